use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bibcheck_core::checker::check_file;
use bibcheck_core::config_file::{self, ConfigFile};
use bibcheck_core::{Convention, EntryOrder, Restriction};
use bibcheck_reporting::types::DEFAULT_LITERATURE_DIR;
use bibcheck_reporting::{LinkOptions, ReportMeta};

mod output;

use output::ColorMode;

const DEFAULT_OUTPUT: &str = "bibtex_check.html";

/// BibTeX Check - review a .bib file for missing fields and naming issues
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bibliography file to check
    #[arg(short, long, value_name = "input.bib")]
    bib: PathBuf,

    /// LaTeX .aux file; when given, only cited entries are checked
    #[arg(short, long, value_name = "input.aux")]
    aux: Option<PathBuf>,

    /// HTML report path [default: bibtex_check.html]
    #[arg(short, long, value_name = "output.html")]
    output: Option<PathBuf>,

    /// Check BibLaTeX conventions instead of BibTeX
    #[arg(short, long)]
    latex: bool,

    /// Config file to use instead of the platform/.bibcheck.toml cascade
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sort report entries by id instead of file order
    #[arg(long)]
    sort: bool,

    /// Percent-encode titles in search links
    #[arg(long)]
    escape_links: bool,

    /// Prefix for the per-entry literature link
    #[arg(long)]
    literature_dir: Option<String>,

    /// Only print the summary, not each problematic entry
    #[arg(long)]
    brief: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bibcheck_core=warn,bibcheck_reporting=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    check(cli)
}

fn load_config(cli: &Cli) -> anyhow::Result<ConfigFile> {
    match &cli.config {
        Some(path) => config_file::load_from_path(path)
            .with_context(|| format!("Could not load config file {}", path.display())),
        None => Ok(config_file::load_config()),
    }
}

fn check(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let report_section = config.report.clone().unwrap_or_default();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut check_config = config.check_config();
    if cli.latex {
        check_config.convention = Convention::BibLaTeX;
    }
    if cli.sort {
        check_config.order = EntryOrder::ById;
    }
    let output_path = cli
        .output
        .clone()
        .or_else(|| std::env::var("BIBCHECK_OUTPUT").ok().map(PathBuf::from))
        .or_else(|| report_section.output.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let links = LinkOptions {
        literature_dir: cli
            .literature_dir
            .clone()
            .or_else(|| std::env::var("BIBCHECK_LITERATURE_DIR").ok())
            .or_else(|| report_section.literature_dir.clone())
            .unwrap_or_else(|| DEFAULT_LITERATURE_DIR.to_string()),
        escape_links: cli.escape_links || report_section.escape_links.unwrap_or(false),
    };
    tracing::debug!(
        output = %output_path.display(),
        convention = check_config.convention.name(),
        rules = ?check_config.rules,
        "resolved configuration"
    );

    let color = ColorMode(!cli.no_color);
    let mut stdout = std::io::stdout();

    if !cli.bib.exists() {
        anyhow::bail!("File not found: {}", cli.bib.display());
    }

    let restriction = match &cli.aux {
        Some(path) => Restriction::from_aux_file(path),
        None => Restriction::Unrestricted,
    };

    let bib_name = cli
        .bib
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.bib.display().to_string());
    output::print_start(
        &mut stdout,
        &bib_name,
        check_config.convention.name(),
        cli.aux.as_deref(),
        restriction.is_active(),
        color,
    )?;

    let report = check_file(&cli.bib, &restriction, check_config)?;

    let meta = ReportMeta {
        bib_file: cli.bib.display().to_string(),
        aux_file: cli
            .aux
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    };
    let html = bibcheck_reporting::render_document(&report, &meta, &links);
    bibcheck_reporting::write_report(&output_path, &html)?;

    if !cli.brief {
        output::print_entry_problems(&mut stdout, &report.entries, color)?;
    }
    output::print_summary(&mut stdout, &report, &output_path, color)?;

    Ok(())
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An outbound search link: the title is appended to `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    pub label: &'static str,
    pub base: &'static str,
}

pub const SEARCH_ENGINES: [SearchEngine; 5] = [
    SearchEngine {
        label: "LibGen",
        base: "http://libgen.rs/search.php?req=",
    },
    SearchEngine {
        label: "LibGenArt",
        base: "http://libgen.rs/scimag/?q=",
    },
    SearchEngine {
        label: "Scholar",
        base: "http://scholar.google.com/scholar?hl=en&q=",
    },
    SearchEngine {
        label: "Google",
        base: "https://www.google.com/search?q=",
    },
    SearchEngine {
        label: "MathSciNet",
        base: "https://mathscinet.ams.org/mathscinet/search/publdoc.html?co4=AND&pg4=AUCN&pg5=TI&r=1&s4=&s5=",
    },
];

pub const DEFAULT_LITERATURE_DIR: &str = "literature/";

/// How links inside a fragment are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Prefix for the reference line link; the entry id is appended.
    pub literature_dir: String,
    /// Percent-encode titles in search links. Off by default: titles are
    /// appended verbatim.
    pub escape_links: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            literature_dir: DEFAULT_LITERATURE_DIR.to_string(),
            escape_links: false,
        }
    }
}

/// Input paths shown in the info panel.
#[derive(Debug, Clone, Default)]
pub struct ReportMeta {
    pub bib_file: String,
    pub aux_file: String,
}

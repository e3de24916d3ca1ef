use std::io::Write;
use std::path::Path;

use bibcheck_core::{CheckedEntry, Report};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the header line before checking starts.
pub fn print_start(
    w: &mut dyn Write,
    bib_name: &str,
    convention: &str,
    aux: Option<&Path>,
    restricted: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Checking {} against {} conventions...", bib_name, convention)?;
    match aux {
        Some(path) if restricted => {
            writeln!(w, "Restricting to entries cited in {}", path.display())?;
        }
        Some(path) => {
            let msg = format!(
                "No citations read from aux file '{}' -> do not restrict entries",
                path.display()
            );
            if color.enabled() {
                writeln!(w, "{}", msg.yellow())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
        None => {}
    }
    writeln!(w)?;
    Ok(())
}

/// Print every reported entry that has at least one problem.
pub fn print_entry_problems(
    w: &mut dyn Write,
    entries: &[CheckedEntry],
    color: ColorMode,
) -> std::io::Result<()> {
    for checked in entries.iter().filter(|c| !c.problems.is_empty()) {
        let header = format!("{} ({})", checked.entry.id, checked.entry.entry_type);
        if color.enabled() {
            writeln!(w, "{}", header.bold().yellow())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        for problem in &checked.problems {
            if color.enabled() {
                writeln!(w, "  {} {}", "-".dimmed(), problem.message)?;
            } else {
                writeln!(w, "  - {}", problem.message)?;
            }
        }
    }
    Ok(())
}

/// Print the final summary panel.
pub fn print_summary(
    w: &mut dyn Write,
    report: &Report,
    output_path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    let c = &report.counters;
    let clean = report.clean_entries();

    writeln!(w)?;
    writeln!(w, "{}", "=".repeat(60))?;
    if color.enabled() {
        writeln!(w, "{}", "SUMMARY".bold())?;
    } else {
        writeln!(w, "SUMMARY")?;
    }
    writeln!(w, "{}", "=".repeat(60))?;
    writeln!(w, "  Entries scanned:  {}", c.entries)?;
    writeln!(w, "  Entries reported: {}", report.entries.len())?;

    if color.enabled() {
        writeln!(w, "  Clean:            {}", clean.green())?;
        writeln!(w, "  Problems:         {}", c.total_problems().red())?;
    } else {
        writeln!(w, "  Clean:            {}", clean)?;
        writeln!(w, "  Problems:         {}", c.total_problems())?;
    }
    writeln!(w, "    missing fields: {}", c.missing_fields)?;
    writeln!(w, "    flawed names:   {}", c.flawed_names)?;
    writeln!(w, "    wrong types:    {}", c.wrong_types)?;
    writeln!(w, "    non-unique ids: {}", c.non_unique_ids)?;
    writeln!(w)?;

    let written = format!("Report written to {}", output_path.display());
    if color.enabled() {
        writeln!(w, "{}", written.dimmed())?;
    } else {
        writeln!(w, "{}", written)?;
    }
    Ok(())
}

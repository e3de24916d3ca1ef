use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CheckError;
use crate::citations::Restriction;
use crate::entry::{CheckedEntry, Entry, Problem};
use crate::rules::{Convention, RuleSet, RuleToggles};
use crate::segmenter::Segmenter;
use crate::state::{Counters, RunState};

/// Order of entries in the report. Encounter order unless sorting is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    #[default]
    Encounter,
    ById,
}

#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    pub convention: Convention,
    pub rules: RuleToggles,
    pub order: EntryOrder,
}

/// Result of one pass over a bibliography.
#[derive(Debug, Clone)]
pub struct Report {
    /// Checked entries, in finalization order unless reordered.
    pub entries: Vec<CheckedEntry>,
    pub counters: Counters,
    pub convention: Convention,
}

impl Report {
    /// The one place entries may be reordered.
    pub fn apply_order(&mut self, order: EntryOrder) {
        match order {
            EntryOrder::Encounter => {}
            EntryOrder::ById => self.entries.sort_by(|a, b| a.entry.id.cmp(&b.entry.id)),
        }
    }

    pub fn clean_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.problems.is_empty()).count()
    }
}

/// Applies the rule set to finalized entries and keeps the run totals.
pub struct Checker {
    rules: RuleSet,
    state: RunState,
    config: CheckConfig,
    checked: Vec<CheckedEntry>,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self::with_rules(config.clone(), RuleSet::new(config.convention, config.rules))
    }

    /// Use a custom rule set instead of the one derived from `config.rules`.
    pub fn with_rules(config: CheckConfig, rules: RuleSet) -> Self {
        Self {
            rules,
            state: RunState::new(),
            config,
            checked: Vec::new(),
        }
    }

    /// Check one finalized entry. Returns `None` for `@string` definitions and
    /// for entries outside the citation restriction; both still count as
    /// scanned entries.
    pub fn check_entry(&mut self, entry: Entry) -> Option<&CheckedEntry> {
        self.state.counters.entries += 1;

        if entry.is_string_macro() || !entry.in_scope {
            tracing::trace!(id = %entry.id, entry_type = %entry.entry_type, "not checked");
            return None;
        }

        let mut problems: Vec<Problem> = Vec::new();
        if !self.state.register_id(&entry.id) {
            problems.push(Problem::non_unique_id(&entry.id));
        }
        problems.extend(self.rules.check(&entry));

        for problem in &problems {
            self.state.counters.record(problem);
        }

        tracing::debug!(id = %entry.id, problems = problems.len(), "entry checked");
        self.checked.push(CheckedEntry { entry, problems });
        self.checked.last()
    }

    pub fn counters(&self) -> &Counters {
        &self.state.counters
    }

    pub fn finish(self) -> Report {
        let mut report = Report {
            entries: self.checked,
            counters: self.state.counters,
            convention: self.config.convention,
        };
        report.apply_order(self.config.order);
        report
    }
}

/// Segment and check bibliography text in one pass.
pub fn check_str(content: &str, restriction: &Restriction, config: CheckConfig) -> Report {
    let mut checker = Checker::new(config);
    let mut segmenter = Segmenter::new(restriction);

    for line in content.lines() {
        if let Some(entry) = segmenter.push_line(line) {
            checker.check_entry(entry);
        }
    }
    if let Some(last) = segmenter.finish() {
        checker.check_entry(last);
    }

    checker.finish()
}

/// Read and check a `.bib` file. Failing to read it is the only fatal error.
pub fn check_file(
    path: &Path,
    restriction: &Restriction,
    config: CheckConfig,
) -> Result<Report, CheckError> {
    let content = std::fs::read_to_string(path).map_err(|source| CheckError::Bibliography {
        path: path.to_path_buf(),
        source,
    })?;
    let report = check_str(&content, restriction, config);
    tracing::info!(
        path = %path.display(),
        entries = report.counters.entries,
        problems = report.counters.total_problems(),
        "bibliography checked"
    );
    Ok(report)
}

//! Per-entry checks.
//!
//! Each heuristic is a [`Rule`]; the [`RuleSet`] holds the enabled ones in
//! evaluation order. Optional heuristics are switched on through
//! [`RuleToggles`] rather than edited out of the code.

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, Problem, ProblemKind};

/// Field-naming convention the bibliography is written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    #[default]
    BibTeX,
    BibLaTeX,
}

impl Convention {
    pub fn required_fields(self) -> &'static RequiredFieldsTable {
        match self {
            Convention::BibTeX => &BIBTEX_REQUIRED,
            Convention::BibLaTeX => &BIBLATEX_REQUIRED,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Convention::BibTeX => "BibTeX",
            Convention::BibLaTeX => "BibLaTeX",
        }
    }
}

/// Static entry-type → mandatory-fields mapping.
#[derive(Debug)]
pub struct RequiredFieldsTable {
    rows: &'static [(&'static str, &'static [&'static str])],
}

impl RequiredFieldsTable {
    /// Exact, case-sensitive lookup. Types without a row have no requirements.
    pub fn fields_for(&self, entry_type: &str) -> Option<&'static [&'static str]> {
        self.rows
            .iter()
            .find(|(t, _)| *t == entry_type)
            .map(|(_, fields)| *fields)
    }
}

static BIBTEX_REQUIRED: RequiredFieldsTable = RequiredFieldsTable {
    rows: &[
        ("article", &["author", "title", "journal", "year", "volume"]),
        ("book", &["author", "publisher", "title", "year", "address"]),
        ("techreport", &["author", "institution", "title", "year"]),
        (
            "inproceedings",
            &["author", "booktitle", "pages", "publisher", "title", "year"],
        ),
        (
            "incollection",
            &["author", "booktitle", "pages", "publisher", "title", "year", "editor"],
        ),
        (
            "inbook",
            &["author", "booktitle", "pages", "publisher", "title", "year"],
        ),
        ("proceedings", &["editor", "publisher", "title", "year"]),
        ("phdthesis", &["author", "school", "title", "year"]),
        ("mastersthesis", &["author", "school", "title", "year"]),
        ("electronic", &["author", "title", "url", "year"]),
        ("misc", &["author", "howpublished", "title", "year"]),
    ],
};

static BIBLATEX_REQUIRED: RequiredFieldsTable = RequiredFieldsTable {
    rows: &[
        ("article", &["author", "title", "journaltitle", "date", "volume"]),
        ("book", &["author", "publisher", "title", "date", "location"]),
        ("report", &["type", "author", "institution", "title", "date"]),
        (
            "inproceedings",
            &["author", "booktitle", "pages", "publisher", "title", "date"],
        ),
        (
            "incollection",
            &["author", "booktitle", "pages", "publisher", "title", "date", "editor"],
        ),
        (
            "inbook",
            &["author", "booktitle", "pages", "publisher", "title", "date"],
        ),
        ("proceedings", &["editor", "publisher", "title", "date"]),
        ("thesis", &["type", "author", "institution", "title", "date"]),
        ("electronic", &["author", "title", "url", "date"]),
        ("misc", &["author", "howpublished", "title", "date"]),
    ],
};

pub trait Rule: Send + Sync {
    /// Stable name, used as the config key.
    fn name(&self) -> &'static str;

    /// Append every problem found on `entry`.
    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>);
}

/// Flags each required field the entry lacks.
pub struct RequiredFields {
    table: &'static RequiredFieldsTable,
}

impl RequiredFields {
    pub fn new(convention: Convention) -> Self {
        Self {
            table: convention.required_fields(),
        }
    }
}

impl Rule for RequiredFields {
    fn name(&self) -> &'static str {
        "required_fields"
    }

    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>) {
        let Some(required) = self.table.fields_for(&entry.entry_type) else {
            return;
        };
        problems.extend(
            required
                .iter()
                .filter(|field| !entry.has_field(field))
                .map(|field| Problem::missing_field(field)),
        );
    }
}

/// A `proceedings` entry with page numbers is probably an `inproceedings`.
pub struct SuspiciousProceedings;

impl Rule for SuspiciousProceedings {
    fn name(&self) -> &'static str {
        "suspicious_proceedings"
    }

    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>) {
        if entry.entry_type != "proceedings" {
            return;
        }
        for _ in entry.fields.iter().filter(|f| f.name == "pages") {
            problems.push(Problem::new(
                ProblemKind::WrongType,
                "wrong type: maybe should be 'inproceedings' because entry has page numbers",
            ));
        }
    }
}

/// Journal names containing a period are assumed to be abbreviated. The
/// period is looked for on the whole physical line, not only in the value.
pub struct AbbreviatedJournal;

impl Rule for AbbreviatedJournal {
    fn name(&self) -> &'static str {
        "abbreviated_journal"
    }

    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>) {
        if entry.entry_type != "article" {
            return;
        }
        for field in &entry.fields {
            if (field.name == "journal" || field.name == "journaltitle") && field.line.contains('.')
            {
                problems.push(Problem::new(
                    ProblemKind::FlawedName,
                    format!("flawed name: abbreviated journal title '{}'", field.value),
                ));
            }
        }
    }
}

/// Expects booktitles shaped like
/// `ICBAB '13: Proceedings of the 13th International Conference on ...`.
pub struct BooktitleFormat;

impl Rule for BooktitleFormat {
    fn name(&self) -> &'static str {
        "booktitle_format"
    }

    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>) {
        if entry.entry_type != "inproceedings" {
            return;
        }
        for field in entry.fields.iter().filter(|f| f.name == "booktitle") {
            let line = field.line.as_str();
            let flawed = !line.contains(':')
                || (!line.contains("Proceedings") && !line.contains("Companion"))
                || line.contains('.')
                || !line.contains(" '")
                || ["workshop", "conference", "symposium"]
                    .iter()
                    .any(|w| line.contains(w));
            if flawed {
                problems.push(Problem::new(
                    ProblemKind::FlawedName,
                    format!(
                        "flawed name: inconsistent formatting of booktitle '{}'",
                        field.value
                    ),
                ));
            }
        }
    }
}

/// Long title words starting lowercase suggest a non-capitalized title.
pub struct TitleCapitalization;

impl TitleCapitalization {
    fn looks_uncapitalized(title: &str) -> bool {
        title.split(' ').any(|word| {
            let word = word.trim_matches(':');
            word.chars().count() > 7
                && word.chars().next().is_some_and(char::is_lowercase)
                && !word.contains(['-', '_', '['])
        })
    }
}

impl Rule for TitleCapitalization {
    fn name(&self) -> &'static str {
        "title_capitalization"
    }

    fn check(&self, entry: &Entry, problems: &mut Vec<Problem>) {
        for field in entry.fields.iter().filter(|f| f.name == "title") {
            let title = crate::segmenter::strip_braces(&field.value);
            if Self::looks_uncapitalized(&title) {
                problems.push(Problem::new(
                    ProblemKind::FlawedName,
                    format!("flawed name: non-capitalized title '{}'", title),
                ));
            }
        }
    }
}

/// Which optional rules run. Field names match [`Rule::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub required_fields: bool,
    pub suspicious_proceedings: bool,
    pub abbreviated_journal: bool,
    pub booktitle_format: bool,
    pub title_capitalization: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            required_fields: true,
            suspicious_proceedings: true,
            abbreviated_journal: true,
            booktitle_format: false,
            title_capitalization: false,
        }
    }
}

/// Enabled rules in evaluation order. Missing-field checks run last.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(convention: Convention, toggles: RuleToggles) -> Self {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        if toggles.suspicious_proceedings {
            rules.push(Box::new(SuspiciousProceedings));
        }
        if toggles.abbreviated_journal {
            rules.push(Box::new(AbbreviatedJournal));
        }
        if toggles.booktitle_format {
            rules.push(Box::new(BooktitleFormat));
        }
        if toggles.title_capitalization {
            rules.push(Box::new(TitleCapitalization));
        }
        if toggles.required_fields {
            rules.push(Box::new(RequiredFields::new(convention)));
        }
        Self { rules }
    }

    /// Add a custom rule after the built-in ones.
    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn check(&self, entry: &Entry) -> Vec<Problem> {
        let mut problems = Vec::new();
        for rule in &self.rules {
            rule.check(entry, &mut problems);
        }
        problems
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(Convention::default(), RuleToggles::default())
    }
}

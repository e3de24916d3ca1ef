use std::fmt;

/// One `name = value` assignment found inside an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Value with surrounding braces, quotes, commas and whitespace stripped.
    pub value: String,
    /// The physical line the assignment was read from.
    pub line: String,
}

/// A bibliography record as seen by the line scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub entry_type: String,
    /// Verbatim non-blank lines, header included.
    pub raw_lines: Vec<String>,
    pub fields: Vec<Field>,
    /// First author, punctuation-stripped. Empty unless the entry is in scope
    /// and had an `author` line.
    pub first_author: String,
    /// Brace-stripped title. Empty unless the entry is in scope and had a
    /// `title` line.
    pub title: String,
    /// Whether the citation restriction covers this entry.
    pub in_scope: bool,
}

impl Entry {
    pub fn new(id: impl Into<String>, entry_type: impl Into<String>, in_scope: bool) -> Self {
        Self {
            id: id.into(),
            entry_type: entry_type.into(),
            in_scope,
            ..Default::default()
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// `@string{...}` macro definitions are scanned but never checked.
    pub fn is_string_macro(&self) -> bool {
        self.entry_type.eq_ignore_ascii_case("string")
    }

    pub fn raw_text(&self) -> String {
        self.raw_lines.join("\n")
    }
}

/// Category of a reviewable issue. Each category has its own run counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    MissingField,
    NonUniqueId,
    WrongType,
    FlawedName,
}

impl ProblemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProblemKind::MissingField => "missing field",
            ProblemKind::NonUniqueId => "non-unique id",
            ProblemKind::WrongType => "wrong type",
            ProblemKind::FlawedName => "flawed name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
}

impl Problem {
    pub fn new(kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ProblemKind::MissingField, format!("missing field '{}'", field))
    }

    pub fn non_unique_id(id: &str) -> Self {
        Self::new(ProblemKind::NonUniqueId, format!("non-unique id: '{}'", id))
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A finalized, in-scope entry together with everything flagged on it.
#[derive(Debug, Clone)]
pub struct CheckedEntry {
    pub entry: Entry,
    pub problems: Vec<Problem>,
}

impl CheckedEntry {
    /// Display tier: 0 is clean, higher is worse.
    pub fn severity(&self) -> usize {
        self.problems.len()
    }
}

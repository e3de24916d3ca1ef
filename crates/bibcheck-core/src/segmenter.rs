//! Line-by-line segmentation of a `.bib` file into entries.
//!
//! This is a heuristic scanner, not a BibTeX grammar: a line starting with
//! `@` opens a record, every other non-blank line belongs to the open record,
//! and any `name = value` assignment on such a line is recorded as a field.
//! Extraction helpers return empty/`None` on malformed input instead of
//! panicking.

use crate::citations::Restriction;
use crate::entry::{Entry, Field};

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `@type{id, ...`. `rest` is whatever follows the first comma.
    RecordStart {
        entry_type: &'a str,
        id: &'a str,
        rest: &'a str,
    },
    Body,
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if !line.starts_with('@') {
        return LineKind::Body;
    }
    LineKind::RecordStart {
        entry_type: extract_type(line),
        id: extract_id(line),
        rest: header_rest(line),
    }
}

/// Text between `@` and the first `{`, trimmed. Without a brace the whole
/// remainder is the type.
pub fn extract_type(header: &str) -> &str {
    let body = header.strip_prefix('@').unwrap_or(header);
    let end = body.find('{').unwrap_or(body.len());
    body[..end].trim()
}

/// Text between the first `{` and the first `,` (or closing `}` / end of
/// line when there is no comma), trimmed. Empty when there is no `{`.
pub fn extract_id(header: &str) -> &str {
    let Some(open) = header.find('{') else {
        return "";
    };
    let after = &header[open + 1..];
    let end = after
        .find(',')
        .or_else(|| after.find('}'))
        .unwrap_or(after.len());
    after[..end].trim()
}

fn header_rest(header: &str) -> &str {
    let Some(open) = header.find('{') else {
        return "";
    };
    let after = &header[open + 1..];
    match after.find(',') {
        Some(comma) => &after[comma + 1..],
        None => "",
    }
}

/// Split on commas that are not nested in braces or quotes.
pub fn split_assignments(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => in_quotes = !in_quotes,
            ',' if depth == 0 && !in_quotes => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse `name = value`. `None` when there is no `=` or the name is empty.
pub fn parse_assignment(segment: &str) -> Option<(&str, &str)> {
    let (name, value) = segment.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, field_value(value)))
}

/// Strip surrounding braces, quotes, commas and whitespace.
pub fn field_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| matches!(c, '{' | '}' | '"' | ',') || c.is_whitespace())
}

/// First `and`-separated author with TeX punctuation removed.
pub fn first_author(value: &str) -> String {
    value
        .split(" and ")
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !matches!(c, '\\' | '"' | '{' | '}'))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn strip_braces(value: &str) -> String {
    value.replace(['{', '}'], "")
}

enum ScanState {
    OutsideEntry,
    InsideEntry(Entry),
}

/// Streaming segmenter. Feed it lines in order; it hands back each entry once
/// the next header (or [`Segmenter::finish`]) closes it.
pub struct Segmenter<'r> {
    restriction: &'r Restriction,
    state: ScanState,
}

impl<'r> Segmenter<'r> {
    pub fn new(restriction: &'r Restriction) -> Self {
        Self {
            restriction,
            state: ScanState::OutsideEntry,
        }
    }

    /// Consume one line. Returns the previous entry when `line` opens a new one.
    pub fn push_line(&mut self, line: &str) -> Option<Entry> {
        let line = line.trim_end_matches(['\n', '\r']);

        match classify_line(line) {
            LineKind::Blank => None,
            LineKind::RecordStart {
                entry_type,
                id,
                rest,
            } => {
                if !line.contains('{') {
                    tracing::warn!(line, "record header without '{{', using an empty id");
                }
                let mut entry = Entry::new(id, entry_type, self.restriction.includes(id));
                entry.raw_lines.push(line.to_string());
                absorb_fields(&mut entry, rest, line);

                match std::mem::replace(&mut self.state, ScanState::InsideEntry(entry)) {
                    // First header of the file: nothing to close.
                    ScanState::OutsideEntry => None,
                    ScanState::InsideEntry(previous) => Some(previous),
                }
            }
            LineKind::Body => match &mut self.state {
                ScanState::OutsideEntry => {
                    tracing::trace!(line, "ignoring text before first entry");
                    None
                }
                ScanState::InsideEntry(entry) => {
                    entry.raw_lines.push(line.to_string());
                    absorb_fields(entry, line, line);
                    None
                }
            },
        }
    }

    /// Close the pending entry at end of input.
    pub fn finish(self) -> Option<Entry> {
        match self.state {
            ScanState::OutsideEntry => None,
            ScanState::InsideEntry(entry) => Some(entry),
        }
    }
}

fn absorb_fields(entry: &mut Entry, text: &str, line: &str) {
    for segment in split_assignments(text) {
        let Some((name, value)) = parse_assignment(segment) else {
            continue;
        };
        if entry.in_scope {
            match name {
                "author" => entry.first_author = first_author(value),
                "title" => entry.title = strip_braces(value),
                _ => {}
            }
        }
        entry.fields.push(Field {
            name: name.to_string(),
            value: value.to_string(),
            line: line.to_string(),
        });
    }
}

/// Segment a whole document.
pub fn segment_str(content: &str, restriction: &Restriction) -> Vec<Entry> {
    let mut segmenter = Segmenter::new(restriction);
    let mut entries: Vec<Entry> = content
        .lines()
        .filter_map(|line| segmenter.push_line(line))
        .collect();
    entries.extend(segmenter.finish());
    entries
}

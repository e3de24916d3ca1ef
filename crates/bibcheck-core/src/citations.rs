use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Which entries are subject to checking.
///
/// An aux file that lists no keys never means "restrict to nothing": it is
/// read as [`Restriction::Unrestricted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Restriction {
    #[default]
    Unrestricted,
    Restricted(HashSet<String>),
}

impl Restriction {
    /// Build a restriction from keys; an empty list or a `*` key (written by
    /// `\nocite{*}`) lifts the restriction.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: HashSet<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() || keys.contains("*") {
            Restriction::Unrestricted
        } else {
            Restriction::Restricted(keys)
        }
    }

    /// Collect keys from every `\citation{a,b,...}` line of an aux file.
    pub fn from_aux_str(content: &str) -> Self {
        static CITATION_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\\citation\{([^}]*)").unwrap());

        let keys = content
            .lines()
            .filter_map(|line| CITATION_RE.captures(line))
            .flat_map(|caps| {
                caps[1]
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .collect::<Vec<_>>()
            });
        Self::from_keys(keys)
    }

    /// Read an aux file. An unreadable file disables the restriction with a
    /// warning instead of failing the run.
    pub fn from_aux_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let restriction = Self::from_aux_str(&content);
                if let Restriction::Restricted(keys) = &restriction {
                    tracing::debug!(path = %path.display(), keys = keys.len(), "loaded citation keys");
                } else {
                    tracing::warn!(path = %path.display(), "aux file lists no citations, not restricting entries");
                }
                restriction
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "no aux file, not restricting entries"
                );
                Restriction::Unrestricted
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Restriction::Restricted(_))
    }

    pub fn includes(&self, id: &str) -> bool {
        match self {
            Restriction::Unrestricted => true,
            Restriction::Restricted(keys) => keys.contains(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_citation_lines() {
        let aux = "\\relax\n\\citation{A,C}\n\\citation{D}\n\\bibdata{refs}\n";
        let r = Restriction::from_aux_str(aux);
        assert!(r.includes("A"));
        assert!(r.includes("C"));
        assert!(r.includes("D"));
        assert!(!r.includes("B"));
        assert!(!r.includes("bibdata"));
    }

    #[test]
    fn skips_empty_keys() {
        let r = Restriction::from_aux_str("\\citation{A,,B,}\n");
        match r {
            Restriction::Restricted(keys) => assert_eq!(keys.len(), 2),
            Restriction::Unrestricted => panic!("expected a restriction"),
        }
    }

    #[test]
    fn empty_aux_is_unrestricted() {
        let r = Restriction::from_aux_str("\\relax\n\\bibstyle{plain}\n");
        assert_eq!(r, Restriction::Unrestricted);
        assert!(r.includes("anything"));
    }

    #[test]
    fn nocite_star_is_unrestricted() {
        let r = Restriction::from_aux_str("\\citation{A}\n\\citation{*}\n");
        assert!(!r.is_active());
        assert!(r.includes("B"));
    }

    #[test]
    fn missing_aux_file_is_unrestricted() {
        let r = Restriction::from_aux_file(Path::new("/nonexistent/dir/paper.aux"));
        assert_eq!(r, Restriction::Unrestricted);
    }
}

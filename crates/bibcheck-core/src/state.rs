use std::collections::HashSet;

use crate::entry::{Problem, ProblemKind};

/// Run-wide totals. Only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    /// Every record header scanned, including `@string` and out-of-scope ones.
    pub entries: usize,
    pub missing_fields: usize,
    pub flawed_names: usize,
    pub wrong_types: usize,
    pub non_unique_ids: usize,
}

impl Counters {
    pub fn total_problems(&self) -> usize {
        self.missing_fields + self.flawed_names + self.wrong_types + self.non_unique_ids
    }

    pub fn record(&mut self, problem: &Problem) {
        match problem.kind {
            ProblemKind::MissingField => self.missing_fields += 1,
            ProblemKind::FlawedName => self.flawed_names += 1,
            ProblemKind::WrongType => self.wrong_types += 1,
            ProblemKind::NonUniqueId => self.non_unique_ids += 1,
        }
    }
}

/// Mutable state of one checking pass, owned by the checker.
#[derive(Debug, Default)]
pub struct RunState {
    pub counters: Counters,
    seen_ids: HashSet<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id`. Returns `false` if it was already seen.
    pub fn register_id(&mut self, id: &str) -> bool {
        if self.seen_ids.contains(id) {
            false
        } else {
            self.seen_ids.insert(id.to_string());
            true
        }
    }

    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }
}

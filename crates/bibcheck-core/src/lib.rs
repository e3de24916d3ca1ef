use std::path::PathBuf;

use thiserror::Error;

pub mod checker;
pub mod citations;
pub mod config_file;
pub mod entry;
pub mod rules;
pub mod segmenter;
pub mod state;

// Re-export for convenience
pub use checker::{CheckConfig, Checker, EntryOrder, Report};
pub use citations::Restriction;
pub use entry::{CheckedEntry, Entry, Field, Problem, ProblemKind};
pub use rules::{Convention, RequiredFieldsTable, Rule, RuleSet, RuleToggles};
pub use state::{Counters, RunState};

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to read bibliography {path}: {source}")]
    Bibliography {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

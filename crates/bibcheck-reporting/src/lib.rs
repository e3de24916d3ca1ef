pub mod export;
mod shell;
pub mod types;

pub use export::{render_document, render_fragment, write_report};
pub use types::{LinkOptions, ReportError, ReportMeta, SEARCH_ENGINES, SearchEngine};

//! Command handlers for the paperqa CLI.

pub mod chat;
pub mod check;
pub mod summarize;

pub use chat::ChatCommand;
pub use check::CheckCommand;
pub use summarize::SummarizeCommand;

use paperqa_knowledge::{ProgressEvent, ProgressReporter};
use std::sync::Arc;

/// Rule printed around results.
pub(crate) const RULE_WIDTH: usize = 70;

pub(crate) fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Reporter that prints each pipeline phase to stderr.
pub(crate) fn stderr_progress(enabled: bool) -> ProgressReporter {
    if !enabled {
        return ProgressReporter::noop();
    }

    ProgressReporter::new(Arc::new(|event: ProgressEvent| {
        eprintln!("{}", event.format_simple());
    }))
}

//! Retrieval-augmented summarization and question answering.
//!
//! Both pipelines run normalize, chunk, score, select and assemble over an
//! in-memory document, then make a single generation request.

pub mod ask;
pub mod assistant;
pub mod summarize;
pub mod types;

pub use ask::{ChatSession, SUMMARY_QUESTION};
pub use assistant::{PaperAssistant, PromptSet, DEFAULT_ANSWER_TIMEOUT, DEFAULT_SUMMARY_TIMEOUT};
pub use types::{ChatAnswer, SummaryReport};

//! Document retrieval pipeline for paperqa.
//!
//! Turns one paper into normalized text, overlapping sentence-aware chunks,
//! lexical relevance scores and a bounded context block, then hands that
//! context to a generation backend. Nothing is persisted between requests.

pub mod chunker;
pub mod config;
pub mod context;
pub mod extract;
pub mod normalize;
pub mod progress;
pub mod rag;
pub mod scoring;
pub mod select;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunker::{chunk_text, ChunkConfig, Chunker};
pub use config::{PipelineConfig, RetrievalProfile};
pub use context::{ContextAssembler, SectionLabel};
pub use extract::{ContentType, Document, FileExtractor, TextExtractor, MIN_DOCUMENT_CHARS};
pub use normalize::normalize;
pub use progress::{ProgressCallback, ProgressEvent, ProgressReporter};
pub use rag::{ChatAnswer, ChatSession, PaperAssistant, PromptSet, SummaryReport, SUMMARY_QUESTION};
pub use scoring::{QueryTerms, RelevanceScorer, ScoringMode, DEFAULT_KEYWORDS};
pub use select::{rank, select_top_k};
pub use types::{Chunk, ScoredChunk};

//! Pipeline type definitions.

use serde::{Deserialize, Serialize};

/// A contiguous, trimmed segment of the normalized document.
///
/// Chunks may overlap in source offsets but each owns its text and never
/// changes after the chunker produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Ordinal in the produced sequence (0-indexed)
    pub index: usize,

    /// Character offset of `text` in the normalized document
    pub start: usize,

    /// Trimmed chunk text
    pub text: String,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(index: usize, start: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            text: text.into(),
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Character offset one past the last character of `text`.
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }
}

/// A chunk paired with its relevance score for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Non-negative relevance score
    pub score: f64,

    /// The scored chunk
    pub chunk: Chunk,
}

impl ScoredChunk {
    pub fn new(score: f64, chunk: Chunk) -> Self {
        Self { score, chunk }
    }
}

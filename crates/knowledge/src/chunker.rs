//! Sentence-aware sliding-window chunking.
//!
//! All sizes and offsets are counted in characters, not bytes.

use crate::types::Chunk;
use paperqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Terminators a window may be snapped to, each followed by a space.
const SENTENCE_BREAKS: [&str; 3] = [". ", "? ", "! "];

/// Chunking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive windows
    pub overlap: usize,

    /// A sentence break is only used when it sits past this fraction of `chunk_size`
    pub boundary_fraction: f64,

    /// Trimmed chunks shorter than this are dropped
    #[serde(default)]
    pub min_chunk_chars: usize,

    /// Stop after producing this many chunks; `null` means no cap
    #[serde(default)]
    pub max_chunks: Option<usize>,
}

impl ChunkConfig {
    /// Whole-document summarization preset.
    pub fn summary() -> Self {
        Self {
            chunk_size: 600,
            overlap: 100,
            boundary_fraction: 0.4,
            min_chunk_chars: 0,
            max_chunks: None,
        }
    }

    /// Interactive question-answering preset.
    pub fn chat() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            boundary_fraction: 0.3,
            min_chunk_chars: 50,
            max_chunks: Some(200),
        }
    }

    /// Reject parameters that would stall the cursor or make snapping meaningless.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        if self.overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }

        if !(0.0..1.0).contains(&self.boundary_fraction) {
            return Err(AppError::Config(format!(
                "boundary fraction must be in [0, 1), got {}",
                self.boundary_fraction
            )));
        }

        if self.max_chunks == Some(0) {
            return Err(AppError::Config(
                "max chunks must be at least one when set".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::summary()
    }
}

/// Splits normalized text into overlapping, sentence-respecting chunks.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a chunker, validating the configuration first.
    pub fn new(config: ChunkConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk `text` into overlapping segments.
    ///
    /// Windows open on a non-whitespace character, so chunk starts strictly
    /// increase. Each window is at most `chunk_size` characters. A window that does not
    /// reach the end of the text is shortened to end just after its last
    /// sentence break, provided that break lies past `boundary_fraction` of
    /// the chunk size. The next window starts `overlap` characters before the
    /// previous end, and always strictly after the previous start.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every character, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let len = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < len {
            // Windows open on the first non-whitespace character.
            while start < len && text[offsets[start]..].starts_with(char::is_whitespace) {
                start += 1;
            }
            if start >= len {
                break;
            }

            let mut end = (start + self.config.chunk_size).min(len);

            if end < len {
                let window = &text[offsets[start]..offsets[end]];
                if let Some(cut) = self.sentence_cut(window) {
                    end = start + cut;
                }
            }

            let trimmed = text[offsets[start]..offsets[end]].trim_end();
            let trimmed_len = trimmed.chars().count();

            if !trimmed.is_empty() && trimmed_len >= self.config.min_chunk_chars {
                chunks.push(Chunk::new(chunks.len(), start, trimmed));

                if self
                    .config
                    .max_chunks
                    .is_some_and(|max| chunks.len() >= max)
                {
                    tracing::debug!("Reached chunk cap of {}", chunks.len());
                    break;
                }
            }

            if end >= len {
                break;
            }

            let next = end.saturating_sub(self.config.overlap);
            start = if next > start { next } else { end };
        }

        tracing::debug!(
            "Chunked {} characters into {} chunks (size: {}, overlap: {})",
            len,
            chunks.len(),
            self.config.chunk_size,
            self.config.overlap
        );

        chunks
    }

    /// Character length the window should be cut to, if it has a usable sentence break.
    fn sentence_cut(&self, window: &str) -> Option<usize> {
        let byte_pos = SENTENCE_BREAKS
            .iter()
            .filter_map(|brk| window.rfind(brk))
            .max()?;
        let char_pos = window[..byte_pos].chars().count();

        let threshold = self.config.chunk_size as f64 * self.config.boundary_fraction;
        if char_pos as f64 > threshold {
            // Keep the terminator and its trailing space.
            Some(char_pos + 2)
        } else {
            None
        }
    }
}

/// Chunk text with the given size and overlap using the summary defaults otherwise.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<Chunk>> {
    let chunker = Chunker::new(ChunkConfig {
        chunk_size,
        overlap,
        ..ChunkConfig::summary()
    })?;
    Ok(chunker.chunk(text))
}

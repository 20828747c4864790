//! Labeled context assembly for generation prompts.

use crate::types::Chunk;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between labeled blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Label prefixed to each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLabel {
    Section,
    Excerpt,
}

impl SectionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "Section",
            Self::Excerpt => "Excerpt",
        }
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins selected chunks into one bounded, labeled context block.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    label: SectionLabel,
    per_chunk_limit: Option<usize>,
    max_total_chars: Option<usize>,
}

impl ContextAssembler {
    pub fn new(label: SectionLabel) -> Self {
        Self {
            label,
            per_chunk_limit: None,
            max_total_chars: None,
        }
    }

    /// Hard-cut each chunk to at most `limit` characters.
    pub fn with_per_chunk_limit(mut self, limit: Option<usize>) -> Self {
        self.per_chunk_limit = limit;
        self
    }

    /// Bound the whole context to `max` characters.
    pub fn with_max_total_chars(mut self, max: Option<usize>) -> Self {
        self.max_total_chars = max;
        self
    }

    /// Assemble `chunks` in the given order.
    ///
    /// Blocks read `"{label} {n}:\n{text}"` with `n` counting from 1 over the
    /// selected chunks. Under a total bound, assembly stops at the first block
    /// that would not fit; the first block is cut to the bound instead.
    pub fn assemble(&self, chunks: &[Chunk]) -> String {
        let mut context = String::new();
        let mut total = 0usize;

        for (i, chunk) in chunks.iter().enumerate() {
            let body = match self.per_chunk_limit {
                Some(limit) => truncate_chars(&chunk.text, limit),
                None => chunk.text.as_str(),
            };
            let block = format!("{} {}:\n{}", self.label, i + 1, body);
            let block_chars = block.chars().count();
            let separator_chars = if i == 0 { 0 } else { BLOCK_SEPARATOR.len() };

            if let Some(max) = self.max_total_chars {
                if total + separator_chars + block_chars > max {
                    if i == 0 {
                        context.push_str(truncate_chars(&block, max));
                    }
                    tracing::debug!(
                        "Context bound of {} characters reached after {} of {} blocks",
                        max,
                        i.max(1),
                        chunks.len()
                    );
                    break;
                }
            }

            if i > 0 {
                context.push_str(BLOCK_SEPARATOR);
            }
            context.push_str(&block);
            total += separator_chars + block_chars;
        }

        context
    }
}

/// Prefix of `text` holding at most `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i * 7, i * 100, *t))
            .collect()
    }

    #[test]
    fn test_labels_follow_selection_order() {
        // Original indices are 0, 7, 14; labels must still count 1, 2, 3.
        let context = ContextAssembler::new(SectionLabel::Section)
            .assemble(&chunks(&["first", "second", "third"]));

        assert_eq!(
            context,
            "Section 1:\nfirst\n\nSection 2:\nsecond\n\nSection 3:\nthird"
        );
    }

    #[test]
    fn test_excerpt_label_and_per_chunk_limit() {
        let context = ContextAssembler::new(SectionLabel::Excerpt)
            .with_per_chunk_limit(Some(4))
            .assemble(&chunks(&["abcdefgh", "xy"]));

        assert_eq!(context, "Excerpt 1:\nabcd\n\nExcerpt 2:\nxy");
    }

    #[test]
    fn test_total_bound_drops_overflowing_blocks() {
        // "Section 1:\naaaa" is 15 chars, the next block adds 2 + 15.
        let assembler =
            ContextAssembler::new(SectionLabel::Section).with_max_total_chars(Some(20));
        let context = assembler.assemble(&chunks(&["aaaa", "bbbb"]));
        assert_eq!(context, "Section 1:\naaaa");
    }

    #[test]
    fn test_total_bound_cuts_first_block() {
        let assembler =
            ContextAssembler::new(SectionLabel::Section).with_max_total_chars(Some(13));
        let context = assembler.assemble(&chunks(&["abcdefgh"]));
        assert_eq!(context, "Section 1:\nab");
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(ContextAssembler::new(SectionLabel::Excerpt).assemble(&[]), "");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
        assert_eq!(truncate_chars("hi", 0), "");
    }
}

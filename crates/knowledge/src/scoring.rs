//! Lexical relevance scoring.
//!
//! Two policies: a fixed research-paper keyword list for whole-document
//! summaries, and significant question words for interactive answers.
//! Both are pure functions of the chunk text and the term set.

use crate::types::{Chunk, ScoredChunk};
use std::collections::BTreeSet;

/// Vocabulary that marks structurally important parts of a research paper.
pub const DEFAULT_KEYWORDS: [&str; 19] = [
    "abstract",
    "introduction",
    "method",
    "approach",
    "result",
    "finding",
    "conclusion",
    "contribution",
    "propose",
    "show",
    "demonstrate",
    "experiment",
    "evaluation",
    "performance",
    "research",
    "study",
    "analysis",
    "data",
    "model",
];

/// Question words must be longer than this many characters to count.
pub const MIN_TERM_EXCLUSIVE: usize = 3;

/// Keyword mode adds `chars / LENGTH_BONUS_DIVISOR` to favor substantial chunks.
pub const LENGTH_BONUS_DIVISOR: f64 = 1000.0;

/// Flat bonus in question mode when at least one term occurs.
pub const PRESENCE_BONUS: f64 = 0.5;

/// Significant, lower-cased words of a question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms(BTreeSet<String>);

impl QueryTerms {
    /// Extract terms from free text.
    ///
    /// Splits on anything that is not alphanumeric, so trailing punctuation
    /// ("used?") does not stop a term from matching.
    pub fn from_question(question: &str) -> Self {
        let terms = question
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() > MIN_TERM_EXCLUSIVE)
            .map(str::to_string)
            .collect();
        Self(terms)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Scoring policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringMode {
    /// Keyword hits plus a small length bonus
    Keywords(Vec<String>),
    /// Question-term hits plus a flat presence bonus
    QuestionTerms(QueryTerms),
}

impl ScoringMode {
    /// Keyword mode over [`DEFAULT_KEYWORDS`].
    pub fn research_keywords() -> Self {
        Self::keywords(DEFAULT_KEYWORDS)
    }

    /// Keyword mode over a custom list; keywords are matched case-insensitively.
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Keywords(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    /// Question mode for the given question text.
    pub fn question(question: &str) -> Self {
        Self::QuestionTerms(QueryTerms::from_question(question))
    }
}

/// Scores chunks under one policy.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    mode: ScoringMode,
}

impl RelevanceScorer {
    pub fn new(mode: ScoringMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> &ScoringMode {
        &self.mode
    }

    /// Score a piece of text.
    pub fn score_text(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();

        match &self.mode {
            ScoringMode::Keywords(keywords) => {
                let hits = count_hits(&lower, keywords.iter().map(String::as_str));
                hits as f64 + text.chars().count() as f64 / LENGTH_BONUS_DIVISOR
            }
            ScoringMode::QuestionTerms(terms) => {
                let hits = count_hits(&lower, terms.iter());
                if hits > 0 {
                    hits as f64 + PRESENCE_BONUS
                } else {
                    0.0
                }
            }
        }
    }

    /// Score one chunk.
    pub fn score(&self, chunk: &Chunk) -> f64 {
        self.score_text(&chunk.text)
    }

    /// Score every chunk, keeping input order.
    pub fn score_all(&self, chunks: &[Chunk]) -> Vec<ScoredChunk> {
        let scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk::new(self.score(chunk), chunk.clone()))
            .collect();

        tracing::trace!(
            scores = ?scored.iter().map(|s| s.score).collect::<Vec<_>>(),
            "Scored {} chunks",
            scored.len()
        );

        scored
    }
}

/// Number of distinct terms that occur as substrings of `haystack`.
fn count_hits<'a>(haystack: &str, terms: impl Iterator<Item = &'a str>) -> usize {
    terms.filter(|term| haystack.contains(term)).count()
}

//! Pipeline result types.

use serde::{Deserialize, Serialize};

/// Outcome of summarizing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// Source file name
    pub file: String,

    /// Characters of raw extracted text
    pub text_length: usize,

    /// Chunks produced from the document
    pub chunks_total: usize,

    /// Chunks sent to the model
    pub chunks_used: usize,

    /// Generated summary
    pub summary: String,
}

/// Answer to one interactive question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    pub question: String,

    /// Generated answer, or a fixed message when nothing matched
    pub answer: String,

    /// Excerpts sent to the model
    pub excerpts_used: usize,

    /// True when no chunk matched and the backend was not called
    pub no_information: bool,

    /// Internal: highest chunk score for this question
    #[serde(skip_serializing, default)]
    pub best_score: f64,
}

impl ChatAnswer {
    pub fn new(question: &str, answer: String, excerpts_used: usize, best_score: f64) -> Self {
        Self {
            question: question.to_string(),
            answer,
            excerpts_used,
            no_information: false,
            best_score,
        }
    }

    /// Answer returned when no part of the paper matches the question.
    pub fn no_information(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: format!(
                "I could not find a section of the paper relevant to \"{}\". \
                 Try rephrasing with terms the paper is likely to use.",
                question
            ),
            excerpts_used: 0,
            no_information: true,
            best_score: 0.0,
        }
    }
}

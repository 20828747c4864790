//! Interactive question answering over one document.

use crate::chunker::Chunker;
use crate::extract::Document;
use crate::normalize::normalize;
use crate::rag::assistant::{assembler_for, PaperAssistant};
use crate::rag::types::ChatAnswer;
use crate::scoring::{RelevanceScorer, ScoringMode};
use crate::select::select_top_k;
use crate::types::{Chunk, ScoredChunk};
use paperqa_core::AppResult;
use std::collections::HashMap;

/// Question the `summary` chat command expands to.
pub const SUMMARY_QUESTION: &str = "Provide a comprehensive summary of this paper: the research \
     question, the methodology, the key findings and results, and the main conclusions.";

/// Chunks of one document, held for the length of an interactive session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    document_name: String,
    text_length: usize,
    chunks: Vec<Chunk>,
}

impl ChatSession {
    pub fn new(document_name: impl Into<String>, text_length: usize, chunks: Vec<Chunk>) -> Self {
        Self {
            document_name: document_name.into(),
            text_length,
            chunks,
        }
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn text_length(&self) -> usize {
        self.text_length
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl PaperAssistant {
    /// Chunk a document once for a series of questions.
    pub fn open_chat(&self, document: &Document) -> AppResult<ChatSession> {
        let normalized = normalize(document.text());
        let chunks = Chunker::new(self.config().chat.chunking.clone())?.chunk(&normalized);
        self.progress().chunk(normalized.chars().count(), chunks.len());

        tracing::info!(
            "Opened chat on {} with {} chunks",
            document.file_name(),
            chunks.len()
        );

        Ok(ChatSession::new(
            document.file_name(),
            document.char_count(),
            chunks,
        ))
    }

    /// Answer one question from the session's best-matching excerpts.
    ///
    /// Chunks sharing no term with the question are never sent. When none
    /// match, the backend is not called and a no-information answer is
    /// returned instead.
    pub async fn answer(&self, session: &ChatSession, question: &str) -> AppResult<ChatAnswer> {
        let question = question.trim();
        let profile = &self.config().chat;

        let relevant: Vec<ScoredChunk> = RelevanceScorer::new(ScoringMode::question(question))
            .score_all(session.chunks())
            .into_iter()
            .filter(|s| s.score > 0.0)
            .collect();
        let best_score = relevant.iter().map(|s| s.score).fold(0.0, f64::max);

        let selected = select_top_k(relevant, profile.top_k);
        self.progress().retrieve(selected.len(), session.chunk_count());

        if selected.is_empty() {
            tracing::info!("No chunk matched question: {}", question);
            return Ok(ChatAnswer::no_information(question));
        }

        tracing::debug!(
            selected = ?selected.iter().map(|c| c.index).collect::<Vec<_>>(),
            best_score,
            "Selected {} excerpts",
            selected.len()
        );

        let context = assembler_for(profile).assemble(&selected);
        let variables = HashMap::from([
            ("context".to_string(), context),
            ("question".to_string(), question.to_string()),
        ]);
        let answer = self
            .generate(&self.prompts().answer, variables, self.answer_timeout())
            .await?;

        self.progress().done();

        Ok(ChatAnswer::new(question, answer, selected.len(), best_score))
    }
}

//! Whole-document summarization.

use crate::chunker::Chunker;
use crate::extract::{Document, MIN_DOCUMENT_CHARS};
use crate::normalize::normalize;
use crate::rag::assistant::{assembler_for, PaperAssistant};
use crate::rag::types::SummaryReport;
use crate::scoring::{RelevanceScorer, ScoringMode};
use crate::select::select_top_k;
use paperqa_core::{AppError, AppResult};
use std::collections::HashMap;

impl PaperAssistant {
    /// Summarize a document from its most keyword-rich sections.
    pub async fn summarize(&self, document: &Document) -> AppResult<SummaryReport> {
        let profile = &self.config().summary;
        tracing::info!(
            "Summarizing {} ({} characters)",
            document.file_name(),
            document.char_count()
        );

        let normalized = normalize(document.text());
        let chunks = Chunker::new(profile.chunking.clone())?.chunk(&normalized);
        self.progress().chunk(normalized.chars().count(), chunks.len());

        if chunks.is_empty() {
            return Err(AppError::InsufficientContent {
                chars: normalized.chars().count(),
                min: MIN_DOCUMENT_CHARS,
            });
        }

        let scored = RelevanceScorer::new(ScoringMode::research_keywords()).score_all(&chunks);
        let selected = select_top_k(scored, profile.top_k);
        self.progress().retrieve(selected.len(), chunks.len());

        tracing::debug!(
            selected = ?selected.iter().map(|c| c.index).collect::<Vec<_>>(),
            "Selected {} of {} chunks",
            selected.len(),
            chunks.len()
        );

        let context = assembler_for(profile).assemble(&selected);
        let variables = HashMap::from([("context".to_string(), context)]);
        let summary = self
            .generate(&self.prompts().summarize, variables, self.summary_timeout())
            .await?;

        self.progress().done();

        Ok(SummaryReport {
            file: document.file_name(),
            text_length: document.char_count(),
            chunks_total: chunks.len(),
            chunks_used: selected.len(),
            summary,
        })
    }
}

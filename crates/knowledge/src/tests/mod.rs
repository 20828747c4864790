//! Cross-module tests for the retrieval pipeline.

mod assistant_flow;
mod pipeline_ranking;

use async_trait::async_trait;
use paperqa_core::{AppError, AppResult};
use paperqa_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Paper-like text whose sections hit different research keywords.
pub(crate) const PAPER_TEXT: &str = "Abstract. This paper studies X. Introduction. We propose Y. \
     Method. We use Z. Results. We found W. Conclusion. We conclude V.";

/// Backend double that records every request.
pub(crate) struct RecordingClient {
    reply: Box<dyn Fn(usize) -> AppResult<String> + Send + Sync>,
    calls: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl RecordingClient {
    /// Always answers with `text`.
    pub(crate) fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move |_| Ok(text.clone()))
    }

    /// Always fails with a timeout.
    pub(crate) fn timing_out(secs: u64) -> Self {
        Self::with(move |_| Err(AppError::Timeout { secs }))
    }

    /// Reply computed from the zero-based call number.
    pub(crate) fn with(reply: impl Fn(usize) -> AppResult<String> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for RecordingClient {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let content = (self.reply)(call)?;
        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(0, 0),
            done: true,
        })
    }
}

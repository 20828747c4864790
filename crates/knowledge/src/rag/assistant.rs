//! Shared state for the summarize and chat pipelines.

use crate::config::{self, PipelineConfig, RetrievalProfile};
use crate::context::ContextAssembler;
use crate::extract::{Document, FileExtractor, TextExtractor};
use crate::progress::ProgressReporter;
use paperqa_core::{AppConfig, AppResult};
use paperqa_llm::{create_client, LlmClient, LlmRequest};
use paperqa_prompt::{
    build_prompt, builtin_prompt, load_prompt, PromptDefinition, ANSWER_PROMPT_ID,
    SUMMARIZE_PROMPT_ID,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default wait for a whole-document summary.
pub const DEFAULT_SUMMARY_TIMEOUT: Duration = Duration::from_secs(120);

/// Default wait for one interactive answer.
pub const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(60);

/// Prompt definitions used by the two pipelines.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub summarize: PromptDefinition,
    pub answer: PromptDefinition,
}

impl PromptSet {
    /// Built-in definitions only.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self {
            summarize: builtin_prompt(SUMMARIZE_PROMPT_ID)?,
            answer: builtin_prompt(ANSWER_PROMPT_ID)?,
        })
    }

    /// Workspace overrides where present, built-ins otherwise.
    pub fn load(workspace: &Path) -> AppResult<Self> {
        Ok(Self {
            summarize: load_prompt(workspace, SUMMARIZE_PROMPT_ID)?,
            answer: load_prompt(workspace, ANSWER_PROMPT_ID)?,
        })
    }
}

/// Summarizes papers and answers questions about them.
///
/// Holds no per-document state; chunk lists live in the caller's
/// [`ChatSession`](crate::rag::ChatSession) or only for one `summarize` call.
pub struct PaperAssistant {
    client: Arc<dyn LlmClient>,
    model: String,
    config: PipelineConfig,
    prompts: PromptSet,
    summary_timeout: Duration,
    answer_timeout: Duration,
    progress: ProgressReporter,
    extractor: Arc<dyn TextExtractor>,
}

impl PaperAssistant {
    /// Create an assistant with default pipeline settings and built-in prompts.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client,
            model: model.into(),
            config: PipelineConfig::default(),
            prompts: PromptSet::builtin()?,
            summary_timeout: DEFAULT_SUMMARY_TIMEOUT,
            answer_timeout: DEFAULT_ANSWER_TIMEOUT,
            progress: ProgressReporter::noop(),
            extractor: Arc::new(FileExtractor),
        })
    }

    /// Wire an assistant from application configuration.
    ///
    /// Reads the pipeline file and prompt overrides from the workspace.
    pub fn from_app_config(app: &AppConfig) -> AppResult<Self> {
        app.validate()?;

        let client = create_client(&app.provider, Some(&app.endpoint))?;
        let assistant = Self::new(client, app.model.clone())?
            .with_config(config::load_config(&app.workspace)?)
            .with_prompts(PromptSet::load(&app.workspace)?)
            .with_timeouts(app.summary_timeout(), app.answer_timeout());

        tracing::debug!(
            provider = %app.provider,
            model = %app.model,
            endpoint = %app.endpoint,
            "Assistant configured"
        );

        Ok(assistant)
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_timeouts(mut self, summary: Duration, answer: Duration) -> Self {
        self.summary_timeout = summary;
        self.answer_timeout = answer;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub(crate) fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    pub(crate) fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    pub(crate) fn summary_timeout(&self) -> Duration {
        self.summary_timeout
    }

    pub(crate) fn answer_timeout(&self) -> Duration {
        self.answer_timeout
    }

    /// Extract a document with the configured extractor.
    pub fn load_document(&self, path: &Path) -> AppResult<Document> {
        self.progress.extract(&path.display().to_string());
        Document::load(path, self.extractor.as_ref())
    }

    /// Render `definition` and send it to the backend.
    pub(crate) async fn generate(
        &self,
        definition: &PromptDefinition,
        variables: HashMap<String, String>,
        timeout: Duration,
    ) -> AppResult<String> {
        let built = build_prompt(definition, variables)?;
        self.progress.generate(&self.model, built.char_count());

        tracing::debug!(
            prompt = %definition.id,
            chars = built.char_count(),
            timeout_secs = timeout.as_secs(),
            "Sending generation request"
        );

        let request = LlmRequest::new(built.text, self.model.clone()).with_timeout(timeout);
        let response = self.client.complete(&request).await?;

        Ok(response.content.trim().to_string())
    }
}

/// Context assembler configured from a retrieval profile.
pub(crate) fn assembler_for(profile: &RetrievalProfile) -> ContextAssembler {
    ContextAssembler::new(profile.label)
        .with_per_chunk_limit(profile.per_chunk_limit)
        .with_max_total_chars(profile.max_context_chars)
}

impl std::fmt::Debug for PaperAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperAssistant")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("config", &self.config)
            .field("summary_timeout", &self.summary_timeout)
            .field("answer_timeout", &self.answer_timeout)
            .finish()
    }
}

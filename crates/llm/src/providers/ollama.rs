//! Ollama LLM provider implementation.
//!
//! This module provides integration with Ollama, a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use paperqa_core::config::DEFAULT_ENDPOINT;
use paperqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback timeout when a request does not carry one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize, PartialEq)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: String,
    response: String,
    #[serde(default = "default_done")]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

fn default_done() -> bool {
    true
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_ENDPOINT)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert LlmRequest to Ollama format.
    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaRequest {
        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options,
        }
    }

    /// Convert Ollama response to LlmResponse.
    fn convert_response(&self, response: OllamaResponse, requested_model: &str) -> LlmResponse {
        let usage = LlmUsage::new(
            response.prompt_eval_count.unwrap_or(0),
            response.eval_count.unwrap_or(0),
        );

        let model = if response.model.is_empty() {
            requested_model.to_string()
        } else {
            response.model
        };

        LlmResponse {
            content: response.response,
            model,
            usage,
            done: response.done,
        }
    }

    /// Map a transport failure to the error taxonomy.
    fn map_send_error(&self, err: reqwest::Error, timeout: Duration) -> AppError {
        if err.is_timeout() {
            AppError::Timeout {
                secs: timeout.as_secs(),
            }
        } else if err.is_connect() {
            AppError::Connection(format!(
                "Cannot connect to Ollama at {}. Make sure 'ollama serve' is running! ({})",
                self.base_url, err
            ))
        } else {
            AppError::Backend(format!("Failed to send request to Ollama: {}", err))
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let timeout = request.timeout.unwrap_or(DEFAULT_TIMEOUT);
        tracing::info!(
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            timeout_secs = timeout.as_secs(),
            "Sending completion request to Ollama"
        );

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Backend(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        // The body is read under the same deadline, so a stalled body is still a timeout.
        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout {
                    secs: timeout.as_secs(),
                }
            } else {
                AppError::Backend(format!("Failed to parse Ollama response: {}", e))
            }
        })?;

        tracing::info!("Received completion from Ollama");
        tracing::debug!("Response: {:?}", ollama_response);

        Ok(self.convert_response(ollama_response, &request.model))
    }
}

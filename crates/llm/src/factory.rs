//! LLM provider factory.
//!
//! Builds a client from the configured provider name and offers a cheap
//! round-trip check that the backend is up and the model loads.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use crate::providers::OllamaClient;
use paperqa_core::config::DEFAULT_ENDPOINT;
use paperqa_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Prompt used by [`check_backend`].
pub const HEALTH_CHECK_PROMPT: &str = "Summarize the theory of relativity in 2 sentences.";

/// Timeout for [`check_backend`].
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (only "ollama" today)
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(DEFAULT_ENDPOINT);
            tracing::debug!("Creating Ollama client for {}", base_url);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

/// Send a short fixed prompt to verify the backend answers.
pub async fn check_backend(client: &dyn LlmClient, model: &str) -> AppResult<LlmResponse> {
    tracing::info!(
        provider = client.provider_name(),
        model,
        "Checking generation backend"
    );

    let request = LlmRequest::new(HEALTH_CHECK_PROMPT, model).with_timeout(HEALTH_CHECK_TIMEOUT);
    client.complete(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmUsage;
    use std::sync::Mutex;

    struct RecordingClient {
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingClient {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(LlmResponse {
                content: "ok".to_string(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
                done: true,
            })
        }
    }

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        assert!(create_client("Ollama", Some("http://localhost:8080")).is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None) {
            Err(AppError::Config(message)) => assert!(message.contains("Unknown provider")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }

    #[tokio::test]
    async fn test_check_backend_sends_fixed_prompt() {
        let client = RecordingClient {
            seen: Mutex::new(Vec::new()),
        };

        let response = check_backend(&client, "llama3.2").await.unwrap();
        assert_eq!(response.content, "ok");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].prompt, HEALTH_CHECK_PROMPT);
        assert_eq!(seen[0].model, "llama3.2");
        assert_eq!(seen[0].timeout, Some(HEALTH_CHECK_TIMEOUT));
    }
}

//! Summarize and chat flows against a recording backend.

use super::{RecordingClient, PAPER_TEXT};
use crate::chunker::ChunkConfig;
use crate::config::{PipelineConfig, RetrievalProfile};
use crate::extract::{Document, TextExtractor};
use crate::progress::ProgressReporter;
use crate::rag::{PaperAssistant, DEFAULT_ANSWER_TIMEOUT, DEFAULT_SUMMARY_TIMEOUT, SUMMARY_QUESTION};
use paperqa_core::{AppError, AppResult};
use std::path::Path;
use std::sync::{Arc, Mutex};

const METHODS_TEXT: &str = "Background on the field. The methodology involves sampling survey data. \
     Results are reported. Unrelated closing remarks here.";

fn small_chunks(boundary_fraction: f64) -> ChunkConfig {
    ChunkConfig {
        chunk_size: 40,
        overlap: 5,
        boundary_fraction,
        min_chunk_chars: 0,
        max_chunks: None,
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        summary: RetrievalProfile {
            chunking: small_chunks(0.4),
            top_k: 2,
            ..RetrievalProfile::summary()
        },
        chat: RetrievalProfile {
            chunking: small_chunks(0.3),
            ..RetrievalProfile::chat()
        },
    }
}

fn assistant(client: Arc<RecordingClient>) -> PaperAssistant {
    PaperAssistant::new(client, "llama3")
        .unwrap()
        .with_config(test_config())
}

#[tokio::test]
async fn test_summarize_sends_top_sections() {
    let client = Arc::new(RecordingClient::replying("  A concise summary.\n"));
    let assistant = assistant(client.clone());
    let document = Document::from_text("paper.pdf", PAPER_TEXT);

    let report = assistant.summarize(&document).await.unwrap();

    assert_eq!(report.file, "paper.pdf");
    assert_eq!(report.text_length, PAPER_TEXT.chars().count());
    assert_eq!(report.chunks_total, 5);
    assert_eq!(report.chunks_used, 2);
    assert_eq!(report.summary, "A concise summary.");

    let prompt = client.last_prompt();
    assert!(prompt.contains(
        "Section 1:\ns X. Introduction. We propose Y.\n\nSection 2:\ne Y. Method. We use Z. Results."
    ));
    assert!(!prompt.contains("Section 3:"));

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "llama3");
    assert_eq!(requests[0].timeout, Some(DEFAULT_SUMMARY_TIMEOUT));
    assert!(!requests[0].stream);
}

#[tokio::test]
async fn test_summarize_blank_document_skips_backend() {
    let client = Arc::new(RecordingClient::replying("unused"));
    let document = Document::from_text("blank.txt", " \n\t ");

    let err = assistant(client.clone()).summarize(&document).await.unwrap_err();

    assert!(matches!(err, AppError::InsufficientContent { chars: 0, .. }));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_answer_uses_matching_excerpts() {
    let client = Arc::new(RecordingClient::replying("They sampled survey data."));
    let assistant = assistant(client.clone());
    let session = assistant
        .open_chat(&Document::from_text("methods.txt", METHODS_TEXT))
        .unwrap();

    assert_eq!(session.chunk_count(), 4);

    let answer = assistant
        .answer(&session, "  What methodology was used?  ")
        .await
        .unwrap();

    assert!(!answer.no_information);
    assert_eq!(answer.question, "What methodology was used?");
    assert_eq!(answer.answer, "They sampled survey data.");
    assert_eq!(answer.excerpts_used, 1);
    assert!((answer.best_score - 1.5).abs() < 1e-9);

    let prompt = client.last_prompt();
    assert!(prompt.contains("Excerpt 1:\neld. The methodology involves sampling s"));
    assert!(prompt.contains("Question: What methodology was used?"));
    assert!(!prompt.contains("Excerpt 2:"));
    assert_eq!(client.requests()[0].timeout, Some(DEFAULT_ANSWER_TIMEOUT));
}

#[tokio::test]
async fn test_answer_without_match_skips_backend() {
    let client = Arc::new(RecordingClient::replying("unused"));
    let assistant = assistant(client.clone());
    let session = assistant
        .open_chat(&Document::from_text("methods.txt", METHODS_TEXT))
        .unwrap();

    let answer = assistant
        .answer(&session, "Explain quantum gravity")
        .await
        .unwrap();

    assert!(answer.no_information);
    assert_eq!(answer.excerpts_used, 0);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_failed_turn_leaves_session_usable() {
    let flaky = Arc::new(RecordingClient::with(|call| {
        if call == 0 {
            Err(AppError::Timeout { secs: 60 })
        } else {
            Ok("Second try works.".to_string())
        }
    }));
    let assistant = assistant(flaky.clone());
    let session = assistant
        .open_chat(&Document::from_text("methods.txt", METHODS_TEXT))
        .unwrap();
    let before = session.chunks().to_vec();

    let err = assistant
        .answer(&session, "What methodology was used?")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Timeout { secs: 60 }));
    assert_eq!(session.chunks(), before.as_slice());

    let answer = assistant
        .answer(&session, "What methodology was used?")
        .await
        .unwrap();
    assert_eq!(answer.answer, "Second try works.");
    assert_eq!(flaky.call_count(), 2);
}

#[tokio::test]
async fn test_backend_errors_propagate_unchanged() {
    let client = Arc::new(RecordingClient::timing_out(120));
    let document = Document::from_text("paper.pdf", PAPER_TEXT);

    let err = assistant(client).summarize(&document).await.unwrap_err();
    assert!(err.is_backend_failure());
    assert!(matches!(err, AppError::Timeout { secs: 120 }));
}

#[tokio::test]
async fn test_summary_question_reaches_keyword_chunks() {
    let client = Arc::new(RecordingClient::replying("Overview."));
    let assistant = assistant(client.clone());
    let session = assistant
        .open_chat(&Document::from_text("paper.pdf", PAPER_TEXT))
        .unwrap();

    let answer = assistant.answer(&session, SUMMARY_QUESTION).await.unwrap();

    assert!(!answer.no_information);
    assert!(answer.excerpts_used > 0);
    assert!(client.last_prompt().contains("Excerpt 1:"));
}

struct FixedExtractor(String);

impl TextExtractor for FixedExtractor {
    fn extract(&self, _path: &Path) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_load_document_uses_injected_extractor_and_reports_progress() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-placeholder").unwrap();

    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = phases.clone();
    let assistant = PaperAssistant::new(Arc::new(RecordingClient::replying("")), "llama3")
        .unwrap()
        .with_extractor(Arc::new(FixedExtractor("Extracted body text. ".repeat(10))))
        .with_progress(ProgressReporter::new(Arc::new(move |event| {
            sink.lock().unwrap().push(event.phase);
        })));

    let document = assistant.load_document(&path).unwrap();

    assert_eq!(document.char_count(), 210);
    assert_eq!(phases.lock().unwrap().as_slice(), ["extract".to_string()]);
}

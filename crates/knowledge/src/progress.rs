//! Structured progress reporting for pipeline runs.
//!
//! Summaries of long papers can take minutes; the reporter lets the caller
//! show each phase as it starts without the library printing anything.

use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted during a pipeline run.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the run: "extract", "chunk", "retrieve", "generate", "done"
    pub phase: String,

    /// Current progress (characters extracted, chunks created, ...)
    pub current: u64,

    /// Total expected work (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Elapsed time since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage =
            total.map(|t| if t > 0 { (current as f64 / t as f64) * 100.0 } else { 0.0 });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = match self.total {
            Some(total) => format!(" {}/{}", self.current, total),
            None if self.current > 0 => format!(" {}", self.current),
            None => String::new(),
        };

        let elapsed = self
            .elapsed_secs
            .map(|s| format!(" ({:.1}s)", s))
            .unwrap_or_default();

        format!("[{}]{} {}{}", self.phase, progress, self.message, elapsed)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Instant::now(),
        }
    }

    /// Reporter that only logs.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Instant::now(),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let event = event.with_elapsed(elapsed);

        tracing::debug!(
            phase = %event.phase,
            current = event.current,
            total = ?event.total,
            message = %event.message,
            elapsed_secs = elapsed,
            "Progress event"
        );

        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    pub fn extract(&self, file: &str) {
        self.emit(ProgressEvent::new("extract", 0, None, format!("reading {}", file)));
    }

    pub fn chunk(&self, text_length: usize, chunks_created: usize) {
        self.emit(ProgressEvent::new(
            "chunk",
            chunks_created as u64,
            None,
            format!("{} chunks from {} characters", chunks_created, text_length),
        ));
    }

    pub fn retrieve(&self, selected: usize, total: usize) {
        self.emit(ProgressEvent::new(
            "retrieve",
            selected as u64,
            Some(total as u64),
            "selecting most relevant chunks",
        ));
    }

    pub fn generate(&self, model: &str, context_chars: usize) {
        self.emit(ProgressEvent::new(
            "generate",
            0,
            None,
            format!("model={} context={} chars", model, context_chars),
        ));
    }

    pub fn done(&self) {
        self.emit(ProgressEvent::new("done", 0, None, "complete"));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

//! Summarize command handler.

use super::{rule, stderr_progress};
use clap::Args;
use paperqa_core::{config::AppConfig, AppError, AppResult};
use paperqa_knowledge::{PaperAssistant, SummaryReport};
use std::fs;
use std::path::{Path, PathBuf};

/// Summarize a paper from its most relevant sections
#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// PDF or text file to summarize
    pub file: PathBuf,

    /// Model identifier (overrides --model)
    pub model: Option<String>,

    /// Save the summary next to the input as <name>_summary.txt
    #[arg(short, long)]
    pub save: bool,

    /// Save the summary to this path instead
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SummarizeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing summarize command");
        tracing::debug!("Summarize command options: {:?}", self);

        let assistant =
            PaperAssistant::from_app_config(config)?.with_progress(stderr_progress(!self.json));

        let document = assistant.load_document(&self.file)?;
        let report = assistant.summarize(&document).await?;

        if self.json {
            let output = serde_json::json!({
                "file": report.file,
                "model": assistant.model(),
                "summary": report.summary,
                "statistics": {
                    "textLength": report.text_length,
                    "chunksTotal": report.chunks_total,
                    "chunksUsed": report.chunks_used
                }
            });
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", render_report(&report));
        }

        if let Some(path) = self.save_path() {
            fs::write(&path, render_saved_summary(&report))?;
            tracing::info!("Summary saved to {:?}", path);
            if !self.json {
                println!("Summary saved to: {}", path.display());
            }
        }

        Ok(())
    }

    fn save_path(&self) -> Option<PathBuf> {
        match (&self.output, self.save) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(default_output_path(&self.file)),
            (None, false) => None,
        }
    }
}

/// `<dir>/<stem>_summary.txt` for an input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "paper".to_string());
    input.with_file_name(format!("{}_summary.txt", stem))
}

/// Summary with its statistics block, for the terminal.
pub fn render_report(report: &SummaryReport) -> String {
    format!(
        "{rule}\nSUMMARY\n{rule}\n\n{summary}\n\n{rule}\nStatistics:\n  \
         Document size: {size} characters\n  \
         Total chunks: {total}\n  \
         Chunks analyzed: {used}\n{rule}",
        rule = rule(),
        summary = report.summary,
        size = report.text_length,
        total = report.chunks_total,
        used = report.chunks_used,
    )
}

/// File contents written by `--save`.
pub fn render_saved_summary(report: &SummaryReport) -> String {
    format!(
        "SUMMARY: {}\n{}\n\n{}\n\n{}\nGenerated by paperqa\n",
        report.file,
        rule(),
        report.summary,
        rule()
    )
}

//! Interactive chat over one paper.

use super::{rule, stderr_progress};
use clap::Args;
use paperqa_core::{config::AppConfig, AppError, AppResult};
use paperqa_knowledge::{ChatAnswer, ChatSession, PaperAssistant, SUMMARY_QUESTION};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Ask questions about a paper interactively
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// PDF or text file to chat about
    pub file: PathBuf,

    /// Hide pipeline progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Exit,
    Empty,
    Question(String),
}

fn parse_input(line: &str) -> ChatInput {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => ChatInput::Empty,
        "exit" | "quit" | "q" | "bye" => ChatInput::Exit,
        "summary" => ChatInput::Question(SUMMARY_QUESTION.to_string()),
        _ => ChatInput::Question(line.to_string()),
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let assistant =
            PaperAssistant::from_app_config(config)?.with_progress(stderr_progress(!self.quiet));
        let document = assistant.load_document(&self.file)?;
        let session = assistant.open_chat(&document)?;

        print_banner(&session, assistant.model());
        run_loop(&assistant, &session).await
    }
}

async fn run_loop(assistant: &PaperAssistant, session: &ChatSession) -> AppResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| AppError::Other(format!("Failed to initialize editor: {}", e)))?;

    loop {
        match editor.readline("question> ") {
            Ok(line) => match parse_input(&line) {
                ChatInput::Empty => continue,
                ChatInput::Exit => {
                    println!("Goodbye!");
                    break;
                }
                ChatInput::Question(question) => {
                    editor.add_history_entry(line.trim()).ok();

                    match assistant.answer(session, &question).await {
                        Ok(answer) => print_answer(&answer),
                        Err(e) => {
                            tracing::warn!("Question failed: {}", e);
                            eprintln!("Error: {}", e);
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("Type 'exit' to quit");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(AppError::Other(format!("Failed to read input: {}", e)));
            }
        }
    }

    Ok(())
}

fn print_banner(session: &ChatSession, model: &str) {
    println!("{}", rule());
    println!("Chatting with {} ({} model)", session.document_name(), model);
    println!(
        "{} characters, {} chunks",
        session.text_length(),
        session.chunk_count()
    );
    println!("Type 'summary' for an overview, 'exit' to quit.");
    println!("{}", rule());
}

fn print_answer(answer: &ChatAnswer) {
    println!();
    println!("{}", answer.answer);
    if !answer.no_information {
        println!("(from {} excerpts)", answer.excerpts_used);
    }
    println!();
}

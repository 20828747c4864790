//! Backend health check.

use clap::Args;
use paperqa_core::{config::AppConfig, AppResult};
use paperqa_llm::{check_backend, create_client};
use paperqa_prompt::{list_prompts, PromptOrigin};
use std::time::Instant;

/// Check that the generation backend answers
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Print the model's reply
    #[arg(long)]
    pub show_reply: bool,

    /// Also list the prompt definitions in use
    #[arg(long)]
    pub prompts: bool,
}

impl CheckCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing check command");
        config.validate()?;

        if self.prompts {
            for (id, origin) in list_prompts(&config.workspace)? {
                let source = match origin {
                    PromptOrigin::Builtin => "built-in",
                    PromptOrigin::Workspace => "workspace",
                };
                println!("{:<20} {}", id, source);
            }
        }

        let client = create_client(&config.provider, Some(&config.endpoint))?;
        println!(
            "Checking {} at {} with model {}...",
            client.provider_name(),
            config.endpoint,
            config.model
        );

        let started = Instant::now();
        let response = check_backend(client.as_ref(), &config.model).await?;

        println!(
            "Backend is working ({:.1}s, {} characters returned)",
            started.elapsed().as_secs_f64(),
            response.content.chars().count()
        );
        if self.show_reply {
            println!("\n{}", response.content.trim());
        }

        Ok(())
    }
}

//! Prompt loader for built-in and workspace YAML prompt definitions.

use crate::types::{PromptDefinition, PromptOrigin};
use paperqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Prompt used for whole-document summaries.
pub const SUMMARIZE_PROMPT_ID: &str = "paper.summarize";

/// Prompt used for single-question answers.
pub const ANSWER_PROMPT_ID: &str = "paper.answer";

/// Definitions compiled into the binary, keyed by id.
const BUILTIN_PROMPTS: [(&str, &str); 2] = [
    (
        SUMMARIZE_PROMPT_ID,
        include_str!("../prompts/paper.summarize.yml"),
    ),
    (ANSWER_PROMPT_ID, include_str!("../prompts/paper.answer.yml")),
];

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in `<workspace>/.paperqa/prompts/` overrides the
/// built-in definition with the same id.
///
/// # Example
/// ```no_run
/// use paperqa_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "paper.summarize")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        tracing::debug!("Loading prompt from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        let definition = parse_definition(&contents, &prompt_file.display().to_string())?;
        if definition.id != prompt_id {
            return Err(AppError::Prompt(format!(
                "Prompt file {:?} declares id '{}', expected '{}'",
                prompt_file, definition.id, prompt_id
            )));
        }

        tracing::info!("Loaded workspace prompt: {} ({})", definition.id, definition.title);
        return Ok(definition);
    }

    builtin_prompt(prompt_id)
}

/// Load a built-in prompt definition, ignoring workspace overrides.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, contents) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    parse_definition(contents, &format!("builtin:{}", prompt_id))
}

/// List all available prompt IDs with where each one resolves from.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<(String, PromptOrigin)>> {
    let mut prompts: Vec<(String, PromptOrigin)> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| (id.to_string(), PromptOrigin::Builtin))
        .collect();

    let dir = prompts_dir(workspace_path);
    if !dir.exists() {
        return Ok(prompts);
    }

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("yml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match prompts.iter_mut().find(|(id, _)| id == stem) {
            Some(existing) => existing.1 = PromptOrigin::Workspace,
            None => prompts.push((stem.to_string(), PromptOrigin::Workspace)),
        }
    }

    prompts.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(prompts)
}

/// Directory holding workspace prompt overrides.
pub fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".paperqa").join("prompts")
}

fn parse_definition(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in &def.input.variables {
        if !def.template.contains(&format!("{{{{{}}}}}", variable)) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' declares variable '{}' but its template never uses it",
                def.id, variable
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_prompt(dir: &Path, id: &str, valid: bool) -> PathBuf {
        let prompts_dir = prompts_dir(dir);
        fs::create_dir_all(&prompts_dir).unwrap();

        let content = if valid {
            format!(
                r#"
id: {}
title: "Test Prompt"
apiVersion: "1.0"
input:
  variables: [context]
template: "Custom: {{{{context}}}}"
output:
  format: text
"#,
                id
            )
        } else {
            "invalid: yaml: content:".to_string()
        };

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_builtin_prompts_parse() {
        let summarize = builtin_prompt(SUMMARIZE_PROMPT_ID).unwrap();
        assert!(summarize.template.contains("{{context}}"));
        assert!(summarize.template.contains("3-4 paragraphs"));

        let answer = builtin_prompt(ANSWER_PROMPT_ID).unwrap();
        assert!(answer.template.contains("{{question}}"));
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), SUMMARIZE_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, SUMMARIZE_PROMPT_ID);
    }

    #[test]
    fn test_workspace_prompt_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), SUMMARIZE_PROMPT_ID, true);

        let prompt = load_prompt(temp_dir.path(), SUMMARIZE_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Test Prompt");
        assert!(prompt.template.starts_with("Custom:"));
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), "invalid", false);

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_declared_variable_must_appear_in_template() {
        let yaml = r#"
id: broken
title: Broken
apiVersion: "1.0"
input:
  variables: [question]
template: "no placeholders here"
output:
  format: text
"#;
        assert!(parse_definition(yaml, "test").is_err());
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        create_test_prompt(temp_dir.path(), "custom.one", true);
        create_test_prompt(temp_dir.path(), ANSWER_PROMPT_ID, true);

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.contains(&("custom.one".to_string(), PromptOrigin::Workspace)));
        assert!(prompts.contains(&(ANSWER_PROMPT_ID.to_string(), PromptOrigin::Workspace)));
        assert!(prompts.contains(&(SUMMARIZE_PROMPT_ID.to_string(), PromptOrigin::Builtin)));
    }
}

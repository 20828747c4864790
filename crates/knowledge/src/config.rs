//! Retrieval pipeline configuration management.

use crate::chunker::ChunkConfig;
use crate::context::SectionLabel;
use paperqa_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Chunking, selection and assembly settings for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalProfile {
    pub chunking: ChunkConfig,

    /// Number of chunks sent to the model
    pub top_k: usize,

    /// Block label used in the assembled context
    pub label: SectionLabel,

    /// Hard cut applied to each chunk before assembly
    #[serde(default)]
    pub per_chunk_limit: Option<usize>,

    /// Bound on the whole assembled context
    #[serde(default)]
    pub max_context_chars: Option<usize>,
}

impl RetrievalProfile {
    /// Whole-document summary: four sections, no truncation.
    pub fn summary() -> Self {
        Self {
            chunking: ChunkConfig::summary(),
            top_k: 4,
            label: SectionLabel::Section,
            per_chunk_limit: None,
            max_context_chars: None,
        }
    }

    /// Interactive answers: three excerpts of at most 1000 characters each.
    pub fn chat() -> Self {
        Self {
            chunking: ChunkConfig::chat(),
            top_k: 3,
            label: SectionLabel::Excerpt,
            per_chunk_limit: Some(1000),
            max_context_chars: Some(4000),
        }
    }

    pub fn validate(&self, name: &str) -> AppResult<()> {
        self.chunking.validate().map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{} profile: {}", name, msg)),
            other => other,
        })?;

        if self.top_k == 0 {
            return Err(AppError::Config(format!(
                "{} profile: top_k must be at least one",
                name
            )));
        }

        if self.per_chunk_limit == Some(0) || self.max_context_chars == Some(0) {
            return Err(AppError::Config(format!(
                "{} profile: context limits must be greater than zero when set",
                name
            )));
        }

        Ok(())
    }
}

/// Settings for both pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub summary: RetrievalProfile,
    pub chat: RetrievalProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            summary: RetrievalProfile::summary(),
            chat: RetrievalProfile::chat(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> AppResult<()> {
        self.summary.validate("summary")?;
        self.chat.validate("chat")
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<usize>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<usize>::deserialize(deserializer).map(Some)
}

/// Partial file contents; absent keys keep the preset value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkFile {
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    boundary_fraction: Option<f64>,
    min_chunk_chars: Option<usize>,
    #[serde(default, deserialize_with = "nullable")]
    max_chunks: Option<Option<usize>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFile {
    #[serde(default)]
    chunking: ChunkFile,
    top_k: Option<usize>,
    label: Option<SectionLabel>,
    #[serde(default, deserialize_with = "nullable")]
    per_chunk_limit: Option<Option<usize>>,
    #[serde(default, deserialize_with = "nullable")]
    max_context_chars: Option<Option<usize>>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineFile {
    #[serde(default)]
    summary: ProfileFile,
    #[serde(default)]
    chat: ProfileFile,
}

impl ProfileFile {
    fn apply(self, profile: &mut RetrievalProfile) {
        let chunking = &mut profile.chunking;
        if let Some(v) = self.chunking.chunk_size {
            chunking.chunk_size = v;
        }
        if let Some(v) = self.chunking.overlap {
            chunking.overlap = v;
        }
        if let Some(v) = self.chunking.boundary_fraction {
            chunking.boundary_fraction = v;
        }
        if let Some(v) = self.chunking.min_chunk_chars {
            chunking.min_chunk_chars = v;
        }
        if let Some(v) = self.chunking.max_chunks {
            chunking.max_chunks = v;
        }
        if let Some(v) = self.top_k {
            profile.top_k = v;
        }
        if let Some(v) = self.label {
            profile.label = v;
        }
        if let Some(v) = self.per_chunk_limit {
            profile.per_chunk_limit = v;
        }
        if let Some(v) = self.max_context_chars {
            profile.max_context_chars = v;
        }
    }
}

/// Load pipeline configuration.
///
/// Reads `.paperqa/pipeline.yaml` if it exists, otherwise uses the presets.
/// The result is always validated.
pub fn load_config(workspace: &Path) -> AppResult<PipelineConfig> {
    let config_path = get_config_path(workspace);
    let mut config = PipelineConfig::default();

    if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            AppError::Config(format!("Failed to read {:?}: {}", config_path, e))
        })?;

        let file: PipelineFile = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse {:?}: {}", config_path, e))
        })?;

        file.summary.apply(&mut config.summary);
        file.chat.apply(&mut config.chat);

        tracing::debug!("Loaded pipeline config from {:?}", config_path);
    } else {
        tracing::debug!("Using default pipeline config (no config file found)");
    }

    config.validate()?;
    Ok(config)
}

/// Save pipeline configuration.
pub fn save_config(workspace: &Path, config: &PipelineConfig) -> AppResult<()> {
    config.validate()?;

    let config_path = get_config_path(workspace);
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(config)?;
    fs::write(&config_path, yaml)?;

    tracing::debug!("Saved pipeline config to {:?}", config_path);
    Ok(())
}

/// Get the path to the pipeline config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".paperqa").join("pipeline.yaml")
}

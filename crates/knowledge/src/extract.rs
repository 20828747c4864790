//! Source document loading and text extraction.

use paperqa_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Documents with less raw text than this are rejected.
pub const MIN_DOCUMENT_CHARS: usize = 100;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Pdf,
    PlainText,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::PlainText,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "text",
        }
    }
}

/// Turns a file on disk into raw text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> AppResult<String>;
}

/// Default extractor: PDF text layer for `.pdf`, lossy UTF-8 for everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract(&self, path: &Path) -> AppResult<String> {
        let bytes = fs::read(path)
            .map_err(|e| AppError::Extraction(format!("Failed to read {:?}: {}", path, e)))?;

        match ContentType::from_path(path) {
            ContentType::Pdf => pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
                AppError::Extraction(format!("Failed to parse PDF {:?}: {}", path, e))
            }),
            ContentType::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

/// Raw text of one source document.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
    char_count: usize,
    content_type: ContentType,
}

impl Document {
    /// Extract a document and reject it when too little text came out.
    pub fn load(path: &Path, extractor: &dyn TextExtractor) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::Extraction(format!("File not found: {:?}", path)));
        }

        let text = extractor.extract(path)?;
        let document = Self::from_text(path, text);

        if document.char_count < MIN_DOCUMENT_CHARS {
            tracing::warn!(
                "Only {} characters extracted from {:?}",
                document.char_count,
                path
            );
            return Err(AppError::InsufficientContent {
                chars: document.char_count,
                min: MIN_DOCUMENT_CHARS,
            });
        }

        tracing::info!(
            "Extracted {} characters from {:?} ({})",
            document.char_count,
            path,
            document.content_type.as_str()
        );

        Ok(document)
    }

    /// Wrap already-extracted text. No minimum length is enforced.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let text = text.into();
        Self {
            content_type: ContentType::from_path(&path),
            char_count: text.chars().count(),
            path,
            text,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the raw extracted text in characters.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Final path component, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

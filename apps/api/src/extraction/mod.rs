//! Format-aware text extraction for uploaded resumes.
//!
//! The declared extension selects one `DocumentFormat`; each format has a
//! single extraction strategy. Adding a format means adding a variant here.
//! Extraction holds no state between calls and never touches the database.

pub mod latex;
pub mod tools;

use std::path::Path;

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

pub use tools::ToolConfig;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Failed(String),
}

/// The closed set of document formats the service can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    Latex,
}

impl DocumentFormat {
    /// Maps a declared extension (with or without the leading dot, any case)
    /// to a format.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractionError> {
        let normalized = normalize_extension(extension);
        match normalized.as_str() {
            ".pdf" => Ok(DocumentFormat::Pdf),
            ".docx" => Ok(DocumentFormat::Docx),
            ".txt" | ".md" => Ok(DocumentFormat::PlainText),
            ".tex" => Ok(DocumentFormat::Latex),
            _ => Err(ExtractionError::UnsupportedFormat(normalized)),
        }
    }
}

/// Returns the lower-cased extension of `filename` including the dot,
/// or an empty string when there is none.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().to_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}

/// Runs the extraction strategy for a document's format.
#[derive(Debug, Clone)]
pub struct Extractor {
    tools: ToolConfig,
}

impl Extractor {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }

    /// Extracts plain text from the file at `path`, dispatching on
    /// `declared_extension`. Unsupported extensions fail before any file
    /// access or process launch.
    pub async fn extract(
        &self,
        path: &Path,
        declared_extension: &str,
    ) -> Result<String, ExtractionError> {
        let format = DocumentFormat::from_extension(declared_extension)?;
        debug!("Extracting {} as {:?}", path.display(), format);

        match format {
            DocumentFormat::Pdf => self.extract_pdf(path).await,
            DocumentFormat::Docx => self.extract_docx(path).await,
            DocumentFormat::PlainText => read_text(path).await,
            DocumentFormat::Latex => read_text(path).await.map(|raw| latex::strip_latex(&raw)),
        }
    }

    async fn extract_pdf(&self, path: &Path) -> Result<String, ExtractionError> {
        let output = self
            .tools
            .run(
                &self.tools.pdftotext_bin,
                &[path.as_os_str(), "-".as_ref()],
            )
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn extract_docx(&self, path: &Path) -> Result<String, ExtractionError> {
        let out_dir = tempfile::Builder::new()
            .prefix("docx-")
            .tempdir_in(&self.tools.scratch_dir)
            .map_err(|e| ExtractionError::Failed(format!("failed to create conversion dir: {e}")))?;

        let result = self.convert_docx(path, &out_dir).await;
        discard_dir(out_dir);
        result
    }

    async fn convert_docx(&self, path: &Path, out_dir: &TempDir) -> Result<String, ExtractionError> {
        self.tools
            .run(
                &self.tools.soffice_bin,
                &[
                    "--headless".as_ref(),
                    "--convert-to".as_ref(),
                    "txt:Text".as_ref(),
                    "--outdir".as_ref(),
                    out_dir.path().as_os_str(),
                    path.as_os_str(),
                ],
            )
            .await?;

        let stem = path
            .file_stem()
            .ok_or_else(|| ExtractionError::Failed(format!("no file stem in {}", path.display())))?;
        let mut converted_name = stem.to_os_string();
        converted_name.push(".txt");
        let converted = out_dir.path().join(converted_name);

        let bytes = tokio::fs::read(&converted).await.map_err(|e| {
            ExtractionError::Failed(format!(
                "failed to read converted text {}: {e}",
                converted.display()
            ))
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

async fn read_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ExtractionError::Failed(format!("failed to read {}: {e}", path.display())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Removes a scratch directory, logging instead of failing on error.
pub(crate) fn discard_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!("Failed to remove temporary directory {}: {e}", path.display());
    }
}

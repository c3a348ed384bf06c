//! Resume ingestion: stage → extract → grade → dedup → persist.
//!
//! Each upload runs linearly with no retries. Any failing stage aborts the
//! rest, so an evaluation row is written only when every stage succeeds.
//! The staging directory is private to one upload and removed as soon as
//! extraction finishes, whatever its outcome.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{discard_dir, extension_of, DocumentFormat, Extractor};
use crate::grading::{GradingClient, GradingResult};
use crate::ingest::gate::commit_evaluation;
use crate::models::applicant::{ApplicantRow, NewApplicant};
use crate::models::job::JobPostingRow;
use crate::store::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Extracted,
    Graded,
    DedupChecked,
    Persisted,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestStage::Received => "received",
            IngestStage::Extracted => "extracted",
            IngestStage::Graded => "graded",
            IngestStage::DedupChecked => "dedup-checked",
            IngestStage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

pub struct Ingestor {
    repo: Arc<dyn Repository>,
    grader: GradingClient,
    extractor: Extractor,
    staging_dir: PathBuf,
}

impl Ingestor {
    pub fn new(
        repo: Arc<dyn Repository>,
        grader: GradingClient,
        extractor: Extractor,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            repo,
            grader,
            extractor,
            staging_dir,
        }
    }

    /// Processes one uploaded resume for `job_id` and returns the stored evaluation.
    /// The upload handler uses the split `resolve_job` / `ingest_for_job` form.
    #[allow(dead_code)]
    pub async fn ingest(
        &self,
        job_id: &str,
        file_bytes: Bytes,
        declared_filename: &str,
    ) -> Result<ApplicantRow, AppError> {
        let job = self.resolve_job(job_id).await?;
        self.ingest_for_job(&job, file_bytes, declared_filename).await
    }

    /// Looks up the target posting. Callers resolve it before reading the upload.
    pub async fn resolve_job(&self, job_id: &str) -> Result<JobPostingRow, AppError> {
        self.repo
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))
    }

    pub async fn ingest_for_job(
        &self,
        job: &JobPostingRow,
        file_bytes: Bytes,
        declared_filename: &str,
    ) -> Result<ApplicantRow, AppError> {
        let job_id = job.id.as_str();
        let filename = safe_filename(declared_filename)
            .inspect_err(|e| log_failure(job_id, IngestStage::Received, e))?;
        let extension = extension_of(&filename);
        DocumentFormat::from_extension(&extension)
            .map_err(AppError::from)
            .inspect_err(|e| log_failure(job_id, IngestStage::Received, e))?;
        info!(
            "Received {filename} ({} bytes) for job {job_id}",
            file_bytes.len()
        );

        let text = self
            .stage_and_extract(&filename, &extension, file_bytes)
            .await
            .inspect_err(|e| log_failure(job_id, IngestStage::Extracted, e))?;
        info!("Extracted {} chars from {filename}", text.len());

        let graded = self
            .grader
            .grade(text, &job.description)
            .await
            .map_err(AppError::from)
            .inspect_err(|e| log_failure(job_id, IngestStage::Graded, e))?;
        info!("Graded {filename} for job {job_id}: {}", graded.grade);

        let applicant = to_applicant(job_id, &filename, graded);
        let row = commit_evaluation(self.repo.as_ref(), &applicant)
            .await
            .inspect_err(|e| log_failure(job_id, commit_failure_stage(e), e))?;

        Ok(row)
    }

    /// Writes the upload into a private staging directory, extracts its
    /// text, then removes the directory.
    async fn stage_and_extract(
        &self,
        filename: &str,
        extension: &str,
        file_bytes: Bytes,
    ) -> Result<String, AppError> {
        let staging = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(&self.staging_dir)
            .map_err(|e| AppError::ExtractionFailed(format!("failed to create staging dir: {e}")))?;
        let staged_path = staging.path().join(filename);

        let written = tokio::fs::write(&staged_path, &file_bytes).await;
        let result = match written {
            Ok(()) => self
                .extractor
                .extract(&staged_path, extension)
                .await
                .map_err(AppError::from),
            Err(e) => Err(AppError::ExtractionFailed(format!(
                "failed to stage upload: {e}"
            ))),
        };

        discard_dir(staging);
        result
    }
}

/// `stage` is the one the upload was working towards when it failed.
fn log_failure(job_id: &str, stage: IngestStage, err: &AppError) {
    warn!("Ingestion for job {job_id} failed before stage {stage}: {err}");
}

fn commit_failure_stage(err: &AppError) -> IngestStage {
    match err {
        AppError::DuplicateSubmission(_) => IngestStage::DedupChecked,
        _ => IngestStage::Persisted,
    }
}

/// Keeps only the final path component of a client-supplied filename.
fn safe_filename(declared: &str) -> Result<String, AppError> {
    Path::new(declared.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Uploaded file has no usable name".to_string()))
}

fn to_applicant(job_id: &str, filename: &str, graded: GradingResult) -> NewApplicant {
    let name = match graded.name.trim() {
        "" => Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename)
            .to_string(),
        name => name.to_string(),
    };

    NewApplicant {
        job_id: job_id.to_string(),
        name,
        email: graded.email.trim().to_string(),
        phone: graded.phone.trim().to_string(),
        grade: graded.grade,
        skills: graded.skills,
        description: graded.description,
    }
}

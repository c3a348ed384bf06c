use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::applicant::ApplicantRow;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub applicant: ApplicantRow,
}

/// POST /api/v1/jobs/:id/resumes
///
/// Multipart upload with the resume in the `resume` field. The posting is
/// resolved before any of the body is read.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let job = state.ingestor.resolve_job(&job_id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file upload: {e}")))?;

        let applicant = state
            .ingestor
            .ingest_for_job(&job, data, &filename)
            .await?;
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "Upload and processing complete. Applicant added to job posting.",
                applicant,
            }),
        ));
    }

    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}

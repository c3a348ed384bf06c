use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::{create_job, get_job_with_applicants, list_jobs_with_applicants};
use crate::models::applicant::ApplicantRow;
use crate::models::job::{JobPostingRow, JobWithApplicants};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    let job = create_job(state.repo.as_ref(), &req.title, &req.description).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobWithApplicants>>, AppError> {
    Ok(Json(list_jobs_with_applicants(state.repo.as_ref()).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobWithApplicants>, AppError> {
    Ok(Json(get_job_with_applicants(state.repo.as_ref(), &id).await?))
}

/// GET /api/v1/jobs/:id/applicants
///
/// Applicants ranked by grade, highest first.
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    let job = get_job_with_applicants(state.repo.as_ref(), &id).await?;
    Ok(Json(job.applicants))
}

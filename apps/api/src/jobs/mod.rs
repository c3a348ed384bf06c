//! Job postings: creation and the read views used by recruiters.

pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobPostingRow, JobWithApplicants};
use crate::store::Repository;

pub async fn create_job(
    repo: &dyn Repository,
    title: &str,
    description: &str,
) -> Result<JobPostingRow, AppError> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if description.is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    repo.create_job(&id, title, description).await
}

pub async fn get_job_with_applicants(
    repo: &dyn Repository,
    id: &str,
) -> Result<JobWithApplicants, AppError> {
    let job = repo
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))?;
    let applicants = repo.list_applicants(id).await?;
    Ok(JobWithApplicants { job, applicants })
}

pub async fn list_jobs_with_applicants(
    repo: &dyn Repository,
) -> Result<Vec<JobWithApplicants>, AppError> {
    let jobs = repo.list_jobs().await?;
    let mut result = Vec::with_capacity(jobs.len());
    for job in jobs {
        let applicants = repo.list_applicants(&job.id).await?;
        result.push(JobWithApplicants { job, applicants });
    }
    Ok(result)
}

//! Persistence backend for job postings and evaluations.
//!
//! `AppState` carries an `Arc<dyn Repository>` built once at startup.
//! `PgRepository` is the production backend.

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, NewApplicant};
use crate::models::job::JobPostingRow;

/// SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
pub trait Repository: Send + Sync {
    async fn create_job(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<JobPostingRow, AppError>;

    async fn get_job(&self, id: &str) -> Result<Option<JobPostingRow>, AppError>;

    async fn list_jobs(&self) -> Result<Vec<JobPostingRow>, AppError>;

    /// Applicants for a job, highest grade first.
    async fn list_applicants(&self, job_id: &str) -> Result<Vec<ApplicantRow>, AppError>;

    async fn applicant_exists(
        &self,
        job_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<bool, AppError>;

    /// Inserts an evaluation. A contact-key collision is reported as
    /// `AppError::DuplicateSubmission`.
    async fn add_applicant(&self, applicant: &NewApplicant) -> Result<ApplicantRow, AppError>;
}

pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn create_job(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<JobPostingRow, AppError> {
        let row = sqlx::query_as::<_, JobPostingRow>(
            r#"
            INSERT INTO job_postings (id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job posting {id}");
        Ok(row)
    }

    async fn get_job(&self, id: &str) -> Result<Option<JobPostingRow>, AppError> {
        let row = sqlx::query_as::<_, JobPostingRow>(
            "SELECT id, title, description, created_at FROM job_postings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_jobs(&self) -> Result<Vec<JobPostingRow>, AppError> {
        let rows = sqlx::query_as::<_, JobPostingRow>(
            "SELECT id, title, description, created_at FROM job_postings ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_applicants(&self, job_id: &str) -> Result<Vec<ApplicantRow>, AppError> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, job_id, name, email, phone, grade, skills, description, created_at
            FROM applicants
            WHERE job_id = $1
            ORDER BY grade DESC, id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn applicant_exists(
        &self,
        job_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM applicants WHERE job_id = $1 AND email = $2 AND phone = $3)",
        )
        .bind(job_id)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn add_applicant(&self, applicant: &NewApplicant) -> Result<ApplicantRow, AppError> {
        let result = sqlx::query_as::<_, ApplicantRow>(
            r#"
            INSERT INTO applicants (job_id, name, email, phone, grade, skills, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, job_id, name, email, phone, grade, skills, description, created_at
            "#,
        )
        .bind(&applicant.job_id)
        .bind(&applicant.name)
        .bind(&applicant.email)
        .bind(&applicant.phone)
        .bind(applicant.grade)
        .bind(applicant.skills.as_slice())
        .bind(&applicant.description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(AppError::DuplicateSubmission(duplicate_message(&applicant.job_id)))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }
}

pub fn duplicate_message(job_id: &str) -> String {
    format!(
        "An application with the same email and phone already exists for job {job_id}. \
         Resubmit with different contact details."
    )
}

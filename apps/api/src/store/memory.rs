//! In-memory `Repository` for tests. Mirrors the Postgres contact index:
//! a (job, email, phone) collision is rejected, empty values included.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, NewApplicant};
use crate::models::job::JobPostingRow;
use crate::store::{duplicate_message, Repository};

#[derive(Default)]
pub struct MemoryRepository {
    jobs: Mutex<Vec<JobPostingRow>>,
    applicants: Mutex<Vec<ApplicantRow>>,
    fail_inserts: AtomicBool,
    blind_exists: AtomicBool,
}

impl MemoryRepository {
    pub fn with_job(id: &str, title: &str, description: &str) -> Self {
        let repo = Self::default();
        repo.jobs.lock().unwrap().push(JobPostingRow {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        });
        repo
    }

    /// Makes every later `add_applicant` fail with a database error.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    /// Makes `applicant_exists` always answer `false`, as when a concurrent
    /// twin commits between the check and the insert.
    pub fn blind_existence_check(&self) {
        self.blind_exists.store(true, Ordering::SeqCst);
    }

    pub fn applicant_count(&self) -> usize {
        self.applicants.lock().unwrap().len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_job(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<JobPostingRow, AppError> {
        let row = JobPostingRow {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: &str) -> Result<Option<JobPostingRow>, AppError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobPostingRow>, AppError> {
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn list_applicants(&self, job_id: &str) -> Result<Vec<ApplicantRow>, AppError> {
        let mut rows: Vec<_> = self
            .applicants
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.grade.total_cmp(&a.grade).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn applicant_exists(
        &self,
        job_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<bool, AppError> {
        if self.blind_exists.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self
            .applicants
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.job_id == job_id && a.email == email && a.phone == phone))
    }

    async fn add_applicant(&self, applicant: &NewApplicant) -> Result<ApplicantRow, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut applicants = self.applicants.lock().unwrap();
        let collides = applicants.iter().any(|a| {
            a.job_id == applicant.job_id
                && a.email == applicant.email
                && a.phone == applicant.phone
        });
        if collides {
            return Err(AppError::DuplicateSubmission(duplicate_message(&applicant.job_id)));
        }

        let row = ApplicantRow {
            id: applicants.len() as i32 + 1,
            job_id: applicant.job_id.clone(),
            name: applicant.name.clone(),
            email: applicant.email.clone(),
            phone: applicant.phone.clone(),
            grade: applicant.grade,
            skills: applicant.skills.clone(),
            description: applicant.description.clone(),
            created_at: Utc::now(),
        };
        applicants.push(row.clone());
        Ok(row)
    }
}

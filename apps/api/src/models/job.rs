use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::applicant::ApplicantRow;

/// A hiring requisition. The description is the grading context.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobWithApplicants {
    #[serde(flatten)]
    pub job: JobPostingRow,
    /// Sorted by grade, highest first.
    pub applicants: Vec<ApplicantRow>,
}

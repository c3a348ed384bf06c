use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted evaluation of one resume against one job. Never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: i32,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade: f64,
    pub skills: Vec<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An evaluation ready to be committed for a job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplicant {
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub grade: f64,
    pub skills: Vec<String>,
    pub description: String,
}

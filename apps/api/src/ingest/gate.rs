use tracing::info;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, NewApplicant};
use crate::store::{duplicate_message, Repository};

/// Commits an evaluation unless the job already has one with the same
/// email and phone.
///
/// Empty values compare like any other, so a second evaluation with no
/// email and no phone is a duplicate of the first. The existence check
/// runs first; the storage unique index still rejects a concurrent twin
/// that slips between the check and the insert.
pub async fn commit_evaluation(
    repo: &dyn Repository,
    applicant: &NewApplicant,
) -> Result<ApplicantRow, AppError> {
    if repo
        .applicant_exists(&applicant.job_id, &applicant.email, &applicant.phone)
        .await?
    {
        info!(
            "Rejected duplicate submission for job {} ({} / {})",
            applicant.job_id, applicant.email, applicant.phone
        );
        return Err(AppError::DuplicateSubmission(duplicate_message(&applicant.job_id)));
    }

    let row = repo.add_applicant(applicant).await?;
    info!("Stored applicant {} for job {}", row.id, row.job_id);
    Ok(row)
}

pub mod applicant;
pub mod job;

// Resume ingestion: orchestrator, dedup gate, and the upload endpoint.

pub mod gate;
pub mod handlers;
pub mod pipeline;

/// Grading client for the generative language-model endpoint.
///
/// One request per resume: the recruiter prompt, job description and resume
/// text travel as a single user part, with a response schema forcing the
/// six evaluation fields. The reply is decoded in two steps: the outer
/// candidate envelope, then the JSON text inside its first part.
/// Nothing is retried.
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use crate::grading::prompts::{build_grading_input, response_schema};

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    ResponseFormat(String),
}

/// The decoded evaluation fields, before they are attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Advisory score; the range is not enforced.
    #[serde(rename = "Grade")]
    pub grade: f64,
    #[serde(rename = "Skills", default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(rename = "Description", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "Email", default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "Phone", default, deserialize_with = "null_as_default")]
    pub phone: String,
}

/// Models emit `null` for fields they could not find; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GradingClient {
    client: Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl GradingClient {
    pub fn new(endpoint: Option<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            api_key,
        })
    }

    /// Grades `resume_text` against `job_description`.
    pub async fn grade(
        &self,
        resume_text: String,
        job_description: &str,
    ) -> Result<GradingResult, GradingError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| GradingError::Config("GEMINI_API_URL not set".to_string()))?;

        let input = build_grading_input(&resume_text, job_description);
        drop(resume_text);

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: &input }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let mut request = self.client.post(endpoint).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GradingError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GradingError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!("Grading endpoint returned {status}: {body}");
            return Err(GradingError::Network(format!(
                "grading endpoint returned status {}",
                status.as_u16()
            )));
        }

        let result = parse_grading_response(&body)?;
        debug!(
            "Graded resume: grade={}, skills={}",
            result.grade,
            result.skills.len()
        );
        if !(0.0..=100.0).contains(&result.grade) {
            warn!("Grade {} is outside 0-100; storing it unchanged", result.grade);
        }
        Ok(result)
    }
}

/// Decodes both envelope layers of a grading response body.
pub fn parse_grading_response(body: &str) -> Result<GradingResult, GradingError> {
    let inner = first_candidate_text(body)?;
    decode_grading_json(&inner)
}

/// Outer layer: text of the first part of the first candidate.
fn first_candidate_text(body: &str) -> Result<String, GradingError> {
    let outer: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        GradingError::ResponseFormat(format!("failed to decode outer response: {e}"))
    })?;

    let candidate = outer
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GradingError::ResponseFormat("response has no candidates".to_string()))?;

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            GradingError::ResponseFormat(format!(
                "first candidate has no text part (finish reason: {finish_reason:?})"
            ))
        })
}

/// Inner layer: the model's JSON object with the six evaluation fields.
fn decode_grading_json(inner: &str) -> Result<GradingResult, GradingError> {
    serde_json::from_str(inner)
        .map_err(|e| GradingError::ResponseFormat(format!("failed to decode evaluation JSON: {e}")))
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest_handlers;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/jobs",
            get(job_handlers::handle_list_jobs).post(job_handlers::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(job_handlers::handle_get_job))
        .route(
            "/api/v1/jobs/:id/applicants",
            get(job_handlers::handle_list_applicants),
        )
        .route(
            "/api/v1/jobs/:id/resumes",
            post(ingest_handlers::handle_upload_resume)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use httpmock::{Method::POST, MockServer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::{test_support::tool_config, Extractor};
    use crate::grading::test_support::{envelope, jane_doe};
    use crate::grading::GradingClient;
    use crate::ingest::pipeline::Ingestor;
    use crate::store::memory::MemoryRepository;

    const BOUNDARY: &str = "shortlister-test-boundary";

    fn test_config(staging: &Path) -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            gemini_api_url: None,
            gemini_api_key: None,
            staging_dir: staging.to_path_buf(),
            pdftotext_bin: "pdftotext".into(),
            soffice_bin: "libreoffice".into(),
            tool_timeout: Duration::from_secs(10),
            grading_timeout: Duration::from_secs(5),
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(server: &MockServer, bin: &Path, staging: &Path) -> Router {
        let repo = Arc::new(MemoryRepository::with_job("J1", "Backend", "Go backend engineer"));
        let grader = GradingClient::new(
            Some(server.url("/generate")),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let ingestor = Ingestor::new(
            repo.clone(),
            grader,
            Extractor::new(tool_config(bin, staging)),
            staging.to_path_buf(),
        );
        build_router(AppState {
            repo,
            ingestor: Arc::new(ingestor),
            config: test_config(staging),
        })
    }

    fn upload(job_id: &str, field: &str, filename: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {contents}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/jobs/{job_id}/resumes"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let response = app(&server, dir.path(), dir.path())
            .oneshot(get_req("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_fetch_job() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let router = app(&server, dir.path(), dir.path());

        let create = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"title": "Platform", "description": "Rust platform engineer"}).to_string(),
            ))
            .unwrap();
        let response = router.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(get_req(&format!("/api/v1/jobs/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job = json_body(response).await;
        assert_eq!(job["title"], "Platform");
        assert_eq!(job["applicants"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let response = app(&server, dir.path(), dir.path())
            .oneshot(get_req("/api/v1/jobs/ghost-job"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_then_duplicate_upload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200).json_body(envelope(&jane_doe()));
            })
            .await;
        let bin = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let router = app(&server, bin.path(), staging.path());

        let response = router
            .clone()
            .oneshot(upload("J1", "resume", "resume.txt", "Jane Doe, Go and SQL"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["applicant"]["job_id"], "J1");
        assert_eq!(body["applicant"]["grade"], 87.5);
        assert_eq!(body["applicant"]["skills"], json!(["Go", "SQL"]));

        let response = router
            .clone()
            .oneshot(upload("J1", "resume", "resume.txt", "Jane Doe, Go and SQL"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = router
            .oneshot(get_req("/api/v1/jobs/J1/applicants"))
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_unsupported_format_is_415() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let response = app(&server, dir.path(), dir.path())
            .oneshot(upload("J1", "resume", "resume.rtf", "{\\rtf1}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_without_resume_field_is_400() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let response = app(&server, dir.path(), dir.path())
            .oneshot(upload("J1", "attachment", "resume.txt", "text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_to_unknown_job_is_404() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let response = app(&server, dir.path(), dir.path())
            .oneshot(upload("ghost-job", "resume", "resume.txt", "text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_job_checked_before_reading_upload() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs/ghost-job/resumes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from("not a multipart body"))
            .unwrap();

        let response = app(&server, dir.path(), dir.path())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

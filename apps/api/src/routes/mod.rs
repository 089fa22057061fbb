pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Files accepted in one upload request at the per-file size limit.
const MAX_FILES_PER_UPLOAD: usize = 20;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .max_upload_bytes
        .saturating_mul(MAX_FILES_PER_UPLOAD);

    Router::new()
        .route("/health", get(health::health_handler))
        // Candidates
        .route(
            "/api/v1/candidates/upload",
            post(candidates::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/all", get(jobs::handle_all_jobs))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Matching
        .route("/api/v1/matching/process", post(matching::handle_process))
        .route("/api/v1/matching/results", get(matching::handle_results))
        .route(
            "/api/v1/matching/detail/:candidate_id/:job_id",
            get(matching::handle_detail),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::Pipeline;
    use crate::config::Config;
    use crate::documents::testing::docx_with_text;
    use crate::llm_client::testing::{Reply, ScriptedBackend};
    use crate::store::memory::MemoryStore;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/test".to_string()),
            "LLM_BACKEND" => Some("ollama".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn app(replies: Vec<Reply>) -> Router {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            pipeline: Arc::new(Pipeline::new(Arc::new(ScriptedBackend::new(replies)))),
            config: test_config(),
        };
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_upload(filename: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "ranker-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/candidates/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn category_scores() -> String {
        json!({
            "degree": {"score": 50, "comment": ""},
            "experience": {"score": 50, "comment": ""},
            "technical_skill": {"score": 80, "comment": "Rust"},
            "responsibility": {"score": 50, "comment": ""},
            "certificate": {"score": 50, "comment": ""},
            "soft_skill": {"score": 50, "comment": ""},
            "summary_comment": "solid"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(vec![]);
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "ranker");
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_404_with_error_body() {
        let app = app(vec![]);
        let uri = format!("/api/v1/candidates/{}", uuid::Uuid::new_v4());
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_page_size_out_of_range_is_400() {
        let app = app(vec![]);
        let response = send(&app, Method::GET, "/api/v1/jobs?page_size=500", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let app = app(vec![Reply::Text(r#"{"technical_skill": ["Rust"]}"#.to_string())]);

        let response = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"job_name": "Backend", "job_description": "Rust services"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["technical_skill"], json!(["Rust"]));
        let id = created["id"].as_str().unwrap().to_string();

        let response = send(&app, Method::GET, "/api/v1/jobs/all", None).await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = send(&app, Method::GET, "/api/v1/jobs?page=1&page_size=10", None).await;
        let page = body_json(response).await;
        assert_eq!(page["total_job"], 1);
        assert_eq!(page["total_page"], 1);

        let uri = format!("/api/v1/jobs/{id}");
        let response = send(&app, Method::PUT, &uri, Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_match_and_rank() {
        let app = app(vec![
            Reply::Text(r#"{"candidate_name": "Jane Doe"}"#.to_string()),
            Reply::Text(r#"{"technical_skill": ["Rust"]}"#.to_string()),
            Reply::Text(category_scores()),
        ]);

        let response = app
            .clone()
            .oneshot(multipart_upload("jane.docx", &docx_with_text("Jane Doe, Rust")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let uploaded = body_json(response).await;
        assert_eq!(uploaded["results"][0]["status"], "success");
        let candidate_id = uploaded["results"][0]["candidate_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"job_name": "Backend", "job_description": "Rust"})),
        )
        .await;
        let job_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/matching/detail/{candidate_id}/{job_id}");
        let detail = body_json(send(&app, Method::GET, &uri, None).await).await;
        assert_eq!(detail["matching_status"], false);
        assert_eq!(detail["summary_comment"], "No matching analysis available");

        let response = send(
            &app,
            Method::POST,
            "/api/v1/matching/process",
            Some(json!({"job_name": "Backend"})),
        )
        .await;
        let summary = body_json(response).await;
        assert_eq!(summary["processed"], 1);
        assert_eq!(summary["failed"], 0);

        let response = send(
            &app,
            Method::GET,
            "/api/v1/matching/results?job_name=Backend",
            None,
        )
        .await;
        let results = body_json(response).await;
        assert_eq!(results["total_matching"], 1);
        assert_eq!(results["results"][0]["candidate_name"], "Jane Doe");
        let score = results["results"][0]["score"].as_f64().unwrap();
        assert!((score - 59.0).abs() < 1e-9, "score was {score}");
        assert_eq!(results["results"][0]["matching_status"], true);

        let detail = body_json(send(&app, Method::GET, &uri, None).await).await;
        assert_eq!(detail["technical_skill"]["score"], 80);
        assert_eq!(detail["summary_comment"], "solid");
    }

    #[tokio::test]
    async fn test_process_unknown_job_is_404() {
        let app = app(vec![]);
        let response = send(
            &app,
            Method::POST,
            "/api/v1/matching/process",
            Some(json!({"job_name": "Nope"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

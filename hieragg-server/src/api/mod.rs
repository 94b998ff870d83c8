//! API Module
//!
//! HTTP API layer of the hieragg server.

pub mod discover;
pub mod error;
pub mod health;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the main router with all endpoints
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Viewer
        .route("/", get(health::index))
        .route("/static/main.js", get(health::main_js))
        .route("/health", get(health::health_check))
        // Discovery endpoints
        .route("/api/discover", post(discover::discover))
        .route("/api/aggregate/{log_id}", get(discover::aggregate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use hieragg_miner::{
        AggregationOptions, Discovery, DiscoveryEngine, EngineError, StandardDiscoveryEngine,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const BOUNDARY: &str = "hieragg-test-boundary";

    /// Engine returning canned results and recording the paths it saw
    struct StubEngine {
        failure: Option<&'static str>,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl StubEngine {
        fn succeeding() -> Self {
            Self {
                failure: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                failure: Some(message),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl DiscoveryEngine for StubEngine {
        fn discover_process_tree_from_log(
            &self,
            path: &Path,
        ) -> hieragg_miner::Result<Discovery> {
            self.seen.lock().unwrap().push(path.to_path_buf());

            if let Some(message) = self.failure {
                return Err(EngineError::InvalidLog(message.to_string()));
            }

            let mut model = serde_json::Map::new();
            model.insert("foo".to_string(), json!(1));
            Ok(Discovery {
                log_id: "X".to_string(),
                model,
                tree: json!({ "root": [] }),
            })
        }

        fn aggregate_process_tree(
            &self,
            log_id: &str,
            _options: &AggregationOptions,
        ) -> hieragg_miner::Result<Discovery> {
            Err(EngineError::UnknownLog(log_id.to_string()))
        }
    }

    fn app(engine: Arc<dyn DiscoveryEngine>, upload_dir: &Path) -> Router {
        let state = AppState::new(engine, upload_dir).unwrap();
        create_router(state, 1024 * 1024)
    }

    fn multipart_request(field: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );

        Request::builder()
            .method("POST")
            .uri("/api/discover")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_discover_without_file() {
        let temp = tempfile::tempdir().unwrap();
        let engine = Arc::new(StubEngine::succeeding());
        let app = app(engine.clone(), temp.path());

        let response = app
            .clone()
            .oneshot(multipart_request("other", "log.csv", "a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "No file uploaded" }));

        // not a multipart request at all
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/discover")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({ "error": "No file uploaded" }));

        assert!(engine.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_discover_returns_engine_output() {
        let temp = tempfile::tempdir().unwrap();
        let engine = Arc::new(StubEngine::succeeding());
        let app = app(engine.clone(), temp.path());

        let response = app
            .oneshot(multipart_request("file", "log.csv", "case,activity\n1,a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "logId": "X", "foo": 1, "tree": { "root": [] } })
        );

        let saved = temp.path().join("log.csv");
        assert_eq!(*engine.seen.lock().unwrap(), vec![saved.clone()]);
        assert_eq!(
            std::fs::read_to_string(saved).unwrap(),
            "case,activity\n1,a"
        );
    }

    #[tokio::test]
    async fn test_discover_engine_failure() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StubEngine::failing("bad log format")), temp.path());

        let response = app
            .oneshot(multipart_request("file", "log.csv", "garbage"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({ "error": "bad log format" }));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let engine = Arc::new(StubEngine::succeeding());
        let state = AppState::new(engine.clone(), temp.path()).unwrap();
        let app = create_router(state, 64);

        let response = app
            .oneshot(multipart_request("file", "log.csv", &"a".repeat(1024)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json_body(response).await["error"].is_string());
        assert!(engine.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_name_is_reduced_to_file_name() {
        let temp = tempfile::tempdir().unwrap();
        let engine = Arc::new(StubEngine::succeeding());
        let app = app(engine.clone(), temp.path());

        let response = app
            .oneshot(multipart_request("file", "../../escape.csv", "x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *engine.seen.lock().unwrap(),
            vec![temp.path().join("escape.csv")]
        );
    }

    #[tokio::test]
    async fn test_index_without_upload() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StubEngine::succeeding()), temp.path());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/static/main.js"));
    }

    #[tokio::test]
    async fn test_static_script_and_health() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StubEngine::succeeding()), temp.path());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/static/main.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/javascript")
        );

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_dir_created_at_startup() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("uploads");
        assert!(!dir.exists());

        let _app = app(Arc::new(StubEngine::succeeding()), &dir);
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_aggregate_unknown_log() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StubEngine::succeeding()), temp.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/aggregate/nope?level=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({ "error": "Log nope not found" }));
    }

    #[tokio::test]
    async fn test_aggregate_invalid_query() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StubEngine::succeeding()), temp.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/aggregate/X?level=deep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_discover_then_aggregate() {
        let temp = tempfile::tempdir().unwrap();
        let app = app(Arc::new(StandardDiscoveryEngine::default()), temp.path());
        let log = "case_id,activity\n1,register\n1,check\n1,pay\n2,register\n2,review\n2,pay";

        let response = app
            .clone()
            .oneshot(multipart_request("file", "claims.csv", log))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["tree"]["kind"], "sequence");
        let log_id = body["logId"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/aggregate/{log_id}?level=1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["logId"], log_id.as_str());
        assert_eq!(body["tree"]["children"][1]["kind"], "aggregate");
        assert_eq!(body["tree"]["children"][1]["label"], "check + review");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/aggregate/{log_id}?level=9"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "level 9 exceeds tree height 2" })
        );
    }
}

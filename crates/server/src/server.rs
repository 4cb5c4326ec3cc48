//! HTTP server for StudyTrack

use crate::config::ServerConfig;
use crate::routes;
use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use studytrack_progress::ProgressStore;
use studytrack_storage::{DocumentStore, JsonFileStore};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState<S: DocumentStore> {
    pub store: ProgressStore<S>,
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub start_time: Instant,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: ProgressStore<S>, config: &ServerConfig) -> Self {
        Self {
            store,
            static_dir: config.static_dir.clone(),
            allowed_origins: config.allowed_origins.clone(),
            start_time: Instant::now(),
        }
    }
}

/// Build the application router: API routes with CORS, health, and the
/// front end as a static fallback.
pub fn router<S: DocumentStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = cors_layer(&state.allowed_origins);
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(routes::api_routes::<S>().layer(cors))
        .merge(routes::health_routes::<S>())
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("  Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: ServerConfig) -> Result<()> {
    let backend = JsonFileStore::new(&config.current_file, &config.historical_file);
    let store = ProgressStore::open(backend).await?;
    info!(
        "  Documents: {} / {}",
        config.current_file.display(),
        config.historical_file.display()
    );

    let app = router(Arc::new(AppState::new(store, &config)));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("  Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("  Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("  Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use studytrack_core::{FixedClock, SubjectStatus};
    use studytrack_storage::MemoryStore;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        state: Arc<AppState<MemoryStore>>,
        clock: Arc<FixedClock>,
        _static_dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("index.html"), "<h1>StudyTrack</h1>").unwrap();

        let config = ServerConfig {
            static_dir: static_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        let store = ProgressStore::open_with_clock(MemoryStore::new(), clock.clone())
            .await
            .unwrap();
        let state = Arc::new(AppState::new(store, &config));

        Harness {
            app: router(state.clone()),
            state,
            clock,
            _static_dir: static_dir,
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_modules_returns_both_documents() {
        let h = harness().await;

        let (status, body) = send(&h.app, get("/api/modules")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["current"]["modules"]["Math"]["subjects"][0],
            json!({"name": "Algebra", "status": "Pas fait"})
        );
        assert_eq!(body["current"]["last_reset"], "2026-10-19");
        assert_eq!(body["historical"], json!({}));
    }

    #[tokio::test]
    async fn test_get_modules_runs_daily_reset() {
        let h = harness().await;
        h.state
            .store
            .update_status("Math", "Algebra", SubjectStatus::Done)
            .await
            .unwrap();
        h.clock.advance(1);

        let (_, body) = send(&h.app, get("/api/modules")).await;
        assert_eq!(body["current"]["modules"]["Math"]["subjects"][0]["status"], "Pas fait");
        assert_eq!(body["current"]["last_reset"], "2026-10-20");
        assert_eq!(body["historical"]["Math"]["2026-10-19"], 2);
    }

    #[tokio::test]
    async fn test_update_progress() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            post(
                "/api/progress",
                json!({"module": "Math", "subject": "Algebra", "status": "Done"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let (status, body) = send(&h.app, get("/api/module/Math")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Math");
        assert_eq!(body["current"]["subjects"][0]["status"], "Done");
        assert_eq!(body["historical"]["2026-10-19"], 2);
    }

    #[tokio::test]
    async fn test_update_progress_validation() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            post("/api/progress", json!({"module": "Math", "subject": "Algebra"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing fields"}));

        let (status, body) = send(
            &h.app,
            post(
                "/api/progress",
                json!({"module": "Math", "subject": "Algebra", "status": "  "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing fields"}));
    }

    #[tokio::test]
    async fn test_update_progress_accepts_free_form_status() {
        let h = harness().await;

        // the front end adds new subjects with "vide"
        let (status, body) = send(
            &h.app,
            post(
                "/api/progress",
                json!({"module": "Math", "subject": "Geometry", "status": "vide"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let view = h.state.store.get_module_data("Math").await.unwrap();
        assert_eq!(
            view.current.subject("Geometry").unwrap().status,
            SubjectStatus::Other("vide".to_string())
        );
        assert_eq!(view.historical["2026-10-19"], 0);

        let (_, body) = send(&h.app, get("/api/module/Math")).await;
        assert_eq!(body["current"]["subjects"][2], json!({"name": "Geometry", "status": "vide"}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_error() {
        let h = harness().await;
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/progress")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ nope"))
            .unwrap();

        let (status, body) = send(&h.app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_module() {
        let h = harness().await;

        let (status, body) = send(&h.app, get("/api/module/Chemistry")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Module 'Chemistry' not found"}));
    }

    #[tokio::test]
    async fn test_delete_subject() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            post("/api/delete", json!({"module": "Law", "subject": "Civil Law"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "deleted"}));

        let (status, body) = send(
            &h.app,
            post("/api/delete", json!({"module": "Law", "subject": "Civil Law"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": "Subject 'Civil Law' not found in module 'Law'"})
        );

        let (status, _) = send(&h.app, post("/api/delete", json!({"module": "Law"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_module() {
        let h = harness().await;

        let (status, _) = send(&h.app, post("/api/delete_module", json!({"module": "Law"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(h.state.store.get_module_data("Law").await.is_none());

        let (status, body) =
            send(&h.app, post("/api/delete_module", json!({"module": "Law"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Module 'Law' not found"}));
    }

    #[tokio::test]
    async fn test_rename_module() {
        let h = harness().await;

        let (status, body) = send(
            &h.app,
            post(
                "/api/rename_module",
                json!({"oldName": "Programming", "newName": "CS"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "renamed"}));

        let (status, body) = send(&h.app, get("/api/module/CS")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"]["subjects"][1]["name"], "C++");

        let (status, _) = send(
            &h.app,
            post("/api/rename_module", json!({"oldName": "Programming"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_summary_and_health() {
        let h = harness().await;

        let (status, body) = send(&h.app, get("/api/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (status, body) = send(&h.app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_static_fallback_serves_front_end() {
        let h = harness().await;

        let resp = h.app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>StudyTrack</h1>");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_front_end_origin() {
        let h = harness().await;
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/progress")
            .header(header::ORIGIN, "http://localhost:8000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let resp = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:8000")
        );
    }
}

//! API routes for the StudyTrack server

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use studytrack_core::{HistoryDocument, ModuleSummary, ModuleView, ProgressDocument, SubjectStatus};
use studytrack_storage::DocumentStore;
use tracing::info;

type SharedState<S> = Arc<AppState<S>>;

// ============================================================================
// Request / response bodies
// ============================================================================

/// Body of `POST /api/progress`.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressRequest {
    pub module: Option<String>,
    pub subject: Option<String>,
    pub status: Option<String>,
}

/// Body of `POST /api/delete`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteSubjectRequest {
    pub module: Option<String>,
    pub subject: Option<String>,
}

/// Body of `POST /api/delete_module`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteModuleRequest {
    pub module: Option<String>,
}

/// Body of `POST /api/rename_module`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameModuleRequest {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
}

/// Response of `GET /api/modules`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModulesResponse {
    pub current: ProgressDocument,
    pub historical: HistoryDocument,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

fn required(field: Option<String>) -> Result<String, ApiError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(ApiError::missing_fields)
}

// ============================================================================
// Module Routes
// ============================================================================

pub fn api_routes<S: DocumentStore + 'static>() -> Router<SharedState<S>> {
    Router::new()
        .route("/api/modules", get(get_modules::<S>))
        .route("/api/module/:name", get(get_module::<S>))
        .route("/api/summary", get(get_summary::<S>))
        .route("/api/progress", post(update_progress::<S>))
        .route("/api/delete", post(delete_subject::<S>))
        .route("/api/delete_module", post(delete_module::<S>))
        .route("/api/rename_module", post(rename_module::<S>))
}

async fn get_modules<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
) -> Result<Json<ModulesResponse>, ApiError> {
    state.store.daily_reset().await?;
    let (current, historical) = state.store.snapshot().await;
    Ok(Json(ModulesResponse { current, historical }))
}

async fn get_module<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(name): Path<String>,
) -> Result<Json<ModuleView>, ApiError> {
    state
        .store
        .get_module_data(&name)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Module '{}' not found", name)))
}

async fn get_summary<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
) -> Json<Vec<ModuleSummary>> {
    Json(state.store.summary().await)
}

async fn update_progress<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let module = required(req.module)?;
    let subject = required(req.subject)?;
    let status = SubjectStatus::from(required(req.status)?);

    info!("  Progress: {} / {} -> {}", module, subject, status);
    state.store.update_status(&module, &subject, status).await?;
    Ok(Json(json!({ "status": "success" })))
}

async fn delete_subject<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<DeleteSubjectRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let module = required(req.module)?;
    let subject = required(req.subject)?;

    state.store.delete_subject(&module, &subject).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

async fn delete_module<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<DeleteModuleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let module = required(req.module)?;

    state.store.delete_module(&module).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

async fn rename_module<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
    payload: Result<Json<RenameModuleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let old_name = required(req.old_name)?;
    let new_name = required(req.new_name)?;

    state.store.rename_module(&old_name, &new_name).await?;
    Ok(Json(json!({ "status": "renamed" })))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes<S: DocumentStore + 'static>() -> Router<SharedState<S>> {
    Router::new().route("/health", get(health::<S>))
}

async fn health<S: DocumentStore + 'static>(
    State(state): State<SharedState<S>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

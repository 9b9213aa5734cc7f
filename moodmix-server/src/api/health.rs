//! Health check endpoint
//!
//! Reports "degraded" rather than failing when the catalog did not load:
//! the service still answers, just with empty playlists.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog_ready: bool,
    pub catalog_size: usize,
    /// Why the catalog is unavailable, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let engine = state.engine().await;
    let status = if engine.is_ready() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        module: "moodmix-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        catalog_ready: engine.is_ready(),
        catalog_size: engine.catalog_size(),
        catalog_error: engine.not_ready_reason().map(str::to_string),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

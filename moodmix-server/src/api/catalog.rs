//! Catalog status and reload endpoints
//!
//! A reload parses the catalog on a blocking thread, then swaps the whole
//! engine at once. A failed reload keeps the engine that is already serving.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use moodmix_engine::{LoadReport, MusicEngine};
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Catalog status response
#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub path: String,
    pub ready: bool,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<LoadReport>,
}

impl CatalogStatus {
    fn of(state: &AppState, engine: &MusicEngine) -> Self {
        Self {
            path: state.catalog_path.display().to_string(),
            ready: engine.is_ready(),
            size: engine.catalog_size(),
            report: engine.catalog().map(|c| c.report()),
        }
    }
}

/// GET /api/catalog
pub async fn catalog_status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let engine = state.engine().await;
    Json(CatalogStatus::of(&state, &engine))
}

/// POST /api/catalog/reload
pub async fn reload_catalog(State(state): State<AppState>) -> ApiResult<Json<CatalogStatus>> {
    let path = state.catalog_path.clone();
    info!("Reloading catalog from {}", path.display());

    let engine = tokio::task::spawn_blocking(move || MusicEngine::load(&path))
        .await
        .map_err(|e| ApiError::Internal(format!("Catalog reload task failed: {}", e)))?;

    if let Some(reason) = engine.not_ready_reason() {
        warn!("Catalog reload failed, keeping current catalog: {}", reason);
        return Err(ApiError::CatalogUnavailable(reason.to_string()));
    }

    let status = CatalogStatus::of(&state, &engine);
    state.swap_engine(engine).await;
    info!("Catalog reloaded with {} songs", status.size);

    Ok(Json(status))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(catalog_status))
        .route("/api/catalog/reload", post(reload_catalog))
}

//! moodmix-server library - HTTP front for the recommendation engine
//!
//! The engine is built once at startup and injected here; handlers only
//! ever read it. A catalog reload builds a fresh engine and swaps the
//! shared `Arc` in one step, so in-flight requests finish on the engine
//! they started with.

pub mod api;
pub mod error;
pub mod logging;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use moodmix_engine::MusicEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Arc<MusicEngine>>>,
    /// Catalog CSV used for reloads
    pub catalog_path: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: MusicEngine, catalog_path: PathBuf) -> Self {
        Self {
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            catalog_path,
            startup_time: Utc::now(),
        }
    }

    /// Current engine; the returned handle stays valid across reloads
    pub async fn engine(&self) -> Arc<MusicEngine> {
        self.engine.read().await.clone()
    }

    /// Replace the engine, returning the previous one
    pub async fn swap_engine(&self, engine: MusicEngine) -> Arc<MusicEngine> {
        let mut guard = self.engine.write().await;
        std::mem::replace(&mut *guard, Arc::new(engine))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recommend_routes())
        .merge(api::catalog_routes())
        .merge(api::buildinfo_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

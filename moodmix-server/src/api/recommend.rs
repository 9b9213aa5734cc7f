//! Playlist recommendation endpoint
//!
//! Takes the classifier labels for one image and answers with the nearest
//! songs. Image upload and classification happen upstream of this service.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use moodmix_engine::{FeatureVector, RankedSong, Signals};
use serde::Serialize;
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

/// Recommendation response
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub scene: String,
    pub emotion: Option<String>,
    pub objects: Vec<String>,
    /// Composed `[valence, energy, danceability, acousticness]` target
    pub target: FeatureVector,
    /// Nearest first; empty when no catalog is loaded
    pub playlist: Vec<RankedSong>,
}

/// POST /api/recommend
///
/// Body: `{"scene": "forest", "emotion": "sad", "objects": ["dog"]}`; every
/// field is optional.
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<Signals>, JsonRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    let Json(signals) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let signals = signals.without_person();

    info!(
        scene = %signals.scene,
        emotion = ?signals.emotion,
        objects = ?signals.objects,
        "Recommendation requested"
    );

    let engine = state.engine().await;
    let recommendation = engine.recommend_detailed(&signals);

    Ok(Json(RecommendResponse {
        success: true,
        target: recommendation.target(),
        scene: signals.scene,
        emotion: signals.emotion,
        objects: signals.objects,
        playlist: recommendation.songs,
    }))
}

pub fn recommend_routes() -> Router<AppState> {
    Router::new().route("/api/recommend", post(recommend))
}

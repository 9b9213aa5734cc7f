//! # MoodMix Engine
//!
//! Context-to-vector blending and song retrieval:
//! - Catalog loading with min-max feature scaling
//! - Exact nearest-neighbor index over the 4-D feature space
//! - Scene/emotion/object lookup tables and target vector composition
//! - Recommendation orchestration with a degraded "not ready" mode
//! - Signal extractor contract for the image classifiers

pub mod catalog;
pub mod compose;
pub mod engine;
pub mod features;
pub mod index;
pub mod scaler;
pub mod signals;
pub mod tables;

pub use catalog::{Catalog, LoadReport, Song, SongRecord};
pub use compose::Composition;
pub use engine::{MusicEngine, RankedSong, Recommendation, SongSummary, PLAYLIST_LENGTH};
pub use features::{FeatureVector, Modifier, FEATURE_COLUMNS};
pub use index::{FeatureIndex, Neighbor};
pub use scaler::MinMaxScaler;
pub use signals::{
    dominant_emotion, extract_signals, ExtractionError, SignalExtractor, Signals, StaticSignals,
};
pub use tables::VibeTables;

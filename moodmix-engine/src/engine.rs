//! Recommendation engine
//!
//! Owns the catalog, its nearest-neighbor index and the vibe tables. Built
//! once at startup and read-only afterwards, so one instance can be shared
//! across request handlers behind an `Arc` without locking.
//!
//! A catalog that fails to load leaves the engine "not ready": it stays
//! usable and answers every request with an empty playlist.

use crate::catalog::Catalog;
use crate::compose::Composition;
use crate::features::FeatureVector;
use crate::index::FeatureIndex;
use crate::signals::Signals;
use crate::tables::VibeTables;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info};

/// Maximum number of songs in a playlist
pub const PLAYLIST_LENGTH: usize = 20;

/// Song as shown to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub title: String,
    pub artist: String,
    pub link: String,
}

/// Playlist entry with its distance to the target vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSong {
    #[serde(flatten)]
    pub song: SongSummary,
    pub distance: f64,
}

/// Full answer to one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub composition: Composition,
    /// Nearest first; empty when the engine is not ready
    pub songs: Vec<RankedSong>,
}

impl Recommendation {
    pub fn target(&self) -> FeatureVector {
        self.composition.target
    }

    pub fn playlist(&self) -> Vec<SongSummary> {
        self.songs.iter().map(|r| r.song.clone()).collect()
    }
}

#[derive(Debug)]
enum EngineState {
    Ready { catalog: Catalog, index: FeatureIndex },
    NotReady { reason: String },
}

#[derive(Debug)]
pub struct MusicEngine {
    tables: VibeTables,
    state: EngineState,
}

impl MusicEngine {
    /// Build an engine from a catalog CSV on disk
    ///
    /// Never fails: a load error is logged and yields a not-ready engine.
    pub fn load(path: &Path) -> Self {
        match Catalog::load(path) {
            Ok(catalog) => Self::from_catalog(catalog),
            Err(e) => {
                error!("Failed to load catalog {}: {}", path.display(), e);
                Self::not_ready(e.to_string())
            }
        }
    }

    /// Build an engine from any CSV source; same failure policy as [`MusicEngine::load`]
    pub fn from_reader<R: Read>(source: R) -> Self {
        match Catalog::from_reader(source) {
            Ok(catalog) => Self::from_catalog(catalog),
            Err(e) => {
                error!("Failed to load catalog: {}", e);
                Self::not_ready(e.to_string())
            }
        }
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let index = FeatureIndex::new(catalog.songs().iter().map(|s| s.features).collect());
        info!("Engine ready with {} songs", catalog.len());
        Self {
            tables: VibeTables::standard(),
            state: EngineState::Ready { catalog, index },
        }
    }

    /// An engine with no usable catalog
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            tables: VibeTables::standard(),
            state: EngineState::NotReady {
                reason: reason.into(),
            },
        }
    }

    pub fn with_tables(mut self, tables: VibeTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready { .. })
    }

    /// Why the catalog is unavailable, if it is
    pub fn not_ready_reason(&self) -> Option<&str> {
        match &self.state {
            EngineState::Ready { .. } => None,
            EngineState::NotReady { reason } => Some(reason.as_str()),
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.state {
            EngineState::Ready { catalog, .. } => Some(catalog),
            EngineState::NotReady { .. } => None,
        }
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog().map_or(0, Catalog::len)
    }

    pub fn tables(&self) -> &VibeTables {
        &self.tables
    }

    /// Target vector for the given signals
    pub fn target_vector(&self, signals: &Signals) -> FeatureVector {
        self.compose(signals).target
    }

    /// Up to [`PLAYLIST_LENGTH`] songs nearest to the signals' target vector
    pub fn recommend(&self, signals: &Signals) -> Vec<SongSummary> {
        self.recommend_detailed(signals).playlist()
    }

    /// Like [`MusicEngine::recommend`], keeping the composition and distances
    pub fn recommend_detailed(&self, signals: &Signals) -> Recommendation {
        let composition = self.compose(signals);

        let songs = match &self.state {
            EngineState::NotReady { reason } => {
                debug!("Engine not ready ({}), returning empty playlist", reason);
                Vec::new()
            }
            EngineState::Ready { catalog, index } => index
                .nearest(&composition.target, PLAYLIST_LENGTH)
                .into_iter()
                .filter_map(|n| {
                    catalog.get(n.index).map(|song| RankedSong {
                        song: SongSummary {
                            title: song.track_name.clone(),
                            artist: song.artist_name.clone(),
                            link: song.link(),
                        },
                        distance: n.distance,
                    })
                })
                .collect(),
        };

        info!(
            scene = %composition.scene,
            emotion = %composition.emotion,
            songs = songs.len(),
            "Recommendation for target {:?}",
            composition.target
        );

        Recommendation { composition, songs }
    }

    fn compose(&self, signals: &Signals) -> Composition {
        self.tables.compose_detailed(
            &signals.scene,
            signals.emotion.as_deref(),
            signals.objects.iter(),
        )
    }
}

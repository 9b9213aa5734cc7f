//! Context signals and the image classifier contract
//!
//! The classifiers themselves are black boxes behind [`SignalExtractor`].
//! [`extract_signals`] runs all three detectors concurrently and degrades
//! each failure to its neutral value, so a broken face model never costs
//! the scene or object signal.

use crate::tables::{normalize_label, UNKNOWN_SCENE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Object label the detector reports for people; never a usable modifier
pub const PERSON_LABEL: &str = "person";

/// The three context signals for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    #[serde(default = "unknown_scene")]
    pub scene: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub objects: Vec<String>,
}

fn unknown_scene() -> String {
    UNKNOWN_SCENE.to_string()
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            scene: unknown_scene(),
            emotion: None,
            objects: Vec::new(),
        }
    }
}

impl Signals {
    pub fn new<I, S>(scene: &str, emotion: Option<&str>, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scene: scene.to_string(),
            emotion: emotion.map(str::to_string),
            objects: objects.into_iter().map(Into::into).collect(),
        }
        .without_person()
    }

    /// Drop the "person" label and blank labels from the object set
    pub fn without_person(mut self) -> Self {
        self.objects.retain(|o| {
            let label = normalize_label(o);
            !label.is_empty() && label != PERSON_LABEL
        });
        self
    }
}

/// Classifier failure for a single detector
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Contract for the image classifiers
///
/// # Example
/// ```rust,ignore
/// struct RemoteClassifier { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl SignalExtractor for RemoteClassifier {
///     fn name(&self) -> &'static str { "remote" }
///     async fn detect_emotion(&self, image: &Path) -> Result<Option<String>, ExtractionError> { ... }
///     async fn detect_scene(&self, image: &Path) -> Result<String, ExtractionError> { ... }
///     async fn detect_objects(&self, image: &Path) -> Result<Vec<String>, ExtractionError> { ... }
/// }
/// ```
#[async_trait]
pub trait SignalExtractor: Send + Sync {
    /// Extractor name for logs
    fn name(&self) -> &'static str;

    /// Dominant facial emotion, `None` when no face is confidently detected
    async fn detect_emotion(&self, image: &Path) -> Result<Option<String>, ExtractionError>;

    /// Scene label, or `"unknown"`
    async fn detect_scene(&self, image: &Path) -> Result<String, ExtractionError>;

    /// Visible object labels, possibly empty
    async fn detect_objects(&self, image: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Run all detectors on one image, degrading each failure independently
pub async fn extract_signals(extractor: &dyn SignalExtractor, image: &Path) -> Signals {
    debug!(extractor = extractor.name(), "Analyzing image {}", image.display());

    let (emotion, scene, objects) = tokio::join!(
        extractor.detect_emotion(image),
        extractor.detect_scene(image),
        extractor.detect_objects(image),
    );

    let emotion = emotion.unwrap_or_else(|e| {
        warn!(extractor = extractor.name(), "Emotion detection failed: {}", e);
        None
    });
    let scene = scene.unwrap_or_else(|e| {
        warn!(extractor = extractor.name(), "Scene detection failed: {}", e);
        unknown_scene()
    });
    let objects = objects.unwrap_or_else(|e| {
        warn!(extractor = extractor.name(), "Object detection failed: {}", e);
        Vec::new()
    });

    let signals = Signals {
        scene,
        emotion,
        objects,
    }
    .without_person();

    debug!(
        scene = %signals.scene,
        emotion = ?signals.emotion,
        objects = ?signals.objects,
        "Extracted signals"
    );
    signals
}

/// Majority vote over per-face emotion labels
///
/// Ties go to the label seen first. Blank labels are ignored.
pub fn dominant_emotion<S: AsRef<str>>(faces: &[S]) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for face in faces {
        let label = normalize_label(face.as_ref());
        if label.is_empty() {
            continue;
        }
        let count = counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut winner: Option<(String, usize)> = None;
    for label in order {
        let count = counts[&label];
        if winner.as_ref().map_or(true, |(_, best)| count > *best) {
            winner = Some((label, count));
        }
    }
    winner.map(|(label, _)| label)
}

/// Extractor that reports labels decided ahead of time
///
/// Used by the command-line tool, where the labels come from flags, and
/// anywhere the classifiers ran out of process.
#[derive(Debug, Clone, Default)]
pub struct StaticSignals {
    /// One emotion label per detected face
    pub faces: Vec<String>,
    pub scene: Option<String>,
    pub objects: Vec<String>,
}

#[async_trait]
impl SignalExtractor for StaticSignals {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn detect_emotion(&self, _image: &Path) -> Result<Option<String>, ExtractionError> {
        Ok(dominant_emotion(&self.faces))
    }

    async fn detect_scene(&self, _image: &Path) -> Result<String, ExtractionError> {
        Ok(self.scene.clone().unwrap_or_else(unknown_scene))
    }

    async fn detect_objects(&self, _image: &Path) -> Result<Vec<String>, ExtractionError> {
        Ok(self.objects.clone())
    }
}

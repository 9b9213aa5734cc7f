//! Context lookup tables
//!
//! Scenes set the base "vibe" vector; emotions and objects shift valence and
//! energy. All keys are lowercase; callers normalize labels with
//! [`normalize_label`] before lookup.

use crate::features::{FeatureVector, Modifier};
use std::collections::HashMap;

/// Scene label reported when the scene classifier has no answer
pub const UNKNOWN_SCENE: &str = "unknown";

/// Emotion assumed when no face was detected
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Base vector for unrecognized scenes
pub const NEUTRAL_VECTOR: FeatureVector = [0.5, 0.5, 0.5, 0.5];

// [valence, energy, danceability, acousticness]
const SCENE_VECTORS: [(&str, FeatureVector); 6] = [
    ("buildings", [0.5, 0.8, 0.8, 0.1]), // pop
    ("street", [0.5, 0.7, 0.9, 0.2]),    // hip-hop
    ("forest", [0.5, 0.3, 0.4, 0.9]),    // acoustic
    ("mountain", [0.5, 0.9, 0.4, 0.1]),  // rock
    ("glacier", [0.2, 0.1, 0.1, 0.9]),   // ambient
    ("sea", [0.8, 0.6, 0.7, 0.3]),       // tropical
];

const EMOTION_MODIFIERS: [(&str, Modifier); 7] = [
    ("happy", Modifier::new(0.3, 0.2)),
    ("sad", Modifier::new(-0.4, -0.3)),
    ("angry", Modifier::new(-0.2, 0.4)),
    ("fear", Modifier::new(-0.2, -0.2)),
    ("surprise", Modifier::new(0.1, 0.3)),
    ("neutral", Modifier::ZERO),
    ("disgust", Modifier::new(-0.3, 0.1)),
];

const OBJECT_MODIFIERS: [(&str, Modifier); 7] = [
    ("laptop", Modifier::new(0.0, -0.1)),
    ("book", Modifier::new(0.1, -0.3)),
    ("cat", Modifier::new(0.2, -0.1)),
    ("dog", Modifier::new(0.4, 0.1)),
    ("car", Modifier::new(0.1, 0.3)),
    ("motorcycle", Modifier::new(0.0, 0.4)),
    ("guitar", Modifier::new(0.2, 0.1)),
];

/// Trim and lowercase a classifier label
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Immutable scene/emotion/object mappings held by the engine
#[derive(Debug, Clone)]
pub struct VibeTables {
    scenes: HashMap<String, FeatureVector>,
    emotions: HashMap<String, Modifier>,
    objects: HashMap<String, Modifier>,
}

impl VibeTables {
    /// The built-in tables
    pub fn standard() -> Self {
        Self {
            scenes: to_map(&SCENE_VECTORS),
            emotions: to_map(&EMOTION_MODIFIERS),
            objects: to_map(&OBJECT_MODIFIERS),
        }
    }

    /// Replace or add an object modifier
    pub fn with_object(mut self, label: &str, modifier: Modifier) -> Self {
        self.objects.insert(normalize_label(label), modifier);
        self
    }

    /// Base vector for a normalized scene label, falling back to [`NEUTRAL_VECTOR`]
    pub fn scene_vector(&self, scene: &str) -> FeatureVector {
        self.scenes.get(scene).copied().unwrap_or(NEUTRAL_VECTOR)
    }

    /// Delta for a normalized emotion label; unknown emotions contribute nothing
    pub fn emotion_modifier(&self, emotion: &str) -> Modifier {
        self.emotions.get(emotion).copied().unwrap_or(Modifier::ZERO)
    }

    pub fn object_modifier(&self, object: &str) -> Option<Modifier> {
        self.objects.get(object).copied()
    }

    /// Recognized scene labels, sorted
    pub fn scene_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Recognized emotion labels, sorted
    pub fn emotion_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.emotions.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

impl Default for VibeTables {
    fn default() -> Self {
        Self::standard()
    }
}

fn to_map<T: Copy>(entries: &[(&str, T)]) -> HashMap<String, T> {
    entries
        .iter()
        .map(|(label, value)| (label.to_string(), *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_sizes() {
        let tables = VibeTables::standard();
        assert_eq!(
            tables.scene_labels(),
            vec!["buildings", "forest", "glacier", "mountain", "sea", "street"]
        );
        assert_eq!(tables.emotion_labels().len(), 7);
        assert!(tables.object_modifier("guitar").is_some());
    }

    #[test]
    fn test_unknown_lookups_fall_back() {
        let tables = VibeTables::standard();
        assert_eq!(tables.scene_vector(UNKNOWN_SCENE), NEUTRAL_VECTOR);
        assert_eq!(tables.emotion_modifier("bored"), Modifier::ZERO);
        assert_eq!(tables.object_modifier("person"), None);
    }

    #[test]
    fn test_with_object_normalizes_key() {
        let tables = VibeTables::standard().with_object("  Piano ", Modifier::new(0.1, -0.2));
        assert_eq!(tables.object_modifier("piano"), Some(Modifier::new(0.1, -0.2)));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Forest\n"), "forest");
        assert_eq!(normalize_label("HAPPY"), "happy");
    }
}

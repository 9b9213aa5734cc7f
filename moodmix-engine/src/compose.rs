//! Target vector composition
//!
//! Fuses the three context signals into one point in feature space. The
//! order is fixed:
//! 1. Scene base vector (neutral fallback for unknown scenes)
//! 2. Emotion delta on valence/energy (absent emotion = neutral)
//! 3. One delta per distinct recognized object, in sorted label order
//! 4. Component-wise clamp into [0,1]
//!
//! Objects are a set: a label detected twice applies its delta once.

use crate::features::{clamp_unit, FeatureVector, Modifier};
use crate::tables::{normalize_label, VibeTables, NEUTRAL_EMOTION};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Breakdown of how a target vector was built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub scene: String,
    pub base: FeatureVector,
    pub emotion: String,
    pub emotion_delta: Modifier,
    /// Recognized objects with their deltas, sorted by label
    pub object_deltas: Vec<(String, Modifier)>,
    /// Unclamped sum, kept for diagnostics
    pub raw: FeatureVector,
    pub target: FeatureVector,
}

impl VibeTables {
    /// Compose the clamped target vector for the given signals
    pub fn compose<I, S>(&self, scene: &str, emotion: Option<&str>, objects: I) -> FeatureVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.compose_detailed(scene, emotion, objects).target
    }

    /// Same as [`VibeTables::compose`] but keeps every contribution
    pub fn compose_detailed<I, S>(
        &self,
        scene: &str,
        emotion: Option<&str>,
        objects: I,
    ) -> Composition
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scene = normalize_label(scene);
        let base = self.scene_vector(&scene);

        let emotion = emotion
            .map(normalize_label)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| NEUTRAL_EMOTION.to_string());
        let emotion_delta = self.emotion_modifier(&emotion);

        let mut raw = base;
        emotion_delta.apply(&mut raw);

        let distinct: BTreeSet<String> = objects
            .into_iter()
            .map(|o| normalize_label(o.as_ref()))
            .filter(|o| !o.is_empty())
            .collect();

        let mut object_deltas = Vec::new();
        for object in distinct {
            if let Some(delta) = self.object_modifier(&object) {
                delta.apply(&mut raw);
                object_deltas.push((object, delta));
            }
        }

        let target = clamp_unit(raw);

        debug!(
            scene = %scene,
            emotion = %emotion,
            objects = object_deltas.len(),
            "Composed target vector {:?} (raw {:?})",
            target,
            raw
        );

        Composition {
            scene,
            base,
            emotion,
            emotion_delta,
            object_deltas,
            raw,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::NEUTRAL_VECTOR;

    const NO_OBJECTS: [&str; 0] = [];

    fn assert_close(actual: FeatureVector, expected: FeatureVector) {
        for i in 0..4 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-9,
                "component {i}: expected {expected:?}, got {actual:?}"
            );
        }
    }

    #[test]
    fn test_recognized_scene_with_neutral_is_identity() {
        let tables = VibeTables::standard();
        for scene in tables.scene_labels() {
            let target = tables.compose(scene, Some("neutral"), NO_OBJECTS);
            assert_eq!(target, tables.scene_vector(scene), "scene {scene}");
        }
    }

    #[test]
    fn test_unknown_scene_is_neutral() {
        let tables = VibeTables::standard();
        assert_eq!(tables.compose("unknown", Some("neutral"), NO_OBJECTS), NEUTRAL_VECTOR);
        assert_eq!(tables.compose("volcano", None, NO_OBJECTS), NEUTRAL_VECTOR);
    }

    #[test]
    fn test_forest_sad() {
        let tables = VibeTables::standard();
        let target = tables.compose("forest", Some("sad"), NO_OBJECTS);
        assert_close(target, [0.1, 0.0, 0.4, 0.9]);
    }

    #[test]
    fn test_street_dog_without_emotion() {
        let tables = VibeTables::standard();
        let target = tables.compose("street", None, ["dog"]);
        assert_close(target, [0.9, 0.8, 0.9, 0.2]);
    }

    #[test]
    fn test_clamps_high_and_low() {
        let tables = VibeTables::standard();

        // sea 0.8 valence + happy 0.3 + dog 0.4 -> 1.5
        let high = tables.compose_detailed("sea", Some("happy"), ["dog", "guitar"]);
        assert!(high.raw[0] > 1.0);
        assert_eq!(high.target[0], 1.0);

        // glacier 0.1 energy + sad -0.3 + book -0.3 -> -0.5
        let low = tables.compose_detailed("glacier", Some("sad"), ["book"]);
        assert!(low.raw[1] < 0.0);
        assert_eq!(low.target[1], 0.0);
        assert_eq!(low.target[0], 0.0);
    }

    #[test]
    fn test_duplicate_objects_do_not_stack() {
        let tables = VibeTables::standard();
        let once = tables.compose("street", None, ["dog"]);
        let twice = tables.compose("street", None, ["dog", "Dog", " dog "]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unmatched_objects_and_labels_ignored() {
        let tables = VibeTables::standard();
        let plain = tables.compose("mountain", Some("neutral"), NO_OBJECTS);
        let noisy = tables.compose("mountain", Some("bored"), ["toaster", "", "person"]);
        assert_eq!(plain, noisy);
    }

    #[test]
    fn test_labels_are_normalized() {
        let tables = VibeTables::standard();
        assert_eq!(
            tables.compose(" Forest ", Some("SAD"), NO_OBJECTS),
            tables.compose("forest", Some("sad"), NO_OBJECTS)
        );
        // Empty emotion is treated as absent
        assert_eq!(
            tables.compose("forest", Some(""), NO_OBJECTS),
            tables.scene_vector("forest")
        );
    }

    #[test]
    fn test_object_order_irrelevant() {
        let tables = VibeTables::standard();
        let a = tables.compose("buildings", Some("fear"), ["cat", "car", "laptop"]);
        let b = tables.compose("buildings", Some("fear"), ["laptop", "cat", "car"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_composition_breakdown() {
        let tables = VibeTables::standard();
        let c = tables.compose_detailed("street", None, ["dog", "toaster", "cat"]);
        assert_eq!(c.emotion, "neutral");
        assert_eq!(c.base, [0.5, 0.7, 0.9, 0.2]);
        let labels: Vec<&str> = c.object_deltas.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["cat", "dog"]);
    }

    #[test]
    fn test_output_always_in_unit_range() {
        let tables = VibeTables::standard();
        let objects = ["laptop", "book", "cat", "dog", "car", "motorcycle", "guitar"];
        for scene in ["buildings", "street", "forest", "mountain", "glacier", "sea", "unknown"] {
            for emotion in tables.emotion_labels() {
                let target = tables.compose(scene, Some(emotion), objects);
                assert!(target.iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }
}

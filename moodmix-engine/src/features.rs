//! Feature space primitives
//!
//! Every point lives in the same 4-D space:
//! `[valence, energy, danceability, acousticness]`, each in [0,1] once
//! normalized.

use serde::{Deserialize, Serialize};

/// Number of audio feature dimensions
pub const FEATURE_DIMS: usize = 4;

/// Catalog column names, in vector component order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMS] =
    ["valence", "energy", "danceability", "acousticness"];

pub const VALENCE: usize = 0;
pub const ENERGY: usize = 1;

/// A point in feature space
pub type FeatureVector = [f64; FEATURE_DIMS];

/// Additive delta on the valence and energy components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Modifier {
    pub valence: f64,
    pub energy: f64,
}

impl Modifier {
    pub const ZERO: Modifier = Modifier::new(0.0, 0.0);

    pub const fn new(valence: f64, energy: f64) -> Self {
        Self { valence, energy }
    }

    /// Add this delta to a vector in place; danceability and acousticness are untouched
    pub fn apply(&self, vector: &mut FeatureVector) {
        vector[VALENCE] += self.valence;
        vector[ENERGY] += self.energy;
    }
}

/// Clamp every component into [0,1]
pub fn clamp_unit(vector: FeatureVector) -> FeatureVector {
    vector.map(|v| v.clamp(0.0, 1.0))
}

/// Euclidean distance between two points
pub fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_touches_only_valence_and_energy() {
        let mut v = [0.5, 0.5, 0.5, 0.5];
        Modifier::new(0.2, -0.1).apply(&mut v);
        assert!((v[0] - 0.7).abs() < 1e-12);
        assert!((v[1] - 0.4).abs() < 1e-12);
        assert_eq!(v[2], 0.5);
        assert_eq!(v[3], 0.5);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit([-0.3, 1.4, 0.5, 1.0]), [0.0, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_euclidean_distance() {
        let d = euclidean_distance(&[0.0, 0.0, 0.0, 0.0], &[1.0, 1.0, 1.0, 1.0]);
        assert!((d - 2.0).abs() < 1e-12);
        assert_eq!(euclidean_distance(&[0.3; 4], &[0.3; 4]), 0.0);
    }
}

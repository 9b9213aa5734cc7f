//! Exact nearest-neighbor index
//!
//! Brute-force Euclidean search over the normalized catalog matrix. The
//! ordering is total: ascending distance, then ascending catalog index, so
//! equidistant songs always come back in catalog order.

use crate::features::{euclidean_distance, FeatureVector};
use std::cmp::Ordering;

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position in the catalog
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

#[derive(Debug, Clone)]
pub struct FeatureIndex {
    points: Vec<FeatureVector>,
}

impl FeatureIndex {
    pub fn new(points: Vec<FeatureVector>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `k` points closest to `target`, nearest first
    ///
    /// Returns `min(k, len)` neighbors.
    pub fn nearest(&self, target: &FeatureVector, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut neighbors: Vec<Neighbor> = self
            .points
            .iter()
            .enumerate()
            .map(|(index, point)| Neighbor {
                index,
                distance: euclidean_distance(point, target),
            })
            .collect();

        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, Neighbor::rank);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by(Neighbor::rank);
        neighbors
    }
}

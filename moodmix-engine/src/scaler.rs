//! Min-max feature scaler
//!
//! Fit once over the raw catalog matrix; the per-column min and max are
//! then fixed for the lifetime of the engine.

use crate::features::{FeatureVector, FEATURE_DIMS};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinMaxScaler {
    min: FeatureVector,
    max: FeatureVector,
}

impl MinMaxScaler {
    /// Fit per-column bounds; `None` when there is nothing to fit
    pub fn fit<'a, I>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut rows = rows.into_iter();
        let first = rows.next()?;
        let mut min = *first;
        let mut max = *first;

        for row in rows {
            for i in 0..FEATURE_DIMS {
                min[i] = min[i].min(row[i]);
                max[i] = max[i].max(row[i]);
            }
        }

        Some(Self { min, max })
    }

    /// Map a raw vector into the fitted space
    ///
    /// A zero-width column (max == min) maps every value to `value - min`,
    /// i.e. 0.0 for catalog rows.
    pub fn transform(&self, raw: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_DIMS];
        for i in 0..FEATURE_DIMS {
            let range = self.max[i] - self.min[i];
            let scale = if range > 0.0 { range } else { 1.0 };
            out[i] = (raw[i] - self.min[i]) / scale;
        }
        out
    }

    pub fn min(&self) -> &FeatureVector {
        &self.min
    }

    pub fn max(&self) -> &FeatureVector {
        &self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_empty_is_none() {
        assert!(MinMaxScaler::fit(std::iter::empty::<&FeatureVector>()).is_none());
    }

    #[test]
    fn test_fit_and_transform() {
        let rows = vec![[0.2, 10.0, 0.0, 1.0], [0.6, 30.0, 0.5, 1.0], [1.0, 20.0, 1.0, 1.0]];
        let scaler = MinMaxScaler::fit(&rows).unwrap();

        assert_eq!(scaler.min(), &[0.2, 10.0, 0.0, 1.0]);
        assert_eq!(scaler.max(), &[1.0, 30.0, 1.0, 1.0]);

        let t = scaler.transform(&rows[1]);
        assert!((t[0] - 0.5).abs() < 1e-12);
        assert!((t[1] - 1.0).abs() < 1e-12);
        assert!((t[2] - 0.5).abs() < 1e-12);
        // Constant column collapses to zero
        assert_eq!(t[3], 0.0);
    }

    #[test]
    fn test_transformed_catalog_stays_in_unit_range() {
        let rows = vec![[-3.0, 0.1, 7.0, 0.0], [5.0, 0.9, 9.0, 2.0], [1.0, 0.5, 8.0, 1.0]];
        let scaler = MinMaxScaler::fit(&rows).unwrap();
        for row in &rows {
            for v in scaler.transform(row) {
                assert!((0.0..=1.0).contains(&v), "{v} out of range");
            }
        }
    }
}

//! Median imputation.

use ndarray::{Array2, ArrayView2};

use crate::utils::quantile;

/// Replaces missing feature values with the per-feature median seen at fit
/// time. A feature with no finite training values imputes to 0.
#[derive(Debug, Clone)]
pub struct MedianImputer {
    medians: Vec<f32>,
}

impl MedianImputer {
    /// Compute per-feature medians from feature-major training data.
    pub fn fit(features: ArrayView2<f32>) -> Self {
        let mut scratch = Vec::new();
        let mut column = Vec::new();
        let medians = features
            .rows()
            .into_iter()
            .map(|row| {
                column.clear();
                column.extend(row.iter().copied());
                let m = quantile(&column, 0.5, &mut scratch);
                if m.is_finite() { m } else { 0.0 }
            })
            .collect();
        Self { medians }
    }

    pub fn medians(&self) -> &[f32] {
        &self.medians
    }

    /// Replace NaN entries in place.
    ///
    /// # Panics
    /// Debug-asserts that the feature count matches fit time.
    pub fn transform(&self, features: &mut Array2<f32>) {
        debug_assert_eq!(features.nrows(), self.medians.len());
        for (f, mut row) in features.rows_mut().into_iter().enumerate() {
            let median = self.medians[f];
            for value in row.iter_mut() {
                if value.is_nan() {
                    *value = median;
                }
            }
        }
    }
}

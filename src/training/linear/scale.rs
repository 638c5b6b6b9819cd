//! Feature standardization.

use ndarray::{Array2, ArrayView2};

/// Scales each feature to zero mean and unit variance.
///
/// Variance is the population variance, and a constant feature keeps a
/// scale of 1 so it maps to zero instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f32>,
    stds: Vec<f32>,
}

impl StandardScaler {
    /// Compute per-feature statistics from feature-major training data.
    pub fn fit(features: ArrayView2<f32>) -> Self {
        let n_samples = features.ncols().max(1) as f64;
        let mut means = Vec::with_capacity(features.nrows());
        let mut stds = Vec::with_capacity(features.nrows());

        for row in features.rows() {
            let mean: f64 = row.iter().map(|&v| v as f64).sum::<f64>() / n_samples;
            let var: f64 = row
                .iter()
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n_samples;
            let std = var.sqrt();
            means.push(mean as f32);
            stds.push(if std > 0.0 && std.is_finite() {
                std as f32
            } else {
                1.0
            });
        }
        Self { means, stds }
    }

    pub fn means(&self) -> &[f32] {
        &self.means
    }

    pub fn stds(&self) -> &[f32] {
        &self.stds
    }

    /// Standardize in place.
    ///
    /// # Panics
    /// Debug-asserts that the feature count matches fit time.
    pub fn transform(&self, features: &mut Array2<f32>) {
        debug_assert_eq!(features.nrows(), self.means.len());
        for (f, mut row) in features.rows_mut().into_iter().enumerate() {
            let mean = self.means[f];
            let inv_std = 1.0 / self.stds[f];
            for value in row.iter_mut() {
                *value = (*value - mean) * inv_std;
            }
        }
    }
}

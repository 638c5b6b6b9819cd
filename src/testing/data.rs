//! Synthetic dataset generators.

use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::data::Dataset;

/// A regression dataset where the target depends linearly on the first
/// feature, plus uniform noise in `[-noise/2, noise/2]`. The remaining
/// features are uninformative distractors.
///
/// `target = 4 * x0 + 10 + noise`
pub fn synthetic_linear(rows: usize, n_features: usize, noise: f32, seed: u64) -> Dataset {
    debug_assert!(n_features >= 1);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut features = Array2::<f32>::zeros((n_features, rows));
    let mut targets = Array1::<f32>::zeros(rows);
    for i in 0..rows {
        for f in 0..n_features {
            features[[f, i]] = rng.random::<f32>() * 10.0;
        }
        let jitter = (rng.random::<f32>() - 0.5) * noise;
        targets[i] = 4.0 * features[[0, i]] + 10.0 + jitter;
    }

    Dataset::new(features.view(), Some(targets.view()))
}

/// RMSE of always predicting the target mean.
pub fn mean_baseline_rmse(targets: ndarray::ArrayView1<f32>) -> f64 {
    let n = targets.len().max(1) as f64;
    let mean: f64 = targets.iter().map(|&t| t as f64).sum::<f64>() / n;
    let sum_sq: f64 = targets
        .iter()
        .map(|&t| {
            let d = t as f64 - mean;
            d * d
        })
        .sum();
    (sum_sq / n).sqrt()
}

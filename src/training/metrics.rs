//! Evaluation metrics.

use ndarray::ArrayView1;

/// A held-out evaluation metric.
///
/// Metrics accumulate in f64 regardless of the f32 data to keep large
/// datasets numerically stable.
pub trait MetricFn: Send + Sync {
    /// Compute the metric over aligned predictions and targets.
    ///
    /// # Panics
    /// Debug-asserts that the lengths match.
    fn compute(&self, preds: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64;

    /// Whether larger values indicate a better model.
    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

/// Root mean squared error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, preds: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64 {
        debug_assert_eq!(preds.len(), targets.len());
        if preds.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = preds
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| {
                let d = (p - t) as f64;
                d * d
            })
            .sum();
        (sum_sq / preds.len() as f64).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

/// Mean absolute error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, preds: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64 {
        debug_assert_eq!(preds.len(), targets.len());
        if preds.is_empty() {
            return 0.0;
        }
        let sum: f64 = preds
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| ((p - t) as f64).abs())
            .sum();
        sum / preds.len() as f64
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

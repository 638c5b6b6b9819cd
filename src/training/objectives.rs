//! Training objectives.
//!
//! An objective maps predictions and targets to first and second order
//! gradients, and supplies the base score that boosting starts from.

use ndarray::ArrayView1;

/// First and second order gradient for one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradPair {
    pub grad: f32,
    pub hess: f32,
}

/// A differentiable training loss.
pub trait ObjectiveFn: Send + Sync {
    /// Fill `out` with per-sample gradients.
    ///
    /// # Panics
    /// Debug-asserts that all three lengths match.
    fn compute_gradients_into(
        &self,
        preds: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        out: &mut [GradPair],
    );

    /// Initial prediction before any tree is added.
    fn base_score(&self, targets: ArrayView1<f32>) -> f32;

    fn name(&self) -> &'static str;
}

/// Squared error: `L = 0.5 * (pred - target)^2`.
///
/// Gradient is the residual, hessian is constant 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl ObjectiveFn for SquaredLoss {
    fn compute_gradients_into(
        &self,
        preds: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        out: &mut [GradPair],
    ) {
        debug_assert_eq!(preds.len(), targets.len());
        debug_assert_eq!(preds.len(), out.len());

        for ((pair, &pred), &target) in out.iter_mut().zip(preds.iter()).zip(targets.iter()) {
            pair.grad = pred - target;
            pair.hess = 1.0;
        }
    }

    fn base_score(&self, targets: ArrayView1<f32>) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let sum: f64 = targets.iter().map(|&t| t as f64).sum();
        (sum / targets.len() as f64) as f32
    }

    fn name(&self) -> &'static str {
        "squared"
    }
}

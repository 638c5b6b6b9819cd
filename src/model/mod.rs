//! High-level model APIs: validated configs and fitted models.

mod gbdt;
mod meta;
mod poly_ridge;
mod stacking;

pub use gbdt::{GBDTConfig, GBDTModel};
pub use meta::ModelMeta;
pub use poly_ridge::{PolyRidgeConfig, PolyRidgeModel};
pub use stacking::{BaseLearner, FittedBase, StackingConfig, StackingModel};

use thiserror::Error;

use crate::training::linear::SolveError;

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("n_trees must be at least 1")]
    InvalidNTrees,

    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f32),

    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,

    #[error("{field} must be in (0, 1], got {value}")]
    InvalidSamplingRatio { field: &'static str, value: f32 },

    #[error("{field} must be non-negative, got {value}")]
    InvalidRegularization { field: &'static str, value: f32 },

    #[error("max_bins must be in 2..=255, got {0}")]
    InvalidMaxBins(usize),

    #[error("degree must be 1 or 2, got {0}")]
    InvalidDegree(usize),

    #[error("alpha must be non-negative and finite, got {0}")]
    InvalidAlpha(f64),

    #[error("a stacking ensemble needs at least one base estimator")]
    NoEstimators,

    #[error("cv_folds must be at least 2, got {0}")]
    InvalidFolds(usize),
}

/// Errors from model training.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("dataset has no targets")]
    MissingTargets,

    #[error(transparent)]
    Solve(#[from] SolveError),
}

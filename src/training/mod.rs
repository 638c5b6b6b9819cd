//! Training subsystems: objectives, metrics, and the model trainers.

pub mod gbdt;
pub mod linear;
mod logger;
mod metrics;
mod objectives;

pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{Mae, MetricFn, Rmse};
pub use objectives::{GradPair, ObjectiveFn, SquaredLoss};

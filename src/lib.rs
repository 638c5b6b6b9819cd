//! Stacked-ensemble gradient boosting for trip-duration regression.
//!
//! The crate supplies everything the training job needs natively: a
//! feature-major [`data::Dataset`] with CSV loading and seeded splitting, a
//! histogram-based GBDT trainer, a ridge pipeline with imputation and
//! scaling, and a stacking ensemble that combines them through
//! out-of-fold predictions.
//!
//! # Example
//!
//! ```
//! use tripstack::data::train_valid_split;
//! use tripstack::model::{BaseLearner, GBDTConfig, PolyRidgeConfig, StackingConfig, StackingModel};
//! use tripstack::testing::data::synthetic_linear;
//! use tripstack::training::{MetricFn, Rmse};
//!
//! let dataset = synthetic_linear(200, 2, 1.0, 42);
//! let (train, valid) = train_valid_split(&dataset, 0.2, 4321);
//!
//! let config = StackingConfig::builder()
//!     .estimators(vec![
//!         ("ridge".into(), BaseLearner::PolyRidge(PolyRidgeConfig::default())),
//!     ])
//!     .final_estimator(GBDTConfig::builder().n_trees(50).build().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let model = StackingModel::train(&train, &config).unwrap();
//! let rmse = Rmse.compute(model.predict(&valid).view(), valid.targets().unwrap());
//! assert!(rmse.is_finite());
//! ```

pub mod data;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

pub use utils::{Parallelism, run_with_threads};

//! Train the trip-duration stacked ensemble and report held-out RMSE.
//!
//! Reads `data/df_clean.csv` (pre-cleaned, with a numeric `trip_duration`
//! column), splits 80/20 with a fixed seed, trains three first-layer
//! models plus a boosted meta-model, and prints one RMSE line per model
//! followed by the ensemble RMSE.
//!
//! Usage:
//!   cargo run --release --bin train_trip_duration

use std::error::Error;

use tripstack::data::{read_csv, train_valid_split};
use tripstack::model::{
    BaseLearner, ConfigError, GBDTConfig, PolyRidgeConfig, StackingConfig, StackingModel,
};
use tripstack::training::{MetricFn, Rmse};

const DATA_PATH: &str = "data/df_clean.csv";
const LABEL: &str = "trip_duration";
const VALID_FRACTION: f64 = 0.2;
const SPLIT_SEED: u64 = 4321;

// =============================================================================
// Model configuration
// =============================================================================

fn base_learners() -> Result<Vec<(String, BaseLearner)>, ConfigError> {
    let poly_ridge = PolyRidgeConfig::builder()
        .degree(1)
        .include_bias(false)
        .alpha(1.0)
        .build()?;

    let lgbm = GBDTConfig::builder()
        .n_trees(500)
        .learning_rate(0.1)
        .seed(42)
        .build()?;

    let xgb_base = GBDTConfig::builder()
        .n_trees(1000)
        .max_depth(5)
        .learning_rate(0.3)
        .colsample_bytree(0.7)
        .subsample(0.7)
        .seed(4321)
        .n_threads(0)
        .build()?;

    Ok(vec![
        ("poly_ridge".into(), BaseLearner::PolyRidge(poly_ridge)),
        ("lgbm".into(), BaseLearner::Gbdt(lgbm)),
        ("xgb_base".into(), BaseLearner::Gbdt(xgb_base)),
    ])
}

fn stack_config() -> Result<StackingConfig, ConfigError> {
    let meta = GBDTConfig::builder()
        .n_trees(300)
        .max_depth(3)
        .learning_rate(0.1)
        .seed(4321)
        .build()?;

    StackingConfig::builder()
        .estimators(base_learners()?)
        .final_estimator(meta)
        .cv_folds(3)
        .passthrough(false)
        .build()
}

// =============================================================================
// Entry point
// =============================================================================

fn main() -> Result<(), Box<dyn Error>> {
    let dataset = read_csv(DATA_PATH, LABEL)?;
    let (train, valid) = train_valid_split(&dataset, VALID_FRACTION, SPLIT_SEED);

    let model = StackingModel::train(&train, &stack_config()?)?;

    let valid_targets = valid.targets().expect("validation split keeps targets");
    let base_preds = model.base_predictions(&valid);

    println!("First-layer models inside the stack:");
    for (e, (name, _)) in model.estimators().iter().enumerate() {
        let rmse = Rmse.compute(base_preds.row(e), valid_targets);
        println!(" - {name:<12} → RMSE: {rmse:.4}");
    }

    println!();
    let stacked_rmse = Rmse.compute(model.predict(&valid).view(), valid_targets);
    println!("{:<25} RMSE: {:.4}", "StackingRegressor", stacked_rmse);

    Ok(())
}

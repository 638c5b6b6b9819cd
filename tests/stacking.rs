//! End-to-end stacked ensemble runs, mirroring the training binary.

use tripstack::data::train_valid_split;
use tripstack::model::{
    BaseLearner, GBDTConfig, PolyRidgeConfig, StackingConfig, StackingModel,
};
use tripstack::testing::data::synthetic_linear;
use tripstack::training::{MetricFn, Rmse};

fn small_stack() -> StackingConfig {
    let ridge = PolyRidgeConfig::builder().alpha(1.0).build().unwrap();
    let trees = GBDTConfig::builder()
        .n_trees(30)
        .learning_rate(0.2)
        .max_depth(4)
        .seed(42)
        .build()
        .unwrap();
    let meta = GBDTConfig::builder()
        .n_trees(20)
        .learning_rate(0.1)
        .max_depth(3)
        .seed(4321)
        .build()
        .unwrap();

    StackingConfig::builder()
        .estimators(vec![
            ("poly_ridge".into(), BaseLearner::PolyRidge(ridge)),
            ("gbdt".into(), BaseLearner::Gbdt(trees)),
        ])
        .final_estimator(meta)
        .build()
        .unwrap()
}

#[test]
fn every_reported_rmse_is_finite_and_non_negative() {
    let dataset = synthetic_linear(600, 3, 2.0, 17);
    let (train, valid) = train_valid_split(&dataset, 0.2, 4321);

    let model = StackingModel::train(&train, &small_stack()).unwrap();
    let targets = valid.targets().unwrap();

    let base_preds = model.base_predictions(&valid);
    for (e, _) in model.estimators().iter().enumerate() {
        let rmse = Rmse.compute(base_preds.row(e), targets);
        assert!(rmse.is_finite() && rmse >= 0.0);
    }

    let stacked = Rmse.compute(model.predict(&valid).view(), targets);
    assert!(stacked.is_finite() && stacked >= 0.0);
}

#[test]
fn two_runs_report_identical_numbers() {
    let dataset = synthetic_linear(400, 3, 2.0, 23);
    let (train, valid) = train_valid_split(&dataset, 0.2, 4321);
    let targets = valid.targets().unwrap();

    let run = || {
        let model = StackingModel::train(&train, &small_stack()).unwrap();
        let base = model.base_predictions(&valid);
        let mut rmses: Vec<f64> = (0..model.estimators().len())
            .map(|e| Rmse.compute(base.row(e), targets))
            .collect();
        rmses.push(Rmse.compute(model.predict(&valid).view(), targets));
        rmses
    };

    assert_eq!(run(), run());
}

#[test]
fn ensemble_tracks_the_underlying_signal() {
    let dataset = synthetic_linear(800, 3, 2.0, 31);
    let (train, valid) = train_valid_split(&dataset, 0.2, 4321);
    let targets = valid.targets().unwrap();

    let model = StackingModel::train(&train, &small_stack()).unwrap();
    let baseline = tripstack::testing::data::mean_baseline_rmse(targets);
    let stacked = Rmse.compute(model.predict(&valid).view(), targets);

    assert!(stacked < baseline * 0.5, "stacked {stacked} vs baseline {baseline}");
}

#[test]
fn base_prediction_rows_match_individual_learners() {
    let dataset = synthetic_linear(300, 2, 1.0, 41);
    let model = StackingModel::train(&dataset, &small_stack()).unwrap();

    let matrix = model.base_predictions(&dataset);
    assert_eq!(matrix.nrows(), model.estimators().len());
    for (e, (_, fitted)) in model.estimators().iter().enumerate() {
        assert_eq!(matrix.row(e).to_owned(), fitted.predict(&dataset));
    }
}

//! Stacked ensemble of heterogeneous base learners.
//!
//! First-layer models produce out-of-fold predictions over the training
//! set; a gradient-boosted meta-model learns to combine them. Training is
//! orchestrated sequentially across learners and folds; any parallelism
//! lives inside the individual learners' own configs.

use bon::Builder;
use ndarray::{Array1, Array2, Axis, concatenate};

use crate::data::{Dataset, kfold_indices};

use super::gbdt::{GBDTConfig, GBDTModel};
use super::poly_ridge::{PolyRidgeConfig, PolyRidgeModel};
use super::{ConfigError, TrainError};

/// A first-layer learner specification.
#[derive(Debug, Clone)]
pub enum BaseLearner {
    PolyRidge(PolyRidgeConfig),
    Gbdt(GBDTConfig),
}

/// A fitted first-layer learner.
#[derive(Debug, Clone)]
pub enum FittedBase {
    PolyRidge(PolyRidgeModel),
    Gbdt(GBDTModel),
}

impl FittedBase {
    pub fn predict(&self, dataset: &Dataset) -> Array1<f32> {
        match self {
            FittedBase::PolyRidge(model) => model.predict(dataset),
            FittedBase::Gbdt(model) => model.predict(dataset),
        }
    }
}

fn fit_base(learner: &BaseLearner, dataset: &Dataset) -> Result<FittedBase, TrainError> {
    match learner {
        BaseLearner::PolyRidge(config) => {
            Ok(FittedBase::PolyRidge(PolyRidgeModel::train(dataset, config)?))
        }
        BaseLearner::Gbdt(config) => Ok(FittedBase::Gbdt(GBDTModel::train(dataset, config)?)),
    }
}

/// Configuration for [`StackingModel`].
///
/// # Example
///
/// ```
/// use tripstack::model::{BaseLearner, GBDTConfig, PolyRidgeConfig, StackingConfig};
///
/// let config = StackingConfig::builder()
///     .estimators(vec![
///         ("ridge".into(), BaseLearner::PolyRidge(PolyRidgeConfig::default())),
///         ("trees".into(), BaseLearner::Gbdt(GBDTConfig::default())),
///     ])
///     .final_estimator(GBDTConfig::default())
///     .build()
///     .unwrap();
/// assert_eq!(config.cv_folds, 3);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct StackingConfig {
    /// Named first-layer learners, in report order.
    pub estimators: Vec<(String, BaseLearner)>,

    /// Meta-model trained on the out-of-fold prediction matrix.
    pub final_estimator: GBDTConfig,

    /// Folds for out-of-fold prediction. Default: 3.
    #[builder(default = 3)]
    pub cv_folds: usize,

    /// Also feed the original features to the meta-model. Default: false.
    #[builder(default = false)]
    pub passthrough: bool,
}

/// Custom finishing function that validates the config.
impl<S: stacking_config_builder::IsComplete> StackingConfigBuilder<S> {
    pub fn build(self) -> Result<StackingConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl StackingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.estimators.is_empty() {
            return Err(ConfigError::NoEstimators);
        }
        if self.cv_folds < 2 {
            return Err(ConfigError::InvalidFolds(self.cv_folds));
        }
        Ok(())
    }
}

/// A fitted stacking ensemble.
///
/// Holds one refit of every base learner (trained on the full training
/// set) plus the meta-model; immutable after training.
#[derive(Debug, Clone)]
pub struct StackingModel {
    estimators: Vec<(String, FittedBase)>,
    meta_model: GBDTModel,
    passthrough: bool,
}

impl StackingModel {
    /// Train the full stack.
    ///
    /// For each base learner: fit on the complement of every fold and
    /// predict the fold, so each training row gets exactly one prediction
    /// from a model that never saw it. The meta-model trains on that
    /// matrix, then every base learner is refit on the whole training set
    /// for inference.
    pub fn train(dataset: &Dataset, config: &StackingConfig) -> Result<Self, TrainError> {
        let targets = dataset.targets().ok_or(TrainError::MissingTargets)?;
        let n_samples = dataset.n_samples();
        let folds = kfold_indices(n_samples, config.cv_folds);

        let mut oof = Array2::<f32>::zeros((config.estimators.len(), n_samples));
        for (e, (_, learner)) in config.estimators.iter().enumerate() {
            for (train_idx, fold_idx) in &folds {
                let fold_train = dataset.select_rows(train_idx);
                let fold_holdout = dataset.select_rows(fold_idx).without_targets();

                let fitted = fit_base(learner, &fold_train)?;
                let preds = fitted.predict(&fold_holdout);
                for (k, &row) in fold_idx.iter().enumerate() {
                    oof[[e, row]] = preds[k];
                }
            }
        }

        let meta_features = if config.passthrough {
            concatenate(Axis(0), &[oof.view(), dataset.features()])
                .expect("oof and features share the sample axis")
        } else {
            oof
        };
        let meta_dataset = Dataset::new(meta_features.view(), Some(targets));
        let meta_model = GBDTModel::train(&meta_dataset, &config.final_estimator)?;

        let estimators = config
            .estimators
            .iter()
            .map(|(name, learner)| Ok((name.clone(), fit_base(learner, dataset)?)))
            .collect::<Result<Vec<_>, TrainError>>()?;

        Ok(Self {
            estimators,
            meta_model,
            passthrough: config.passthrough,
        })
    }

    /// The refit first-layer models, in configuration order.
    pub fn estimators(&self) -> &[(String, FittedBase)] {
        &self.estimators
    }

    /// First-layer predictions, one row per base learner.
    pub fn base_predictions(&self, dataset: &Dataset) -> Array2<f32> {
        let mut out = Array2::<f32>::zeros((self.estimators.len(), dataset.n_samples()));
        for (e, (_, fitted)) in self.estimators.iter().enumerate() {
            out.row_mut(e).assign(&fitted.predict(dataset));
        }
        out
    }

    /// Ensemble prediction: base predictions routed through the meta-model.
    pub fn predict(&self, dataset: &Dataset) -> Array1<f32> {
        let base = self.base_predictions(dataset);
        let meta_features = if self.passthrough {
            concatenate(Axis(0), &[base.view(), dataset.features()])
                .expect("base predictions and features share the sample axis")
        } else {
            base
        };
        let meta_dataset = Dataset::new(meta_features.view(), None);
        self.meta_model.predict(&meta_dataset)
    }
}

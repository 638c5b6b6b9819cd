//! Gradient-boosted tree model with a validated configuration.

use bon::Builder;
use ndarray::Array1;

use crate::data::Dataset;
use crate::repr::Forest;
use crate::training::gbdt::{BinnedDataset, GBDTParams, GBDTTrainer, GainParams, MAX_BINS};
use crate::training::{SquaredLoss, Verbosity};
use crate::utils::run_with_threads;

use super::meta::ModelMeta;
use super::{ConfigError, TrainError};

/// Configuration for [`GBDTModel`] training.
///
/// # Example
///
/// ```
/// use tripstack::model::GBDTConfig;
///
/// // All defaults
/// let config = GBDTConfig::builder().build().unwrap();
///
/// // Heavily subsampled forest on all cores
/// let config = GBDTConfig::builder()
///     .n_trees(1000)
///     .max_depth(5)
///     .subsample(0.7)
///     .colsample_bytree(0.7)
///     .n_threads(0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct GBDTConfig {
    /// Number of boosting rounds. Default: 100.
    #[builder(default = 100)]
    pub n_trees: usize,

    /// Learning rate (shrinkage). Default: 0.3.
    #[builder(default = 0.3)]
    pub learning_rate: f32,

    /// Maximum tree depth. Default: 6.
    #[builder(default = 6)]
    pub max_depth: usize,

    /// Row fraction drawn per tree. Default: 1.0 (no subsampling).
    #[builder(default = 1.0)]
    pub subsample: f32,

    /// Feature fraction drawn per tree. Default: 1.0.
    #[builder(default = 1.0)]
    pub colsample_bytree: f32,

    /// L2 regularization on leaf weights. Default: 1.0.
    #[builder(default = 1.0)]
    pub reg_lambda: f32,

    /// Minimum hessian sum per child. Default: 1.0.
    #[builder(default = 1.0)]
    pub min_child_weight: f32,

    /// Minimum split gain. Default: 0.0.
    #[builder(default = 0.0)]
    pub min_split_gain: f32,

    /// Finite histogram bins per feature. Default: 255.
    #[builder(default = MAX_BINS)]
    pub max_bins: usize,

    /// Random seed for row and feature sampling. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Thread count: 0 = all cores, 1 = sequential. Default: 1.
    #[builder(default = 1)]
    pub n_threads: usize,

    /// Training log level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: g_b_d_t_config_builder::IsComplete> GBDTConfigBuilder<S> {
    /// Build and validate the configuration.
    pub fn build(self) -> Result<GBDTConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl GBDTConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        for (field, value) in [
            ("subsample", self.subsample),
            ("colsample_bytree", self.colsample_bytree),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidSamplingRatio { field, value });
            }
        }
        for (field, value) in [
            ("reg_lambda", self.reg_lambda),
            ("min_child_weight", self.min_child_weight),
            ("min_split_gain", self.min_split_gain),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidRegularization { field, value });
            }
        }
        if !(2..=MAX_BINS).contains(&self.max_bins) {
            return Err(ConfigError::InvalidMaxBins(self.max_bins));
        }
        Ok(())
    }

    fn to_params(&self) -> GBDTParams {
        GBDTParams {
            n_trees: self.n_trees,
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
            subsample: self.subsample,
            colsample_bytree: self.colsample_bytree,
            gain: GainParams {
                reg_lambda: self.reg_lambda,
                min_child_weight: self.min_child_weight,
                min_split_gain: self.min_split_gain,
            },
            seed: self.seed,
            verbosity: self.verbosity,
        }
    }
}

impl Default for GBDTConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

/// A trained gradient-boosted regression forest.
#[derive(Debug, Clone)]
pub struct GBDTModel {
    forest: Forest,
    meta: ModelMeta,
    config: GBDTConfig,
}

impl GBDTModel {
    /// Bin the features and boost `config.n_trees` rounds of squared-loss
    /// trees.
    pub fn train(dataset: &Dataset, config: &GBDTConfig) -> Result<Self, TrainError> {
        let targets = dataset.targets().ok_or(TrainError::MissingTargets)?;

        let binned = BinnedDataset::from_dataset(dataset, config.max_bins);
        let trainer = GBDTTrainer::new(SquaredLoss, config.to_params());
        let forest = run_with_threads(config.n_threads, |parallelism| {
            trainer.train(&binned, targets, parallelism)
        });

        Ok(Self {
            forest,
            meta: ModelMeta::from_dataset(dataset),
            config: config.clone(),
        })
    }

    pub fn predict(&self, dataset: &Dataset) -> Array1<f32> {
        run_with_threads(self.config.n_threads, |parallelism| {
            self.forest.predict(dataset, parallelism)
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn config(&self) -> &GBDTConfig {
        &self.config
    }
}

//! Linear pipeline model: impute, expand, scale, ridge.

use bon::Builder;
use ndarray::Array1;

use crate::data::Dataset;
use crate::training::linear::{
    FittedRidge, MedianImputer, PolynomialFeatures, Ridge, StandardScaler,
};

use super::meta::ModelMeta;
use super::{ConfigError, TrainError};

/// Configuration for [`PolyRidgeModel`].
///
/// # Example
///
/// ```
/// use tripstack::model::PolyRidgeConfig;
///
/// let config = PolyRidgeConfig::builder().alpha(1.0).build().unwrap();
/// assert_eq!(config.degree, 1);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct PolyRidgeConfig {
    /// Polynomial degree, 1 or 2. Default: 1 (no expansion).
    #[builder(default = 1)]
    pub degree: usize,

    /// Prepend a constant bias column before scaling. Default: false.
    #[builder(default = false)]
    pub include_bias: bool,

    /// Ridge regularization strength. Default: 1.0.
    #[builder(default = 1.0)]
    pub alpha: f64,
}

/// Custom finishing function that validates the config.
impl<S: poly_ridge_config_builder::IsComplete> PolyRidgeConfigBuilder<S> {
    pub fn build(self) -> Result<PolyRidgeConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PolyRidgeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=2).contains(&self.degree) {
            return Err(ConfigError::InvalidDegree(self.degree));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

impl Default for PolyRidgeConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

/// A fitted preprocessing pipeline feeding a ridge regression.
///
/// All stages learn their statistics on the training split only, so
/// prediction on held-out data uses training medians, means, and scales.
#[derive(Debug, Clone)]
pub struct PolyRidgeModel {
    imputer: MedianImputer,
    poly: PolynomialFeatures,
    scaler: StandardScaler,
    ridge: FittedRidge,
    meta: ModelMeta,
}

impl PolyRidgeModel {
    pub fn train(dataset: &Dataset, config: &PolyRidgeConfig) -> Result<Self, TrainError> {
        let targets = dataset.targets().ok_or(TrainError::MissingTargets)?;

        let mut features = dataset.features().to_owned();
        let imputer = MedianImputer::fit(features.view());
        imputer.transform(&mut features);

        let poly = PolynomialFeatures::new(config.degree, config.include_bias);
        let mut expanded = poly.transform(features.view());

        let scaler = StandardScaler::fit(expanded.view());
        scaler.transform(&mut expanded);

        let ridge = Ridge::new(config.alpha).fit(expanded.view(), targets)?;

        Ok(Self {
            imputer,
            poly,
            scaler,
            ridge,
            meta: ModelMeta::from_dataset(dataset),
        })
    }

    pub fn predict(&self, dataset: &Dataset) -> Array1<f32> {
        let mut features = dataset.features().to_owned();
        self.imputer.transform(&mut features);
        let mut expanded = self.poly.transform(features.view());
        self.scaler.transform(&mut expanded);
        self.ridge.predict(expanded.view())
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn ridge(&self) -> &FittedRidge {
        &self.ridge
    }
}

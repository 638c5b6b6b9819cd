//! Dataset container and builder.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, s};

use super::error::DatasetError;

/// In-memory regression dataset.
///
/// # Storage Layout
///
/// Features are stored in **feature-major** layout: `[n_features, n_samples]`.
/// Each feature's values across all samples are contiguous in memory, which
/// is what binning and column statistics want.
///
/// Targets are a single output vector of length `n_samples`; a dataset built
/// for prediction carries no targets. `NaN` in a feature column marks a
/// missing value.
///
/// # Example
///
/// ```
/// use tripstack::data::Dataset;
/// use ndarray::array;
///
/// // 2 features, 3 samples
/// let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let targets = array![10.0, 20.0, 30.0];
/// let ds = Dataset::new(features.view(), Some(targets.view()));
///
/// assert_eq!(ds.n_samples(), 3);
/// assert_eq!(ds.n_features(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature data: `[n_features, n_samples]` (feature-major).
    features: Array2<f32>,

    /// Target values, length = n_samples.
    targets: Option<Array1<f32>>,

    /// Optional feature names, length = n_features.
    feature_names: Option<Vec<String>>,
}

impl Dataset {
    /// Create a dataset from feature-major data.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the target length matches the sample count.
    pub fn new(features: ArrayView2<f32>, targets: Option<ArrayView1<f32>>) -> Self {
        if let Some(ref t) = targets {
            debug_assert_eq!(
                t.len(),
                features.ncols(),
                "targets must have same sample count as features"
            );
        }

        Self {
            features: features.to_owned(),
            targets: targets.map(|t| t.to_owned()),
            feature_names: None,
        }
    }

    /// Create a dataset from row-major data `[n_samples, n_features]`.
    ///
    /// Transposes into the internal feature-major layout.
    pub fn from_rows(rows: ArrayView2<f32>, targets: Option<ArrayView1<f32>>) -> Self {
        let features = rows.t().as_standard_layout().into_owned();
        Self::new(features.view(), targets)
    }

    /// Create a builder for validated construction.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Check if the dataset has targets.
    pub fn has_targets(&self) -> bool {
        self.targets.is_some()
    }

    /// Feature matrix view, shape `[n_features, n_samples]`.
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// One feature column across all samples.
    #[inline]
    pub fn feature(&self, index: usize) -> ArrayView1<'_, f32> {
        self.features.row(index)
    }

    /// Single feature value; `NaN` marks missing.
    #[inline]
    pub fn value(&self, feature: usize, sample: usize) -> f32 {
        self.features[[feature, sample]]
    }

    /// Target vector view, if targets were provided.
    pub fn targets(&self) -> Option<ArrayView1<'_, f32>> {
        self.targets.as_ref().map(|t| t.view())
    }

    /// Feature names, if known.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Attach feature names.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the name count matches n_features.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        debug_assert_eq!(
            names.len(),
            self.n_features(),
            "name count must match n_features"
        );
        self.feature_names = Some(names);
        self
    }

    // =========================================================================
    // Row selection
    // =========================================================================

    /// Materialize a new dataset containing the given rows, in order.
    ///
    /// Preserves feature/target alignment and feature names. Used by the
    /// train/validation splitter and by cross-validation folds.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        let n_features = self.n_features();
        let mut features = Array2::<f32>::zeros((n_features, indices.len()));
        for (out_col, &src) in indices.iter().enumerate() {
            features
                .slice_mut(s![.., out_col])
                .assign(&self.features.index_axis(Axis(1), src));
        }

        let targets = self
            .targets
            .as_ref()
            .map(|t| indices.iter().map(|&i| t[i]).collect::<Array1<f32>>());

        Dataset {
            features,
            targets,
            feature_names: self.feature_names.clone(),
        }
    }

    /// A copy of this dataset without its targets, for prediction paths.
    pub fn without_targets(&self) -> Dataset {
        Dataset {
            features: self.features.clone(),
            targets: None,
            feature_names: self.feature_names.clone(),
        }
    }
}

/// Builder with explicit validation.
///
/// # Example
///
/// ```
/// use tripstack::data::DatasetBuilder;
/// use ndarray::array;
///
/// let ds = DatasetBuilder::default()
///     .add_feature("distance", array![1.2, 3.4, 5.6].view())
///     .add_feature("passengers", array![1.0, 2.0, 1.0].view())
///     .targets(array![300.0, 720.0, 1500.0].view())
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_features(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<(String, Array1<f32>)>,
    targets: Option<Array1<f32>>,
}

impl DatasetBuilder {
    /// Add a named feature column.
    pub fn add_feature(mut self, name: impl Into<String>, values: ArrayView1<f32>) -> Self {
        self.columns.push((name.into(), values.to_owned()));
        self
    }

    /// Set the target vector.
    pub fn targets(mut self, targets: ArrayView1<f32>) -> Self {
        self.targets = Some(targets.to_owned());
        self
    }

    /// Validate and build the dataset.
    pub fn build(self) -> Result<Dataset, DatasetError> {
        if self.columns.is_empty() {
            return Err(DatasetError::EmptyFeatures);
        }

        let n_samples = self.columns[0].1.len();
        for (name, col) in &self.columns {
            if col.len() != n_samples {
                return Err(DatasetError::FeatureLengthMismatch {
                    name: name.clone(),
                    len: col.len(),
                    expected: n_samples,
                });
            }
        }
        if let Some(ref t) = self.targets {
            if t.len() != n_samples {
                return Err(DatasetError::TargetLengthMismatch {
                    len: t.len(),
                    expected: n_samples,
                });
            }
        }

        let n_features = self.columns.len();
        let mut features = Array2::<f32>::zeros((n_features, n_samples));
        let mut names = Vec::with_capacity(n_features);
        for (i, (name, col)) in self.columns.into_iter().enumerate() {
            features.row_mut(i).assign(&col);
            names.push(name);
        }

        Ok(Dataset {
            features,
            targets: self.targets,
            feature_names: Some(names),
        })
    }
}

//! Model metadata.

use serde::{Deserialize, Serialize};

/// Descriptive metadata carried by every fitted model.
///
/// Nothing here affects predictions; it records what the model was trained
/// on so callers can sanity-check inputs and label reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Number of input features expected at prediction time.
    pub n_features: usize,

    /// Feature names in input order, when the dataset knew them.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub feature_names: Option<Vec<String>>,
}

impl ModelMeta {
    pub fn new(n_features: usize) -> Self {
        Self {
            n_features,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), self.n_features);
        self.feature_names = Some(names);
        self
    }

    /// Metadata describing a dataset's feature block.
    pub fn from_dataset(dataset: &crate::data::Dataset) -> Self {
        let meta = Self::new(dataset.n_features());
        match dataset.feature_names() {
            Some(names) => meta.with_feature_names(names.to_vec()),
            None => meta,
        }
    }
}

//! Error types for dataset construction and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from in-memory dataset construction.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset has no features")]
    EmptyFeatures,

    #[error("feature '{name}' has {len} samples, expected {expected}")]
    FeatureLengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("targets have {len} samples, expected {expected}")]
    TargetLengthMismatch { len: usize, expected: usize },

    #[error("{count} feature names given for {n_features} features")]
    NameCountMismatch { count: usize, n_features: usize },
}

/// Errors from loading a dataset from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("label column '{0}' not found in header")]
    MissingLabel(String),

    #[error("row {row}: label column '{column}' is not numeric: '{value}'")]
    BadLabel {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

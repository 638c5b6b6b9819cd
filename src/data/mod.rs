//! Data containers, loading, and partitioning.

mod csv;
mod dataset;
mod error;
mod split;

pub use csv::read_csv;
pub use dataset::{Dataset, DatasetBuilder};
pub use error::{DatasetError, LoadError};
pub use split::{kfold_indices, split_indices, train_valid_split};

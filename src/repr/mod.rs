//! Model representations, independent of how they were trained.

mod forest;
mod tree;

pub use forest::{DatasetSample, Forest};
pub use tree::{SampleAccessor, Tree, TreeValidationError};

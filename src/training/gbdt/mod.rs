//! Gradient-boosted decision tree training.

mod binning;
mod histogram;
mod trainer;

pub use binning::{BinMapper, BinnedDataset, BinnedSample, MAX_BINS, MISSING_BIN};
pub use histogram::{
    BinSplit, BinStats, GainParams, Histogram, best_split, build_histogram, leaf_weight,
};
pub use trainer::{GBDTParams, GBDTTrainer};

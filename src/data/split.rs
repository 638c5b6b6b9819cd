//! Deterministic dataset partitioning.
//!
//! A seeded shuffle split for the train/validation holdout, and contiguous
//! unshuffled folds for cross-validated stacking.

use rand::prelude::*;
use rand::rngs::StdRng;

use super::dataset::Dataset;

/// Split row indices into `(train, valid)` with a seeded shuffle.
///
/// `valid_len` is `round(rows * valid_fraction)`; the two index sets are
/// disjoint and together cover every row exactly once. The same seed always
/// produces the same partition.
pub fn split_indices(rows: usize, valid_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let valid_len = ((rows as f64) * valid_fraction).round() as usize;
    let valid = idx.split_off(rows - valid_len);
    (idx, valid)
}

/// Split a dataset into `(train, valid)` materialized subsets.
pub fn train_valid_split(dataset: &Dataset, valid_fraction: f64, seed: u64) -> (Dataset, Dataset) {
    let (train_idx, valid_idx) = split_indices(dataset.n_samples(), valid_fraction, seed);
    (
        dataset.select_rows(&train_idx),
        dataset.select_rows(&valid_idx),
    )
}

/// Contiguous k-fold index sets: `(train, fold)` per fold.
///
/// Unshuffled: fold 0 is the first block of rows, fold k-1 the last. The
/// first `rows % k` folds hold one extra row so every row lands in exactly
/// one fold.
pub fn kfold_indices(rows: usize, k: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    debug_assert!(k >= 2, "need at least 2 folds");
    let base = rows / k;
    let extra = rows % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let len = base + usize::from(fold < extra);
        let stop = start + len;
        let fold_idx: Vec<usize> = (start..stop).collect();
        let train_idx: Vec<usize> = (0..start).chain(stop..rows).collect();
        folds.push((train_idx, fold_idx));
        start = stop;
    }
    folds
}

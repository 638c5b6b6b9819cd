//! Additive forest of regression trees.

use ndarray::Array1;

use crate::data::Dataset;
use crate::utils::Parallelism;

use super::tree::{SampleAccessor, Tree};

/// One sample of a feature-major [`Dataset`].
#[derive(Clone, Copy)]
pub struct DatasetSample<'a> {
    dataset: &'a Dataset,
    row: usize,
}

impl<'a> DatasetSample<'a> {
    #[inline]
    pub fn new(dataset: &'a Dataset, row: usize) -> Self {
        Self { dataset, row }
    }
}

impl SampleAccessor for DatasetSample<'_> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.dataset.value(index, self.row)
    }
}

/// A trained ensemble: `base_score + sum(tree outputs)`.
#[derive(Debug, Clone)]
pub struct Forest {
    base_score: f32,
    trees: Vec<Tree>,
}

impl Forest {
    pub fn new(base_score: f32) -> Self {
        Self {
            base_score,
            trees: Vec::new(),
        }
    }

    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Predict one sample.
    pub fn predict_row<A: SampleAccessor>(&self, sample: &A) -> f32 {
        let mut acc = self.base_score;
        for tree in &self.trees {
            acc += tree.predict_row(sample);
        }
        acc
    }

    /// Predict every sample of a dataset into `out`.
    ///
    /// # Panics
    /// Debug-asserts that `out` has one slot per sample.
    pub fn predict_into(&self, dataset: &Dataset, out: &mut [f32], parallelism: Parallelism) {
        debug_assert_eq!(out.len(), dataset.n_samples());
        parallelism.maybe_par_bridge_for_each(out.iter_mut().enumerate(), |(row, slot)| {
            *slot = self.predict_row(&DatasetSample::new(dataset, row));
        });
    }

    /// Predict every sample of a dataset into a fresh array.
    pub fn predict(&self, dataset: &Dataset, parallelism: Parallelism) -> Array1<f32> {
        let mut out = Array1::<f32>::zeros(dataset.n_samples());
        let slice = out.as_slice_mut().expect("freshly allocated array is contiguous");
        self.predict_into(dataset, slice, parallelism);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(threshold: f32, left: f32, right: f32) -> Tree {
        let mut tree = Tree::new();
        let root = tree.add_leaf(0.0);
        tree.make_split(root, 0, threshold, true);
        let l = tree.add_leaf(left);
        let r = tree.add_leaf(right);
        tree.set_children(root, l, r);
        tree
    }

    #[test]
    fn empty_forest_predicts_base_score() {
        let forest = Forest::new(2.5);
        assert_eq!(forest.predict_row(&[1.0f32].as_slice()), 2.5);
    }

    #[test]
    fn trees_accumulate() {
        let mut forest = Forest::new(1.0);
        forest.push_tree(stump(0.5, -1.0, 1.0));
        forest.push_tree(stump(1.5, 10.0, 20.0));

        // 0.0: 1.0 + (-1.0) + 10.0
        assert_eq!(forest.predict_row(&[0.0f32].as_slice()), 10.0);
        // 2.0: 1.0 + 1.0 + 20.0
        assert_eq!(forest.predict_row(&[2.0f32].as_slice()), 22.0);
    }

    #[test]
    fn predict_matches_predict_row() {
        let mut forest = Forest::new(0.5);
        forest.push_tree(stump(1.0, -2.0, 3.0));

        let features = array![[0.0, 1.0, 2.0, f32::NAN]];
        let ds = Dataset::new(features.view(), None);
        let preds = forest.predict(&ds, Parallelism::Sequential);

        assert_eq!(preds.len(), 4);
        for row in 0..4 {
            assert_eq!(preds[row], forest.predict_row(&DatasetSample::new(&ds, row)));
        }
        // NaN routes left by default
        assert_eq!(preds[3], 0.5 - 2.0);
    }
}

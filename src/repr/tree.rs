//! Regression tree representation.
//!
//! Structure-of-arrays node storage. Trees are grown top-down by the
//! trainer: a node starts life as a leaf and is later converted into a
//! split once its children exist.

use thiserror::Error;

/// Read access to one sample's feature values during traversal.
///
/// `NaN` marks a missing value and is routed by the per-node default
/// direction.
pub trait SampleAccessor {
    fn feature(&self, index: usize) -> f32;
}

impl SampleAccessor for &[f32] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

/// Structural problems detected by [`Tree::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    Empty,

    #[error("node {node} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: usize,
        child: u32,
        n_nodes: usize,
    },

    #[error("node {0} is a split without both children")]
    MissingChildren(usize),

    #[error("node {0} is unreachable from the root")]
    Unreachable(usize),
}

const NO_CHILD: u32 = u32::MAX;

/// A single regression tree with scalar leaves.
///
/// Numeric splits send `fvalue < threshold` left; missing values follow
/// `default_left`.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    split_indices: Vec<u32>,
    thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes (splits and leaves).
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&l| l).count()
    }

    /// Append a leaf node and return its id. The first node added is the root.
    pub fn add_leaf(&mut self, value: f32) -> u32 {
        let id = self.n_nodes() as u32;
        self.split_indices.push(0);
        self.thresholds.push(0.0);
        self.left_children.push(NO_CHILD);
        self.right_children.push(NO_CHILD);
        self.default_left.push(true);
        self.is_leaf.push(true);
        self.leaf_values.push(value);
        id
    }

    /// Convert a leaf into a split node. Children must be attached with
    /// [`Tree::set_children`] before the tree is used for prediction.
    pub fn make_split(&mut self, node: u32, feature: u32, threshold: f32, default_left: bool) {
        let node = node as usize;
        debug_assert!(self.is_leaf[node], "can only split a leaf");
        self.split_indices[node] = feature;
        self.thresholds[node] = threshold;
        self.default_left[node] = default_left;
        self.is_leaf[node] = false;
        self.leaf_values[node] = 0.0;
    }

    pub fn set_children(&mut self, node: u32, left: u32, right: u32) {
        let node = node as usize;
        debug_assert!(!self.is_leaf[node], "leaves have no children");
        self.left_children[node] = left;
        self.right_children[node] = right;
    }

    /// Overwrite a leaf's value.
    pub fn set_leaf_value(&mut self, node: u32, value: f32) {
        debug_assert!(self.is_leaf[node as usize]);
        self.leaf_values[node as usize] = value;
    }

    #[inline]
    pub fn is_leaf(&self, node: u32) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: u32) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Walk a sample from the root to its leaf.
    #[inline]
    pub fn traverse_to_leaf<A: SampleAccessor>(&self, sample: &A) -> u32 {
        let mut node = 0usize;
        while !self.is_leaf[node] {
            let fvalue = sample.feature(self.split_indices[node] as usize);
            let go_left = if fvalue.is_nan() {
                self.default_left[node]
            } else {
                fvalue < self.thresholds[node]
            };
            node = if go_left {
                self.left_children[node] as usize
            } else {
                self.right_children[node] as usize
            };
        }
        node as u32
    }

    /// Predicted value for one sample.
    #[inline]
    pub fn predict_row<A: SampleAccessor>(&self, sample: &A) -> f32 {
        self.leaf_values[self.traverse_to_leaf(sample) as usize]
    }

    /// Check structural sanity: children in bounds, every split has both
    /// children, every node reachable from the root.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::Empty);
        }

        let mut reachable = vec![false; n_nodes];
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if reachable[node] {
                continue;
            }
            reachable[node] = true;
            if self.is_leaf[node] {
                continue;
            }
            for child in [self.left_children[node], self.right_children[node]] {
                if child == NO_CHILD {
                    return Err(TreeValidationError::MissingChildren(node));
                }
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        child,
                        n_nodes,
                    });
                }
                stack.push(child as usize);
            }
        }

        if let Some(node) = reachable.iter().position(|&r| !r) {
            return Err(TreeValidationError::Unreachable(node));
        }
        Ok(())
    }
}

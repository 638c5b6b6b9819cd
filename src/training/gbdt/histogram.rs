//! Gradient histograms and split search.

use crate::training::objectives::GradPair;

use super::binning::MISSING_BIN;

/// Accumulated gradient statistics for one bin (or one tree node).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinStats {
    pub grad: f64,
    pub hess: f64,
    pub count: u32,
}

impl BinStats {
    #[inline]
    pub fn add(&mut self, pair: GradPair) {
        self.grad += pair.grad as f64;
        self.hess += pair.hess as f64;
        self.count += 1;
    }

    #[inline]
    pub fn merge(&mut self, other: BinStats) {
        self.grad += other.grad;
        self.hess += other.hess;
        self.count += other.count;
    }
}

/// Split quality and regularization controls.
#[derive(Debug, Clone, Copy)]
pub struct GainParams {
    /// L2 regularization on leaf weights.
    pub reg_lambda: f32,
    /// Minimum hessian sum in each child.
    pub min_child_weight: f32,
    /// Minimum gain for a split to be kept.
    pub min_split_gain: f32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self {
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            min_split_gain: 0.0,
        }
    }
}

/// The best split found for one feature, in bin space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinSplit {
    /// Last bin routed left.
    pub bin: u8,
    /// Where missing values go.
    pub default_left: bool,
    pub gain: f64,
}

/// One feature's histogram over a node's rows: per-bin finite stats plus a
/// separate slot for missing values.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<BinStats>,
    pub missing: BinStats,
}

/// Accumulate a feature histogram over the given rows.
pub fn build_histogram(
    feature_bins: &[u8],
    rows: &[u32],
    grads: &[GradPair],
    n_bins: usize,
) -> Histogram {
    let mut hist = Histogram {
        bins: vec![BinStats::default(); n_bins],
        missing: BinStats::default(),
    };
    for &row in rows {
        let row = row as usize;
        let bin = feature_bins[row];
        if bin == MISSING_BIN {
            hist.missing.add(grads[row]);
        } else {
            hist.bins[bin as usize].add(grads[row]);
        }
    }
    hist
}

#[inline]
fn leaf_score(grad: f64, hess: f64, lambda: f64) -> f64 {
    (grad * grad) / (hess + lambda)
}

/// Optimal leaf weight for accumulated statistics.
#[inline]
pub fn leaf_weight(stats: BinStats, lambda: f64) -> f32 {
    (-stats.grad / (stats.hess + lambda)) as f32
}

/// Scan one histogram for the best split.
///
/// For every candidate bin the missing slot is tried on both sides; the
/// direction that scores higher becomes the node's default. Returns `None`
/// when no split satisfies the child-weight and gain constraints.
pub fn best_split(hist: &Histogram, params: &GainParams) -> Option<BinSplit> {
    let lambda = params.reg_lambda as f64;
    let min_child = params.min_child_weight as f64;

    let mut total = hist.missing;
    for stats in &hist.bins {
        total.merge(*stats);
    }
    let parent_score = leaf_score(total.grad, total.hess, lambda);

    let mut best: Option<BinSplit> = None;
    let mut left = BinStats::default();

    // The last bin never splits: everything finite would go left.
    for bin in 0..hist.bins.len().saturating_sub(1) {
        left.merge(hist.bins[bin]);

        for missing_left in [true, false] {
            let (mut gl, mut hl) = (left.grad, left.hess);
            if missing_left {
                gl += hist.missing.grad;
                hl += hist.missing.hess;
            }
            let gr = total.grad - gl;
            let hr = total.hess - hl;

            if hl < min_child || hr < min_child {
                continue;
            }

            let gain =
                0.5 * (leaf_score(gl, hl, lambda) + leaf_score(gr, hr, lambda) - parent_score);
            if gain <= params.min_split_gain as f64 {
                continue;
            }
            if best.is_none_or(|b| gain > b.gain) {
                best = Some(BinSplit {
                    bin: bin as u8,
                    default_left: missing_left,
                    gain,
                });
            }
        }
    }
    best
}

//! Quantile binning for histogram-based training.
//!
//! Each feature is discretized into at most 255 finite bins; bin 255 is
//! reserved for missing values. A [`BinMapper`] records the cut points so a
//! split found on bins can be expressed as a raw-value threshold for
//! inference, and so binned rows can be traversed with the same `value <
//! threshold` rule the trees use at inference time.

use ndarray::{Array2, ArrayView1};

use crate::data::Dataset;
use crate::repr::SampleAccessor;

/// Largest number of finite bins per feature.
pub const MAX_BINS: usize = 255;

/// Bin id reserved for missing values.
pub const MISSING_BIN: u8 = u8::MAX;

/// Cut points for one feature.
///
/// Cuts are strictly increasing. Bin `b` holds values in
/// `[cuts[b-1], cuts[b])`; the split "bins `0..=b` go left" is exactly
/// "value < cuts[b]".
#[derive(Debug, Clone)]
pub struct BinMapper {
    cuts: Vec<f32>,
}

impl BinMapper {
    /// Fit cut points to a feature column.
    ///
    /// With few distinct values every adjacent pair gets a cut; otherwise
    /// cuts are taken at evenly spaced quantile ranks. NaN entries are
    /// ignored here and always map to [`MISSING_BIN`].
    pub fn fit(values: ArrayView1<f32>, max_bins: usize) -> Self {
        debug_assert!((2..=MAX_BINS).contains(&max_bins));

        let mut finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
        finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        finite.dedup();

        if finite.len() < 2 {
            return Self { cuts: Vec::new() };
        }

        let max_cuts = max_bins - 1;
        let mut cuts = Vec::new();
        if finite.len() - 1 <= max_cuts {
            for pair in finite.windows(2) {
                push_cut(&mut cuts, pair[0], pair[1]);
            }
        } else {
            for i in 1..=max_cuts {
                let rank = i * (finite.len() - 1) / max_cuts;
                let rank = rank.clamp(1, finite.len() - 1);
                push_cut(&mut cuts, finite[rank - 1], finite[rank]);
            }
            cuts.dedup();
        }

        Self { cuts }
    }

    /// Number of finite bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Map a raw value to its bin.
    #[inline]
    pub fn bin(&self, value: f32) -> u8 {
        if value.is_nan() {
            return MISSING_BIN;
        }
        self.cuts.partition_point(|&c| value >= c) as u8
    }

    /// Raw-value threshold for the split "bins `0..=bin` go left".
    #[inline]
    pub fn threshold(&self, bin: u8) -> f32 {
        self.cuts[bin as usize]
    }

    /// A raw value inside bin `bin`, consistent with [`BinMapper::bin`].
    #[inline]
    pub fn representative(&self, bin: u8) -> f32 {
        let b = bin as usize;
        if self.cuts.is_empty() {
            return 0.0;
        }
        if b == 0 {
            return self.cuts[0] - 1.0;
        }
        if b >= self.cuts.len() {
            return self.cuts[self.cuts.len() - 1] + 1.0;
        }
        let lo = self.cuts[b - 1];
        let hi = self.cuts[b];
        let mid = 0.5 * (lo + hi);
        if mid < hi { mid } else { lo }
    }
}

/// Place a cut strictly above `lo` and at most `hi`.
fn push_cut(cuts: &mut Vec<f32>, lo: f32, hi: f32) {
    let mid = 0.5 * (lo + hi);
    cuts.push(if mid > lo { mid } else { hi });
}

/// A dataset discretized for histogram training.
#[derive(Debug, Clone)]
pub struct BinnedDataset {
    /// Bin ids, `[n_features, n_samples]`.
    bins: Array2<u8>,
    mappers: Vec<BinMapper>,
}

impl BinnedDataset {
    pub fn from_dataset(dataset: &Dataset, max_bins: usize) -> Self {
        let n_features = dataset.n_features();
        let n_samples = dataset.n_samples();

        let mut bins = Array2::<u8>::zeros((n_features, n_samples));
        let mut mappers = Vec::with_capacity(n_features);
        for f in 0..n_features {
            let column = dataset.feature(f);
            let mapper = BinMapper::fit(column, max_bins);
            for (slot, &value) in bins.row_mut(f).iter_mut().zip(column.iter()) {
                *slot = mapper.bin(value);
            }
            mappers.push(mapper);
        }

        Self { bins, mappers }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.bins.ncols()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.bins.nrows()
    }

    /// Bin ids for one feature across all samples.
    #[inline]
    pub fn feature_bins(&self, feature: usize) -> &[u8] {
        self.bins
            .row(feature)
            .to_slice()
            .expect("feature-major bins are contiguous per row")
    }

    #[inline]
    pub fn mapper(&self, feature: usize) -> &BinMapper {
        &self.mappers[feature]
    }
}

/// One binned sample, traversable by trees through bin representatives.
#[derive(Clone, Copy)]
pub struct BinnedSample<'a> {
    binned: &'a BinnedDataset,
    row: usize,
}

impl<'a> BinnedSample<'a> {
    #[inline]
    pub fn new(binned: &'a BinnedDataset, row: usize) -> Self {
        Self { binned, row }
    }
}

impl SampleAccessor for BinnedSample<'_> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        let bin = self.binned.bins[[index, self.row]];
        if bin == MISSING_BIN {
            f32::NAN
        } else {
            self.binned.mappers[index].representative(bin)
        }
    }
}

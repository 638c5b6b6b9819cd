//! Common utilities used across the crate.
//!
//! Quantile computation, parallelism configuration, and thread pool setup
//! shared by the data and training subsystems.

use rayon::prelude::*;

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Compute a quantile of a slice using a step function.
///
/// No interpolation: returns the value at the point where the cumulative
/// count first reaches `alpha * n`. Non-finite entries are skipped, so the
/// caller can pass raw feature columns that contain NaN markers.
///
/// # Arguments
/// * `values` - The values to compute the quantile over
/// * `alpha` - The quantile level in (0, 1); 0.5 is the median
/// * `scratch` - Scratch space for sorting indices, reused across calls
///
/// # Returns
/// The quantile value, or `f32::NAN` if no finite values exist.
#[inline]
pub fn quantile(values: &[f32], alpha: f32, scratch: &mut Vec<usize>) -> f32 {
    scratch.clear();
    scratch.extend((0..values.len()).filter(|&i| values[i].is_finite()));

    let n = scratch.len();
    if n == 0 {
        return f32::NAN;
    }
    if n == 1 {
        return values[scratch[0]];
    }

    scratch.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let threshold = (n as f32) * alpha;
    let mut cumulative = 0.0f32;
    for &idx in scratch.iter() {
        cumulative += 1.0;
        if cumulative >= threshold {
            return values[idx];
        }
    }

    values[scratch[n - 1]]
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// A simple flag passed through training components. When `Parallel`,
/// components may use `rayon` parallel iterators; when `Sequential`, they
/// must iterate in order. The actual thread pool is set up at the model API
/// level via `n_threads` - components just respect the flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    #[inline]
    pub fn maybe_par_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().for_each(f);
        } else {
            iter.into_iter().for_each(f);
        }
    }

    /// Bridge variant for iterators without an `IntoParallelIterator` impl,
    /// such as `iter_mut().enumerate()` over an output buffer.
    #[inline]
    pub fn maybe_par_bridge_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge().for_each(f);
        } else {
            iter.for_each(f);
        }
    }

    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    let parallelism = Parallelism::from_threads(n_threads);

    match parallelism {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()
                .expect("Failed to create thread pool");
            pool.install(|| f(Parallelism::Parallel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_empty() {
        let mut scratch = Vec::new();
        assert!(quantile(&[], 0.5, &mut scratch).is_nan());
    }

    #[test]
    fn quantile_single() {
        let mut scratch = Vec::new();
        let result = quantile(&[42.0], 0.5, &mut scratch);
        assert!((result - 42.0).abs() < 1e-6);
    }

    #[test]
    fn quantile_median_odd() {
        let mut scratch = Vec::new();
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = quantile(&values, 0.5, &mut scratch);
        assert!((result - 3.0).abs() < 1e-6);
    }

    #[test]
    fn quantile_q25() {
        let mut scratch = Vec::new();
        // n = 4, threshold = 1.0, cumulative hits it at the first value.
        let values = [1.0, 2.0, 3.0, 4.0];
        let result = quantile(&values, 0.25, &mut scratch);
        assert!((result - 1.0).abs() < 1e-6);
    }

    #[test]
    fn quantile_unsorted_input() {
        let mut scratch = Vec::new();
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        let result = quantile(&values, 0.5, &mut scratch);
        assert!((result - 3.0).abs() < 1e-6);
    }

    #[test]
    fn quantile_skips_nan() {
        let mut scratch = Vec::new();
        let values = [f32::NAN, 1.0, f32::NAN, 3.0, 2.0];
        let result = quantile(&values, 0.5, &mut scratch);
        assert!((result - 2.0).abs() < 1e-6);
    }

    #[test]
    fn quantile_all_nan() {
        let mut scratch = Vec::new();
        let values = [f32::NAN, f32::NAN];
        assert!(quantile(&values, 0.5, &mut scratch).is_nan());
    }

    #[test]
    fn parallelism_from_threads() {
        assert!(Parallelism::from_threads(0).is_parallel());
        assert!(!Parallelism::from_threads(1).is_parallel());
        assert!(Parallelism::from_threads(2).is_parallel());
    }

    #[test]
    fn run_with_threads_sequential() {
        let result = run_with_threads(1, |_| 42);
        assert_eq!(result, 42);
    }

    #[test]
    fn run_with_threads_explicit() {
        let result = run_with_threads(2, |_| rayon::current_num_threads());
        assert_eq!(result, 2);
    }

    #[test]
    fn maybe_par_for_each_sums() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let sum = AtomicUsize::new(0);
        Parallelism::Sequential.maybe_par_for_each(0..10usize, |i| {
            sum.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), 45);

        sum.store(0, Ordering::Relaxed);
        Parallelism::Parallel.maybe_par_for_each(0..10usize, |i| {
            sum.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), 45);
    }

    #[test]
    fn maybe_par_map_preserves_order() {
        let result: Vec<_> = Parallelism::Parallel.maybe_par_map(0..5usize, |i| i * 2);
        assert_eq!(result, vec![0, 2, 4, 6, 8]);
    }
}

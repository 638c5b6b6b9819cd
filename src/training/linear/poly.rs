//! Polynomial feature expansion.

use ndarray::{Array2, ArrayView2};

/// Expands features with polynomial terms up to `degree`.
///
/// Degree 1 passes the inputs through unchanged. Degree 2 appends all
/// squares and pairwise products, ordered `(0,0), (0,1), .., (1,1), ..`
/// after the linear terms. An optional bias column of ones comes first.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
}

impl PolynomialFeatures {
    /// `degree` must be 1 or 2; the config layer enforces this.
    pub fn new(degree: usize, include_bias: bool) -> Self {
        debug_assert!((1..=2).contains(&degree));
        Self {
            degree,
            include_bias,
        }
    }

    pub fn n_output_features(&self, n_input: usize) -> usize {
        let mut n = n_input;
        if self.degree >= 2 {
            n += n_input * (n_input + 1) / 2;
        }
        if self.include_bias {
            n += 1;
        }
        n
    }

    /// Expand feature-major data `[n_input, n_samples]` into
    /// `[n_output, n_samples]`.
    pub fn transform(&self, features: ArrayView2<f32>) -> Array2<f32> {
        let n_input = features.nrows();
        let n_samples = features.ncols();
        let mut out = Array2::<f32>::zeros((self.n_output_features(n_input), n_samples));

        let mut next = 0;
        if self.include_bias {
            out.row_mut(next).fill(1.0);
            next += 1;
        }
        for f in 0..n_input {
            out.row_mut(next).assign(&features.row(f));
            next += 1;
        }
        if self.degree >= 2 {
            for i in 0..n_input {
                for j in i..n_input {
                    let product = &features.row(i) * &features.row(j);
                    out.row_mut(next).assign(&product);
                    next += 1;
                }
            }
        }
        debug_assert_eq!(next, out.nrows());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn degree_one_is_identity() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let poly = PolynomialFeatures::new(1, false);
        let out = poly.transform(features.view());
        assert_eq!(out, features);
    }

    #[test]
    fn degree_one_with_bias_prepends_ones() {
        let features = array![[2.0, 5.0]];
        let poly = PolynomialFeatures::new(1, true);
        let out = poly.transform(features.view());
        assert_eq!(out, array![[1.0, 1.0], [2.0, 5.0]]);
    }

    #[test]
    fn degree_two_adds_squares_and_interactions() {
        let features = array![[2.0], [3.0]];
        let poly = PolynomialFeatures::new(2, false);
        let out = poly.transform(features.view());
        // x1, x2, x1^2, x1*x2, x2^2
        assert_eq!(out, array![[2.0], [3.0], [4.0], [6.0], [9.0]]);
    }

    #[test]
    fn output_feature_count() {
        let poly = PolynomialFeatures::new(2, true);
        // 1 bias + 3 linear + 6 quadratic
        assert_eq!(poly.n_output_features(3), 10);

        let poly = PolynomialFeatures::new(1, false);
        assert_eq!(poly.n_output_features(3), 3);
    }
}

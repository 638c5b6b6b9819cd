//! Ridge regression via normal equations.
//!
//! The problem is small in the feature dimension, so the exact solution is
//! cheaper and more predictable than an iterative solver: center the
//! features, solve `(X Xᵀ + alpha I) w = X yᵀ` with a Cholesky
//! factorization, and recover the unpenalized intercept from the means.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("normal equations are singular; features may be collinear with alpha = 0")]
    Singular,
}

/// L2-regularized least squares.
#[derive(Debug, Clone, Copy)]
pub struct Ridge {
    pub alpha: f64,
}

impl Ridge {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Fit on feature-major data `[n_features, n_samples]`.
    pub fn fit(
        &self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
    ) -> Result<FittedRidge, SolveError> {
        let p = features.nrows();
        let n = features.ncols();
        debug_assert_eq!(targets.len(), n);

        let means: Array1<f64> = features
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&v| v as f64).sum::<f64>() / n.max(1) as f64)
            .collect();
        let y_mean: f64 = targets.iter().map(|&t| t as f64).sum::<f64>() / n.max(1) as f64;

        // Centered Gram matrix and right-hand side, accumulated in f64.
        let mut gram = Array2::<f64>::zeros((p, p));
        let mut rhs = Array1::<f64>::zeros(p);
        for i in 0..p {
            let xi = features.row(i);
            let mi = means[i];
            for j in i..p {
                let xj = features.row(j);
                let mj = means[j];
                let dot: f64 = xi
                    .iter()
                    .zip(xj.iter())
                    .map(|(&a, &b)| (a as f64 - mi) * (b as f64 - mj))
                    .sum();
                gram[[i, j]] = dot;
                gram[[j, i]] = dot;
            }
            let r: f64 = xi
                .iter()
                .zip(targets.iter())
                .map(|(&a, &y)| (a as f64 - mi) * (y as f64 - y_mean))
                .sum();
            rhs[i] = r;
        }
        for i in 0..p {
            gram[[i, i]] += self.alpha;
        }

        let weights = cholesky_solve(gram, rhs)?;
        let intercept = y_mean - weights.dot(&means);

        Ok(FittedRidge { weights, intercept })
    }
}

/// A fitted linear model: `pred = wᵀ x + intercept`.
#[derive(Debug, Clone)]
pub struct FittedRidge {
    weights: Array1<f64>,
    intercept: f64,
}

impl FittedRidge {
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predict from feature-major data `[n_features, n_samples]`.
    pub fn predict(&self, features: ArrayView2<f32>) -> Array1<f32> {
        debug_assert_eq!(features.nrows(), self.weights.len());
        let n = features.ncols();
        let mut out = Array1::<f64>::from_elem(n, self.intercept);
        for (f, row) in features.rows().into_iter().enumerate() {
            let w = self.weights[f];
            for (acc, &v) in out.iter_mut().zip(row.iter()) {
                *acc += w * v as f64;
            }
        }
        out.mapv(|v| v as f32)
    }
}

/// Solve `A x = b` for symmetric positive-definite `A`, in place.
fn cholesky_solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, SolveError> {
    let n = a.nrows();

    // Lower-triangular factorization.
    for j in 0..n {
        let mut d = a[[j, j]];
        for k in 0..j {
            d -= a[[j, k]] * a[[j, k]];
        }
        if d <= 0.0 || !d.is_finite() {
            return Err(SolveError::Singular);
        }
        let d = d.sqrt();
        a[[j, j]] = d;
        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= a[[i, k]] * a[[j, k]];
            }
            a[[i, j]] = s / d;
        }
    }

    // L y = b
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= a[[i, k]] * b[k];
        }
        b[i] = s / a[[i, i]];
    }
    // Lᵀ x = y
    for i in (0..n).rev() {
        let mut s = b[i];
        for k in (i + 1)..n {
            s -= a[[k, i]] * b[k];
        }
        b[i] = s / a[[i, i]];
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn unregularized_fit_recovers_line() {
        // y = 2x + 1
        let features = array![[0.0, 1.0, 2.0, 3.0, 4.0]];
        let targets = array![1.0, 3.0, 5.0, 7.0, 9.0];

        let fit = Ridge::new(0.0).fit(features.view(), targets.view()).unwrap();
        assert_abs_diff_eq!(fit.weights()[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.intercept(), 1.0, epsilon = 1e-9);

        let preds = fit.predict(features.view());
        for (p, t) in preds.iter().zip(targets.iter()) {
            assert_abs_diff_eq!(*p, *t, epsilon = 1e-5);
        }
    }

    #[test]
    fn two_features_exact() {
        // y = 3a - b + 2
        let features = array![[1.0, 2.0, 3.0, 4.0, 0.0], [0.0, 1.0, 1.0, 3.0, 2.0]];
        let targets = array![5.0, 7.0, 10.0, 11.0, 0.0];

        let fit = Ridge::new(0.0).fit(features.view(), targets.view()).unwrap();
        assert_abs_diff_eq!(fit.weights()[0], 3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fit.weights()[1], -1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fit.intercept(), 2.0, epsilon = 1e-8);
    }

    #[test]
    fn regularization_shrinks_weights() {
        let features = array![[0.0, 1.0, 2.0, 3.0, 4.0]];
        let targets = array![1.0, 3.0, 5.0, 7.0, 9.0];

        let loose = Ridge::new(0.0).fit(features.view(), targets.view()).unwrap();
        let tight = Ridge::new(100.0)
            .fit(features.view(), targets.view())
            .unwrap();
        assert!(tight.weights()[0].abs() < loose.weights()[0].abs());
    }

    #[test]
    fn collinear_features_without_alpha_are_singular() {
        let features = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]];
        let targets = array![1.0, 2.0, 3.0];

        let result = Ridge::new(0.0).fit(features.view(), targets.view());
        assert_eq!(result.unwrap_err(), SolveError::Singular);

        // Any positive alpha makes the system solvable.
        assert!(Ridge::new(1.0).fit(features.view(), targets.view()).is_ok());
    }

    #[test]
    fn fit_is_deterministic() {
        let features = array![[0.5, 1.5, 2.5, 3.5], [1.0, 0.0, 1.0, 0.0]];
        let targets = array![2.0, 3.0, 5.0, 4.0];

        let a = Ridge::new(1.0).fit(features.view(), targets.view()).unwrap();
        let b = Ridge::new(1.0).fit(features.view(), targets.view()).unwrap();
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.intercept(), b.intercept());
    }
}

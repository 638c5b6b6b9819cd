//! Linear model training and its preprocessing stages.

mod impute;
mod poly;
mod ridge;
mod scale;

pub use impute::MedianImputer;
pub use poly::PolynomialFeatures;
pub use ridge::{FittedRidge, Ridge, SolveError};
pub use scale::StandardScaler;

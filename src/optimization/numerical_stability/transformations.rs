//! Covariance propagation and the tolerances it relies on.
//!
//! - [`EIGEN_EPS`]: eigenvalues of an information matrix at or below this
//!   are treated as zero when forming its pseudo-inverse.
//! - [`delta_method`]: push a θ-space covariance through a Jacobian,
//!   `Σ_g = J Σ_θ Jᵀ`.
//! - [`std_errors`]: square roots of a covariance diagonal.
use ndarray::{Array1, Array2};

/// Eigenvalue cutoff for pseudo-inverses of observed information.
pub const EIGEN_EPS: f64 = 1e-10;

/// First-order covariance of `g(θ̂)` given `Cov(θ̂)`.
///
/// `jacobian` is `m × p` (row `i` holds `∂g_i/∂θ`), `theta_cov` is `p × p`.
/// The result is `m × m` and symmetric up to rounding.
///
/// Panics
/// ------
/// - If the inner dimensions disagree (`jacobian.ncols() != theta_cov.nrows()`).
pub fn delta_method(jacobian: &Array2<f64>, theta_cov: &Array2<f64>) -> Array2<f64> {
    jacobian.dot(theta_cov).dot(&jacobian.t())
}

/// `sqrt(max(diag, 0))`. Rounding can leave a variance a hair below zero
/// on a singular direction; that reports as a zero standard error rather
/// than NaN.
pub fn std_errors(cov: &Array2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

//! inference::hessian — parameter covariance from observed information.
//!
//! Purpose
//! -------
//! Turn a gradient map of the negative log-likelihood into `Cov(θ̂)`:
//! differentiate it once more with [`compute_hessian`] to get the observed
//! information `I(θ̂)`, then invert `I` through its symmetric
//! eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - No explicit inverse is formed. With `I = Q Λ Qᵀ`,
//!   `Cov = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k` (Moore–Penrose
//!   pseudo-inverse on the well-determined subspace).
//! - Directions with `λ_k ≤ EIGEN_EPS` contribute nothing and clear the
//!   `pd_hessian` flag. A flat direction therefore shows up as a cleared
//!   flag, not as an infinite variance.
//!
//! Conventions
//! -----------
//! - The information is on the *sum* NLL scale the model reports; no
//!   division by a sample size happens here.
//! - `ndarray` on the outside, `nalgebra::DMatrix` for the eigen solve.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Pseudo-inverse of the observed information and whether it was positive
/// definite.
#[derive(Debug, Clone, PartialEq)]
pub struct ThetaCovariance {
    pub cov: Array2<f64>,
    pub pd_hessian: bool,
}

/// Covariance of θ̂ from the NLL gradient map `f`.
///
/// Parameters
/// ----------
/// - `f`: `θ ↦ ∇NLL(θ)`; must be finite in a neighborhood of `theta_hat`.
/// - `theta_hat`: the fitted parameter vector.
///
/// Errors
/// ------
/// - `OptError::InvalidHessian` / `HessianDimMismatch` when neither
///   difference scheme produces a valid Hessian.
///
/// ```rust
/// # use ndarray::array;
/// # use capelin_predation::inference::hessian::calc_covariance;
/// // NLL = 2θ₀² + θ₁²/2 has information diag(4, 1).
/// let grad = |t: &ndarray::Array1<f64>| array![4.0 * t[0], t[1]];
/// let out = calc_covariance(&grad, &array![0.0, 0.0]).unwrap();
/// assert!((out.cov[[0, 0]] - 0.25).abs() < 1e-6);
/// assert!(out.pd_hessian);
/// ```
pub fn calc_covariance<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<ThetaCovariance> {
    let obs_info = compute_hessian(f, theta_hat)?;
    Ok(pseudo_inverse(to_dmatrix(&obs_info)))
}

// ---- Helper methods ----

/// Column-major copy of a square `ndarray` matrix.
fn to_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

/// Eigen-truncated pseudo-inverse of a symmetric matrix.
fn pseudo_inverse(obs_info: DMatrix<f64>) -> ThetaCovariance {
    let n = obs_info.nrows();
    let eigen = obs_info.symmetric_eigen();
    let q = &eigen.eigenvectors;
    let kept: Vec<(usize, f64)> =
        eigen.eigenvalues.iter().copied().enumerate().filter(|(_, l)| *l > EIGEN_EPS).collect();
    let cov = Array2::from_shape_fn((n, n), |(i, j)| {
        kept.iter().map(|&(k, lambda)| q[(i, k)] * q[(j, k)] / lambda).sum()
    });
    ThetaCovariance { cov, pd_hessian: kept.len() == n }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The pseudo-inverse on full-rank and rank-deficient matrices.
    // - End-to-end covariance from a quadratic NLL gradient.
    //
    // They intentionally DO NOT cover:
    // - The consumption model (see `inference::sdreport`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A positive-definite information matrix is inverted exactly.
    //
    // Given
    // -----
    // - I = [[2, 1], [1, 2]], whose inverse is [[2, −1], [−1, 2]] / 3.
    //
    // Expect
    // ------
    // - `cov == I⁻¹` to 1e-12 and `pd_hessian == true`.
    fn pseudo_inverse_inverts_pd_matrix() {
        let info = array![[2.0, 1.0], [1.0, 2.0]];

        let out = pseudo_inverse(to_dmatrix(&info));

        let expected = array![[2.0, -1.0], [-1.0, 2.0]] / 3.0;
        for ((i, j), &v) in out.cov.indexed_iter() {
            assert!((v - expected[[i, j]]).abs() < 1e-12);
        }
        assert!(out.pd_hessian);
    }

    #[test]
    // Purpose
    // -------
    // A singular direction is dropped and flagged.
    //
    // Given
    // -----
    // - I = [[1, 1], [1, 1]] (rank one, eigenvalue 2 along (1, 1)/√2).
    //
    // Expect
    // ------
    // - cov = [[1, 1], [1, 1]] / 4 and `pd_hessian == false`.
    fn pseudo_inverse_flags_singular_information() {
        let info = array![[1.0, 1.0], [1.0, 1.0]];

        let out = pseudo_inverse(to_dmatrix(&info));

        for &v in out.cov.iter() {
            assert!((v - 0.25).abs() < 1e-12);
        }
        assert!(!out.pd_hessian);
    }

    #[test]
    // Purpose
    // -------
    // An indefinite Hessian (a saddle, not a minimum) is not positive
    // definite.
    fn negative_curvature_clears_pd_flag() {
        let grad = |t: &Array1<f64>| array![t[0], -t[1]];

        let out = calc_covariance(&grad, &array![0.1, 0.1]).unwrap();

        assert!(!out.pd_hessian);
        assert!((out.cov[[0, 0]] - 1.0).abs() < 1e-6);
        assert!(out.cov[[1, 1]].abs() < 1e-10);
    }
}

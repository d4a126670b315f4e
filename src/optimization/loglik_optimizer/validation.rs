//! Consistency checks shared by the optimizer layer.
//!
//! Tolerances are checked when options are built; gradients, Hessians and
//! solver outputs are checked as they come back from user code or argmin.
//! Each check reports the first offending entry through a dedicated
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// `None`, or a finite, strictly positive gradient-norm tolerance.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// `None`, or a finite, strictly positive cost-change tolerance.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Gradient of length `dim` with finite entries.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidGradient {
            index,
            value: grad[index],
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter vector, requiring finite entries.
///
/// Errors
/// ------
/// - `MissingThetaHat` when the solver produced none.
/// - `InvalidThetaHat` for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = theta_hat.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: theta_hat[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta_hat)
}

/// Log-likelihood values must be finite; their sign is unrestricted.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// `dim × dim` Hessian with finite entries.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.dim() != (dim, dim) {
        return Err(OptError::HessianDimMismatch { expected: dim, found: hessian.dim() });
    }
    match hessian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::InvalidHessian { row, col, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Tolerances accept `None` and positive finite values only.
    fn tolerances_reject_non_positive_and_non_finite_values() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Gradient checks report the length mismatch or the first bad entry.
    fn validate_grad_reports_first_offender() {
        let bad = array![1.0, f64::INFINITY, f64::NAN];

        assert_eq!(
            validate_grad(&bad, 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 3 })
        );
        assert!(matches!(validate_grad(&bad, 3), Err(OptError::InvalidGradient { index: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // A missing or non-finite θ̂ is rejected; a finite one is returned as is.
    fn validate_theta_hat_requires_finite_vector() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.5])), Ok(array![0.5]));
    }

    #[test]
    // Purpose
    // -------
    // Hessian checks cover shape and finiteness.
    fn validate_hessian_checks_shape_and_entries() {
        let h = array![[1.0, 0.0], [0.0, f64::NAN]];

        assert!(matches!(validate_hessian(&h, 3), Err(OptError::HessianDimMismatch { .. })));
        assert!(matches!(
            validate_hessian(&h, 2),
            Err(OptError::InvalidHessian { row: 1, col: 1, .. })
        ));
    }
}

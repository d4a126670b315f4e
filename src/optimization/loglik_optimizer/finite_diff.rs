//! loglik_optimizer::finite_diff — numerical derivatives around θ.
//!
//! Two consumers:
//! - the argmin adapter, when a [`LogLikelihood`] does not supply `grad`
//!   ([`run_fd_diff`], forward differences of the cost);
//! - the sdreport, which differentiates an exact gradient once more to get
//!   the observed information ([`compute_hessian`]).
//!
//! The consumption model always supplies an exact gradient, so in practice
//! only the Hessian path runs for it. Everything returned from here has
//! passed [`validate_grad`] / [`validate_hessian`].
//!
//! [`LogLikelihood`]: crate::optimization::loglik_optimizer::LogLikelihood
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` cannot return a `Result`, so callers route evaluation failures
/// into `closure_err` and return `NaN`. The cell is cleared on entry; a
/// captured error wins over the numeric result.
///
/// Errors
/// ------
/// - The captured backend error, converted into `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Hessian of a scalar objective from its gradient map `f`.
///
/// Central differences of `f` first; if that matrix fails validation the
/// forward-difference matrix is tried and its validation error, if any, is
/// returned. The accepted matrix is symmetrized before it is handed back.
///
/// ```rust
/// # use ndarray::array;
/// # use capelin_predation::optimization::loglik_optimizer::{Theta, finite_diff::compute_hessian};
/// // g(θ) = (2θ₀, 6θ₁) is the gradient of θ₀² + 3θ₁².
/// let grad = |t: &Theta| array![2.0 * t[0], 6.0 * t[1]];
/// let hess = compute_hessian(&grad, &array![0.3, -1.0]).unwrap();
/// assert!((hess[[1, 1]] - 6.0).abs() < 1e-6);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Average each off-diagonal pair in place.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

//! loglik_optimizer::builders — configured L-BFGS solvers.
//!
//! One builder per supported line search. Each reads the history length
//! and the gradient/cost tolerances from [`MLEOptions`]; the starting
//! point and the iteration cap are runtime settings applied by
//! `run_lbfgs`. Tolerances argmin refuses surface as `OptError` through the
//! backend conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let solver = LbfgsHagerZhang::new(HagerZhangLS::new(), history(opts));
    configure_lbfgs(solver, opts)
}

/// L-BFGS with More–Thuente line search (the default).
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let solver = LbfgsMoreThuente::new(MoreThuenteLS::new(), history(opts));
    configure_lbfgs(solver, opts)
}

/// Apply whichever of `tol_grad` / `tol_cost` is set; unset tolerances keep
/// argmin's defaults.
///
/// Errors
/// ------
/// - `OptError` converted from argmin when a tolerance is rejected.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

fn history(opts: &MLEOptions) -> usize {
    opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
}

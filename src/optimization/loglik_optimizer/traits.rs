//! Log-likelihood trait, optimizer options and the normalized outcome.
//!
//! The optimizer *maximizes* `ℓ(θ)` by handing argmin the cost
//! `c(θ) = −ℓ(θ)`. Implementors return `ℓ` and, optionally, `∇ℓ`; every sign
//! flip happens in the adapter.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// A model the optimizer can maximize.
///
/// - `value` returns `ℓ(θ)`; model failures come back as `OptError`.
/// - `check` runs once on the starting point before any iteration.
/// - `grad` returns `∇ℓ(θ)`. The default reports
///   [`OptError::GradientNotImplemented`], which switches the adapter to
///   finite differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer configuration.
///
/// Fields
/// ------
/// - `tols`: stopping rules, see [`Tolerances`].
/// - `line_searcher`: line search inside L-BFGS.
/// - `verbose`: with the `obs_slog` feature, log every iteration to the
///   terminal; ignored otherwise.
/// - `lbfgs_mem`: L-BFGS history length; `None` means `DEFAULT_LBFGS_MEM`.
///
/// The default is `tol_grad = 1e-6`, `max_iter = 300`, More–Thuente,
/// quiet, default history.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors
    /// ------
    /// - `InvalidLBFGSMem` when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::default(),
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. Each is optional, but at least one must be set.
///
/// - `tol_grad`: stop when `‖∇c‖` falls below it.
/// - `tol_cost`: stop when the cost change falls below it.
/// - `max_iter`: hard iteration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Errors
    /// ------
    /// - `NoTolerancesProvided` when all three are `None`.
    /// - `InvalidTolGrad` / `InvalidTolCost` for non-finite or non-positive
    ///   tolerances.
    /// - `InvalidMaxIter` when `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) }
    }
}

/// Result of [`maximize`](crate::optimization::loglik_optimizer::maximize).
///
/// `value` is the log-likelihood `ℓ(θ̂)`, not the cost. `converged` is
/// `true` only when the solver met its gradient or cost tolerance (or a
/// target cost); hitting `max_iter`, an interrupt or an early solver exit
/// leaves it `false`. `status` is the termination status in readable form. `grad_norm` is the norm of the
/// last gradient argmin kept, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build an outcome from raw solver state, validating θ̂ and `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Line-search names parse regardless of case; unknown names fail.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Tolerances require at least one stopping rule and a positive cap.
    fn tolerances_validate_inputs() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(Tolerances::new(None, Some(1e-9), None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Defaults match the documented configuration and a zero history is
    // rejected.
    fn mle_options_defaults_and_history_guard() {
        let opts = MLEOptions::default();

        assert_eq!(opts.tols.tol_grad, Some(1e-6));
        assert_eq!(opts.tols.max_iter, Some(300));
        assert_eq!(opts.line_searcher, LineSearcher::MoreThuente);
        assert!(!opts.verbose);
        assert!(matches!(
            MLEOptions::new(Tolerances::default(), LineSearcher::HagerZhang, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Termination status maps onto `converged` and the gradient norm is
    // computed.
    //
    // Given
    // -----
    // - A solver-converged status and gradient (3, 4).
    //
    // Expect
    // ------
    // - `converged == true`, `grad_norm == Some(5)`.
    fn outcome_maps_termination_and_gradient() {
        let done = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        let running = OptimOutcome::new(
            Some(array![0.0]),
            1.0,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        )
        .unwrap();

        assert!(done.converged);
        assert_eq!(done.grad_norm, Some(5.0));
        assert_eq!(done.iterations, 12);
        assert!(!running.converged);
        assert_eq!(running.status, "Not terminated");
    }

    #[test]
    // Purpose
    // -------
    // Only tolerance-based stops count as convergence.
    //
    // Given
    // -----
    // - The iteration cap, an early solver exit and a target-cost stop.
    //
    // Expect
    // ------
    // - The first two are not converged and keep their reason in `status`.
    // - The target-cost stop is converged.
    fn early_exits_are_not_converged() {
        let outcome = |reason: TerminationReason| {
            OptimOutcome::new(
                Some(array![0.0]),
                -1.0,
                TerminationStatus::Terminated(reason),
                1,
                FnEvalMap::new(),
                None,
            )
            .unwrap()
        };

        let capped = outcome(TerminationReason::MaxItersReached);
        let exited = outcome(TerminationReason::SolverExit("line search failed".to_string()));
        let target = outcome(TerminationReason::TargetCostReached);

        assert!(!capped.converged);
        assert!(!exited.converged);
        assert!(exited.status.contains("line search failed"));
        assert!(target.converged);
    }
}

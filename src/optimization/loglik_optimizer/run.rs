//! Executor wiring shared by both line-search variants.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State, TerminationReason, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run `solver` on `problem` from `theta0` and normalize the final state.
///
/// `opts.tols.max_iter` caps the run when set. With the `obs_slog` feature
/// and `opts.verbose`, `ℓ(θ₀)` and `‖∇c(θ₀)‖` go to stderr and a terminal
/// slog observer reports every iteration.
///
/// The returned `value` is `ℓ(θ̂) = −c(θ̂)` at argmin's best parameter.
///
/// Errors
/// ------
/// - Solver and line-search failures converted from argmin.
/// - A model or cost error that made L-BFGS exit early, as the `OptError`
///   the callback returned (for instance `PreyDepleted` or `NonFiniteCost`).
/// - Validation failures of θ̂ or `ℓ(θ̂)` (see [`OptimOutcome::new`]).
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let failure = problem.failure();
    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        );
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    if let TerminationStatus::Terminated(TerminationReason::SolverExit(_)) = termination {
        let recorded = failure.borrow_mut().take();
        if let Some(err) = recorded {
            return Err(err);
        }
    }
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F: LogLikelihood>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    let ell0 = -problem.cost(theta0)?;
    let grad_note = problem
        .gradient(theta0)
        .map(|g| format!(", ||grad|| = {:.6}", g.l2_norm()))
        .unwrap_or_default();
    eprintln!("init: ell(theta0) = {ell0:.6}{grad_note}");
    Ok(())
}

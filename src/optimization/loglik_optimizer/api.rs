//! `maximize`: the single entry point of the optimizer layer.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS starting from `theta0`.
///
/// `f.check` runs on `theta0` first. The model is then wrapped in an
/// [`ArgMinAdapter`] (argmin sees `−ℓ`) and solved with the line search
/// named in `opts`.
///
/// Errors
/// ------
/// - Whatever `f.check` rejects.
/// - Tolerances argmin refuses.
/// - Solver failures, including model errors raised mid-run. A failed
///   evaluation inside a line search ends the run with the callback's own
///   `OptError` variant rather than an outcome at `theta0`.
/// - `InvalidThetaHat` / `NonFiniteCost` if the solver ends on a
///   non-finite point.
///
/// ```no_run
/// use capelin_predation::consumption::prelude::*;
/// # fn demo(data: ConsumptionData) -> capelin_predation::optimization::errors::OptResult<()> {
/// let model = ConsumptionModel::new(ModelOptions::default());
/// let theta0 = LogParams::from_natural(1.0, 500.0, 2.0, 4.0, 10.0)?.to_theta();
/// let outcome = capelin_predation::optimization::loglik_optimizer::maximize(
///     &model, theta0, &data, &model.options.mle_opts,
/// )?;
/// println!("ℓ(θ̂) = {} after {} iterations", outcome.value, outcome.iterations);
/// # Ok(())
/// # }
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
    }
}

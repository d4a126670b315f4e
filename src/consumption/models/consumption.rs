//! Consumption model: NLL, exact gradient and fitting.
//!
//! This module wires the forward model in `consumption::core` to the
//! `LogLikelihood` trait so the generic L-BFGS driver can fit it.
//!
//! Key ideas:
//! - θ = `(log Cmax, log Chalf, log alpha, log beta, log sigma)` lives in
//!   unconstrained space; every natural parameter is `exp(θ_i)`.
//! - `value` returns `ℓ(θ) = −NLL(θ)` from an `f64` evaluation.
//! - `grad` returns `∇ℓ(θ)` from one dual-number evaluation; no finite
//!   differences are involved.
//! - The same dual-number pass gives the Jacobian of the AD report, which
//!   the delta method in `inference::sdreport` consumes.
use crate::{
    consumption::{
        core::{
            data::ConsumptionData,
            likelihood::evaluate,
            options::ModelOptions,
            params::{LogParams, validate_theta},
            report::ModelReport,
        },
        errors::{ModelError, ModelResult},
        models::derivatives::{gradient, jacobian, real_parts, seed},
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Grad, LogLikelihood, OptimOutcome, Theta, maximize},
    },
};
use ndarray::{Array1, Array2};

/// Model derivatives at one θ: NLL value and gradient plus the AD report
/// values and their Jacobian.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDerivatives {
    pub nll: f64,
    pub nll_gradient: Array1<f64>,
    pub adreport: Array1<f64>,
    pub adreport_jacobian: Array2<f64>,
}

/// ConsumptionModel — configuration plus the state of the last fit.
///
/// Fields
/// ------
/// - `options`: [`ModelOptions`] (model switches and optimizer settings).
/// - `results`: optimizer outcome of the last successful [`ConsumptionModel::fit`].
/// - `fitted_report`: full [`ModelReport`] evaluated at `θ̂`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionModel {
    pub options: ModelOptions,
    pub results: Option<OptimOutcome>,
    pub fitted_report: Option<ModelReport<f64>>,
}

impl ConsumptionModel {
    pub fn new(options: ModelOptions) -> ConsumptionModel {
        ConsumptionModel { options, results: None, fitted_report: None }
    }

    /// Forward model on plain `f64` at `theta`.
    ///
    /// Errors
    /// ------
    /// - θ validation errors (`ThetaLengthMismatch`, `InvalidThetaInput`).
    /// - Domain errors from the recurrence under `DomainPolicy::Fail`.
    pub fn evaluate(&self, theta: &Theta, data: &ConsumptionData) -> ModelResult<ModelReport<f64>> {
        let log_params = LogParams::from_theta(theta.view())?;
        evaluate(&log_params, data, &self.options)
    }

    /// Negative log-likelihood at `theta`.
    pub fn nll(&self, theta: &Theta, data: &ConsumptionData) -> ModelResult<f64> {
        Ok(self.evaluate(theta, data)?.nll)
    }

    /// One dual-number pass: NLL, its θ-gradient, the AD report and its
    /// Jacobian with respect to θ.
    pub fn derivatives(
        &self, theta: &Theta, data: &ConsumptionData,
    ) -> ModelResult<ModelDerivatives> {
        let log_params = LogParams::from_theta(theta.view())?;
        let report = evaluate(&seed(&log_params), data, &self.options)?;
        let adreport = report.adreport();
        Ok(ModelDerivatives {
            nll: report.nll.real(),
            nll_gradient: gradient(&report.nll),
            adreport: real_parts(&adreport),
            adreport_jacobian: jacobian(&adreport),
        })
    }

    /// Maximize `ℓ(θ) = −NLL(θ)` from `theta0` and store the outcome plus the
    /// report at `θ̂`.
    ///
    /// Errors
    /// ------
    /// - Any `OptError` from validation of `theta0`, the solver, or model
    ///   evaluation (domain errors map to their `OptError` counterparts).
    ///   A domain violation hit by a line-search step ends the fit with that
    ///   error (`PreyDepleted`, `SaturationUndefined`, or `NonFiniteCost`
    ///   under `DomainPolicy::Propagate`); nothing is stored.
    ///
    /// A run that stops on `max_iter` is stored with `converged == false`.
    pub fn fit(&mut self, theta0: Theta, data: &ConsumptionData) -> OptResult<()> {
        let outcome = maximize(self, theta0, data, &self.options.mle_opts)?;
        let report = self.evaluate(&outcome.theta_hat, data)?;
        self.results = Some(outcome);
        self.fitted_report = Some(report);
        Ok(())
    }

    /// θ̂ of the last fit.
    pub fn theta_hat(&self) -> ModelResult<&Theta> {
        self.results.as_ref().map(|r| &r.theta_hat).ok_or(ModelError::ModelNotFitted)
    }

    /// Report at θ̂ of the last fit.
    pub fn report(&self) -> ModelResult<&ModelReport<f64>> {
        self.fitted_report.as_ref().ok_or(ModelError::ModelNotFitted)
    }
}

impl LogLikelihood for ConsumptionModel {
    type Data = ConsumptionData;

    /// `ℓ(θ) = −NLL(θ)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        Ok(-self.nll(theta, data)?)
    }

    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view())?;
        Ok(())
    }

    /// `∇ℓ(θ) = −∇NLL(θ)`, exact to floating-point rounding.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let log_params = LogParams::from_theta(theta.view())?;
        let report = evaluate(&seed(&log_params), data, &self.options)?;
        Ok(-gradient(&report.nll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumption::core::{
        data::{PredatorTables, PreyTables},
        options::DomainPolicy,
        params::N_PARAMS,
    };
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `LogLikelihood` conformance (`check`, `value`, `grad`).
    // - Agreement of the dual-number gradient and Jacobian with central
    //   finite differences.
    // - Fit-state accessors before fitting.
    //
    // They intentionally DO NOT cover:
    // - Full optimizer runs (see the integration tests).
    // -------------------------------------------------------------------------

    /// Four years, twelve predator ages, three prey ages, with smooth
    /// year-to-year variation so every parameter has a visible effect.
    fn toy_data() -> ConsumptionData {
        let years = 4;
        let cod_ages = 12;
        let cod = |f: &dyn Fn(usize, usize) -> f64| Array2::from_shape_fn((years, cod_ages), |(y, a)| f(y, a));
        let predator = PredatorTables {
            consumption: cod(&|y, a| 0.4 + 0.05 * a as f64 + 0.1 * y as f64),
            abundance: cod(&|y, a| 50.0 / (1.0 + a as f64) + 5.0 * y as f64),
            maturity: cod(&|_, a| (a as f64 / 14.0).min(0.9)),
            subregion_immature: cod(&|_, _| 0.2),
            weight: cod(&|_, a| 0.5 + 0.8 * a as f64),
            fishing_mortality: cod(&|y, _| 0.3 + 0.02 * y as f64),
            natural_mortality: cod(&|_, _| 0.2),
        };
        let prey = PreyTables {
            abundance: Array2::from_shape_fn((years, 3), |(y, a)| 400.0 + 50.0 * y as f64 - 80.0 * a as f64),
            weight: Array2::from_shape_fn((years, 3), |(_, a)| 1.0 + 0.5 * a as f64),
            off_season_mortality: array![0.1, 0.2, 0.15, 0.25],
        };
        ConsumptionData::new(predator, prey).unwrap()
    }

    fn theta() -> Theta {
        LogParams::from_natural(0.8, 300.0, 2.0, 3.0, 20.0).unwrap().to_theta()
    }

    #[test]
    // Purpose
    // -------
    // `value` is the negated NLL of the forward model.
    fn value_is_negated_nll() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let data = toy_data();

        let ell = model.value(&theta(), &data).unwrap();
        let report = model.evaluate(&theta(), &data).unwrap();

        assert!(ell.is_finite());
        assert_eq!(ell, -report.nll);
    }

    #[test]
    // Purpose
    // -------
    // The dual-number gradient agrees with central finite differences of
    // `value`.
    //
    // Given
    // -----
    // - Toy data and a θ away from any domain boundary.
    //
    // Expect
    // ------
    // - Component-wise agreement with a fourth-order stencil (h = 1e-3)
    //   within 1e-6 relative tolerance.
    fn grad_matches_central_differences() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let data = toy_data();
        let th = theta();
        let ell = |j: usize, step: f64| {
            let mut t = th.clone();
            t[j] += step;
            model.value(&t, &data).unwrap()
        };
        let h = 1e-3;

        let analytic = model.grad(&th, &data).unwrap();
        let numeric = Array1::from_shape_fn(N_PARAMS, |j| {
            (8.0 * (ell(j, h) - ell(j, -h)) - (ell(j, 2.0 * h) - ell(j, -2.0 * h))) / (12.0 * h)
        });

        assert_eq!(analytic.len(), N_PARAMS);
        for i in 0..N_PARAMS {
            let scale = numeric[i].abs().max(1.0);
            assert!(
                (analytic[i] - numeric[i]).abs() / scale < 1e-6,
                "component {i}: analytic {} vs numeric {}",
                analytic[i],
                numeric[i]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // The AD report Jacobian agrees with finite differences of the report.
    fn adreport_jacobian_matches_central_differences() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let data = toy_data();
        let th = theta();

        let d = model.derivatives(&th, &data).unwrap();

        assert_eq!(d.adreport_jacobian.dim(), (N_PARAMS + 4, N_PARAMS));
        let h = 1e-6;
        for j in 0..N_PARAMS {
            let mut up = th.clone();
            let mut down = th.clone();
            up[j] += h;
            down[j] -= h;
            let r_up = model.evaluate(&up, &data).unwrap().adreport();
            let r_down = model.evaluate(&down, &data).unwrap().adreport();
            for i in 0..d.adreport.len() {
                let numeric = (r_up[i] - r_down[i]) / (2.0 * h);
                let scale = numeric.abs().max(1.0);
                assert!((d.adreport_jacobian[[i, j]] - numeric).abs() / scale < 1e-5);
            }
        }
        // Natural parameters are exp(θ): diagonal Jacobian block equals the values.
        for i in 0..N_PARAMS {
            assert!((d.adreport_jacobian[[i, i]] - d.adreport[i]).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects θ of the wrong length through the optimizer error type.
    fn check_rejects_wrong_length() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let data = toy_data();

        let res = model.check(&array![0.0, 1.0, 2.0], &data);

        assert!(res.is_err());
    }

    #[test]
    // Purpose
    // -------
    // Accessors report `ModelNotFitted` before `fit`.
    fn accessors_require_fit() {
        let model = ConsumptionModel::new(ModelOptions::default());

        assert_eq!(model.theta_hat().unwrap_err(), ModelError::ModelNotFitted);
        assert_eq!(model.report().unwrap_err(), ModelError::ModelNotFitted);
    }

    #[test]
    // Purpose
    // -------
    // Under `Propagate` a depleting parameter set yields a non-finite NLL
    // rather than an error; under `Fail` it is an error.
    //
    // Given
    // -----
    // - Cmax so large that period-0 consumption exceeds prey biomass.
    fn depletion_follows_domain_policy() {
        let data = toy_data();
        let greedy = LogParams::from_natural(1e6, 1.0, 2.0, 3.0, 20.0).unwrap().to_theta();

        let fail = ConsumptionModel::new(ModelOptions::default());
        let propagate = ConsumptionModel::new(ModelOptions {
            domain_policy: DomainPolicy::Propagate,
            ..ModelOptions::default()
        });

        assert!(matches!(fail.nll(&greedy, &data), Err(ModelError::PreyDepleted { period: 1, .. })));
        assert!(!propagate.nll(&greedy, &data).unwrap().is_finite());
    }
}

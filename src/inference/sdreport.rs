//! inference::sdreport — standard errors of parameters and derived series.
//!
//! Purpose
//! -------
//! Quantify the uncertainty of a fitted consumption model: the five natural
//! parameters and the annual modeled consumption, each with a delta-method
//! standard error.
//!
//! Key behaviors
//! -------------
//! - `Cov(θ̂)` is the pseudo-inverse of the observed information, the
//!   finite-difference Jacobian of the *exact* NLL gradient
//!   ([`calc_covariance`]).
//! - The AD report and its Jacobian `J` come from one dual-number pass;
//!   `Cov(report) = J Cov(θ̂) Jᵀ` ([`delta_method`]).
//! - `pd_hessian` records whether every eigenvalue of the information was
//!   above `EIGEN_EPS`. When it is `false` the standard errors only cover
//!   the identified subspace and should not be read as full uncertainty.
//!
//! Conventions
//! -----------
//! - Entries follow [`ModelReport::adreport`]:
//!   `Cmax, Chalf, alpha, beta, sigma, modeled_annual[0..n_years]`, named by
//!   [`adreport_names`].
//! - θ-space quantities (`theta_hat`, `theta_cov`, `theta_se`) are on the
//!   log scale.
//!
//! [`ModelReport::adreport`]: crate::consumption::core::report::ModelReport::adreport
use crate::{
    consumption::{
        core::{data::ConsumptionData, report::adreport_names},
        models::consumption::ConsumptionModel,
    },
    inference::{
        errors::{InferenceError, InferenceResult},
        hessian::calc_covariance,
    },
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::transformations::{delta_method, std_errors},
    },
};
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal};

/// Point estimates and delta-method uncertainty at θ̂.
#[derive(Debug, Clone, PartialEq)]
pub struct SdReport {
    pub names: Vec<String>,
    pub estimates: Array1<f64>,
    pub std_errors: Array1<f64>,
    pub cov: Array2<f64>,
    pub theta_hat: Theta,
    pub theta_cov: Array2<f64>,
    pub theta_se: Array1<f64>,
    pub nll: f64,
    /// Largest absolute NLL gradient component at θ̂; near zero at an optimum.
    pub max_gradient: f64,
    pub pd_hessian: bool,
}

impl SdReport {
    /// Estimate and standard error of the entry called `name`.
    pub fn get(&self, name: &str) -> Option<(f64, f64)> {
        let i = self.names.iter().position(|n| n == name)?;
        Some((self.estimates[i], self.std_errors[i]))
    }

    /// Two-sided Wald interval `estimate ± z · se` at confidence `level`.
    ///
    /// `None` when `name` is unknown or `level` is not in `(0, 1)`.
    pub fn wald_interval(&self, name: &str, level: f64) -> Option<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return None;
        }
        let (est, se) = self.get(name)?;
        let z = Normal::standard().inverse_cdf(0.5 + level / 2.0);
        Some((est - z * se, est + z * se))
    }
}

/// Build an [`SdReport`] for `model` at `theta_hat`.
///
/// `theta_hat` need not come from `model.fit`; any θ is accepted, though
/// standard errors are only meaningful at a minimum of the NLL.
///
/// Errors
/// ------
/// - `InferenceError::Model` when the model cannot be evaluated at
///   `theta_hat` (wrong length, domain violation under `DomainPolicy::Fail`).
/// - `InferenceError::Optimization` when the Hessian is not finite, for
///   instance because a finite-difference step crossed a domain boundary.
/// - `InferenceError::NonFiniteCovariance` when the propagated covariance
///   is not finite.
pub fn sdreport(
    model: &ConsumptionModel, theta_hat: &Theta, data: &ConsumptionData,
) -> InferenceResult<SdReport> {
    let at_hat = model.derivatives(theta_hat, data)?;
    let n = theta_hat.len();
    let (rows, cols) = at_hat.adreport_jacobian.dim();
    if cols != n {
        return Err(InferenceError::JacobianShapeMismatch { expected_cols: n, found: (rows, cols) });
    }

    // A failed evaluation inside the stencil becomes NaN, which Hessian
    // validation rejects.
    let nll_gradient = |theta: &Theta| {
        model
            .derivatives(theta, data)
            .map(|d| d.nll_gradient)
            .unwrap_or_else(|_| Array1::from_elem(n, f64::NAN))
    };
    let theta_cov = calc_covariance(&nll_gradient, theta_hat)?;
    let cov = delta_method(&at_hat.adreport_jacobian, &theta_cov.cov);
    if let Some(((row, col), &value)) = cov.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteCovariance { row, col, value });
    }

    Ok(SdReport {
        names: adreport_names(data.n_years()),
        std_errors: std_errors(&cov),
        estimates: at_hat.adreport,
        cov,
        theta_hat: theta_hat.clone(),
        theta_se: std_errors(&theta_cov.cov),
        theta_cov: theta_cov.cov,
        nll: at_hat.nll,
        max_gradient: at_hat.nll_gradient.iter().fold(0.0, |m, g| m.max(g.abs())),
        pd_hessian: theta_cov.pd_hessian,
    })
}

impl ConsumptionModel {
    /// [`sdreport`] at the θ̂ of the last [`fit`](ConsumptionModel::fit).
    ///
    /// Errors
    /// ------
    /// - `InferenceError::Model(ModelError::ModelNotFitted)` before a fit.
    /// - Everything [`sdreport`] returns.
    pub fn sdreport(&self, data: &ConsumptionData) -> InferenceResult<SdReport> {
        let theta_hat = self.theta_hat()?.clone();
        sdreport(self, &theta_hat, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumption::{
        core::{
            data::{PredatorTables, PreyTables},
            options::ModelOptions,
            params::{LogParams, N_PARAMS},
        },
        errors::ModelError,
    };
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shapes and naming of the report.
    // - The exp-transform identity SE(p) = p · SE(log p) for every parameter.
    // - Symmetry of the propagated covariance.
    // - The not-fitted guard on the model convenience method.
    //
    // They intentionally DO NOT cover:
    // - Reports at a fitted optimum (see the integration tests).
    // -------------------------------------------------------------------------

    fn toy_data() -> ConsumptionData {
        let years = 5;
        let cod_ages = 11;
        let cod = |f: &dyn Fn(usize, usize) -> f64| {
            Array2::from_shape_fn((years, cod_ages), |(y, a)| f(y, a))
        };
        let predator = PredatorTables {
            consumption: cod(&|y, a| 0.3 + 0.04 * a as f64 + 0.05 * ((y * 7) % 3) as f64),
            abundance: cod(&|y, a| 80.0 / (1.0 + a as f64) + 3.0 * y as f64),
            maturity: cod(&|_, a| (a as f64 / 12.0).min(0.95)),
            subregion_immature: cod(&|_, _| 0.25),
            weight: cod(&|_, a| 0.4 + 0.7 * a as f64),
            fishing_mortality: cod(&|_, _| 0.25),
            natural_mortality: cod(&|_, _| 0.2),
        };
        let prey = PreyTables {
            abundance: Array2::from_shape_fn((years, 3), |(y, a)| 500.0 + 40.0 * y as f64 - 90.0 * a as f64),
            weight: Array2::from_shape_fn((years, 3), |(_, a)| 1.2 + 0.4 * a as f64),
            off_season_mortality: array![0.1, 0.12, 0.2, 0.15, 0.18],
        };
        ConsumptionData::new(predator, prey).unwrap()
    }

    fn theta() -> Theta {
        LogParams::from_natural(0.7, 250.0, 2.5, 3.5, 15.0).unwrap().to_theta()
    }

    #[test]
    // Purpose
    // -------
    // The report has one entry per parameter plus one per year, named in
    // AD-report order, and the estimates are the natural parameters.
    fn report_lists_parameters_then_annual_consumption() {
        // Arrange
        let model = ConsumptionModel::new(ModelOptions::default());
        let data = toy_data();

        // Act
        let rep = sdreport(&model, &theta(), &data).unwrap();

        // Assert
        assert_eq!(rep.names.len(), N_PARAMS + 5);
        assert_eq!(rep.estimates.len(), rep.names.len());
        assert_eq!(rep.std_errors.len(), rep.names.len());
        assert_eq!(rep.cov.dim(), (N_PARAMS + 5, N_PARAMS + 5));
        assert_eq!(rep.theta_cov.dim(), (N_PARAMS, N_PARAMS));
        assert!((rep.get("Chalf").unwrap().0 - 250.0).abs() < 1e-9);
        assert_eq!(rep.names[N_PARAMS], "modeled_annual[0]");
        assert!(rep.get("no such entry").is_none());
    }

    #[test]
    // Purpose
    // -------
    // A 95% Wald interval is symmetric with half-width 1.959964 · SE, and
    // invalid levels or names give `None`.
    fn wald_interval_uses_normal_quantile() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let rep = sdreport(&model, &theta(), &toy_data()).unwrap();
        let (est, se) = rep.get("Cmax").unwrap();

        let (lo, hi) = rep.wald_interval("Cmax", 0.95).unwrap();

        assert!(((hi - lo) / 2.0 - 1.959_963_984_540_054 * se).abs() <= 1e-9 * se.max(1e-12));
        assert!(((hi + lo) / 2.0 - est).abs() < 1e-12);
        assert!(rep.wald_interval("Cmax", 1.0).is_none());
        assert!(rep.wald_interval("Cmax", f64::NAN).is_none());
        assert!(rep.wald_interval("missing", 0.9).is_none());
    }

    #[test]
    // Purpose
    // -------
    // For p = exp(θ) the delta method gives SE(p) = p · SE(θ), for all five
    // parameters, and the propagated covariance is symmetric.
    //
    // Given
    // -----
    // - Toy data at a θ that is not an optimum (the identity does not
    //   depend on optimality).
    //
    // Expect
    // ------
    // - Relative agreement within 1e-9; |cov − covᵀ| < 1e-9 relative.
    fn parameter_errors_follow_exp_transform() {
        let model = ConsumptionModel::new(ModelOptions::default());
        let rep = sdreport(&model, &theta(), &toy_data()).unwrap();

        for i in 0..N_PARAMS {
            let expected = rep.estimates[i] * rep.theta_se[i];
            let scale = expected.abs().max(1e-12);
            assert!((rep.std_errors[i] - expected).abs() / scale < 1e-9, "parameter {i}");
        }
        for ((i, j), &v) in rep.cov.indexed_iter() {
            let scale = v.abs().max(rep.cov[[j, i]].abs()).max(1e-12);
            assert!((v - rep.cov[[j, i]]).abs() / scale < 1e-9);
        }
        assert!(rep.std_errors.iter().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    // Purpose
    // -------
    // The model convenience method requires a fit.
    fn model_sdreport_requires_fit() {
        let model = ConsumptionModel::new(ModelOptions::default());

        let err = model.sdreport(&toy_data()).unwrap_err();

        assert_eq!(err, InferenceError::Model(ModelError::ModelNotFitted));
    }

    #[test]
    // Purpose
    // -------
    // A θ of the wrong length is a model error, not a panic.
    fn wrong_length_theta_is_rejected() {
        let model = ConsumptionModel::new(ModelOptions::default());

        let err = sdreport(&model, &array![0.0, 1.0], &toy_data()).unwrap_err();

        assert!(matches!(err, InferenceError::Model(ModelError::ThetaLengthMismatch { .. })));
    }
}

//! capelin_predation — cod–capelin consumption model with exact-gradient
//! maximum likelihood and delta-method reporting.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge behind the `_capelin_predation` extension
//! module.
//!
//! Key behaviors
//! -------------
//! - [`consumption`]: data tables, the forward model on `f64` or dual numbers,
//!   and [`consumption::ConsumptionModel`].
//! - [`optimization`]: the argmin-backed L-BFGS maximizer and its error type.
//! - [`inference`]: observed-information covariance and the sdreport.
//! - `#[pyclass]` wrappers for the data, the model, the fit outcome, the
//!   model report and the sdreport.
//!
//! Invariants & assumptions
//! ------------------------
//! - Numerical work lives in the inner modules; this file performs FFI glue,
//!   input conversion and error mapping only.
//! - θ crosses the boundary on the log scale, in the order
//!   `(log Cmax, log Chalf, log alpha, log beta, log sigma)`.
//!
//! Conventions
//! -----------
//! - 2-D tables are returned to Python as lists of rows (years).
//! - Rust errors become `ValueError` at the boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust code should depend on the inner modules and can ignore everything
//!   guarded by `python-bindings`.

pub mod consumption;
pub mod inference;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    consumption::{
        core::{data::ConsumptionData, params::LogParams, report::ModelReport},
        errors::ModelError,
        models::consumption::ConsumptionModel,
    },
    inference::sdreport::SdReport,
    optimization::loglik_optimizer::traits::OptimOutcome,
    utils::{extract_consumption_data, extract_f64_array, extract_model_options},
};

#[cfg(feature = "python-bindings")]
fn rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Validated input tables (rows are years).
///
/// Predator tables are `(n_years, n_cod_ages)`; prey tables are
/// `(n_years, n_capelin_ages)`; `off_season_mortality` has one entry per year.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "capelin_predation", name = "ConsumptionData")]
pub struct PyConsumptionData {
    pub inner: ConsumptionData,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyConsumptionData {
    #[new]
    #[pyo3(
        signature = (
            consumption,
            abundance,
            maturity,
            subregion_immature,
            weight,
            fishing_mortality,
            natural_mortality,
            prey_abundance,
            prey_weight,
            off_season_mortality,
        ),
        text_signature = "(consumption, abundance, maturity, subregion_immature, weight, \
                          fishing_mortality, natural_mortality, prey_abundance, prey_weight, \
                          off_season_mortality, /)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        consumption: &Bound<'py, PyAny>, abundance: &Bound<'py, PyAny>,
        maturity: &Bound<'py, PyAny>, subregion_immature: &Bound<'py, PyAny>,
        weight: &Bound<'py, PyAny>, fishing_mortality: &Bound<'py, PyAny>,
        natural_mortality: &Bound<'py, PyAny>, prey_abundance: &Bound<'py, PyAny>,
        prey_weight: &Bound<'py, PyAny>, off_season_mortality: &Bound<'py, PyAny>,
    ) -> PyResult<Self> {
        let inner = extract_consumption_data(
            consumption,
            abundance,
            maturity,
            subregion_immature,
            weight,
            fishing_mortality,
            natural_mortality,
            prey_abundance,
            prey_weight,
            off_season_mortality,
        )?;
        Ok(PyConsumptionData { inner })
    }

    #[getter]
    pub fn n_years(&self) -> usize {
        self.inner.n_years()
    }

    #[getter]
    pub fn n_predator_ages(&self) -> usize {
        self.inner.n_predator_ages()
    }

    #[getter]
    pub fn n_prey_ages(&self) -> usize {
        self.inner.n_prey_ages()
    }
}

/// Python handle on a [`ConsumptionModel`].
///
/// Holds the options and, after `fit`, the optimizer outcome and the report
/// at θ̂.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "capelin_predation", name = "ConsumptionModel", unsendable)]
pub struct PyConsumptionModel {
    pub inner: ConsumptionModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyConsumptionModel {
    #[new]
    #[pyo3(
        signature = (
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
            residual_grain = None,
            domain_policy = None,
            plateau = None,
        ),
        text_signature = "(/, tol_grad=1e-6, tol_cost=None, max_iter=300, \
                          line_searcher='MoreThuente', lbfgs_mem=7, verbose=False, \
                          residual_grain='Annual', domain_policy='Fail', plateau='OutOfSupport')"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
        residual_grain: Option<&str>, domain_policy: Option<&str>, plateau: Option<&str>,
    ) -> PyResult<Self> {
        let options = extract_model_options(
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
            residual_grain,
            domain_policy,
            plateau,
        )?;
        Ok(PyConsumptionModel { inner: ConsumptionModel::new(options) })
    }

    /// Log-scale θ from natural-scale parameters.
    #[staticmethod]
    #[pyo3(text_signature = "(cmax, chalf, alpha, beta, sigma, /)")]
    pub fn theta_from_natural(
        cmax: f64, chalf: f64, alpha: f64, beta: f64, sigma: f64,
    ) -> PyResult<Vec<f64>> {
        Ok(LogParams::from_natural(cmax, chalf, alpha, beta, sigma)?.to_theta().to_vec())
    }

    #[pyo3(text_signature = "(self, data, theta, /)")]
    pub fn evaluate<'py>(
        &self, data: &PyConsumptionData, theta: &Bound<'py, PyAny>,
    ) -> PyResult<PyModelReport> {
        let theta = extract_f64_array(theta, "theta")?;
        Ok(PyModelReport { inner: self.inner.evaluate(&theta, &data.inner)? })
    }

    #[pyo3(text_signature = "(self, data, theta, /)")]
    pub fn nll<'py>(&self, data: &PyConsumptionData, theta: &Bound<'py, PyAny>) -> PyResult<f64> {
        let theta = extract_f64_array(theta, "theta")?;
        Ok(self.inner.nll(&theta, &data.inner)?)
    }

    /// Exact gradient of the NLL with respect to θ.
    #[pyo3(text_signature = "(self, data, theta, /)")]
    pub fn gradient<'py>(
        &self, data: &PyConsumptionData, theta: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let theta = extract_f64_array(theta, "theta")?;
        Ok(self.inner.derivatives(&theta, &data.inner)?.nll_gradient.to_vec())
    }

    #[pyo3(text_signature = "(self, data, theta0, /)")]
    pub fn fit<'py>(
        &mut self, data: &PyConsumptionData, theta0: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let theta0: Array1<f64> = extract_f64_array(theta0, "theta0")?;
        self.inner.fit(theta0, &data.inner)?;
        Ok(())
    }

    #[pyo3(text_signature = "(self, data, /)")]
    pub fn sdreport(&self, data: &PyConsumptionData) -> PyResult<PySdReport> {
        Ok(PySdReport { inner: self.inner.sdreport(&data.inner)? })
    }

    #[getter]
    pub fn results(&self) -> PyResult<PyOptimOutcome> {
        let outcome = self.inner.results.as_ref().ok_or(ModelError::ModelNotFitted)?;
        Ok(PyOptimOutcome { inner: outcome.clone() })
    }

    #[getter]
    pub fn report(&self) -> PyResult<PyModelReport> {
        Ok(PyModelReport { inner: self.inner.report()?.clone() })
    }
}

/// Optimizer diagnostics from the last fit.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "capelin_predation", name = "OptimOutcome")]
pub struct PyOptimOutcome {
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// Derived quantities of one forward-model evaluation.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "capelin_predation", name = "ModelReport")]
pub struct PyModelReport {
    pub inner: ModelReport<f64>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyModelReport {
    /// `(Cmax, Chalf, alpha, beta, sigma)` on the natural scale.
    #[getter]
    pub fn params(&self) -> (f64, f64, f64, f64, f64) {
        let p = &self.inner.params;
        (p.cmax, p.chalf, p.alpha, p.beta, p.sigma)
    }

    #[getter]
    pub fn nll(&self) -> f64 {
        self.inner.nll
    }

    #[getter]
    pub fn suitability(&self) -> Vec<f64> {
        self.inner.suitability.to_vec()
    }

    #[getter]
    pub fn prey_biomass(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.prey_biomass)
    }

    #[getter]
    pub fn predation_pressure(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.predation_pressure)
    }

    #[getter]
    pub fn modeled_consumption(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.modeled_consumption)
    }

    #[getter]
    pub fn empirical_consumption(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.empirical_consumption)
    }

    #[getter]
    pub fn prey_mortality(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.prey_mortality)
    }

    #[getter]
    pub fn predator_mortality(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.predator_mortality)
    }

    #[getter]
    pub fn modeled_annual(&self) -> Vec<f64> {
        self.inner.modeled_annual.to_vec()
    }

    #[getter]
    pub fn empirical_annual(&self) -> Vec<f64> {
        self.inner.empirical_annual.to_vec()
    }
}

/// Point estimates with delta-method standard errors.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "capelin_predation", name = "SdReport")]
pub struct PySdReport {
    pub inner: SdReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PySdReport {
    #[getter]
    pub fn names(&self) -> Vec<String> {
        self.inner.names.clone()
    }

    #[getter]
    pub fn estimates(&self) -> Vec<f64> {
        self.inner.estimates.to_vec()
    }

    #[getter]
    pub fn std_errors(&self) -> Vec<f64> {
        self.inner.std_errors.to_vec()
    }

    #[getter]
    pub fn cov(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.cov)
    }

    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn theta_cov(&self) -> Vec<Vec<f64>> {
        rows(&self.inner.theta_cov)
    }

    #[getter]
    pub fn theta_se(&self) -> Vec<f64> {
        self.inner.theta_se.to_vec()
    }

    #[getter]
    pub fn nll(&self) -> f64 {
        self.inner.nll
    }

    #[getter]
    pub fn max_gradient(&self) -> f64 {
        self.inner.max_gradient
    }

    #[getter]
    pub fn pd_hessian(&self) -> bool {
        self.inner.pd_hessian
    }

    /// `(estimate, std_error)` for `name`, or `None` if absent.
    #[pyo3(text_signature = "(self, name, /)")]
    pub fn get(&self, name: &str) -> Option<(f64, f64)> {
        self.inner.get(name)
    }

    /// Two-sided Wald interval for `name` at confidence `level`.
    #[pyo3(signature = (name, level = 0.95), text_signature = "(self, name, /, level=0.95)")]
    pub fn wald_interval(&self, name: &str, level: f64) -> Option<(f64, f64)> {
        self.inner.wald_interval(name, level)
    }
}

/// Initializer of the `_capelin_predation` extension module.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _capelin_predation<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyConsumptionData>()?;
    m.add_class::<PyConsumptionModel>()?;
    m.add_class::<PyOptimOutcome>()?;
    m.add_class::<PyModelReport>()?;
    m.add_class::<PySdReport>()?;
    Ok(())
}

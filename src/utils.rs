//! Conversion helpers for the Python facade.
//!
//! Everything here is compiled only with the `python-bindings` feature. The
//! helpers accept numpy arrays, pandas objects (via `to_numpy`) or plain
//! nested sequences and hand back owned `ndarray` values and validated
//! option structs.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use crate::{
    consumption::{
        core::{
            data::{ConsumptionData, PredatorTables, PreyTables},
            options::{DomainPolicy, ModelOptions, ResidualGrain, SuitabilityPlateau},
        },
        errors::ModelError,
    },
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
};

/// Owned 1-D `f64` array from a numpy array, pandas Series or sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(raw: &Bound<'py, PyAny>, name: &str) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(obj) = raw.call_method1("to_numpy", (false,)) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    let vec: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{name}: expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(vec))
}

/// Owned 2-D `f64` array (rows = years) from a numpy array, pandas DataFrame
/// or sequence of equal-length rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw: &Bound<'py, PyAny>, name: &str) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(obj) = raw.call_method1("to_numpy", (false,)) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "{name}: expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64"
        ))
    })?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err(format!(
            "{name}: row {bad} has {} entries; expected {n_cols}",
            rows[bad].len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat)
        .map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

/// Validated [`ConsumptionData`] from the ten input tables.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn extract_consumption_data<'py>(
    consumption: &Bound<'py, PyAny>, abundance: &Bound<'py, PyAny>,
    maturity: &Bound<'py, PyAny>, subregion_immature: &Bound<'py, PyAny>,
    weight: &Bound<'py, PyAny>, fishing_mortality: &Bound<'py, PyAny>,
    natural_mortality: &Bound<'py, PyAny>, prey_abundance: &Bound<'py, PyAny>,
    prey_weight: &Bound<'py, PyAny>, off_season_mortality: &Bound<'py, PyAny>,
) -> PyResult<ConsumptionData> {
    let predator = PredatorTables {
        consumption: extract_f64_matrix(consumption, "consumption")?,
        abundance: extract_f64_matrix(abundance, "abundance")?,
        maturity: extract_f64_matrix(maturity, "maturity")?,
        subregion_immature: extract_f64_matrix(subregion_immature, "subregion_immature")?,
        weight: extract_f64_matrix(weight, "weight")?,
        fishing_mortality: extract_f64_matrix(fishing_mortality, "fishing_mortality")?,
        natural_mortality: extract_f64_matrix(natural_mortality, "natural_mortality")?,
    };
    let prey = PreyTables {
        abundance: extract_f64_matrix(prey_abundance, "prey_abundance")?,
        weight: extract_f64_matrix(prey_weight, "prey_weight")?,
        off_season_mortality: extract_f64_array(off_season_mortality, "off_season_mortality")?,
    };
    Ok(ConsumptionData::new(predator, prey)?)
}

/// [`ModelOptions`] from optional keyword arguments; `None` keeps the default.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn extract_model_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
    residual_grain: Option<&str>, domain_policy: Option<&str>, plateau: Option<&str>,
) -> PyResult<ModelOptions> {
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
    let residual_grain = parse_or_default::<ResidualGrain>(residual_grain)?;
    let domain_policy = parse_or_default::<DomainPolicy>(domain_policy)?;
    let plateau = parse_or_default::<SuitabilityPlateau>(plateau)?;
    Ok(ModelOptions::new(mle_opts, residual_grain, domain_policy, plateau))
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    let defaults = Tolerances::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter.or(defaults.max_iter))?
    };
    let ls = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::default(),
    };
    Ok(MLEOptions::new(tols, ls, verbose.unwrap_or(false), lbfgs_mem)?)
}

#[cfg(feature = "python-bindings")]
fn parse_or_default<T>(raw: Option<&str>) -> PyResult<T>
where
    T: Default + std::str::FromStr<Err = ModelError>,
{
    match raw {
        Some(s) => Ok(s.parse::<T>()?),
        None => Ok(T::default()),
    }
}

//! Derived-quantity report of one model evaluation.
//!
//! Every stage of the forward model (parameters, suitability, recurrence,
//! likelihood) writes its outputs here so callers can inspect them without
//! re-running anything. The report never feeds back into the model.
//!
//! The *AD report* is the delta-method-eligible subset: the five
//! exponentiated parameters followed by the annual modeled consumption, in
//! that order. It stays in the evaluation's numeric type so that a dual-number
//! run yields its Jacobian with respect to θ.
use crate::consumption::core::{
    params::{ModelParams, N_PARAMS, PARAM_NAMES},
    scalar::ModelFloat,
};
use ndarray::{Array1, Array2};

/// Outputs of one evaluation, generic over the numeric type.
///
/// Period matrices are `[years × N_PERIODS]`; predator mortality is
/// `[years × predator ages]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport<T> {
    pub params: ModelParams<T>,
    pub suitability: Array1<T>,
    pub prey_biomass: Array2<T>,
    pub predation_pressure: Array2<T>,
    pub modeled_consumption: Array2<T>,
    pub empirical_consumption: Array2<f64>,
    pub prey_mortality: Array2<T>,
    pub predator_mortality: Array2<f64>,
    pub modeled_annual: Array1<T>,
    pub empirical_annual: Array1<f64>,
    pub nll: T,
}

impl<T: ModelFloat> ModelReport<T> {
    /// Delta-method-eligible outputs: `[Cmax, Chalf, alpha, beta, sigma,
    /// modeled_annual[0], ..., modeled_annual[n_years − 1]]`.
    pub fn adreport(&self) -> Array1<T> {
        self.params.to_array().into_iter().chain(self.modeled_annual.iter().copied()).collect()
    }

    /// Drop derivative information, keeping real parts only.
    pub fn to_real(&self) -> ModelReport<f64> {
        ModelReport {
            params: ModelParams {
                cmax: self.params.cmax.to_real(),
                chalf: self.params.chalf.to_real(),
                alpha: self.params.alpha.to_real(),
                beta: self.params.beta.to_real(),
                sigma: self.params.sigma.to_real(),
            },
            suitability: self.suitability.mapv(T::to_real),
            prey_biomass: self.prey_biomass.mapv(T::to_real),
            predation_pressure: self.predation_pressure.mapv(T::to_real),
            modeled_consumption: self.modeled_consumption.mapv(T::to_real),
            empirical_consumption: self.empirical_consumption.clone(),
            prey_mortality: self.prey_mortality.mapv(T::to_real),
            predator_mortality: self.predator_mortality.clone(),
            modeled_annual: self.modeled_annual.mapv(T::to_real),
            empirical_annual: self.empirical_annual.clone(),
            nll: self.nll.to_real(),
        }
    }
}

/// Names of the AD report entries for `n_years` years.
pub fn adreport_names(n_years: usize) -> Vec<String> {
    PARAM_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain((0..n_years).map(|year| format!("modeled_annual[{year}]")))
        .collect()
}

/// Length of the AD report for `n_years` years.
pub fn adreport_len(n_years: usize) -> usize {
    N_PARAMS + n_years
}

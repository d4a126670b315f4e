//! Likelihood aggregation and the full forward evaluation.
//!
//! Purpose
//! -------
//! Compare modeled against empirical consumption under a Gaussian
//! observation model and drive the whole forward pass (parameters →
//! suitability → recurrence → NLL) into a [`ModelReport`].
//!
//! Key behaviors
//! -------------
//! - [`annual_nll`]: `−Σ_y ln N(E_y; C_y, sigma)` over annual sums.
//! - [`period_nll`]: the same comparison per (year, period) cell, enabled by
//!   [`ResidualGrain::PerPeriod`].
//! - [`evaluate`]: run every stage and collect all outputs.
//!
//! Conventions
//! -----------
//! - Empirical consumption is the observation, modeled consumption the mean.
//! - Generic over [`ModelFloat`]; the same call on dual numbers yields exact
//!   derivatives of every reported quantity.
use crate::consumption::{
    core::{
        constants::N_PERIODS,
        data::ConsumptionData,
        options::{ModelOptions, ResidualGrain},
        params::LogParams,
        recurrence::{RecurrenceContext, predator_total_mortality},
        report::ModelReport,
        scalar::{ModelFloat, normal_ln_pdf},
        suitability::suitability,
    },
    errors::ModelResult,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Negative log-likelihood of annual empirical sums given annual modeled sums.
pub fn annual_nll<T: ModelFloat>(
    modeled: ArrayView1<T>, empirical: ArrayView1<f64>, sigma: T,
) -> T {
    modeled
        .iter()
        .zip(empirical.iter())
        .fold(T::zero(), |nll, (&mean, &obs)| nll - normal_ln_pdf(T::cst(obs), mean, sigma))
}

/// Negative log-likelihood with one residual per (year, period).
pub fn period_nll<T: ModelFloat>(
    modeled: ArrayView2<T>, empirical: ArrayView2<f64>, sigma: T,
) -> T {
    modeled
        .iter()
        .zip(empirical.iter())
        .fold(T::zero(), |nll, (&mean, &obs)| nll - normal_ln_pdf(T::cst(obs), mean, sigma))
}

/// Run the complete forward model.
///
/// Parameters
/// ----------
/// - `log_params`: θ in the fixed layout, as `f64` or seeded dual numbers.
/// - `data`: validated input tables.
/// - `opts`: residual grain, domain policy and plateau option are read here.
///
/// Returns
/// -------
/// `ModelResult<ModelReport<T>>` with every intermediate series and the NLL.
///
/// Errors
/// ------
/// - `ModelError::PreyDepleted` / `ModelError::SaturationUndefined` under
///   `DomainPolicy::Fail`. Under `DomainPolicy::Propagate` the same
///   conditions yield a non-finite `nll` instead.
pub fn evaluate<T: ModelFloat>(
    log_params: &LogParams<T>, data: &ConsumptionData, opts: &ModelOptions,
) -> ModelResult<ModelReport<T>> {
    let params = log_params.natural();
    let n_years = data.n_years();
    let suit = suitability(data.n_predator_ages(), params.alpha, params.beta, opts.plateau);
    let predator_mortality = predator_total_mortality(data);

    let ctx = RecurrenceContext {
        data,
        params: &params,
        suitability: suit.view(),
        predator_mortality: predator_mortality.view(),
        policy: opts.domain_policy,
    };

    let mut prey_biomass = Array2::from_elem((n_years, N_PERIODS), T::zero());
    let mut predation_pressure = Array2::from_elem((n_years, N_PERIODS), T::zero());
    let mut modeled_consumption = Array2::from_elem((n_years, N_PERIODS), T::zero());
    let mut prey_mortality = Array2::from_elem((n_years, N_PERIODS), T::zero());
    let mut empirical_consumption = Array2::<f64>::zeros((n_years, N_PERIODS));
    let mut modeled_annual = Array1::from_elem(n_years, T::zero());
    let mut empirical_annual = Array1::<f64>::zeros(n_years);

    for year in 0..n_years {
        let trajectory = ctx.run_year(year)?;
        for (period, outcome) in trajectory.periods.iter().enumerate() {
            prey_biomass[[year, period]] = outcome.biomass;
            predation_pressure[[year, period]] = outcome.pressure;
            modeled_consumption[[year, period]] = outcome.consumption;
            prey_mortality[[year, period]] = outcome.prey_mortality;
            empirical_consumption[[year, period]] = outcome.empirical;
        }
        modeled_annual[year] = trajectory.modeled_annual;
        empirical_annual[year] = trajectory.empirical_annual;
    }

    let nll = match opts.residual_grain {
        ResidualGrain::Annual => {
            annual_nll(modeled_annual.view(), empirical_annual.view(), params.sigma)
        }
        ResidualGrain::PerPeriod => period_nll(
            modeled_consumption.view(),
            empirical_consumption.view(),
            params.sigma,
        ),
    };

    Ok(ModelReport {
        params,
        suitability: suit,
        prey_biomass,
        predation_pressure,
        modeled_consumption,
        empirical_consumption,
        prey_mortality,
        predator_mortality,
        modeled_annual,
        empirical_annual,
        nll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use statrs::distribution::{Continuous, Normal};

    #[test]
    // Purpose
    // -------
    // The annual NLL is the negated sum of Gaussian log-densities.
    fn annual_nll_matches_statrs() {
        let modeled = array![10.0, 12.0];
        let empirical = array![11.0, 9.5];
        let normal_a = Normal::new(10.0, 0.8).unwrap();
        let normal_b = Normal::new(12.0, 0.8).unwrap();

        let nll = annual_nll(modeled.view(), empirical.view(), 0.8);

        let expected = -(normal_a.ln_pdf(11.0) + normal_b.ln_pdf(9.5));
        assert!((nll - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With a fixed mismatch larger than sigma, shrinking sigma strictly
    // increases the year's contribution.
    //
    // Given
    // -----
    // - |mismatch| = 3 and sigma decreasing from 2.5 to 0.5.
    //
    // Expect
    // ------
    // - Strictly increasing NLL.
    fn shrinking_sigma_increases_nll_for_large_mismatch() {
        let modeled = array![10.0];
        let empirical = array![13.0];
        let mut previous = f64::NEG_INFINITY;
        for sigma in [2.5, 2.0, 1.5, 1.0, 0.5] {
            let nll = annual_nll(modeled.view(), empirical.view(), sigma);
            assert!(nll > previous);
            previous = nll;
        }
    }

    #[test]
    // Purpose
    // -------
    // Per-period grain sums one term per cell.
    fn period_nll_sums_every_cell() {
        let modeled = array![[1.0, 2.0, 3.0]];
        let empirical = array![[1.0, 2.0, 3.0]];

        let nll = period_nll(modeled.view(), empirical.view(), 1.0);

        let per_cell = 0.5 * (2.0 * std::f64::consts::PI).ln();
        assert!((nll - 3.0 * per_cell).abs() < 1e-12);
    }
}

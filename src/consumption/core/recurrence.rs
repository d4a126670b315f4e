//! Within-year recurrence: prey depletion coupled to predator consumption.
//!
//! Purpose
//! -------
//! Evaluate, for one year, the three sequential sub-year periods in which
//! prey predation mortality depends on the consumption realized in the
//! previous period. Years are independent; nothing here survives across
//! years.
//!
//! Key behaviors
//! -------------
//! For period `t` of year `y` (with `Z = M + F` the predator total mortality):
//!
//! 1. prey mortality `Mmc(t)`: `0` for `t = 0`, else `−ln(1 − C(t−1) / B(t−1))`;
//! 2. prey biomass `B(t) = Σ_a Nmc · exp(−(3/12)·p3 − Mmc(t)) · Wmc`;
//! 3. predation pressure
//!    `P(t) = Σ_A Nco · exp(−(t − 0.5)·Z/12) · suit · (1 − O) · (1 − SV) · W^0.801`;
//! 4. empirical consumption: same sum with `Cco` in place of `suit · W^0.801`;
//! 5. modeled consumption `C(t) = Cmax · P(t) · B(t) / (Chalf + B(t))`.
//!
//! The dependency of period `t` on period `t − 1` is carried explicitly by
//! [`PeriodCarry`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `C(t−1) < B(t−1)` is required for a finite `Mmc(t)`. Violations are
//!   never clamped: with [`DomainPolicy::Fail`] they stop the evaluation
//!   with `ModelError::PreyDepleted`, with [`DomainPolicy::Propagate`] the
//!   non-finite value flows on.
//! - `Chalf + B(t) = 0` or a non-finite `C(t)` is reported as
//!   `ModelError::SaturationUndefined` under the same policy.
//! - Data-only quantities (empirical consumption, predator exposure) stay
//!   `f64`; everything touched by a parameter is generic.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a hand-computed scenario, the period-0 zero mortality,
//!   the annual-sum identity, monotonicity in `Chalf` and both domain
//!   policies.
use crate::consumption::{
    core::{
        constants::{
            ALLOMETRIC_EXPONENT, MONTHS_PER_YEAR, N_PERIODS, OFF_SEASON_MONTHS, PERIOD_MIDPOINT,
        },
        data::ConsumptionData,
        options::DomainPolicy,
        params::ModelParams,
        scalar::ModelFloat,
    },
    errors::{ModelError, ModelResult},
};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// State handed from period `t − 1` to period `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodCarry<T> {
    /// Modeled consumption `C(t−1)`.
    pub consumption: T,
    /// Prey biomass `B(t−1)`.
    pub biomass: T,
}

/// Everything computed for one (year, period) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodOutcome<T> {
    pub prey_mortality: T,
    pub biomass: T,
    pub pressure: T,
    pub consumption: T,
    pub empirical: f64,
}

/// The three periods of one year plus their annual sums.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTrajectory<T> {
    pub periods: Vec<PeriodOutcome<T>>,
    pub modeled_annual: T,
    pub empirical_annual: f64,
}

/// Predator total mortality `Z = M + F`, `[years × predator ages]`.
pub fn predator_total_mortality(data: &ConsumptionData) -> Array2<f64> {
    &data.predator.natural_mortality + &data.predator.fishing_mortality
}

/// Fraction of the year-start predator numbers exposed in period `t`.
pub fn predator_exposure(period: usize, total_mortality: f64) -> f64 {
    (-(period as f64 - PERIOD_MIDPOINT) * total_mortality / MONTHS_PER_YEAR).exp()
}

/// Prey predation mortality for period `period` given the previous carry.
///
/// Errors
/// ------
/// - `ModelError::PreyDepleted` when the value is non-finite and `policy`
///   is [`DomainPolicy::Fail`].
pub fn prey_predation_mortality<T: ModelFloat>(
    carry: Option<&PeriodCarry<T>>, year: usize, period: usize, policy: DomainPolicy,
) -> ModelResult<T> {
    let Some(prev) = carry else {
        return Ok(T::zero());
    };
    let mortality = -(T::one() - prev.consumption / prev.biomass).ln();
    if !mortality.is_finite() && policy == DomainPolicy::Fail {
        return Err(ModelError::PreyDepleted {
            year,
            period,
            consumption: prev.consumption.to_real(),
            biomass: prev.biomass.to_real(),
            mortality: mortality.to_real(),
        });
    }
    Ok(mortality)
}

/// Prey biomass available in a period after off-season and predation
/// mortality.
pub fn prey_biomass<T: ModelFloat>(
    abundance: ArrayView1<f64>, weight: ArrayView1<f64>, off_season_rate: f64, mortality: T,
) -> T {
    let off_season = T::cst(OFF_SEASON_MONTHS / MONTHS_PER_YEAR * off_season_rate);
    abundance.iter().zip(weight.iter()).fold(T::zero(), |acc, (&n, &w)| {
        acc + T::cst(n) * (-off_season - mortality).exp() * T::cst(w)
    })
}

/// Saturating (Holling type II) consumption `Cmax · P · B / (Chalf + B)`.
///
/// Errors
/// ------
/// - `ModelError::SaturationUndefined` when `Chalf + B = 0` or the result is
///   non-finite and `policy` is [`DomainPolicy::Fail`].
pub fn saturating_consumption<T: ModelFloat>(
    cmax: T, chalf: T, pressure: T, biomass: T, year: usize, period: usize, policy: DomainPolicy,
) -> ModelResult<T> {
    let denominator = chalf + biomass;
    let value = cmax * pressure * biomass / denominator;
    if (denominator == T::zero() || !value.is_finite()) && policy == DomainPolicy::Fail {
        return Err(ModelError::SaturationUndefined {
            year,
            period,
            denominator: denominator.to_real(),
            value: value.to_real(),
        });
    }
    Ok(value)
}

/// Inputs shared by every year of one evaluation.
#[derive(Debug, Clone)]
pub struct RecurrenceContext<'a, T> {
    pub data: &'a ConsumptionData,
    pub params: &'a ModelParams<T>,
    pub suitability: ArrayView1<'a, T>,
    pub predator_mortality: ArrayView2<'a, f64>,
    pub policy: DomainPolicy,
}

impl<'a, T: ModelFloat> RecurrenceContext<'a, T> {
    /// Predation pressure and empirical consumption of `year`, `period`.
    ///
    /// Both sums share the exposed, immature, in-region predator numbers; the
    /// pressure weights them by `suit · W^0.801`, the empirical series by the
    /// observed per-capita consumption.
    pub fn predator_sums(&self, year: usize, period: usize) -> (T, f64) {
        let cod = &self.data.predator;
        let mut pressure = T::zero();
        let mut empirical = 0.0;
        for age in 0..self.data.n_predator_ages() {
            let present = cod.abundance[[year, age]]
                * predator_exposure(period, self.predator_mortality[[year, age]])
                * (1.0 - cod.maturity[[year, age]])
                * (1.0 - cod.subregion_immature[[year, age]]);
            let allometric = cod.weight[[year, age]].powf(ALLOMETRIC_EXPONENT);
            pressure = pressure + T::cst(present * allometric) * self.suitability[age];
            empirical += present * cod.consumption[[year, age]];
        }
        (pressure, empirical)
    }

    /// Run the three periods of `year`.
    ///
    /// Errors
    /// ------
    /// - Domain violations per [`prey_predation_mortality`] and
    ///   [`saturating_consumption`].
    pub fn run_year(&self, year: usize) -> ModelResult<YearTrajectory<T>> {
        let prey = &self.data.prey;
        let abundance = prey.abundance.row(year);
        let weight = prey.weight.row(year);
        let off_season_rate = prey.off_season_mortality[year];

        let mut periods = Vec::with_capacity(N_PERIODS);
        let mut carry: Option<PeriodCarry<T>> = None;
        let mut modeled_annual = T::zero();
        let mut empirical_annual = 0.0;

        for period in 0..N_PERIODS {
            let prey_mortality =
                prey_predation_mortality(carry.as_ref(), year, period, self.policy)?;
            let biomass = prey_biomass(abundance, weight, off_season_rate, prey_mortality);
            let (pressure, empirical) = self.predator_sums(year, period);
            let consumption = saturating_consumption(
                self.params.cmax,
                self.params.chalf,
                pressure,
                biomass,
                year,
                period,
                self.policy,
            )?;

            modeled_annual = modeled_annual + consumption;
            empirical_annual += empirical;
            periods.push(PeriodOutcome { prey_mortality, biomass, pressure, consumption, empirical });
            carry = Some(PeriodCarry { consumption, biomass });
        }

        Ok(YearTrajectory { periods, modeled_annual, empirical_annual })
    }
}

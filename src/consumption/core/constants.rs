//! Structural constants of the consumption model.
//!
//! These values define the model itself (time discretization, allometry and
//! the age rescaling of the suitability curve); they are not user
//! configuration and every fitted parameter set depends on them.

/// Number of sub-year periods evaluated per year.
pub const N_PERIODS: usize = 3;

/// Allometric exponent applied to predator mean weight in the predation
/// pressure term (`W^0.801`).
pub const ALLOMETRIC_EXPONENT: f64 = 0.801;

/// Months per year; period exposures are expressed in twelfths of a year.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Length in months of the off-season window over which the per-year prey
/// natural-mortality rate acts before predation starts.
pub const OFF_SEASON_MONTHS: f64 = 3.0;

/// Offset subtracted from the 1-based predator age before rescaling.
pub const AGE_OFFSET: f64 = 2.0;

/// Divisor mapping `A - AGE_OFFSET` onto the beta-density coordinate.
pub const AGE_SPAN: f64 = 8.5;

/// First predator age index (0-based) with non-zero suitability.
pub const FIRST_SELECTED_AGE: usize = 2;

/// Predator age index (0-based) from which suitability is held constant.
pub const PLATEAU_AGE: usize = 10;

/// Offset, in periods, of the predator exposure midpoint (`t - 0.5`).
pub const PERIOD_MIDPOINT: f64 = 0.5;

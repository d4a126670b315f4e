//! consumption — bio-energetic model of cod consuming maturing capelin.
//!
//! Purpose
//! -------
//! Estimate the five parameters of a predation model (maximum consumption
//! rate, half-saturation biomass, two suitability shapes, observation noise)
//! from yearly-by-age tables of predator and prey data. The negative
//! log-likelihood is differentiable end to end, so the optimizer receives
//! exact gradients and the delta method receives exact Jacobians.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the forward model: validated data, the θ layout, the
//!   suitability curve, the three-period within-year recurrence, the
//!   Gaussian likelihood and the derived-quantity report.
//! - [`models`] exposes [`ConsumptionModel`] for evaluation and fitting.
//! - [`errors`] defines [`ModelError`] for input, parameter and numerical
//!   domain failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - All natural-scale parameters are `exp(θ_i)` and therefore positive.
//! - Prey depletion (`C(t−1) ≥ B(t−1)`) and an undefined saturation term are
//!   never clamped. They are errors by default; see
//!   [`core::options::DomainPolicy`].
//!
//! Downstream usage
//! ----------------
//! - Build [`ConsumptionData`] from the tables, pick [`ModelOptions`], create
//!   a [`ConsumptionModel`], call `fit` with a starting θ (for example from
//!   [`LogParams::from_natural`]) and pass the fitted model to
//!   `inference::sdreport` for uncertainties.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each stage; the integration tests under `tests/`
//!   run data → evaluate → gradient check → fit → sdreport.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    ConsumptionData, DomainPolicy, LogParams, ModelOptions, ModelParams, ModelReport,
    PredatorTables, PreyTables, ResidualGrain, SuitabilityPlateau,
};
pub use self::errors::{ModelError, ModelResult};
pub use self::models::{ConsumptionModel, ModelDerivatives};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use capelin_predation::consumption::prelude::*;
//
// to import the main consumption-model surface in a single line.

pub mod prelude {
    pub use super::{
        ConsumptionData, ConsumptionModel, DomainPolicy, LogParams, ModelDerivatives, ModelError,
        ModelOptions, ModelParams, ModelReport, ModelResult, PredatorTables, PreyTables,
        ResidualGrain, SuitabilityPlateau,
    };
}

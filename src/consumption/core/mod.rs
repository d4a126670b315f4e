//! core — forward model of cod consumption of maturing capelin.
//!
//! Purpose
//! -------
//! Hold the building blocks of one model evaluation: validated input tables,
//! the log-space parameterization, the differentiable scalar layer, the
//! suitability curve, the within-year recurrence, likelihood aggregation and
//! the derived-quantity report.
//!
//! Key behaviors
//! -------------
//! - [`data`] validates table dimensions once, at construction.
//! - [`params`] fixes the θ layout `(log Cmax, log Chalf, log alpha,
//!   log beta, log sigma)`.
//! - [`scalar`] defines [`ModelFloat`]; every equation downstream is generic
//!   over it.
//! - [`suitability`], [`recurrence`] and [`likelihood`] implement the model
//!   stages; [`likelihood::evaluate`] chains them into a [`ModelReport`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation is pure: each call allocates its own outputs and touches no
//!   shared state.
//! - Periods within a year are strictly sequential; years are independent.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own stage. End-to-end
//!   behavior (gradients, fitting) is tested in `models` and in the
//!   integration tests.

pub mod constants;
pub mod data;
pub mod likelihood;
pub mod options;
pub mod params;
pub mod recurrence;
pub mod report;
pub mod scalar;
pub mod suitability;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{ConsumptionData, PredatorTables, PreyTables};
pub use self::likelihood::{annual_nll, evaluate, period_nll};
pub use self::options::{DomainPolicy, ModelOptions, ResidualGrain, SuitabilityPlateau};
pub use self::params::{LogParams, ModelParams, N_PARAMS, PARAM_NAMES, validate_theta};
pub use self::recurrence::{PeriodCarry, PeriodOutcome, RecurrenceContext, YearTrajectory};
pub use self::report::{ModelReport, adreport_names};
pub use self::scalar::ModelFloat;
pub use self::suitability::suitability;

pub mod prelude {
    pub use super::data::{ConsumptionData, PredatorTables, PreyTables};
    pub use super::options::{DomainPolicy, ModelOptions, ResidualGrain, SuitabilityPlateau};
    pub use super::params::{LogParams, ModelParams};
    pub use super::report::ModelReport;
}

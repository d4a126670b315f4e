//! Errors for the cod–capelin consumption model (input shapes, parameter
//! vectors, and numerical domain violations inside the within-year recurrence).
//!
//! This module defines the model error type, [`ModelError`], used across the
//! Rust core and the optional Python facade. It implements `Display`/`Error`
//! and converts to `PyErr` when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based**: `year` is a row of the input tables, `period` is
//!   one of the `N_PERIODS` sub-year periods.
//! - Domain violations carry the offending values as `f64` (the real part when
//!   the model ran on dual numbers) so that callers can tell a bad parameter
//!   vector apart from a successful evaluation with an extreme value.
//! - Nothing in the core clamps; a reported value is the value that was
//!   actually produced.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for consumption-model operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for the consumption model.
///
/// Covers table-shape validation, optimizer-vector checks, recurrence domain
/// failures, and fit-state errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Input tables ----
    /// A table has zero years or zero ages.
    EmptyTable { table: &'static str },

    /// A table disagrees with the reference table of its species.
    TableShapeMismatch { table: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// A per-year vector or prey table disagrees with the predator year count.
    YearCountMismatch { table: &'static str, expected: usize, found: usize },

    // ---- Parameters ----
    /// θ must hold exactly one entry per free parameter.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Natural-scale starting values must be finite and strictly positive.
    NonPositiveParameter { name: &'static str, value: f64 },

    // ---- Recurrence domain ----
    /// Previous-period consumption reached or exceeded the prey biomass, so the
    /// predation mortality `-ln(1 - C/B)` is non-finite.
    PreyDepleted { year: usize, period: usize, consumption: f64, biomass: f64, mortality: f64 },

    /// The saturating consumption term is undefined (`Chalf + B = 0`) or
    /// produced a non-finite value.
    SaturationUndefined { year: usize, period: usize, denominator: f64, value: f64 },

    // ---- Configuration ----
    /// An option name could not be parsed.
    InvalidOption { option: &'static str, value: String, reason: &'static str },

    // ---- Estimation ----
    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input tables ----
            ModelError::EmptyTable { table } => {
                write!(f, "Table '{table}' is empty.")
            }
            ModelError::TableShapeMismatch { table, expected, found } => {
                write!(f, "Table '{table}' has shape {found:?}; expected {expected:?}.")
            }
            ModelError::YearCountMismatch { table, expected, found } => {
                write!(f, "Table '{table}' covers {found} years; expected {expected}.")
            }
            // ---- Parameters ----
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ModelError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            ModelError::NonPositiveParameter { name, value } => {
                write!(f, "Parameter '{name}' must be finite and > 0, got {value}")
            }
            // ---- Recurrence domain ----
            ModelError::PreyDepleted { year, period, consumption, biomass, mortality } => {
                write!(
                    f,
                    "Prey depleted in year {year} before period {period}: consumption {consumption} \
                     >= biomass {biomass}; predation mortality is {mortality}"
                )
            }
            ModelError::SaturationUndefined { year, period, denominator, value } => {
                write!(
                    f,
                    "Saturating consumption undefined in year {year}, period {period}: \
                     Chalf + biomass = {denominator}, consumption = {value}"
                )
            }
            // ---- Configuration ----
            ModelError::InvalidOption { option, value, reason } => {
                write!(f, "Invalid {option} '{value}': {reason}")
            }
            // ---- Estimation ----
            ModelError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
        }
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

//! Error type for post-fit uncertainty quantification.
//!
//! [`InferenceError`] wraps the failures an sdreport can run into: the
//! model refusing θ̂, the finite-difference Hessian failing validation, or a
//! Jacobian whose shape does not match the covariance it is applied to.
//! [`InferenceResult<T>`] is the matching alias.
use crate::{consumption::errors::ModelError, optimization::errors::OptError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Upstream layers ----
    /// Model evaluation at θ̂ failed.
    Model(ModelError),

    /// Hessian construction or validation failed.
    Optimization(OptError),

    // ---- Delta method ----
    /// The AD-report Jacobian does not have one column per parameter.
    JacobianShapeMismatch {
        expected_cols: usize,
        found: (usize, usize),
    },

    /// The propagated covariance contains a non-finite entry.
    NonFiniteCovariance {
        row: usize,
        col: usize,
        value: f64,
    },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::Model(err) => write!(f, "Inference Error: {err}"),
            InferenceError::Optimization(err) => write!(f, "Inference Error: {err}"),
            InferenceError::JacobianShapeMismatch { expected_cols, found } => write!(
                f,
                "Inference Error: Jacobian has shape {:?}, expected {} columns",
                found, expected_cols
            ),
            InferenceError::NonFiniteCovariance { row, col, value } => write!(
                f,
                "Inference Error: Non-finite covariance entry at ({row}, {col}): {value}"
            ),
        }
    }
}

impl From<ModelError> for InferenceError {
    fn from(err: ModelError) -> Self {
        InferenceError::Model(err)
    }
}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Optimization(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

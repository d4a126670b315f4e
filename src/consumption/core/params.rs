//! Parameterization of the consumption model.
//!
//! The five free parameters are held in log space so that every
//! natural-scale value is positive by construction:
//!
//! | slot | θ entry      | natural value                      |
//! |------|--------------|------------------------------------|
//! | 0    | `log Cmax`   | maximum consumption rate           |
//! | 1    | `log Chalf`  | half-saturation prey biomass       |
//! | 2    | `log alpha`  | first suitability shape            |
//! | 3    | `log beta`   | second suitability shape           |
//! | 4    | `log sigma`  | observation noise (standard dev.)  |
//!
//! [`LogParams`] is generic over the numeric type so the same container
//! carries plain `f64` values or dual numbers seeded for differentiation.
//! [`ModelParams`] is its exponentiated image.
use crate::consumption::{
    core::scalar::ModelFloat,
    errors::{ModelError, ModelResult},
};
use ndarray::{Array1, ArrayView1};

/// Number of free parameters (length of θ).
pub const N_PARAMS: usize = 5;

/// θ slot of `log Cmax`.
pub const IDX_LOG_CMAX: usize = 0;
/// θ slot of `log Chalf`.
pub const IDX_LOG_CHALF: usize = 1;
/// θ slot of `log alpha`.
pub const IDX_LOG_ALPHA: usize = 2;
/// θ slot of `log beta`.
pub const IDX_LOG_BETA: usize = 3;
/// θ slot of `log sigma`.
pub const IDX_LOG_SIGMA: usize = 4;

/// Natural-scale parameter names, in θ order.
pub const PARAM_NAMES: [&str; N_PARAMS] = ["Cmax", "Chalf", "alpha", "beta", "sigma"];

/// Log-space parameters in the fixed θ layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogParams<T> {
    pub log_cmax: T,
    pub log_chalf: T,
    pub log_alpha: T,
    pub log_beta: T,
    pub log_sigma: T,
}

/// Exponentiated parameters; every field is strictly positive for finite θ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams<T> {
    pub cmax: T,
    pub chalf: T,
    pub alpha: T,
    pub beta: T,
    pub sigma: T,
}

impl<T: ModelFloat> LogParams<T> {
    /// Build from values already in θ order. Infallible; used after seeding
    /// dual numbers from a validated θ.
    pub fn from_array(values: [T; N_PARAMS]) -> Self {
        LogParams {
            log_cmax: values[IDX_LOG_CMAX],
            log_chalf: values[IDX_LOG_CHALF],
            log_alpha: values[IDX_LOG_ALPHA],
            log_beta: values[IDX_LOG_BETA],
            log_sigma: values[IDX_LOG_SIGMA],
        }
    }

    /// Values in θ order.
    pub fn to_array(&self) -> [T; N_PARAMS] {
        [self.log_cmax, self.log_chalf, self.log_alpha, self.log_beta, self.log_sigma]
    }

    /// Exponentiate every slot.
    pub fn natural(&self) -> ModelParams<T> {
        ModelParams {
            cmax: self.log_cmax.exp(),
            chalf: self.log_chalf.exp(),
            alpha: self.log_alpha.exp(),
            beta: self.log_beta.exp(),
            sigma: self.log_sigma.exp(),
        }
    }
}

impl LogParams<f64> {
    /// Read a validated θ.
    ///
    /// Errors
    /// ------
    /// - `ModelError::ThetaLengthMismatch` when `theta.len() != N_PARAMS`.
    /// - `ModelError::InvalidThetaInput` for the first non-finite entry.
    pub fn from_theta(theta: ArrayView1<f64>) -> ModelResult<Self> {
        validate_theta(theta)?;
        Ok(LogParams::from_array([
            theta[IDX_LOG_CMAX],
            theta[IDX_LOG_CHALF],
            theta[IDX_LOG_ALPHA],
            theta[IDX_LOG_BETA],
            theta[IDX_LOG_SIGMA],
        ]))
    }

    /// θ vector in the fixed layout.
    pub fn to_theta(&self) -> Array1<f64> {
        Array1::from(self.to_array().to_vec())
    }

    /// Build a starting point from natural-scale guesses.
    ///
    /// Errors
    /// ------
    /// - `ModelError::NonPositiveParameter` naming the first value that is
    ///   not finite and strictly positive.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use capelin_predation::consumption::core::params::LogParams;
    /// let start = LogParams::from_natural(1.0, 50.0, 2.0, 3.0, 0.5).unwrap();
    /// assert!((start.natural().chalf - 50.0).abs() < 1e-12);
    /// ```
    pub fn from_natural(
        cmax: f64, chalf: f64, alpha: f64, beta: f64, sigma: f64,
    ) -> ModelResult<Self> {
        let values = [cmax, chalf, alpha, beta, sigma];
        for (name, &value) in PARAM_NAMES.iter().zip(values.iter()) {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::NonPositiveParameter { name, value });
            }
        }
        Ok(LogParams::from_array(values.map(f64::ln)))
    }
}

impl<T: Copy> ModelParams<T> {
    /// Values in θ order (`Cmax, Chalf, alpha, beta, sigma`).
    pub fn to_array(&self) -> [T; N_PARAMS] {
        [self.cmax, self.chalf, self.alpha, self.beta, self.sigma]
    }
}

/// Check θ length and finiteness.
///
/// Errors
/// ------
/// - `ModelError::ThetaLengthMismatch`
/// - `ModelError::InvalidThetaInput`
pub fn validate_theta(theta: ArrayView1<f64>) -> ModelResult<()> {
    if theta.len() != N_PARAMS {
        return Err(ModelError::ThetaLengthMismatch { expected: N_PARAMS, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(ModelError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

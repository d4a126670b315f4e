//! inference — uncertainty of a fitted consumption model.
//!
//! Purpose
//! -------
//! After `ConsumptionModel::fit`, report standard errors for the natural
//! parameters and the annual modeled consumption, the way an AD report is
//! summarized after a maximum-likelihood fit.
//!
//! Key behaviors
//! -------------
//! - [`hessian::calc_covariance`]: observed information from the exact NLL
//!   gradient, inverted through an eigen-truncated pseudo-inverse with a
//!   positive-definiteness flag.
//! - [`sdreport::sdreport`]: delta method over the AD-report Jacobian,
//!   collected into an [`SdReport`].
//! - [`InferenceError`] / [`InferenceResult`] wrap model and optimizer
//!   failures encountered on the way.
//!
//! Conventions
//! -----------
//! - θ-space results are on the log scale; report-space results are on the
//!   natural scale of each quantity.
//! - Nothing here mutates the model; an sdreport can be requested at any θ.

pub mod errors;
pub mod hessian;
pub mod sdreport;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{ThetaCovariance, calc_covariance};
pub use self::sdreport::{SdReport, sdreport};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::sdreport::{SdReport, sdreport};
}

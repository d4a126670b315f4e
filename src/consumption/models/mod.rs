//! models — consumption model wired to the optimizer and to forward-mode AD.
//!
//! Purpose
//! -------
//! Expose [`ConsumptionModel`], the estimation handle that evaluates the NLL,
//! its exact gradient and the AD-report Jacobian, and fits θ by maximizing
//! `ℓ(θ) = −NLL(θ)` with the crate's L-BFGS driver.
//!
//! Key behaviors
//! -------------
//! - [`consumption`] implements `LogLikelihood` for [`ConsumptionModel`] and
//!   stores the optimizer outcome and the report at `θ̂` after a fit.
//! - [`derivatives`] seeds `hyperdual` numbers from θ and reads gradients and
//!   Jacobians back out.
//!
//! Testing notes
//! -------------
//! - Unit tests compare dual-number derivatives against central finite
//!   differences and check both domain policies end to end.

pub mod consumption;
pub mod derivatives;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::consumption::{ConsumptionModel, ModelDerivatives};
pub use self::derivatives::{Dual, N_DUAL};

pub mod prelude {
    pub use super::consumption::{ConsumptionModel, ModelDerivatives};
}

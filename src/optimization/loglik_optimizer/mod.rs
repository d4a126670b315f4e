//! loglik_optimizer — maximize a log-likelihood with argmin's L-BFGS.
//!
//! Purpose
//! -------
//! Fit any model that implements [`LogLikelihood`] by calling [`maximize`].
//! The consumption model is the main client; it returns `ℓ(θ) = −NLL(θ)`
//! and an exact dual-number gradient.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] presents `c(θ) = −ℓ(θ)` to argmin and falls
//!   back to finite differences when a model has no gradient.
//! - [`builders`] configures L-BFGS with More–Thuente or Hager–Zhang line
//!   search; [`run::run_lbfgs`] executes it and returns an [`OptimOutcome`].
//! - [`finite_diff::compute_hessian`] differentiates a gradient map, which
//!   the sdreport uses for the observed information.
//!
//! Conventions
//! -----------
//! - Users supply `ℓ` and `∇ℓ`, never the cost; every reported value is on
//!   the log-likelihood scale.
//! - Options ([`Tolerances`], [`MLEOptions`]) are validated when built.
//! - Failures are [`OptError`](crate::optimization::errors::OptError);
//!   model errors raised during a run keep their variant.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::finite_diff::compute_hessian;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Grad, Theta};
}

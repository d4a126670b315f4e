//! optimization — maximum-likelihood fitting and its shared numerics.
//!
//! - [`loglik_optimizer`]: the [`LogLikelihood`](loglik_optimizer::LogLikelihood)
//!   trait, optimizer options and the L-BFGS driver `maximize`.
//! - [`numerical_stability`]: eigenvalue cutoff and the delta method used by
//!   the sdreport.
//! - [`errors`]: [`OptError`](errors::OptError) and `OptResult<T>`, into
//!   which argmin and consumption-model failures are both converted.
//!
//! Every public entry point returns `OptResult<T>`; raw argmin errors do not
//! escape this module.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}

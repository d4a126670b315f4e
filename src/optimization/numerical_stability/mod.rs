//! numerical_stability — covariance propagation helpers.
//!
//! The sdreport turns the pseudo-inverse of the observed information into
//! standard errors of derived quantities with [`delta_method`]; the cutoff
//! for that pseudo-inverse is [`EIGEN_EPS`]. Parameters need no
//! constraining transforms here because the consumption model works in
//! log space throughout.

pub mod transformations;

pub use self::transformations::{EIGEN_EPS, delta_method, std_errors};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, delta_method, std_errors};
}

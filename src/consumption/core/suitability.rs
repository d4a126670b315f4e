//! Age-dependent predator suitability curve.
//!
//! Purpose
//! -------
//! Map the two positive shape parameters `(alpha, beta)` to a selectivity
//! value per predator age. The curve is a beta density over a rescaled age
//! coordinate, zero for the two youngest ages and flat from age index 10 on.
//!
//! Key behaviors
//! -------------
//! - Index 0 and 1 → 0.
//! - Index 2..=9 → `Beta(alpha, beta)` density at `x = (A − 2) / 8.5` with
//!   the 1-based age `A = index + 1`.
//! - Index ≥ 10 → one plateau value chosen by [`SuitabilityPlateau`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `alpha`, `beta` are positive (exponentiated log-parameters).
//! - Output length equals the predator age count; shorter age ranges simply
//!   never reach the plateau.
use crate::consumption::core::{
    constants::{AGE_OFFSET, AGE_SPAN, FIRST_SELECTED_AGE, PLATEAU_AGE},
    options::SuitabilityPlateau,
    scalar::{ModelFloat, beta_pdf},
};
use ndarray::Array1;

/// Beta-density coordinate of a 0-based predator age index.
pub fn age_coordinate(index: usize) -> f64 {
    ((index + 1) as f64 - AGE_OFFSET) / AGE_SPAN
}

/// Build the suitability vector for `n_ages` predator ages.
///
/// Parameters
/// ----------
/// - `n_ages`: predator age count (columns of the predator tables).
/// - `alpha`, `beta`: natural-scale shape parameters.
/// - `plateau`: value held from index 10 onward.
///
/// Returns
/// -------
/// `Array1<T>` of length `n_ages`. Never fails.
pub fn suitability<T: ModelFloat>(
    n_ages: usize, alpha: T, beta: T, plateau: SuitabilityPlateau,
) -> Array1<T> {
    let anchor_index = match plateau {
        SuitabilityPlateau::OutOfSupport => PLATEAU_AGE,
        SuitabilityPlateau::LastSelected => PLATEAU_AGE - 1,
    };
    let anchor = beta_pdf(age_coordinate(anchor_index), alpha, beta);

    Array1::from_shape_fn(n_ages, |index| {
        if index < FIRST_SELECTED_AGE {
            T::zero()
        } else if index < PLATEAU_AGE {
            beta_pdf(age_coordinate(index), alpha, beta)
        } else {
            anchor
        }
    })
}

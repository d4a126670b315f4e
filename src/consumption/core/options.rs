//! Model options — switches of the consumption model plus optimizer settings.
//!
//! Purpose
//! -------
//! Collect every configuration knob of a fit in one value so call sites pass
//! an explicit [`ModelOptions`] instead of loose flags.
//!
//! Key behaviors
//! -------------
//! - [`ResidualGrain`] selects where modeled and empirical consumption are
//!   compared (annual sums by default, or every period).
//! - [`DomainPolicy`] selects how a numerical domain violation inside the
//!   recurrence is surfaced (explicit error by default, or raw IEEE
//!   propagation into a non-finite NLL).
//! - [`SuitabilityPlateau`] selects the value held for predator ages ≥ 11.
//!
//! Invariants & assumptions
//! ------------------------
//! - `MLEOptions` is validated by its own constructor; this module adds no
//!   cross-field checks.
//! - Defaults reproduce the reference model: annual grain, failing on domain
//!   violations, out-of-support plateau.
//!
//! Testing notes
//! -------------
//! - Unit tests check the documented defaults and string parsing.
use crate::{
    consumption::errors::ModelError,
    optimization::loglik_optimizer::MLEOptions,
};
use std::str::FromStr;

/// Where the Gaussian observation model compares modeled and empirical
/// consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualGrain {
    /// One residual per year: annual modeled sum vs annual empirical sum.
    #[default]
    Annual,
    /// One residual per (year, period).
    PerPeriod,
}

/// How the recurrence reacts to prey depletion (`C(t−1) ≥ B(t−1)`) or an
/// undefined saturation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainPolicy {
    /// Stop with `ModelError::PreyDepleted` / `ModelError::SaturationUndefined`.
    #[default]
    Fail,
    /// Let the non-finite value flow into the NLL.
    Propagate,
}

/// Value held by the suitability curve from predator age index 10 onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuitabilityPlateau {
    /// Evaluate index 10 like the interior ages, at `x = 9 / 8.5`. That point
    /// lies outside the beta support, so the plateau is zero.
    #[default]
    OutOfSupport,
    /// Carry the index-9 value forward.
    LastSelected,
}

/// Estimation-time configuration for the consumption model.
///
/// Fields
/// ------
/// - `mle_opts`: [`MLEOptions`] (tolerances, line search, L-BFGS memory).
/// - `residual_grain`: [`ResidualGrain`]
/// - `domain_policy`: [`DomainPolicy`]
/// - `plateau`: [`SuitabilityPlateau`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelOptions {
    pub mle_opts: MLEOptions,
    pub residual_grain: ResidualGrain,
    pub domain_policy: DomainPolicy,
    pub plateau: SuitabilityPlateau,
}

impl ModelOptions {
    /// Bundle already-validated components. Never fails.
    pub fn new(
        mle_opts: MLEOptions, residual_grain: ResidualGrain, domain_policy: DomainPolicy,
        plateau: SuitabilityPlateau,
    ) -> ModelOptions {
        ModelOptions { mle_opts, residual_grain, domain_policy, plateau }
    }
}

impl FromStr for ResidualGrain {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annual" => Ok(ResidualGrain::Annual),
            "perperiod" | "per_period" => Ok(ResidualGrain::PerPeriod),
            _ => Err(ModelError::InvalidOption {
                option: "residual_grain",
                value: s.to_string(),
                reason: "Valid options are case insensitive 'Annual' or 'PerPeriod'.",
            }),
        }
    }
}

impl FromStr for DomainPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(DomainPolicy::Fail),
            "propagate" => Ok(DomainPolicy::Propagate),
            _ => Err(ModelError::InvalidOption {
                option: "domain_policy",
                value: s.to_string(),
                reason: "Valid options are case insensitive 'Fail' or 'Propagate'.",
            }),
        }
    }
}

impl FromStr for SuitabilityPlateau {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outofsupport" | "out_of_support" => Ok(SuitabilityPlateau::OutOfSupport),
            "lastselected" | "last_selected" => Ok(SuitabilityPlateau::LastSelected),
            _ => Err(ModelError::InvalidOption {
                option: "plateau",
                value: s.to_string(),
                reason: "Valid options are case insensitive 'OutOfSupport' or 'LastSelected'.",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Defaults select the reference behavior.
    //
    // Expect
    // ------
    // - Annual grain, Fail policy, OutOfSupport plateau, default optimizer.
    fn defaults_reproduce_reference_model() {
        let opts = ModelOptions::default();

        assert_eq!(opts.residual_grain, ResidualGrain::Annual);
        assert_eq!(opts.domain_policy, DomainPolicy::Fail);
        assert_eq!(opts.plateau, SuitabilityPlateau::OutOfSupport);
        assert_eq!(opts.mle_opts, MLEOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // String parsing is case-insensitive and rejects unknown names.
    fn options_parse_case_insensitively() {
        assert_eq!("PERPERIOD".parse::<ResidualGrain>().unwrap(), ResidualGrain::PerPeriod);
        assert_eq!("propagate".parse::<DomainPolicy>().unwrap(), DomainPolicy::Propagate);
        assert_eq!(
            "LastSelected".parse::<SuitabilityPlateau>().unwrap(),
            SuitabilityPlateau::LastSelected
        );

        let err = "weekly".parse::<ResidualGrain>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidOption { option: "residual_grain", .. }));
    }
}

//! Differentiable scalar layer: the numeric abstraction every model equation
//! is written against, plus the special functions the model needs.
//!
//! Purpose
//! -------
//! Keep the suitability curve, the within-year recurrence and the likelihood
//! generic over a single float trait, [`ModelFloat`], so the same code runs on
//! plain `f64` (values only) and on forward-mode dual numbers from `hyperdual`
//! (values plus exact first derivatives with respect to all free parameters).
//!
//! Key behaviors
//! -------------
//! - [`ModelFloat`] refines `num_traits::Float` with a constant-lifting helper
//!   ([`ModelFloat::cst`]) and a real-part accessor ([`ModelFloat::to_real`]).
//! - [`ln_gamma`] evaluates `ln Γ(x)` with the Lanczos approximation used by
//!   `statrs`, written against `ModelFloat` so it is differentiable.
//! - [`beta_pdf`] and [`normal_ln_pdf`] build on it for the suitability curve
//!   and the Gaussian observation model.
//!
//! Conventions
//! -----------
//! - Data-only quantities stay `f64` and are lifted with [`ModelFloat::cst`]
//!   where they meet parameter-dependent terms.
//! - No clamping happens here: a non-finite input yields a non-finite output.
use num_traits::{Float, NumCast};
use std::f64::consts::{E, PI};

/// `ln(2 * sqrt(e / pi))`, the Lanczos normalization constant.
const LN_2_SQRT_E_OVER_PI: f64 = 0.620_782_237_635_245_2;

/// `ln(pi)`.
const LN_PI: f64 = 1.144_729_885_849_400_2;

/// `ln(sqrt(2 * pi))`.
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Lanczos `g` parameter matching [`GAMMA_DK`].
const GAMMA_R: f64 = 10.900511;

/// Lanczos series coefficients (`g = 10.900511`, 11 terms).
const GAMMA_DK: [f64; 11] = [
    2.485_740_891_387_535_655_46e-5,
    1.051_423_785_817_219_742_10,
    -3.456_870_972_220_162_354_69,
    4.512_277_094_668_948_237_00,
    -2.982_852_253_235_766_557_21,
    1.056_397_115_771_267_130_77,
    -1.954_287_731_916_458_695_83e-1,
    1.709_705_434_044_412_243_07e-2,
    -5.719_261_174_043_057_812_83e-4,
    4.633_994_733_599_056_367_08e-6,
    -2.719_949_084_886_077_039_10e-9,
];

/// Float abstraction shared by every model equation.
///
/// Blanket-implemented for any `num_traits::Float`, which covers
/// `f64` and `hyperdual::Hyperdual<f64, N>`.
pub trait ModelFloat: Float {
    /// Lift an `f64` constant into `Self` (zero derivative part).
    #[inline]
    fn cst(x: f64) -> Self {
        <Self as NumCast>::from(x).unwrap_or_else(Self::nan)
    }

    /// Real part as `f64`; used for diagnostics and error payloads.
    #[inline]
    fn to_real(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T> ModelFloat for T where T: Float {}

/// Natural log of the gamma function via the Lanczos approximation.
///
/// Uses the reflection formula for `x < 0.5`. Accurate to roughly machine
/// precision for `f64`; derivatives inherit the same accuracy when `T` is a
/// dual number.
pub fn ln_gamma<T: ModelFloat>(x: T) -> T {
    let half = T::cst(0.5);
    let one = T::one();
    if x < half {
        let s = GAMMA_DK
            .iter()
            .enumerate()
            .skip(1)
            .fold(T::cst(GAMMA_DK[0]), |s, (k, &dk)| s + T::cst(dk) / (T::cst(k as f64) - x));
        T::cst(LN_PI)
            - (T::cst(PI) * x).sin().ln()
            - s.ln()
            - T::cst(LN_2_SQRT_E_OVER_PI)
            - (half - x) * ((half - x + T::cst(GAMMA_R)) / T::cst(E)).ln()
    } else {
        let s = GAMMA_DK
            .iter()
            .enumerate()
            .skip(1)
            .fold(T::cst(GAMMA_DK[0]), |s, (k, &dk)| s + T::cst(dk) / (x + T::cst(k as f64) - one));
        s.ln() + T::cst(LN_2_SQRT_E_OVER_PI) + (x - half) * ((x - half + T::cst(GAMMA_R)) / T::cst(E)).ln()
    }
}

/// Beta(`a`, `b`) density (not log) at a data coordinate `x`.
///
/// The support is the open unit interval; the density is zero outside it.
/// `a` and `b` must be positive, which the model guarantees by
/// exponentiating log-parameters.
pub fn beta_pdf<T: ModelFloat>(x: f64, a: T, b: T) -> T {
    if !(x > 0.0 && x < 1.0) {
        return T::zero();
    }
    let one = T::one();
    let ln_norm = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b);
    ((a - one) * T::cst(x.ln()) + (b - one) * T::cst((1.0 - x).ln()) + ln_norm).exp()
}

/// Log-density of `Normal(mean, sd)` at `x`.
pub fn normal_ln_pdf<T: ModelFloat>(x: T, mean: T, sd: T) -> T {
    let z = (x - mean) / sd;
    -T::cst(LN_SQRT_2PI) - sd.ln() - T::cst(0.5) * z * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperdual::Hyperdual;
    use statrs::distribution::{Beta, Continuous, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the generic special functions with `statrs` on `f64`.
    // - Exact derivatives when the same code runs on dual numbers.
    //
    // They intentionally DO NOT cover:
    // - Model equations built on top of these primitives.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `ln_gamma` must reproduce known values on both branches of the
    // Lanczos approximation.
    //
    // Given
    // -----
    // - Γ(1) = Γ(2) = 1, Γ(0.5) = sqrt(pi), Γ(10) = 9!, Γ(0.25) from statrs.
    //
    // Expect
    // ------
    // - Agreement to 1e-10.
    fn ln_gamma_matches_known_values() {
        assert!(ln_gamma(1.0_f64).abs() < 1e-10);
        assert!(ln_gamma(2.0_f64).abs() < 1e-10);
        assert!((ln_gamma(0.5_f64) - PI.sqrt().ln()).abs() < 1e-10);
        assert!((ln_gamma(10.0_f64) - 362_880.0_f64.ln()).abs() < 1e-10);
        let reference = statrs::function::gamma::ln_gamma(0.25);
        assert!((ln_gamma(0.25_f64) - reference).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // On dual numbers the derivative of `ln_gamma` must be the digamma
    // function.
    //
    // Given
    // -----
    // - x = 2.5 seeded with unit tangent.
    //
    // Expect
    // ------
    // - d/dx ln Γ(x) ≈ ψ(2.5) from statrs.
    fn ln_gamma_dual_derivative_is_digamma() {
        let x = Hyperdual::<f64, 2>::from_slice(&[2.5, 1.0]);

        let y = ln_gamma(x);

        let expected = statrs::function::gamma::digamma(2.5);
        assert!((y[1] - expected).abs() < 1e-8);
        assert!((y.to_real() - statrs::function::gamma::ln_gamma(2.5)).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // `beta_pdf` agrees with the statrs Beta density inside the support and
    // is zero outside it.
    fn beta_pdf_matches_statrs_and_vanishes_outside_support() {
        let (a, b) = (2.3_f64, 4.1_f64);
        let reference = Beta::new(a, b).unwrap();
        for &x in &[1.0 / 8.5, 0.3, 0.5, 8.0 / 8.5] {
            assert!((beta_pdf(x, a, b) - reference.pdf(x)).abs() < 1e-9);
        }
        assert_eq!(beta_pdf(9.0 / 8.5, a, b), 0.0);
        assert_eq!(beta_pdf(-0.1, a, b), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // `normal_ln_pdf` is the standard Gaussian log-density.
    fn normal_ln_pdf_matches_statrs() {
        let reference = Normal::new(3.0, 0.7).unwrap();
        let value = normal_ln_pdf(2.1_f64, 3.0, 0.7);
        assert!((value - reference.ln_pdf(2.1)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Constants lifted with `cst` carry no derivative.
    fn cst_lifts_with_zero_tangent() {
        let c = <Hyperdual<f64, 3> as ModelFloat>::cst(1.75);
        assert_eq!(c.to_real(), 1.75);
        assert_eq!(c[1], 0.0);
        assert_eq!(c[2], 0.0);
    }
}

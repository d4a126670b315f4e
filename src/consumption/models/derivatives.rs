//! Forward-mode derivatives of the consumption model via `hyperdual`.
//!
//! One evaluation on [`Dual`] numbers (real part plus one tangent slot per
//! free parameter) yields the NLL gradient and the Jacobian of the AD report
//! with respect to θ, exactly and in a single pass.
//!
//! Slot layout of a [`Dual`]: index 0 is the value, index `i + 1` is the
//! partial derivative with respect to `θ[i]`.
use crate::consumption::core::params::{LogParams, N_PARAMS};
use hyperdual::Hyperdual;
use ndarray::{Array1, Array2};

/// Number of slots in a [`Dual`]: the value plus one tangent per parameter.
pub const N_DUAL: usize = N_PARAMS + 1;

/// Dual number carrying value and the full θ-gradient.
pub type Dual = Hyperdual<f64, N_DUAL>;

/// Seed every log-parameter with a unit tangent in its own slot.
pub fn seed(log_params: &LogParams<f64>) -> LogParams<Dual> {
    let values = log_params.to_array();
    LogParams::from_array(std::array::from_fn(|i| {
        let mut parts = [0.0; N_DUAL];
        parts[0] = values[i];
        parts[i + 1] = 1.0;
        Dual::from_slice(&parts)
    }))
}

/// Partial derivatives carried by `x`, in θ order.
pub fn gradient(x: &Dual) -> Array1<f64> {
    Array1::from_shape_fn(N_PARAMS, |i| x[i + 1])
}

/// Stack the gradients of `values` into a `[values.len() × N_PARAMS]`
/// Jacobian.
pub fn jacobian(values: &Array1<Dual>) -> Array2<f64> {
    Array2::from_shape_fn((values.len(), N_PARAMS), |(row, col)| values[row][col + 1])
}

/// Real parts of `values`.
pub fn real_parts(values: &Array1<Dual>) -> Array1<f64> {
    values.mapv(|x| x.real())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_traits::Float;

    #[test]
    // Purpose
    // -------
    // Seeding places a unit tangent on the diagonal and keeps the values.
    fn seed_places_unit_tangents() {
        let theta = LogParams::from_array([0.1, 0.2, 0.3, 0.4, 0.5]);

        let seeded = seed(&theta).to_array();

        for (i, x) in seeded.iter().enumerate() {
            assert_eq!(x.real(), theta.to_array()[i]);
            let g = gradient(x);
            for j in 0..N_PARAMS {
                assert_eq!(g[j], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Derivatives propagate through arithmetic on seeded values.
    //
    // Given
    // -----
    // - f = exp(θ0) · θ2² at θ = (0.1, ·, 0.3, ·, ·).
    //
    // Expect
    // ------
    // - ∂f/∂θ0 = f, ∂f/∂θ2 = 2 exp(θ0) θ2, other partials zero.
    fn gradient_matches_analytic_partials() {
        let p = seed(&LogParams::from_array([0.1, 0.2, 0.3, 0.4, 0.5]));

        let f = p.log_cmax.exp() * p.log_alpha * p.log_alpha;
        let g = gradient(&f);

        let value = 0.1_f64.exp() * 0.09;
        assert!((g[0] - value).abs() < 1e-14);
        assert!((g[2] - 2.0 * 0.1_f64.exp() * 0.3).abs() < 1e-14);
        assert_eq!(g[1], 0.0);
        assert_eq!(g[3], 0.0);
        assert_eq!(g[4], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The Jacobian stacks one gradient per row.
    fn jacobian_stacks_rows() {
        let p = seed(&LogParams::from_array([0.0; N_PARAMS]));
        let outputs = array![p.log_chalf, p.log_sigma + p.log_sigma];

        let jac = jacobian(&outputs);

        assert_eq!(jac.dim(), (2, N_PARAMS));
        assert_eq!(jac[[0, 1]], 1.0);
        assert_eq!(jac[[1, 4]], 2.0);
        assert_eq!(jac.sum(), 3.0);
        assert_eq!(real_parts(&outputs), array![0.0, 0.0]);
    }
}

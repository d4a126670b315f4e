//! Bridge from a [`LogLikelihood`] to argmin's `CostFunction` and `Gradient`.
//!
//! argmin minimizes, so the adapter exposes `c(θ) = −ℓ(θ)` and `−∇ℓ(θ)`.
//! A non-finite `ℓ` (for instance a model run under
//! `DomainPolicy::Propagate` that depleted its prey) is reported as
//! `NonFiniteCost`.
//!
//! argmin's line searches do not back off from a failed evaluation: the
//! error aborts the search and L-BFGS stops with `SolverExit`, keeping only
//! the error's text. The adapter therefore records the first `OptError`
//! its callbacks return so the driver can hand the typed error back.
use std::{cell::RefCell, rc::Rc};

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// A model and its data, borrowed for the length of one solver run.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    failure: Rc<RefCell<Option<OptError>>>,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, failure: Rc::new(RefCell::new(None)) }
    }

    /// Shared handle on the first error returned to argmin. Stays readable
    /// after the adapter has been moved into an executor.
    pub fn failure(&self) -> Rc<RefCell<Option<OptError>>> {
        Rc::clone(&self.failure)
    }

    fn record(&self, err: OptError) -> Error {
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err.clone());
        }
        err.into()
    }

    /// `c(θ)` without recording failures.
    fn neg_loglik(&self, theta: &Theta) -> Result<Cost, OptError> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(-value)
    }

    /// Finite-difference gradient of the cost. Central differences first;
    /// forward differences when an evaluation failed or the central result
    /// is not finite.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, OptError> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |t: &Theta| -> f64 {
            self.neg_loglik(t).unwrap_or_else(|e| {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e.into());
                }
                f64::NAN
            })
        };
        let central = theta.central_diff(&cost);
        if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        run_fd_diff(theta, &cost, &closure_err)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        self.neg_loglik(theta).map_err(|e| self.record(e))
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `−∇ℓ(θ)` from the model, validated; finite differences of the cost
    /// when the model has no gradient. Any other model error is returned.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let grad = match self.f.grad(theta, self.data) {
            Ok(g) => validate_grad(&g, theta.len()).map(|_| -g),
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e),
        };
        grad.map_err(|e| self.record(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    /// ℓ(θ) = −(θ₀ − 1)² − 2θ₁², with or without an analytic gradient.
    struct Bowl {
        analytic: bool,
    }

    impl LogLikelihood for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(theta[0] - 1.0).powi(2) - 2.0 * theta[1] * theta[1])
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            if self.analytic {
                Ok(array![-2.0 * (theta[0] - 1.0), -4.0 * theta[1]])
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    /// Always returns NaN, like a model whose prey ran out.
    struct Depleted;

    impl LogLikelihood for Depleted {
        type Data = ();

        fn value(&self, _: &Theta, _: &()) -> OptResult<f64> {
            Ok(f64::NAN)
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Cost and analytic gradient carry the flipped sign.
    fn cost_and_gradient_are_negated() {
        let model = Bowl { analytic: true };
        let adapter = ArgMinAdapter::new(&model, &());
        let theta = array![0.0, 0.5];

        assert_eq!(adapter.cost(&theta).unwrap(), 1.5);
        assert_eq!(adapter.gradient(&theta).unwrap(), array![-2.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter differentiates the cost
    // numerically and agrees with the analytic answer.
    fn missing_gradient_falls_back_to_finite_differences() {
        let analytic = Bowl { analytic: true };
        let numeric = Bowl { analytic: false };
        let theta = array![0.3, -0.2];

        let exact = ArgMinAdapter::new(&analytic, &()).gradient(&theta).unwrap();
        let approx = ArgMinAdapter::new(&numeric, &()).gradient(&theta).unwrap();

        for i in 0..2 {
            assert!((exact[i] - approx[i]).abs() < 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // A NaN log-likelihood is rejected as `NonFiniteCost`.
    fn non_finite_value_is_an_error() {
        let adapter = ArgMinAdapter::new(&Depleted, &());

        let err: OptError = adapter.cost(&array![0.0]).unwrap_err().into();

        assert!(matches!(err, OptError::NonFiniteCost { .. }));
    }

    #[test]
    // Purpose
    // -------
    // The first failing callback is kept in the shared slot, and a
    // recovered finite-difference probe is not.
    //
    // Given
    // -----
    // - An adapter over a NaN likelihood and one over a smooth bowl.
    //
    // Expect
    // ------
    // - After two failing cost calls the slot holds `NonFiniteCost`.
    // - The bowl's slot stays empty after cost and gradient calls.
    fn first_callback_failure_is_recorded() {
        // Arrange
        let depleted = ArgMinAdapter::new(&Depleted, &());
        let slot = depleted.failure();
        let numeric = Bowl { analytic: false };
        let bowl = ArgMinAdapter::new(&numeric, &());

        // Act
        let _ = depleted.cost(&array![0.0]);
        let _ = depleted.cost(&array![1.0]);
        let _ = bowl.cost(&array![0.0, 0.0]);
        let _ = bowl.gradient(&array![0.2, 0.1]);

        // Assert
        assert!(matches!(*slot.borrow(), Some(OptError::NonFiniteCost { .. })));
        assert!(bowl.failure().borrow().is_none());
    }
}

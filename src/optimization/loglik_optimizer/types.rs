//! Numeric aliases and argmin solver wiring for the optimizer layer.
//!
//! Everything the optimizer touches is `ndarray` over `f64`: θ and
//! gradients are `Array1`, Hessians `Array2`. The L-BFGS aliases pin
//! argmin's generics to those shapes so the rest of the crate never spells
//! them out.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector. For the consumption model this is
/// `(log Cmax, log Chalf, log alpha, log beta, log sigma)`.
pub type Theta = Array1<f64>;

/// Gradient with the same layout as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `θ.len() × θ.len()` matrix of second derivatives.
pub type Hessian = Array2<f64>;

/// Scalar objective handed to argmin, `c(θ) = −ℓ(θ)`.
pub type Cost = f64;

/// Evaluation counters reported by argmin (`"cost_count"`, `"gradient_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide derivative approximations around a parameter vector together with
//! validation and symmetry cleanup, so the optimizer and the inference layer
//! can request derivatives of a likelihood that only exposes values.
//!
//! Key behaviors
//! -------------
//! - Forward-difference gradients with error capture via [`run_fd_diff`].
//! - Hessians of scalar objectives via [`compute_hessian`]: a central
//!   second-difference stencil with steps scaled to each coordinate, falling
//!   back to `finitediff`'s forward Hessian when the stencil fails validation.
//! - In-place symmetrization of Hessians.
//!
//! Conventions
//! -----------
//! - The step for coordinate `i` is `ε^{1/4} · max(|θ_i|, 1)`. A Kalman filter
//!   likelihood carries round-off of order `n·ε`, so the fixed `√ε` steps used
//!   for gradients would swamp second differences.
//! - Errors are reported as [`OptError`](crate::optimization::errors::OptError)
//!   via `OptResult<T>`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta` with error capture.
///
/// `func` cannot return a `Result`, so callers route evaluation failures into
/// `closure_err` and return `NaN`. This helper clears the cell, runs the
/// stencil, surfaces any captured error, then validates the gradient.
///
/// # Errors
/// - The captured error, converted into `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
///
/// # Example
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::array;
/// # use rust_statespace::optimization::loglik_optimizer::finite_diff::run_fd_diff;
/// let theta = array![0.0_f64, 1.0];
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
/// let f = |x: &ndarray::Array1<f64>| x.dot(x);
/// let grad = run_fd_diff(&theta, &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), 2);
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Hessian of a scalar objective `f` at `theta`.
///
/// Uses the four-point central stencil
/// `[f(x+h_i+h_j) - f(x+h_i-h_j) - f(x-h_i+h_j) + f(x-h_i-h_j)] / (4 h_i h_j)`
/// (and the three-point rule on the diagonal). If that matrix contains a
/// non-finite entry, `finitediff`'s forward Hessian is tried instead. The
/// result is symmetrized before returning.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   fallback also fails validation.
///
/// # Example
/// ```rust
/// # use ndarray::array;
/// # use rust_statespace::optimization::loglik_optimizer::finite_diff::compute_hessian;
/// let f = |x: &ndarray::Array1<f64>| x[0] * x[0] + 3.0 * x[0] * x[1];
/// let hess = compute_hessian(&f, &array![1.0, 2.0]).unwrap();
/// assert!((hess[[0, 1]] - 3.0).abs() < 1e-5);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> f64>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = central_hessian_scaled(f, theta);
    match validate_hessian(&cent_hess, dim) {
        Ok(()) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian_nograd(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

fn step_sizes(theta: &Theta) -> Theta {
    let base = f64::EPSILON.powf(0.25);
    theta.mapv(|x| base * x.abs().max(1.0))
}

fn central_hessian_scaled<F: Fn(&Theta) -> f64>(f: &F, theta: &Theta) -> Hessian {
    let dim = theta.len();
    let h = step_sizes(theta);
    let f0 = f(theta);
    let mut hess = Array2::<f64>::zeros((dim, dim));
    let mut x = theta.clone();
    for i in 0..dim {
        x[i] = theta[i] + h[i];
        let f_plus = f(&x);
        x[i] = theta[i] - h[i];
        let f_minus = f(&x);
        x[i] = theta[i];
        hess[[i, i]] = (f_plus - 2.0 * f0 + f_minus) / (h[i] * h[i]);
        for j in 0..i {
            let mut eval = |si: f64, sj: f64| {
                x[i] = theta[i] + si * h[i];
                x[j] = theta[j] + sj * h[j];
                let v = f(&x);
                x[i] = theta[i];
                x[j] = theta[j];
                v
            };
            let value = (eval(1.0, 1.0) - eval(1.0, -1.0) - eval(-1.0, 1.0) + eval(-1.0, -1.0))
                / (4.0 * h[i] * h[j]);
            hess[[i, j]] = value;
            hess[[j, i]] = value;
        }
    }
    hess
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

//! Initial state distribution `α₀ ~ N(a₀, P₀)` for the Kalman filter.
//!
//! Purpose
//! -------
//! Describe how the filter is started and compute `(a₀, P₀)` for a given
//! representation.
//!
//! Key behaviors
//! -------------
//! - [`Initialization::Known`]: user-supplied mean and covariance.
//! - [`Initialization::ApproximateDiffuse`]: `a₀ = 0`, `P₀ = κ I` with large
//!   `κ` (default [`APPROX_DIFFUSE_VARIANCE`]); the first `k_states`
//!   observations are burned from the likelihood.
//! - [`Initialization::Stationary`]: the unconditional distribution,
//!   `a₀ = (I − T)⁻¹ c` and `P₀` solving `P₀ = T P₀ Tᵀ + R Q Rᵀ`
//!   via [`solve_discrete_lyapunov`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Stationary initialization requires every eigenvalue of `T` to lie
//!   strictly inside the unit circle; otherwise
//!   `SSMError::NonStationaryInit` is returned.
//! - Covariances are relative to the scale when the model concentrates it;
//!   a stationary `P₀` computed from a unit `Q` is then scaled with the
//!   rest of the system.
use crate::statespace::{
    core::representation::Representation,
    errors::{SSMError, SSMResult},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Default variance `κ` of the approximate diffuse prior.
pub const APPROX_DIFFUSE_VARIANCE: f64 = 1e6;

/// How the first predicted state is formed.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialization {
    /// Fixed `a₀`, `P₀`.
    Known { state: Array1<f64>, cov: Array2<f64> },
    /// `a₀ = 0`, `P₀ = variance · I`.
    ApproximateDiffuse { variance: f64 },
    /// Unconditional mean and covariance of a stationary state.
    Stationary,
}

impl Default for Initialization {
    fn default() -> Self {
        Initialization::ApproximateDiffuse { variance: APPROX_DIFFUSE_VARIANCE }
    }
}

impl Initialization {
    /// Validated known initialization.
    ///
    /// # Errors
    /// - `SSMError::ShapeMismatch` when `cov` is not `m × m` for `m = state.len()`.
    /// - `SSMError::NonFiniteMatrix` for non-finite entries.
    pub fn known(state: Array1<f64>, cov: Array2<f64>) -> SSMResult<Self> {
        let m = state.len();
        if cov.dim() != (m, m) {
            return Err(SSMError::ShapeMismatch {
                name: "initial_state_cov",
                expected: (m, m),
                actual: cov.dim(),
            });
        }
        for (row, &value) in state.iter().enumerate() {
            if !value.is_finite() {
                return Err(SSMError::NonFiniteMatrix { matrix: "initial_state", row, col: 0, value });
            }
        }
        for ((row, col), &value) in cov.indexed_iter() {
            if !value.is_finite() {
                return Err(SSMError::NonFiniteMatrix { matrix: "initial_state_cov", row, col, value });
            }
        }
        Ok(Initialization::Known { state, cov })
    }

    /// Approximate diffuse initialization with a custom `κ`.
    ///
    /// # Errors
    /// `SSMError::InvalidDiffuseVariance` unless `variance` is finite and > 0.
    pub fn approximate_diffuse(variance: f64) -> SSMResult<Self> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(SSMError::InvalidDiffuseVariance { value: variance });
        }
        Ok(Initialization::ApproximateDiffuse { variance })
    }

    /// Number of leading observations excluded from the likelihood.
    ///
    /// `k_states` for approximate diffuse priors, 0 otherwise.
    pub fn loglikelihood_burn(&self, k_states: usize) -> usize {
        match self {
            Initialization::ApproximateDiffuse { .. } => k_states,
            _ => 0,
        }
    }

    /// `(a₀, P₀)` for `repr`.
    ///
    /// # Errors
    /// - `SSMError::ShapeMismatch` when a known state does not match `k_states`.
    /// - `SSMError::NonStationaryInit` / `SSMError::SingularSystem` from the
    ///   stationary branch.
    pub fn initial_state(&self, repr: &Representation) -> SSMResult<(Array1<f64>, Array2<f64>)> {
        let m = repr.k_states;
        match self {
            Initialization::Known { state, cov } => {
                if state.len() != m {
                    return Err(SSMError::ShapeMismatch {
                        name: "initial_state",
                        expected: (m, 1),
                        actual: (state.len(), 1),
                    });
                }
                Ok((state.clone(), cov.clone()))
            }
            Initialization::ApproximateDiffuse { variance } => {
                Ok((Array1::zeros(m), Array2::eye(m) * *variance))
            }
            Initialization::Stationary => {
                if !is_stationary(&repr.transition) {
                    return Err(SSMError::NonStationaryInit);
                }
                let mean = stationary_mean(&repr.transition, &repr.state_intercept)?;
                let cov = solve_discrete_lyapunov(&repr.transition, &repr.selected_state_cov())?;
                Ok((mean, cov))
            }
        }
    }
}

/// Whether every eigenvalue of `transition` lies strictly inside the unit
/// circle.
pub fn is_stationary(transition: &Array2<f64>) -> bool {
    let t = to_dmatrix(transition);
    t.complex_eigenvalues().iter().all(|lambda| lambda.norm() < 1.0)
}

/// Solve `P = A P Aᵀ + Q` for `P`.
///
/// Uses the vectorized form `(I − A ⊗ A) vec(P) = vec(Q)` and an LU solve;
/// the result is symmetrized. Intended for the small state dimensions of
/// univariate models.
///
/// # Errors
/// `SSMError::SingularSystem` when `I − A ⊗ A` is singular (an eigenvalue
/// pair of `A` multiplies to one).
///
/// # Example
/// ```rust
/// # use ndarray::array;
/// # use rust_statespace::statespace::core::init::solve_discrete_lyapunov;
/// // AR(1) with φ = 0.5 and unit innovations: P = 1 / (1 − 0.25).
/// let p = solve_discrete_lyapunov(&array![[0.5]], &array![[1.0]]).unwrap();
/// assert!((p[[0, 0]] - 4.0 / 3.0).abs() < 1e-12);
/// ```
pub fn solve_discrete_lyapunov(a: &Array2<f64>, q: &Array2<f64>) -> SSMResult<Array2<f64>> {
    let m = a.nrows();
    let m2 = m * m;
    let lhs = DMatrix::<f64>::from_fn(m2, m2, |r, c| {
        let (i, j) = (r / m, r % m);
        let (k, l) = (c / m, c % m);
        let identity = if r == c { 1.0 } else { 0.0 };
        identity - a[[i, k]] * a[[j, l]]
    });
    let rhs = DVector::<f64>::from_iterator(m2, q.iter().copied());
    let vec_p = lhs.lu().solve(&rhs).ok_or(SSMError::SingularSystem { context: "stationary covariance" })?;
    let mut p = Array2::<f64>::zeros((m, m));
    for i in 0..m {
        for j in 0..m {
            p[[i, j]] = 0.5 * (vec_p[i * m + j] + vec_p[j * m + i]);
        }
    }
    Ok(p)
}

// ---- Helper methods ----

fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn stationary_mean(transition: &Array2<f64>, intercept: &Array1<f64>) -> SSMResult<Array1<f64>> {
    if intercept.iter().all(|&c| c == 0.0) {
        return Ok(Array1::zeros(intercept.len()));
    }
    let m = intercept.len();
    let lhs = DMatrix::<f64>::identity(m, m) - to_dmatrix(transition);
    let rhs = DVector::<f64>::from_iterator(m, intercept.iter().copied());
    let mean = lhs.lu().solve(&rhs).ok_or(SSMError::SingularSystem { context: "stationary mean" })?;
    Ok(Array1::from_iter(mean.iter().copied()))
}

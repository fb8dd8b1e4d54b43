//! numerical_stability — maps between optimizer space and model space.
//!
//! Purpose
//! -------
//! Keep every state-space parameter inside its admissible region while the
//! optimizer works in ℝⁿ: variances stay non-negative, AR polynomials stay
//! stationary and MA polynomials stay invertible.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; the model layer validates parameter vectors before
//!   calling into these maps.
//! - Constraining functions are total on ℝⁿ. Unconstraining functions clamp
//!   boundary inputs rather than fail.
//!
//! Conventions
//! -----------
//! - AR coefficients are reported as `φ` in `1 − Σ φᵢ Lⁱ`; MA coefficients
//!   as `θ` in `1 + Σ θᵢ Lⁱ`.
//! - Pure functions, no I/O.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, PACF_BOUND, constrain_stationary_univariate, constrain_variance,
    unconstrain_stationary_univariate, unconstrain_variance,
};

//! inference — post-estimation uncertainty for fitted state-space models.
//!
//! Classical standard errors from the observed information matrix, computed
//! by [`hessian::calc_standard_errors`] and attached to fit results. Robust
//! and HAC covariance estimators are not provided.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::calc_standard_errors;

//! statespace::core — building blocks shared by every state-space model.
//!
//! Purpose
//! -------
//! Provide the validated data container, the system matrices, the initial
//! state distribution, the Kalman filter and the fit configuration. Models in
//! [`crate::statespace::models`] only decide how parameters fill the
//! matrices; everything numerical happens here.
//!
//! Key behaviors
//! -------------
//! - [`data::SSMData`]: observations, `NaN` = missing, differencing.
//! - [`representation::Representation`]: `(Z, d, H, T, c, R, Q)` with named,
//!   bounds-checked entry access.
//! - [`init::Initialization`]: known, approximate diffuse, stationary.
//! - [`kalman::kalman_filter`]: full or concentrated likelihood.
//! - [`options::FitOptions`]: optimizer settings and scale fallback policy.
//!
//! Invariants & assumptions
//! ------------------------
//! - Univariate observations; `k_posdef ≤ k_states`.
//! - Every failure is an [`SSMError`](crate::statespace::errors::SSMError);
//!   nothing here panics on user input.

pub mod data;
pub mod init;
pub mod kalman;
pub mod options;
pub mod representation;

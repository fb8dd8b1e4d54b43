//! loglik_optimizer — argmin-backed maximization of state-space likelihoods.
//!
//! Purpose
//! -------
//! Maximize a log-likelihood `ℓ(θ)` over an unconstrained parameter vector.
//! State-space models implement [`LogLikelihood`] (through the model layer's
//! adapter) and call [`maximize`], which runs L-BFGS with a configurable line
//! search and finite-difference gradients when no analytic one is offered.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the Argmin cost `-ℓ(θ)`.
//! - [`builders`] constructs the solver for the chosen [`traits::LineSearcher`].
//! - [`run::run_lbfgs`] executes it and returns an [`OptimOutcome`] whose
//!   `iterations` field is what the concentration comparison reports.
//! - [`finite_diff`] supplies gradients and Hessians from function values;
//!   the inference layer reuses its Hessian for standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementations return `ℓ` and `∇ℓ`, never the cost; sign flips live in
//!   the adapter.
//! - Invalid inputs surface as [`OptError`](crate::optimization::errors::OptError)
//!   values, never panics.
//! - Options are validated at construction and trusted afterwards.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

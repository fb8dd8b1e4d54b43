//! optimization — MLE stack, parameter transforms, and unified error surface.
//!
//! Purpose
//! -------
//! Give the state-space models one place to turn a likelihood into estimates:
//! an Argmin-backed maximizer, the transforms that keep parameters admissible,
//! and a single error enum for everything that can go wrong on the way.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: L-BFGS maximization of `ℓ(θ)` with configurable
//!   tolerances and line search, plus finite-difference helpers.
//! - `numerical_stability`: variance and stationarity transforms.
//! - `errors`: [`OptError`](errors::OptError) / [`OptResult`](errors::OptResult),
//!   including the conversion from model-layer errors.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; all reported
//!   values are on the log-likelihood scale.
//! - No logging here except the optional `obs_slog` observer.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_statespace::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::{
        LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Theta, Tolerances, maximize,
    };
}

//! models — state-space models, estimation, and formulation comparison.
//!
//! Purpose
//! -------
//! Turn the core filter into estimable models: the [`StateSpaceModel`] trait
//! describes how a parameter vector fills the system matrices, and the
//! generic [`fit`] / [`loglike`] / [`filter`] entry points do the rest.
//!
//! Key behaviors
//! -------------
//! - [`LocalLevel`]: random walk plus noise, with either variance usable as
//!   the concentrated scale ([`ScaleNormalization`]).
//! - [`Sarimax`]: seasonal ARIMA with optional measurement error.
//! - [`FitResults`]: estimates, criteria, standard errors, forecasts.
//! - [`compare_formulations`]: fit full and concentrated formulations of one
//!   model and measure their agreement.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimization runs in unconstrained space on the average log-likelihood;
//!   reported parameters are always in model space.
//! - A model instance is immutable; per-evaluation scratch lives in
//!   [`ModelLikelihood`] and is not shared across threads.

pub mod concentration;
pub mod local_level;
pub mod mle;
pub mod results;
pub mod sarimax;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::concentration::{FormulationComparison, compare_formulations};
pub use self::local_level::{LocalLevel, ScaleNormalization};
pub use self::mle::{ModelLikelihood, StateSpaceModel, filter, fit, loglike};
pub use self::results::{FitResults, Forecast};
pub use self::sarimax::Sarimax;

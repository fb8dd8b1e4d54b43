//! statespace — linear Gaussian state-space models with a concentrated scale.
//!
//! Purpose
//! -------
//! Bundle the Kalman-filter core, the models built on it, and the shared
//! error type under one namespace. This is the surface most consumers
//! (including the Python bindings) depend on.
//!
//! Key behaviors
//! -------------
//! - [`core`]: data, system matrices, initialization, filter, fit options.
//! - [`models`]: local level and SARIMAX models, MLE, results, comparison of
//!   full and concentrated formulations.
//! - [`errors`]: [`SSMError`] / [`SSMResult`].
//!
//! Conventions
//! -----------
//! - When the scale is concentrated, every covariance in the representation
//!   is relative to `σ²` and the filter reports `σ̂²` as `scale`.
//! - The layer performs no I/O; verbose optimizer output is opt-in through
//!   `MLEOptions::verbose` and the `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`SSMData`] from a series (`NaN` = missing).
//! 2. Pick a model, e.g. `LocalLevel::new(ScaleNormalization::Level)` or
//!    `Sarimax::new((1, 0, 0), (0, 0, 0, 0))?.with_concentrate_scale(true)`.
//! 3. `fit(&model, &data, &FitOptions::default())?` and read
//!    `params`, `scale`, `llf` and `forecast(h, alpha)` off the results.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    data::SSMData,
    init::Initialization,
    kalman::{FilterOutput, kalman_filter},
    options::{FitOptions, ScaleEstimation},
    representation::{Representation, SystemMatrix},
};

pub use self::errors::{SSMError, SSMResult};

pub use self::models::{
    FitResults, Forecast, FormulationComparison, LocalLevel, Sarimax, ScaleNormalization,
    StateSpaceModel, compare_formulations, filter, fit, loglike,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_statespace::statespace::prelude::*;
//
// to import the main state-space surface in a single line.

pub mod prelude {
    pub use super::{
        FitOptions, FitResults, Forecast, FormulationComparison, Initialization, LocalLevel,
        SSMData, SSMError, SSMResult, Sarimax, ScaleEstimation, ScaleNormalization,
        StateSpaceModel, compare_formulations, filter, fit, loglike,
    };
}

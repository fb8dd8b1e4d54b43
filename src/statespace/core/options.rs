//! Fit options — configuration for state-space estimation.
//!
//! Purpose
//! -------
//! Collect the knobs of a maximum-likelihood fit in one place: optimizer
//! settings, how the scale is handled when concentration fails, whether to
//! compute standard errors, and an optional starting point.
//!
//! Key behaviors
//! -------------
//! - [`FitOptions`] bundles an [`MLEOptions`] with model-level choices.
//! - [`ScaleEstimation`] decides what happens when a concentrated fit cannot
//!   produce a usable scale.
//!
//! Invariants & assumptions
//! ------------------------
//! - `MLEOptions` is validated by its own constructor.
//! - A supplied `start_params` vector is finite; its length is checked
//!   against the model when fitting.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    statespace::errors::{SSMError, SSMResult},
};
use ndarray::Array1;
use std::str::FromStr;

/// Handling of the scale parameter during estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleEstimation {
    /// Use the model as configured (concentrated or not) and report any
    /// failure.
    #[default]
    AsSpecified,
    /// If a concentrated fit fails (degenerate or non-positive scale,
    /// optimizer failure), refit the unconcentrated formulation with the
    /// scale as an ordinary parameter.
    ConcentratedWithFallback,
}

impl FromStr for ScaleEstimation {
    type Err = SSMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "as_specified" | "asspecified" => Ok(ScaleEstimation::AsSpecified),
            "fallback" | "concentrated_with_fallback" => {
                Ok(ScaleEstimation::ConcentratedWithFallback)
            }
            _ => Err(SSMError::InvalidSpecification {
                reason: format!(
                    "unknown scale estimation '{s}'; expected 'as_specified' or 'fallback'"
                ),
            }),
        }
    }
}

/// Configuration of a maximum-likelihood fit.
///
/// Fields
/// ------
/// - `mle_opts`: optimizer tolerances, line search and verbosity.
/// - `scale_estimation`: see [`ScaleEstimation`].
/// - `std_errors`: compute standard errors from the observed information.
/// - `start_params`: model-space starting values; `None` uses the model's
///   own `start_params`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub mle_opts: MLEOptions,
    pub scale_estimation: ScaleEstimation,
    pub std_errors: bool,
    pub start_params: Option<Array1<f64>>,
}

impl FitOptions {
    /// Bundle validated fit options.
    ///
    /// # Errors
    /// `SSMError::NonFiniteParam` when `start_params` has a non-finite entry.
    pub fn new(
        mle_opts: MLEOptions, scale_estimation: ScaleEstimation, std_errors: bool,
        start_params: Option<Array1<f64>>,
    ) -> SSMResult<Self> {
        if let Some(start) = &start_params {
            if let Some((index, &value)) = start.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(SSMError::NonFiniteParam { index, value });
            }
        }
        Ok(Self { mle_opts, scale_estimation, std_errors, start_params })
    }

    /// Same options without a starting point (used when switching
    /// formulations, where the old start has the wrong length).
    pub fn without_start(&self) -> Self {
        Self { start_params: None, ..self.clone() }
    }
}

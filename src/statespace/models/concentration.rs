//! Formulation comparison — full vs concentrated-scale estimation.
//!
//! Purpose
//! -------
//! Fit the same model twice, once with the scale as a free parameter and
//! once with the scale concentrated out, and report how closely the two
//! estimates agree.
//!
//! Key behaviors
//! -------------
//! - Concentrated estimates are mapped into the full parameterization with
//!   [`StateSpaceModel::full_params`] before comparison.
//! - Iteration counts of both optimizations are kept; the concentrated search
//!   runs in one dimension less.
//!
//! Invariants & assumptions
//! ------------------------
//! - `full` does not concentrate the scale; `concentrated` does.
//! - `concentrated.full_param_names()` equals `full.param_names()`.
use crate::statespace::{
    core::{data::SSMData, options::FitOptions},
    errors::{SSMError, SSMResult},
    models::{
        mle::{StateSpaceModel, fit},
        results::FitResults,
    },
};
use ndarray::Array1;

/// Outcome of fitting both formulations.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulationComparison {
    pub param_names: Vec<String>,
    pub llf_full: f64,
    pub llf_concentrated: f64,
    pub iterations_full: usize,
    pub iterations_concentrated: usize,
    /// Estimates of the full fit.
    pub full_params: Array1<f64>,
    /// Concentrated estimates expressed in the full parameterization.
    pub implied_params: Array1<f64>,
    pub full_fit: FitResults,
    pub concentrated_fit: FitResults,
}

impl FormulationComparison {
    /// `llf_concentrated − llf_full`.
    pub fn llf_gap(&self) -> f64 {
        self.llf_concentrated - self.llf_full
    }

    /// `max_i |implied_i − full_i| / max(|full_i|, 1)`.
    ///
    /// Relative for estimates of magnitude above one, absolute below, so a
    /// variance sitting at the zero boundary in both fits reports no gap.
    pub fn max_relative_param_gap(&self) -> f64 {
        self.implied_params
            .iter()
            .zip(self.full_params.iter())
            .map(|(&c, &f)| mixed_gap(c, f))
            .fold(0.0, f64::max)
    }
}

fn mixed_gap(implied: f64, full: f64) -> f64 {
    (implied - full).abs() / full.abs().max(1.0)
}

/// Fit `full` and `concentrated` to `data` and compare the estimates.
///
/// `opts.start_params` is ignored; each formulation starts from its own
/// default starting values.
///
/// # Errors
/// - `SSMError::IncompatibleFormulations` when the concentration flags or the
///   parameter names do not line up.
/// - Any error of either fit.
pub fn compare_formulations<F: StateSpaceModel, C: StateSpaceModel>(
    full: &F, concentrated: &C, data: &SSMData, opts: &FitOptions,
) -> SSMResult<FormulationComparison> {
    if full.concentrate_scale() || !concentrated.concentrate_scale() {
        return Err(SSMError::IncompatibleFormulations {
            reason: "expected an unconcentrated model and a concentrated one".to_string(),
        });
    }
    let param_names = full.param_names();
    if concentrated.full_param_names() != param_names {
        return Err(SSMError::IncompatibleFormulations {
            reason: format!(
                "parameter names differ: {:?} vs {:?}",
                param_names,
                concentrated.full_param_names()
            ),
        });
    }

    let opts = opts.without_start();
    let full_fit = fit(full, data, &opts)?;
    let concentrated_fit = fit(concentrated, data, &opts)?;
    let implied_params = concentrated.full_params(&concentrated_fit.params, concentrated_fit.scale)?;

    Ok(FormulationComparison {
        param_names,
        llf_full: full_fit.llf,
        llf_concentrated: concentrated_fit.llf,
        iterations_full: full_fit.iterations(),
        iterations_concentrated: concentrated_fit.iterations(),
        full_params: full_fit.params.clone(),
        implied_params,
        full_fit,
        concentrated_fit,
    })
}

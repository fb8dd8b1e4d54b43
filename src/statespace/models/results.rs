//! Fit results — estimates, information criteria, inference and forecasts.
//!
//! Purpose
//! -------
//! Hold everything a maximum-likelihood fit produces in one self-contained
//! snapshot: model-space estimates, the scale, the filter at the optimum, the
//! optimizer outcome, and optional standard errors.
//!
//! Key behaviors
//! -------------
//! - Information criteria count the concentrated scale as an estimated
//!   parameter, so `k_params = len(params) + concentrated`.
//! - `zvalues` / `pvalues` use the standard normal reference distribution.
//! - [`FitResults::forecast`] rolls the system forward from the last
//!   predicted state `(a_n, P_n)` with covariances multiplied by `scale`.
//!
//! Conventions
//! -----------
//! - `aic = −2ℓ + 2k`, `bic = −2ℓ + k ln n`, `hqic = −2ℓ + 2k ln ln n`, with
//!   `n = nobs_effective`.
//! - Forecasts are for the series the filter ran on (after any differencing
//!   done by the model's `prepare_data`).
use crate::{
    optimization::loglik_optimizer::OptimOutcome,
    statespace::{
        core::{kalman::FilterOutput, representation::Representation},
        errors::{SSMError, SSMResult},
    },
};
use ndarray::Array1;
use statrs::distribution::{ContinuousCDF, Normal};

/// Snapshot of a completed fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResults {
    pub model_name: String,
    /// Model-space estimates.
    pub params: Array1<f64>,
    pub param_names: Vec<String>,
    /// `σ̂²` when concentrated, 1 otherwise.
    pub scale: f64,
    pub concentrated: bool,
    pub llf: f64,
    pub nobs_effective: usize,
    /// Estimated parameters including a concentrated scale.
    pub k_params: usize,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    /// Standard errors of `params`, when requested and computable.
    pub bse: Option<Array1<f64>>,
    pub optim: OptimOutcome,
    pub filter_output: FilterOutput,
    pub representation: Representation,
    /// Set when a concentrated fit failed and the unconcentrated
    /// formulation was fitted instead.
    pub scale_fallback: bool,
}

impl FitResults {
    pub fn new(
        model_name: String, params: Array1<f64>, param_names: Vec<String>, optim: OptimOutcome,
        filter_output: FilterOutput, representation: Representation, bse: Option<Array1<f64>>,
    ) -> Self {
        let concentrated = filter_output.concentrated;
        let k_params = params.len() + usize::from(concentrated);
        let llf = filter_output.llf;
        let n = filter_output.nobs_effective as f64;
        let k = k_params as f64;
        let aic = -2.0 * llf + 2.0 * k;
        let bic = -2.0 * llf + k * n.ln();
        let hqic = -2.0 * llf + 2.0 * k * n.ln().ln();
        Self {
            model_name,
            params,
            param_names,
            scale: filter_output.scale,
            concentrated,
            llf,
            nobs_effective: filter_output.nobs_effective,
            k_params,
            aic,
            bic,
            hqic,
            bse,
            optim,
            filter_output,
            representation,
            scale_fallback: false,
        }
    }

    pub fn iterations(&self) -> usize {
        self.optim.iterations
    }

    pub fn converged(&self) -> bool {
        self.optim.converged
    }

    /// Estimate for the parameter called `name`.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.param_names.iter().position(|n| n == name).map(|i| self.params[i])
    }

    /// `params / bse`, if standard errors are available.
    pub fn zvalues(&self) -> Option<Array1<f64>> {
        self.bse.as_ref().map(|bse| &self.params / bse)
    }

    /// Two-sided p-values `2(1 − Φ(|z|))`.
    pub fn pvalues(&self) -> Option<Array1<f64>> {
        let z = self.zvalues()?;
        let normal = Normal::new(0.0, 1.0).ok()?;
        Some(z.mapv(|zi| 2.0 * (1.0 - normal.cdf(zi.abs()))))
    }

    /// `horizon`-step-ahead forecasts with `(1 − alpha)` prediction intervals.
    ///
    /// # Errors
    /// - `SSMError::InvalidHorizon` when `horizon == 0`.
    /// - `SSMError::InvalidAlpha` unless `0 < alpha < 1`.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use ndarray::array;
    /// # use rust_statespace::statespace::prelude::*;
    /// let data = SSMData::new(array![1.0, 1.4, 0.9, 1.7, 2.1, 1.8]).unwrap();
    /// let model = LocalLevel::new(ScaleNormalization::Level);
    /// let res = fit(&model, &data, &FitOptions::default()).unwrap();
    /// let fc = res.forecast(3, 0.05).unwrap();
    /// assert_eq!(fc.mean.len(), 3);
    /// ```
    pub fn forecast(&self, horizon: usize, alpha: f64) -> SSMResult<Forecast> {
        if horizon == 0 {
            return Err(SSMError::InvalidHorizon { horizon });
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(SSMError::InvalidAlpha { alpha });
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| SSMError::InvalidSpecification { reason: e.to_string() })?;
        let q = normal.inverse_cdf(1.0 - alpha / 2.0);

        let repr = &self.representation;
        let rqr = repr.selected_state_cov();
        let mut a = self.filter_output.predicted_state.clone();
        let mut p = self.filter_output.predicted_state_cov.clone();
        let mut mean = Array1::<f64>::zeros(horizon);
        let mut variance = Array1::<f64>::zeros(horizon);
        for h in 0..horizon {
            mean[h] = repr.design.dot(&a) + repr.obs_intercept;
            variance[h] = self.scale * (repr.design.dot(&p.dot(&repr.design)) + repr.obs_cov);
            a = repr.transition.dot(&a) + &repr.state_intercept;
            p = repr.transition.dot(&p).dot(&repr.transition.t()) + &rqr;
        }
        let half_width = variance.mapv(|v| q * v.max(0.0).sqrt());
        Ok(Forecast {
            lower: &mean - &half_width,
            upper: &mean + &half_width,
            mean,
            variance,
            alpha,
        })
    }
}

impl std::fmt::Display for FitResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} results", self.model_name)?;
        writeln!(
            f,
            "llf = {:.4}  aic = {:.4}  bic = {:.4}  hqic = {:.4}",
            self.llf, self.aic, self.bic, self.hqic
        )?;
        writeln!(
            f,
            "nobs = {}  iterations = {}  converged = {}",
            self.nobs_effective,
            self.iterations(),
            self.converged()
        )?;
        for (i, name) in self.param_names.iter().enumerate() {
            match &self.bse {
                Some(bse) => writeln!(f, "  {name:<16} {:>12.6} ({:.6})", self.params[i], bse[i])?,
                None => writeln!(f, "  {name:<16} {:>12.6}", self.params[i])?,
            }
        }
        if self.concentrated {
            writeln!(f, "  {:<16} {:>12.6} (concentrated)", "scale", self.scale)?;
        }
        Ok(())
    }
}

/// Out-of-sample forecast path; entry `h` is the `(h + 1)`-step-ahead value.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub mean: Array1<f64>,
    pub variance: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    pub alpha: f64,
}

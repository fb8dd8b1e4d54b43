//! Univariate Kalman filter with optional concentration of the scale.
//!
//! Purpose
//! -------
//! Run the prediction-error decomposition of the Gaussian likelihood for a
//! [`Representation`], either at the covariances as written (full
//! likelihood) or treating them as relative to an unknown scale `σ²` that is
//! solved for in closed form (concentrated likelihood).
//!
//! Key behaviors
//! -------------
//! - For `t = 0..n`:
//!   `v_t = y_t − Z a_t − d`, `F_t = Z P_t Zᵀ + H`, `K_t = P_t Zᵀ / F_t`,
//!   `a_{t|t} = a_t + K_t v_t`, `P_{t|t} = P_t − K_t F_t K_tᵀ`,
//!   `a_{t+1} = T a_{t|t} + c`, `P_{t+1} = T P_{t|t} Tᵀ + R Q Rᵀ`.
//! - Missing `y_t` skip the update step (`a_{t|t} = a_t`).
//! - Observations with `t < burn` update the state but contribute nothing to
//!   the likelihood or to `n_eff`.
//! - Concentrated: `σ̂² = (Σ v_t²/F_t) / n_eff` and
//!   `ℓ_c = −½ n_eff (ln 2π + ln σ̂² + 1) − ½ Σ ln F_t`, which equals the full
//!   likelihood evaluated with every covariance multiplied by `σ̂²`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `F_t` must be finite and `> 0` at every observed time point; otherwise
//!   `SSMError::NonPositiveForecastVariance` is returned.
//! - At least one observation must enter the likelihood.
//! - In concentrated mode `Σ v_t²/F_t` must be finite and larger than
//!   [`DEGENERATE_SCALE_RATIO`] times `Σ y_t²` over the same observations;
//!   otherwise `SSMError::DegenerateScale` is returned. A near-zero residual
//!   left by the approximate diffuse prior on a constant series counts as
//!   degenerate.
//!
//! Conventions
//! -----------
//! - Stored covariances (`forecast_error_cov`, `predicted_state_cov`) are the
//!   ones produced by the recursion, i.e. relative to `scale` in concentrated
//!   mode. Multiply by [`FilterOutput::scale`] for absolute values.
//! - `llf_obs[t]` is 0 for missing and burned observations.
use crate::statespace::{
    core::{data::SSMData, init::Initialization, representation::Representation},
    errors::{SSMError, SSMResult},
};
use ndarray::{Array1, Array2, Axis};
use std::f64::consts::PI;

/// Floor on `σ̂² / mean(y_t²)` below which the concentrated scale is
/// considered degenerate.
pub const DEGENERATE_SCALE_RATIO: f64 = 1e-10;

/// Everything the filter produces for one parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    /// Log-likelihood (concentrated or full).
    pub llf: f64,
    /// Per-observation log-likelihood contributions.
    pub llf_obs: Array1<f64>,
    /// `σ̂²` in concentrated mode, 1 otherwise.
    pub scale: f64,
    /// Whether the scale was concentrated out.
    pub concentrated: bool,
    /// Observations entering the likelihood.
    pub nobs_effective: usize,
    /// Likelihood burn-in used for this pass.
    pub burn: usize,
    /// One-step-ahead forecasts `Z a_t + d`.
    pub forecasts: Array1<f64>,
    /// Forecast errors `v_t` (`NaN` when missing).
    pub forecast_errors: Array1<f64>,
    /// Forecast error variances `F_t` (relative to `scale`).
    pub forecast_error_cov: Array1<f64>,
    /// Filtered states `a_{t|t}`, `n × m`.
    pub filtered_state: Array2<f64>,
    /// Predicted state `a_n` after the last observation.
    pub predicted_state: Array1<f64>,
    /// Predicted state covariance `P_n` (relative to `scale`).
    pub predicted_state_cov: Array2<f64>,
    /// `Σ v_t² / F_t` over likelihood observations.
    pub sum_sq_norm_errors: f64,
    /// `Σ ln F_t` over likelihood observations.
    pub sum_log_f: f64,
}

impl FilterOutput {
    /// Log-likelihood divided by the effective sample size.
    pub fn avg_llf(&self) -> f64 {
        self.llf / self.nobs_effective as f64
    }

    /// Standardized forecast errors `v_t / √(σ² F_t)`.
    pub fn standardized_errors(&self) -> Array1<f64> {
        let scale = self.scale;
        Array1::from_iter(
            self.forecast_errors
                .iter()
                .zip(self.forecast_error_cov.iter())
                .map(|(&v, &f)| v / (scale * f).sqrt()),
        )
    }
}

/// Run the filter over `data`.
///
/// - `concentrate_scale`: treat covariances as relative and profile out `σ²`.
/// - `burn`: number of leading observations excluded from the likelihood
///   (usually [`Initialization::loglikelihood_burn`]).
///
/// # Errors
/// - Representation validation errors.
/// - Initialization errors (`NonStationaryInit`, `SingularSystem`, shapes).
/// - `SSMError::NonPositiveForecastVariance { t, value }`.
/// - `SSMError::NoEffectiveObservations` when nothing enters the likelihood.
/// - `SSMError::DegenerateScale` in concentrated mode.
///
/// # Example
/// ```rust
/// # use ndarray::array;
/// # use rust_statespace::statespace::core::{
/// #     data::SSMData, init::Initialization, kalman::kalman_filter,
/// #     representation::Representation,
/// # };
/// // White noise y_t ~ N(0, 2) as a degenerate state-space model.
/// let mut repr = Representation::new(1, 1).unwrap();
/// repr.obs_cov = 2.0;
/// let init = Initialization::known(array![0.0], array![[0.0]]).unwrap();
/// let data = SSMData::new(array![1.0, -1.0]).unwrap();
/// let out = kalman_filter(&repr, &init, &data, false, 0).unwrap();
/// let expected = -(2.0 * std::f64::consts::PI * 2.0).ln() - 0.5;
/// assert!((out.llf - expected).abs() < 1e-12);
/// ```
pub fn kalman_filter(
    repr: &Representation, init: &Initialization, data: &SSMData, concentrate_scale: bool,
    burn: usize,
) -> SSMResult<FilterOutput> {
    repr.validate()?;
    let n = data.nobs();
    let m = repr.k_states;
    let (mut a, mut p) = init.initial_state(repr)?;
    let rqr = repr.selected_state_cov();
    let z = &repr.design;

    let mut forecasts = Array1::<f64>::zeros(n);
    let mut forecast_errors = Array1::<f64>::from_elem(n, f64::NAN);
    let mut forecast_error_cov = Array1::<f64>::zeros(n);
    let mut filtered_state = Array2::<f64>::zeros((n, m));
    let mut llf_obs = Array1::<f64>::zeros(n);
    let mut nobs_effective = 0usize;
    let mut sum_sq_norm_errors = 0.0;
    let mut sum_sq_obs = 0.0;
    let mut sum_log_f = 0.0;

    for t in 0..n {
        let pz = p.dot(z);
        let f_t = z.dot(&pz) + repr.obs_cov;
        forecasts[t] = z.dot(&a) + repr.obs_intercept;
        forecast_error_cov[t] = f_t;

        let y_t = data.endog[t];
        if !y_t.is_nan() {
            if !f_t.is_finite() || f_t <= 0.0 {
                return Err(SSMError::NonPositiveForecastVariance { t, value: f_t });
            }
            let v_t = y_t - forecasts[t];
            forecast_errors[t] = v_t;
            let gain = &pz / f_t;
            a.scaled_add(v_t, &gain);
            p = &p - &outer(&pz, &gain);

            if t >= burn {
                nobs_effective += 1;
                let norm_sq = v_t * v_t / f_t;
                sum_sq_norm_errors += norm_sq;
                sum_sq_obs += y_t * y_t;
                sum_log_f += f_t.ln();
                llf_obs[t] = -0.5 * ((2.0 * PI).ln() + f_t.ln() + norm_sq);
            }
        }
        filtered_state.row_mut(t).assign(&a);

        a = repr.transition.dot(&a) + &repr.state_intercept;
        p = repr.transition.dot(&p).dot(&repr.transition.t()) + &rqr;
        symmetrize(&mut p);
    }

    if nobs_effective == 0 {
        return Err(SSMError::NoEffectiveObservations { burn, nobs: data.nobs_observed() });
    }

    let (llf, scale) = if concentrate_scale {
        if !sum_sq_norm_errors.is_finite()
            || sum_sq_norm_errors <= 0.0
            || sum_sq_norm_errors <= DEGENERATE_SCALE_RATIO * sum_sq_obs
        {
            return Err(SSMError::DegenerateScale { value: sum_sq_norm_errors });
        }
        let n_eff = nobs_effective as f64;
        let scale = sum_sq_norm_errors / n_eff;
        let llf = -0.5 * n_eff * ((2.0 * PI).ln() + scale.ln() + 1.0) - 0.5 * sum_log_f;
        for t in burn..n {
            if !forecast_errors[t].is_nan() {
                let f_t = forecast_error_cov[t];
                let v_t = forecast_errors[t];
                llf_obs[t] = -0.5 * ((2.0 * PI).ln() + (scale * f_t).ln() + v_t * v_t / (scale * f_t));
            }
        }
        (llf, scale)
    } else {
        (llf_obs.sum(), 1.0)
    };

    Ok(FilterOutput {
        llf,
        llf_obs,
        scale,
        concentrated: concentrate_scale,
        nobs_effective,
        burn,
        forecasts,
        forecast_errors,
        forecast_error_cov,
        filtered_state,
        predicted_state: a,
        predicted_state_cov: p,
        sum_sq_norm_errors,
        sum_log_f,
    })
}

// ---- Helper methods ----

fn outer(x: &Array1<f64>, y: &Array1<f64>) -> Array2<f64> {
    let col = x.view().insert_axis(Axis(1));
    let row = y.view().insert_axis(Axis(0));
    col.dot(&row)
}

fn symmetrize(p: &mut Array2<f64>) {
    let m = p.nrows();
    for i in 0..m {
        for j in 0..i {
            let avg = 0.5 * (p[[i, j]] + p[[j, i]]);
            p[[i, j]] = avg;
            p[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The recursion on a local level model against a hand-rolled filter.
    // - Concentrated vs. full likelihood at the profiled scale.
    // - Exclusion of missing and burned observations from n_eff.
    // - Degenerate scale and non-positive forecast variance failures.
    // -------------------------------------------------------------------------

    fn local_level(sigma2_level: f64, sigma2_irregular: f64) -> Representation {
        let mut repr = Representation::new(1, 1).expect("valid dims");
        repr.design[0] = 1.0;
        repr.transition[[0, 0]] = 1.0;
        repr.selection[[0, 0]] = 1.0;
        repr.state_cov[[0, 0]] = sigma2_level;
        repr.obs_cov = sigma2_irregular;
        repr
    }

    #[test]
    // Purpose
    // -------
    // The filter reproduces a scalar local-level recursion written out by hand.
    //
    // Given
    // -----
    // - σ²_level = 0.5, σ²_irregular = 2, known a₀ = 0, P₀ = 1, four points.
    //
    // Expect
    // ------
    // - Identical forecasts, variances and log-likelihood (1e-12).
    fn local_level_matches_scalar_recursion() {
        // Arrange
        let repr = local_level(0.5, 2.0);
        let init = Initialization::known(array![0.0], array![[1.0]]).expect("valid");
        let y = [1.0, 0.2, -0.7, 1.5];
        let data = SSMData::new(Array1::from(y.to_vec())).expect("valid data");

        // Act
        let out = kalman_filter(&repr, &init, &data, false, 0).expect("filter runs");

        // Assert
        let (mut a, mut p, mut llf) = (0.0_f64, 1.0_f64, 0.0_f64);
        for (t, &y_t) in y.iter().enumerate() {
            let f = p + 2.0;
            let v = y_t - a;
            assert_relative_eq!(out.forecasts[t], a, epsilon = 1e-12);
            assert_relative_eq!(out.forecast_error_cov[t], f, epsilon = 1e-12);
            llf += -0.5 * ((2.0 * PI).ln() + f.ln() + v * v / f);
            a += p / f * v;
            p = p - p * p / f + 0.5;
        }
        assert_relative_eq!(out.llf, llf, epsilon = 1e-12);
        assert_relative_eq!(out.predicted_state[0], a, epsilon = 1e-12);
        assert_relative_eq!(out.predicted_state_cov[[0, 0]], p, epsilon = 1e-12);
        assert_eq!(out.nobs_effective, 4);
        assert_eq!(out.scale, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The concentrated log-likelihood equals the full one evaluated with all
    // covariances multiplied by the profiled scale.
    //
    // Given
    // -----
    // - Relative system: σ²_level = 1, ratio = 4, known a₀ = 0, P₀ = 3.
    //
    // Expect
    // ------
    // - ℓ_c equals ℓ at (σ̂², 4σ̂²) with P₀ = 3σ̂², and Σ llf_obs = ℓ_c.
    fn concentrated_equals_full_at_profiled_scale() {
        // Arrange
        let data = SSMData::new(array![0.3, 1.1, 0.4, 2.0, 1.7, 1.2]).expect("valid data");
        let rel_init = Initialization::known(array![0.0], array![[3.0]]).expect("valid");

        // Act
        let conc = kalman_filter(&local_level(1.0, 4.0), &rel_init, &data, true, 0).unwrap();
        let s = conc.scale;
        let abs_init = Initialization::known(array![0.0], array![[3.0 * s]]).expect("valid");
        let full = kalman_filter(&local_level(s, 4.0 * s), &abs_init, &data, false, 0).unwrap();

        // Assert
        assert!(conc.concentrated);
        assert_relative_eq!(conc.llf, full.llf, epsilon = 1e-10);
        assert_relative_eq!(conc.llf_obs.sum(), conc.llf, epsilon = 1e-10);
        assert_relative_eq!(s, conc.sum_sq_norm_errors / 6.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Missing observations and the burn-in are excluded from n_eff and llf.
    //
    // Given
    // -----
    // - Six points with one NaN, approximate diffuse prior, burn = 1.
    //
    // Expect
    // ------
    // - n_eff = 4, zero contributions at t = 0 and at the missing index,
    //   a missing forecast error and a state carried forward at that index.
    fn missing_and_burned_observations_are_excluded() {
        let data = SSMData::new(array![1.0, 1.2, f64::NAN, 0.8, 1.1, 0.9]).expect("valid data");
        let init = Initialization::default();

        let out = kalman_filter(&local_level(0.1, 1.0), &init, &data, true, 1).unwrap();

        assert_eq!(out.nobs_effective, 4);
        assert_eq!(out.burn, 1);
        assert_eq!(out.llf_obs[0], 0.0);
        assert_eq!(out.llf_obs[2], 0.0);
        assert!(out.forecast_errors[2].is_nan());
        assert_relative_eq!(out.filtered_state[[2, 0]], out.filtered_state[[1, 0]]);
        assert_relative_eq!(out.scale, out.sum_sq_norm_errors / 4.0);
    }

    #[test]
    // Purpose
    // -------
    // A perfectly fitted series leaves nothing to concentrate.
    //
    // Given
    // -----
    // - A constant series with a known, exact initial state and no noise in
    //   the level, so every forecast error is zero.
    //
    // Expect
    // ------
    // - `DegenerateScale { value: 0 }` in concentrated mode only.
    fn zero_errors_are_degenerate() {
        let data = SSMData::new(array![2.0, 2.0, 2.0]).expect("valid data");
        let init = Initialization::known(array![2.0], array![[0.0]]).expect("valid");
        let repr = local_level(0.0, 1.0);

        let err = kalman_filter(&repr, &init, &data, true, 0).expect_err("degenerate scale");
        assert_eq!(err, SSMError::DegenerateScale { value: 0.0 });
        assert!(kalman_filter(&repr, &init, &data, false, 0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // The residual the approximate diffuse prior leaves on a constant series
    // is not a usable scale.
    //
    // Given
    // -----
    // - Twenty observations equal to 5, relative local level (1, 1), default
    //   approximate diffuse prior, burn = 1.
    //
    // Expect
    // ------
    // - Forecast errors are tiny but not exactly zero.
    // - `DegenerateScale` in concentrated mode; the full filter still runs.
    fn diffuse_residual_on_constant_series_is_degenerate() {
        let data = SSMData::new(Array1::from_elem(20, 5.0)).expect("valid data");
        let init = Initialization::default();
        let repr = local_level(1.0, 1.0);

        let err = kalman_filter(&repr, &init, &data, true, 1).expect_err("degenerate scale");
        let full = kalman_filter(&repr, &init, &data, false, 1).expect("full filter runs");

        match err {
            SSMError::DegenerateScale { value } => assert!(value > 0.0 && value < 1e-9),
            other => panic!("Unexpected variant: {other:?}"),
        }
        assert!(full.forecast_errors[1] != 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Zero forecast variance at an observed point is rejected; burning every
    // observation leaves no likelihood.
    fn invalid_variance_and_empty_likelihood() {
        let data = SSMData::new(array![1.0, 2.0]).expect("valid data");
        let init = Initialization::known(array![0.0], array![[0.0]]).expect("valid");

        let err = kalman_filter(&local_level(0.0, 0.0), &init, &data, false, 0).unwrap_err();
        assert_eq!(err, SSMError::NonPositiveForecastVariance { t: 0, value: 0.0 });

        let err = kalman_filter(&local_level(1.0, 1.0), &init, &data, false, 2).unwrap_err();
        assert!(matches!(err, SSMError::NoEffectiveObservations { burn: 2, nobs: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Standardized errors divide by the absolute forecast standard deviation.
    fn standardized_errors_use_scale() {
        let data = SSMData::new(array![1.0, 3.0, 2.0, 4.0]).expect("valid data");
        let init = Initialization::known(array![0.0], array![[1.0]]).expect("valid");
        let out = kalman_filter(&local_level(1.0, 1.0), &init, &data, true, 0).unwrap();

        let z = out.standardized_errors();

        let expected = out.forecast_errors[1] / (out.scale * out.forecast_error_cov[1]).sqrt();
        assert_relative_eq!(z[1], expected);
        assert_relative_eq!(z.mapv(|v| v * v).sum() / 4.0, 1.0, epsilon = 1e-12);
    }
}

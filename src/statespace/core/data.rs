//! Observation containers for univariate state-space models.
//!
//! Purpose
//! -------
//! Validate an observed series once, at the boundary where data enters the
//! state-space stack, so the filter and the models can rely on its
//! invariants without re-checking.
//!
//! Key behaviors
//! -------------
//! - [`SSMData::new`] rejects empty series, infinite values and series with no
//!   observed value at all.
//! - `NaN` entries are kept and mark missing observations; the Kalman filter
//!   skips their update step and excludes them from the likelihood.
//! - [`SSMData::difference`] applies simple and seasonal differencing for
//!   integrated ARIMA models.
//!
//! Invariants & assumptions
//! ------------------------
//! - `endog.len() > 0` and at least one entry is not `NaN`.
//! - No entry is `±∞`.
//! - `nobs_missing` equals the number of `NaN` entries.
use crate::statespace::errors::{SSMError, SSMResult};
use ndarray::Array1;

/// Validated observation series; `NaN` marks a missing value.
///
/// Fields
/// ------
/// - `endog`: `Array1<f64>`
///   Observed series `y_t`, `t = 0..n`.
/// - `nobs_missing`: `usize`
///   Number of `NaN` entries in `endog`.
#[derive(Debug, Clone, PartialEq)]
pub struct SSMData {
    /// Observed series (`NaN` = missing).
    pub endog: Array1<f64>,
    /// Count of missing entries.
    pub nobs_missing: usize,
}

impl SSMData {
    /// Construct a validated [`SSMData`] from raw observations.
    ///
    /// # Errors
    /// - `SSMError::EmptySeries` when `endog` is empty.
    /// - `SSMError::NonFiniteData { index, value }` for the first `±∞` entry.
    /// - `SSMError::AllMissing` when every entry is `NaN`.
    ///
    /// # Example
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_statespace::statespace::core::data::SSMData;
    /// let data = SSMData::new(array![1.0, f64::NAN, 0.5]).unwrap();
    /// assert_eq!(data.nobs(), 3);
    /// assert_eq!(data.nobs_missing, 1);
    /// ```
    pub fn new(endog: Array1<f64>) -> SSMResult<Self> {
        if endog.is_empty() {
            return Err(SSMError::EmptySeries);
        }
        let mut nobs_missing = 0;
        for (index, &value) in endog.iter().enumerate() {
            if value.is_nan() {
                nobs_missing += 1;
            } else if value.is_infinite() {
                return Err(SSMError::NonFiniteData { index, value });
            }
        }
        if nobs_missing == endog.len() {
            return Err(SSMError::AllMissing);
        }
        Ok(Self { endog, nobs_missing })
    }

    /// Total number of time points, including missing ones.
    pub fn nobs(&self) -> usize {
        self.endog.len()
    }

    /// Number of non-missing observations.
    pub fn nobs_observed(&self) -> usize {
        self.endog.len() - self.nobs_missing
    }

    /// Whether `y_t` is missing.
    pub fn is_missing(&self, t: usize) -> bool {
        self.endog[t].is_nan()
    }

    /// Sample mean and (population) variance of the observed entries.
    pub fn observed_moments(&self) -> (f64, f64) {
        let observed = self.endog.iter().filter(|v| !v.is_nan());
        let n = self.nobs_observed() as f64;
        let mean = observed.clone().sum::<f64>() / n;
        let var = observed.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        (mean, var)
    }

    /// Apply `(1 − L)^d (1 − L^s)^D` and drop the `d + s·D` leading values.
    ///
    /// A difference involving a missing value is missing.
    ///
    /// # Errors
    /// - `SSMError::InsufficientData` when fewer than one value would remain.
    /// - Any validation error of the differenced series (e.g. all missing).
    pub fn difference(&self, d: usize, seasonal_d: usize, s: usize) -> SSMResult<Self> {
        let lost = d + seasonal_d * s;
        if lost == 0 {
            return Ok(self.clone());
        }
        if self.nobs() <= lost {
            return Err(SSMError::InsufficientData { nobs: self.nobs(), required: lost + 1 });
        }
        let mut series = self.endog.to_vec();
        for _ in 0..seasonal_d {
            series = series.windows(s + 1).map(|w| w[s] - w[0]).collect();
        }
        for _ in 0..d {
            series = series.windows(2).map(|w| w[1] - w[0]).collect();
        }
        Self::new(Array1::from(series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction happy path and each rejection branch.
    // - Missing-value bookkeeping and observed moments.
    // - Simple and seasonal differencing, including missing propagation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // NaN entries are counted as missing, not rejected.
    fn new_counts_missing_values() {
        let data = SSMData::new(array![1.0, f64::NAN, f64::NAN, 2.0]).expect("valid data");
        assert_eq!(data.nobs(), 4);
        assert_eq!(data.nobs_missing, 2);
        assert_eq!(data.nobs_observed(), 2);
        assert!(data.is_missing(1));
        assert!(!data.is_missing(3));
    }

    #[test]
    // Purpose
    // -------
    // Empty, infinite and fully missing series are rejected.
    //
    // Expect
    // ------
    // - `EmptySeries`, `NonFiniteData { index: 1 }` and `AllMissing`.
    fn new_rejects_invalid_series() {
        assert_eq!(SSMData::new(Array1::zeros(0)), Err(SSMError::EmptySeries));
        assert!(matches!(
            SSMData::new(array![0.0, f64::NEG_INFINITY]),
            Err(SSMError::NonFiniteData { index: 1, .. })
        ));
        assert_eq!(SSMData::new(array![f64::NAN, f64::NAN]), Err(SSMError::AllMissing));
    }

    #[test]
    // Purpose
    // -------
    // Moments ignore missing entries.
    fn observed_moments_skip_missing() {
        let data = SSMData::new(array![1.0, f64::NAN, 3.0]).expect("valid data");
        let (mean, var) = data.observed_moments();
        assert_eq!(mean, 2.0);
        assert_eq!(var, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // First and seasonal differences match hand computations.
    //
    // Given
    // -----
    // - y = (1, 4, 9, 16, 25, 36) (squares).
    //
    // Expect
    // ------
    // - d = 1: (3, 5, 7, 9, 11); d = 2: (2, 2, 2, 2).
    // - D = 1, s = 2: (8, 12, 16, 20); then d = 1 on top: (4, 4, 4).
    fn difference_matches_hand_computation() {
        let data = SSMData::new(array![1.0, 4.0, 9.0, 16.0, 25.0, 36.0]).expect("valid data");
        assert_eq!(data.difference(1, 0, 0).unwrap().endog, array![3.0, 5.0, 7.0, 9.0, 11.0]);
        assert_eq!(data.difference(2, 0, 0).unwrap().endog, array![2.0, 2.0, 2.0, 2.0]);
        assert_eq!(data.difference(0, 1, 2).unwrap().endog, array![8.0, 12.0, 16.0, 20.0]);
        assert_eq!(data.difference(1, 1, 2).unwrap().endog, array![4.0, 4.0, 4.0]);
        assert_eq!(data.difference(0, 0, 12).unwrap(), data);
    }

    #[test]
    // Purpose
    // -------
    // Differences touching a missing value are missing; too short series fail.
    fn difference_propagates_missing_and_checks_length() {
        let data = SSMData::new(array![1.0, f64::NAN, 3.0, 5.0]).expect("valid data");
        let diff = data.difference(1, 0, 0).expect("differencing succeeds");
        assert!(diff.endog[0].is_nan() && diff.endog[1].is_nan());
        assert_eq!(diff.endog[2], 2.0);
        assert_eq!(diff.nobs_missing, 2);
        assert!(matches!(
            data.difference(0, 1, 4),
            Err(SSMError::InsufficientData { nobs: 4, required: 5 })
        ));
    }
}

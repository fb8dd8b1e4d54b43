//! Errors for linear Gaussian state-space models (data validation, system
//! matrices, initialization, filtering, concentration and estimation).
//!
//! [`SSMError`] is the single error type of the `statespace` module. It
//! implements `Display`/`Error`, converts into
//! [`OptError`](crate::optimization::errors::OptError) when raised inside an
//! objective, converts back when optimizer failures reach the fitting layer,
//! and maps to a Python `ValueError` under the `python-bindings` feature.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - `NaN` observations are *missing*, never an error; `±∞` is rejected.
//! - Optimizer/backend failures that have no model-level meaning are
//!   normalized to [`SSMError::OptimizationFailed`].
use crate::optimization::errors::OptError;
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for state-space operations.
pub type SSMResult<T> = Result<T, SSMError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SSMError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// A data point is ±inf (NaN marks a missing value and is allowed).
    NonFiniteData { index: usize, value: f64 },

    /// Every observation is missing.
    AllMissing,

    /// Not enough observations for the requested model.
    InsufficientData { nobs: usize, required: usize },

    // ---- Representation ----
    /// State dimension and number of state disturbances must be ≥ 1.
    InvalidStateDimension { k_states: usize, k_posdef: usize },

    /// Unknown system matrix name.
    UnknownMatrix { name: String },

    /// Index outside a system matrix.
    IndexOutOfBounds { matrix: &'static str, row: usize, col: usize, shape: (usize, usize) },

    /// Matrix or vector with the wrong shape.
    ShapeMismatch { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    /// System matrix entry must be finite.
    NonFiniteMatrix { matrix: &'static str, row: usize, col: usize, value: f64 },

    /// A variance entry in `obs_cov` / `state_cov` is negative.
    NegativeVariance { matrix: &'static str, index: usize, value: f64 },

    // ---- Initialization ----
    /// Approximate diffuse variance must be finite and > 0.
    InvalidDiffuseVariance { value: f64 },

    /// Stationary initialization requested for a non-stationary transition.
    NonStationaryInit,

    /// A linear system in the initialization could not be solved.
    SingularSystem { context: &'static str },

    // ---- Parameters / model specification ----
    /// Parameter vector has the wrong length.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// Parameter is NaN/±inf.
    NonFiniteParam { index: usize, value: f64 },

    /// Model-space parameter outside its admissible region.
    InvalidParam { name: String, value: f64, reason: &'static str },

    /// Model order / normalization combination is not supported.
    InvalidSpecification { reason: String },

    // ---- Filtering / concentration ----
    /// Forecast error variance F_t was non-positive or non-finite.
    NonPositiveForecastVariance { t: usize, value: f64 },

    /// No observation enters the likelihood (all missing or burned).
    NoEffectiveObservations { burn: usize, nobs: usize },

    /// Σ v²/F is zero or non-finite so the scale cannot be concentrated out.
    DegenerateScale { value: f64 },

    // ---- Estimation / forecasting ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Forecast horizon must be ≥ 1.
    InvalidHorizon { horizon: usize },

    /// Confidence-interval significance level must lie in (0, 1).
    InvalidAlpha { alpha: f64 },

    /// Two fits compared for equivalence do not describe the same model.
    IncompatibleFormulations { reason: String },
}

impl std::error::Error for SSMError {}

impl std::fmt::Display for SSMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            SSMError::EmptySeries => write!(f, "Input series is empty."),
            SSMError::NonFiniteData { index, value } => {
                write!(f, "Data point at index {index} is infinite: {value}")
            }
            SSMError::AllMissing => write!(f, "Every observation in the series is missing."),
            SSMError::InsufficientData { nobs, required } => {
                write!(f, "Model needs at least {required} observations; got {nobs}.")
            }

            // ---- Representation ----
            SSMError::InvalidStateDimension { k_states, k_posdef } => write!(
                f,
                "State dimension ({k_states}) and disturbance dimension ({k_posdef}) must be >= 1."
            ),
            SSMError::UnknownMatrix { name } => write!(f, "Unknown system matrix '{name}'."),
            SSMError::IndexOutOfBounds { matrix, row, col, shape } => write!(
                f,
                "Index ({row}, {col}) is out of bounds for '{matrix}' with shape {shape:?}."
            ),
            SSMError::ShapeMismatch { name, expected, actual } => {
                write!(f, "'{name}' must have shape {expected:?}; got {actual:?}.")
            }
            SSMError::NonFiniteMatrix { matrix, row, col, value } => {
                write!(f, "Entry ({row}, {col}) of '{matrix}' is non-finite: {value}")
            }
            SSMError::NegativeVariance { matrix, index, value } => {
                write!(f, "Variance {index} of '{matrix}' is negative: {value}")
            }

            // ---- Initialization ----
            SSMError::InvalidDiffuseVariance { value } => {
                write!(f, "Approximate diffuse variance must be finite and > 0; got {value}.")
            }
            SSMError::NonStationaryInit => write!(
                f,
                "Stationary initialization requires all transition eigenvalues inside the unit circle."
            ),
            SSMError::SingularSystem { context } => {
                write!(f, "Singular linear system while computing the {context}.")
            }

            // ---- Parameters / model specification ----
            SSMError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector must have length {expected}; got {actual}.")
            }
            SSMError::NonFiniteParam { index, value } => {
                write!(f, "Parameter at index {index} is non-finite: {value}")
            }
            SSMError::InvalidParam { name, value, reason } => {
                write!(f, "Invalid value {value} for parameter '{name}': {reason}")
            }
            SSMError::InvalidSpecification { reason } => {
                write!(f, "Invalid model specification: {reason}")
            }

            // ---- Filtering / concentration ----
            SSMError::NonPositiveForecastVariance { t, value } => {
                write!(f, "Forecast error variance at t = {t} must be finite and > 0; got {value}")
            }
            SSMError::NoEffectiveObservations { burn, nobs } => write!(
                f,
                "No observations enter the likelihood (burn = {burn}, observed = {nobs})."
            ),
            SSMError::DegenerateScale { value } => write!(
                f,
                "Cannot concentrate the scale: sum of normalized squared errors is {value}."
            ),

            // ---- Estimation / forecasting ----
            SSMError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            SSMError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be >= 1; got {horizon}.")
            }
            SSMError::InvalidAlpha { alpha } => {
                write!(f, "Significance level must lie in (0, 1); got {alpha}.")
            }
            SSMError::IncompatibleFormulations { reason } => {
                write!(f, "Formulations cannot be compared: {reason}")
            }
        }
    }
}

impl From<OptError> for SSMError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::ThetaLengthMismatch { expected, actual } => {
                SSMError::ParamLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                SSMError::NonFiniteParam { index, value }
            }
            OptError::NonPositiveForecastVariance { t, value } => {
                SSMError::NonPositiveForecastVariance { t, value }
            }
            OptError::DegenerateScale { value } => SSMError::DegenerateScale { value },
            OptError::NonStationaryInit => SSMError::NonStationaryInit,
            OptError::Model(err) => err,
            other => SSMError::OptimizationFailed { status: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<SSMError> for PyErr {
    fn from(err: SSMError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

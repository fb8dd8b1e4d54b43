//! rust_statespace — linear Gaussian state-space models with a concentrated
//! scale, and optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the state-space models to Python via the `_rust_statespace`
//! extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`statespace`] (data, filter, models),
//!   [`optimization`] (argmin-backed MLE and parameter transforms) and
//!   [`inference`] (observed-information standard errors).
//! - With `python-bindings`, define `#[pyclass]` wrappers for the local level
//!   and SARIMAX models and their fit results, registered under the
//!   `rust_statespace.models` submodule.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion and error mapping.
//! - Errors travel as [`statespace::SSMError`] and become Python
//!   `ValueError`s at the boundary.
//!
//! Downstream usage
//! ----------------
//! ```rust,no_run
//! use ndarray::array;
//! use rust_statespace::statespace::prelude::*;
//!
//! let data = SSMData::new(array![4.4, 4.0, 3.5, 3.8, 4.6, 5.1, 4.9, 5.5]).unwrap();
//! let model = LocalLevel::new(ScaleNormalization::Irregular);
//! let res = fit(&model, &data, &FitOptions::default()).unwrap();
//! println!("{res}");
//! ```

pub mod inference;
pub mod optimization;
pub mod statespace;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statespace::{
        FitResults, LocalLevel, Sarimax, ScaleNormalization, StateSpaceModel, fit, loglike,
    },
    utils::{build_fit_options, extract_owned_array, extract_ssm_data},
};

/// Shared body of the `fit` methods: convert inputs, fit, wrap results.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
fn fit_model<'py, M: StateSpaceModel>(
    py: Python<'py>, model: &M, endog: &Bound<'py, PyAny>, start_params: Option<&Bound<'py, PyAny>>,
    scale_estimation: Option<&str>, std_errors: Option<bool>, tol_grad: Option<f64>,
    tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<StateSpaceResults> {
    let data = extract_ssm_data(py, endog)?;
    let opts = build_fit_options(
        py,
        tol_grad,
        tol_cost,
        max_iter,
        line_searcher,
        lbfgs_mem,
        verbose,
        scale_estimation,
        std_errors,
        start_params,
    )?;
    let inner = fit(model, &data, &opts)?;
    Ok(StateSpaceResults { inner })
}

#[cfg(feature = "python-bindings")]
fn loglike_model<'py, M: StateSpaceModel>(
    py: Python<'py>, model: &M, endog: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let data = extract_ssm_data(py, endog)?;
    let params = extract_owned_array(py, params, "params")?;
    Ok(loglike(model, &data, &params)?)
}

/// LocalLevel — Python-facing random walk plus noise model.
///
/// Constructed via `LocalLevel(normalization=None)` where `normalization` is
/// `"none"` (both variances free), `"level"` (state variance is the
/// concentrated scale) or `"irregular"` (observation variance is the scale).
#[cfg(feature = "python-bindings")]
#[pyclass(name = "LocalLevel", module = "rust_statespace.models")]
pub struct PyLocalLevel {
    pub inner: LocalLevel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyLocalLevel {
    #[new]
    #[pyo3(signature = (normalization = None), text_signature = "(normalization=None)")]
    pub fn new(normalization: Option<&str>) -> PyResult<Self> {
        let normalization = match normalization {
            Some(name) => name.parse::<ScaleNormalization>()?,
            None => ScaleNormalization::None,
        };
        Ok(PyLocalLevel { inner: LocalLevel::new(normalization) })
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.inner.param_names()
    }

    #[pyo3(
        signature = (
            endog,
            start_params = None,
            scale_estimation = None,
            std_errors = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, endog, /, start_params=None, scale_estimation='as_specified', \
                          std_errors=True, tol_grad=1e-6, tol_cost=1e-12, max_iter=500, \
                          line_searcher='MoreThuente', lbfgs_mem=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn fit<'py>(
        &self, py: Python<'py>, endog: &Bound<'py, PyAny>, start_params: Option<&Bound<'py, PyAny>>,
        scale_estimation: Option<&str>, std_errors: Option<bool>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<StateSpaceResults> {
        fit_model(
            py,
            &self.inner,
            endog,
            start_params,
            scale_estimation,
            std_errors,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
        )
    }

    #[pyo3(text_signature = "(self, endog, params)")]
    pub fn loglike<'py>(
        &self, py: Python<'py>, endog: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
    ) -> PyResult<f64> {
        loglike_model(py, &self.inner, endog, params)
    }
}

/// SARIMAX — Python-facing seasonal ARIMA model.
///
/// Constructed via `SARIMAX(order, seasonal_order=(0, 0, 0, 0),
/// measurement_error=False, enforce_stationarity=True,
/// enforce_invertibility=True, concentrate_scale=False)`.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "SARIMAX", module = "rust_statespace.models")]
pub struct PySarimax {
    pub inner: Sarimax,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PySarimax {
    #[new]
    #[pyo3(
        signature = (
            order,
            seasonal_order = None,
            measurement_error = None,
            enforce_stationarity = None,
            enforce_invertibility = None,
            concentrate_scale = None,
        ),
        text_signature = "(order, /, seasonal_order=(0, 0, 0, 0), measurement_error=False, \
                          enforce_stationarity=True, enforce_invertibility=True, \
                          concentrate_scale=False)"
    )]
    pub fn new(
        order: (usize, usize, usize), seasonal_order: Option<(usize, usize, usize, usize)>,
        measurement_error: Option<bool>, enforce_stationarity: Option<bool>,
        enforce_invertibility: Option<bool>, concentrate_scale: Option<bool>,
    ) -> PyResult<Self> {
        let inner = Sarimax::new(order, seasonal_order.unwrap_or((0, 0, 0, 0)))?
            .with_measurement_error(measurement_error.unwrap_or(false))
            .with_enforce_stationarity(enforce_stationarity.unwrap_or(true))
            .with_enforce_invertibility(enforce_invertibility.unwrap_or(true))
            .with_concentrate_scale(concentrate_scale.unwrap_or(false));
        Ok(PySarimax { inner })
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.inner.param_names()
    }

    #[getter]
    pub fn k_states(&self) -> usize {
        self.inner.k_states()
    }

    #[pyo3(
        signature = (
            endog,
            start_params = None,
            scale_estimation = None,
            std_errors = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = None,
        ),
        text_signature = "(self, endog, /, start_params=None, scale_estimation='as_specified', \
                          std_errors=True, tol_grad=1e-6, tol_cost=1e-12, max_iter=500, \
                          line_searcher='MoreThuente', lbfgs_mem=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn fit<'py>(
        &self, py: Python<'py>, endog: &Bound<'py, PyAny>, start_params: Option<&Bound<'py, PyAny>>,
        scale_estimation: Option<&str>, std_errors: Option<bool>, tol_grad: Option<f64>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        lbfgs_mem: Option<usize>, verbose: Option<bool>,
    ) -> PyResult<StateSpaceResults> {
        fit_model(
            py,
            &self.inner,
            endog,
            start_params,
            scale_estimation,
            std_errors,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
        )
    }

    #[pyo3(text_signature = "(self, endog, params)")]
    pub fn loglike<'py>(
        &self, py: Python<'py>, endog: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
    ) -> PyResult<f64> {
        loglike_model(py, &self.inner, endog, params)
    }
}

/// StateSpaceResults — read-only view of a [`FitResults`] for Python.
///
/// Instances are created by the models' `fit` methods. Vector-valued
/// accessors copy into Python lists.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_statespace.models")]
pub struct StateSpaceResults {
    pub inner: FitResults,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StateSpaceResults {
    #[getter]
    pub fn params(&self) -> Vec<f64> {
        self.inner.params.to_vec()
    }

    #[getter]
    pub fn param_names(&self) -> Vec<String> {
        self.inner.param_names.clone()
    }

    #[getter]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    #[getter]
    pub fn concentrated(&self) -> bool {
        self.inner.concentrated
    }

    #[getter]
    pub fn scale_fallback(&self) -> bool {
        self.inner.scale_fallback
    }

    #[getter]
    pub fn llf(&self) -> f64 {
        self.inner.llf
    }

    #[getter]
    pub fn nobs_effective(&self) -> usize {
        self.inner.nobs_effective
    }

    #[getter]
    pub fn aic(&self) -> f64 {
        self.inner.aic
    }

    #[getter]
    pub fn bic(&self) -> f64 {
        self.inner.bic
    }

    #[getter]
    pub fn hqic(&self) -> f64 {
        self.inner.hqic
    }

    #[getter]
    pub fn bse(&self) -> Option<Vec<f64>> {
        self.inner.bse.as_ref().map(|b| b.to_vec())
    }

    #[getter]
    pub fn pvalues(&self) -> Option<Vec<f64>> {
        self.inner.pvalues().map(|p| p.to_vec())
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations()
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.optim.status.clone()
    }

    #[getter]
    pub fn standardized_errors(&self) -> Vec<f64> {
        self.inner.filter_output.standardized_errors().to_vec()
    }

    /// `(mean, variance, lower, upper)` for steps `1..=horizon`.
    #[pyo3(signature = (horizon, alpha = 0.05), text_signature = "(self, horizon, /, alpha=0.05)")]
    #[allow(clippy::type_complexity)]
    pub fn forecast(
        &self, horizon: usize, alpha: f64,
    ) -> PyResult<(Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> {
        let fc = self.inner.forecast(horizon, alpha)?;
        Ok((fc.mean.to_vec(), fc.variance.to_vec(), fc.lower.to_vec(), fc.upper.to_vec()))
    }

    pub fn summary(&self) -> String {
        self.inner.to_string()
    }
}

/// _rust_statespace — PyO3 module initializer.
///
/// Creates the `models` submodule, attaches it to the extension module and
/// registers it in `sys.modules` so `rust_statespace.models` imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_statespace<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(_py, "models")?;
    models(_py, m, &models_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_statespace.models", models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn models<'py>(
    _py: Python, rust_statespace: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyLocalLevel>()?;
    m.add_class::<PySarimax>()?;
    m.add_class::<StateSpaceResults>()?;
    rust_statespace.add_submodule(m)?;
    Ok(())
}

//! utils — conversions between Python objects and the Rust state-space API.
//!
//! Everything here is compiled only with the `python-bindings` feature and is
//! used by the `#[pyclass]` wrappers in the crate root.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    statespace::{
        core::{
            data::SSMData,
            options::{FitOptions, ScaleEstimation},
        },
        errors::SSMError,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a 1-D `numpy.ndarray`, a `pandas.Series` or any float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy an array-like into an owned `Array1<f64>`; `what` names the argument
/// in error messages.
#[cfg(feature = "python-bindings")]
pub fn extract_owned_array<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, what: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{what} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Observations with `NaN` marking missing values.
#[cfg(feature = "python-bindings")]
pub fn extract_ssm_data<'py>(py: Python<'py>, endog: &Bound<'py, PyAny>) -> PyResult<SSMData> {
    let series = extract_owned_array(py, endog, "endog")?;
    Ok(SSMData::new(series)?)
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let defaults = Tolerances::default();
    let tols = Tolerances::new(
        tol_grad.or(defaults.tol_grad),
        tol_cost.or(defaults.tol_cost),
        max_iter.or(defaults.max_iter),
    )
    .map_err(SSMError::from)?;

    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(SSMError::from)?,
        None => LineSearcher::MoreThuente,
    };

    let opts =
        MLEOptions::new(tols, ls, verbose.unwrap_or(false), lbfgs_mem).map_err(SSMError::from)?;

    Ok(opts)
}

/// Build [`FitOptions`] from the keyword arguments shared by every model's
/// `fit` method.
#[cfg(feature = "python-bindings")]
pub fn build_fit_options<'py>(
    py: Python<'py>, tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
    scale_estimation: Option<&str>, std_errors: Option<bool>,
    start_params: Option<&Bound<'py, PyAny>>,
) -> PyResult<FitOptions> {
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;
    let scale_estimation = match scale_estimation {
        Some(name) => name.parse::<ScaleEstimation>()?,
        None => ScaleEstimation::AsSpecified,
    };
    let start_params = match start_params {
        Some(raw) => Some(extract_owned_array(py, raw, "start_params")?),
        None => None,
    };
    Ok(FitOptions::new(mle_opts, scale_estimation, std_errors.unwrap_or(true), start_params)?)
}

//! loglik_optimizer::validation — shared consistency checks.
//!
//! Tolerance checks run when options are built; gradient, Hessian, estimate
//! and objective checks run around every solver call. Each failure maps to a
//! dedicated [`OptError`] variant carrying the offending index and value.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Accept `None`, otherwise require a finite, strictly positive tolerance.
///
/// # Errors
/// [`OptError::InvalidTolGrad`].
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match check_tolerance(tol) {
        Some(reason) => Err(OptError::InvalidTolGrad { tol: tol.unwrap_or(f64::NAN), reason }),
        None => Ok(()),
    }
}

/// Same rule as [`verify_tol_grad`] for the cost-change tolerance.
///
/// # Errors
/// [`OptError::InvalidTolCost`].
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match check_tolerance(tol) {
        Some(reason) => Err(OptError::InvalidTolCost { tol: tol.unwrap_or(f64::NAN), reason }),
        None => Ok(()),
    }
}

/// Length must equal `dim` and every entry must be finite.
///
/// # Errors
/// [`OptError::GradientDimMismatch`] or [`OptError::InvalidGradient`] for the
/// first offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    if let Some((index, &value)) = grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        });
    }
    Ok(())
}

/// Unwrap the solver's best parameter vector, requiring finite entries.
///
/// # Errors
/// [`OptError::MissingThetaHat`] or [`OptError::InvalidThetaHat`].
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// A log-likelihood value must be finite; its sign is unrestricted.
///
/// # Errors
/// [`OptError::NonFiniteCost`].
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Hessians must be `dim × dim` with finite entries.
///
/// # Errors
/// [`OptError::HessianDimMismatch`] or [`OptError::InvalidHessian`] with the
/// row/column of the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}

// ---- Helper methods ----

fn check_tolerance(tol: Option<f64>) -> Option<&'static str> {
    match tol {
        Some(t) if !t.is_finite() => Some("Tolerance must be finite."),
        Some(t) if t <= 0.0 => Some("Tolerance must be positive."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    // Purpose
    // -------
    // Tolerances accept `None` and positive finite values only.
    fn tolerance_checks() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-12)).is_ok());
        assert!(matches!(
            verify_tol_grad(Some(0.0)),
            Err(OptError::InvalidTolGrad { reason: "Tolerance must be positive.", .. })
        ));
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)),
            Err(OptError::InvalidTolCost { reason: "Tolerance must be finite.", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Gradient and estimate checks report the first offending index.
    //
    // Given
    // -----
    // - A gradient of the wrong length and one with a NaN at index 1.
    // - A missing and a non-finite `theta_hat`.
    //
    // Expect
    // ------
    // - The matching variants with the recorded positions.
    fn vector_checks_report_position() {
        assert_eq!(
            validate_grad(&array![1.0], 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_grad(&array![1.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, 0.0, f64::INFINITY])),
            Err(OptError::InvalidThetaHat { index: 2, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.5])), Ok(array![0.5]));
    }

    #[test]
    // Purpose
    // -------
    // Hessian checks cover shape and finiteness; objective checks finiteness.
    fn hessian_and_value_checks() {
        let mut h = Array2::<f64>::eye(2);
        assert!(validate_hessian(&h, 2).is_ok());
        assert!(matches!(validate_hessian(&h, 3), Err(OptError::HessianDimMismatch { .. })));
        h[[1, 0]] = f64::NAN;
        assert!(matches!(
            validate_hessian(&h, 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
        assert!(validate_value(-1234.5).is_ok());
        assert!(validate_value(f64::NAN).is_err());
    }
}

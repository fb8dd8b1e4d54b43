//! inference::hessian — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn a fitted likelihood into per-parameter standard errors: build the
//! observed information as the finite-difference Hessian of the negative
//! average log-likelihood, then take the diagonal of its pseudoinverse.
//!
//! Key behaviors
//! -------------
//! - [`compute_hessian`] supplies the matrix (scaled steps, validated and
//!   symmetrized).
//! - The `ndarray` matrix is copied into a `nalgebra::DMatrix` and decomposed
//!   with `symmetric_eigen`; no explicit inverse is formed.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped, which inflates the
//!   standard errors along weakly identified directions instead of failing.
//!
//! Conventions
//! -----------
//! - The objective is the **negative average** log-likelihood, so the returned
//!   errors are on the per-observation scale. Divide by `√n_eff` for the
//!   sampling standard errors of the estimates (the model layer does this).
//! - The parameters are whatever vector `theta_hat` is; the state-space layer
//!   passes model-space parameters so no delta method is needed.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Standard errors `√diag(J⁺)` where `J` is the Hessian of `f` at `theta_hat`.
///
/// `f` should be the negative average log-likelihood so that `J` is the
/// observed information matrix on the average scale.
///
/// # Errors
/// Propagates Hessian validation failures from [`compute_hessian`].
///
/// # Example
/// ```rust
/// # use ndarray::array;
/// # use rust_statespace::inference::hessian::calc_standard_errors;
/// // f(θ) = 2 θ₀² + ½ θ₁² has information diag(4, 1).
/// let f = |theta: &ndarray::Array1<f64>| 2.0 * theta[0] * theta[0] + 0.5 * theta[1] * theta[1];
/// let se = calc_standard_errors(&f, &array![1.0, -1.0]).unwrap();
/// assert!((se[0] - 0.5).abs() < 1e-5);
/// assert!((se[1] - 1.0).abs() < 1e-5);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> f64>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    Ok(solve_for_se(to_dmatrix(&obs_info)))
}

// ---- Helper methods ----

fn to_dmatrix(obs_info: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(obs_info.nrows(), obs_info.ncols(), |i, j| obs_info[[i, j]])
}

/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k` for `J = Q Λ Qᵀ`.
fn solve_for_se(obs_info_nalg: DMatrix<f64>) -> Array1<f64> {
    let n = obs_info_nalg.nrows();
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    Array1::from_iter((0..n).map(|i| {
        eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Classical SEs for quadratics with known information matrices.
    // - Truncation of non-positive eigen-directions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A correlated quadratic reproduces the diagonal of the analytic inverse.
    //
    // Given
    // -----
    // - f(θ) = ½ θᵀ A θ with A = [[2, 1], [1, 2]], so A⁻¹ = ⅓ [[2, −1], [−1, 2]].
    //
    // Expect
    // ------
    // - SE = √(2/3) for both parameters.
    fn correlated_quadratic_matches_inverse_diagonal() {
        // Arrange
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Array1<f64>| 0.5 * theta.dot(&a.dot(theta));

        // Act
        let se = calc_standard_errors(&f, &array![0.3, -0.7]).expect("SEs should exist");

        // Assert
        let expected = (2.0_f64 / 3.0).sqrt();
        assert!((se[0] - expected).abs() < 1e-5);
        assert!((se[1] - expected).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // A flat direction contributes nothing instead of producing infinities.
    //
    // Given
    // -----
    // - Information diag(4, 0) supplied directly.
    //
    // Expect
    // ------
    // - SE = [0.5, 0.0], all finite.
    fn flat_direction_is_truncated() {
        let se = solve_for_se(DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 0.0]));
        assert!((se[0] - 0.5).abs() < 1e-12);
        assert_eq!(se[1], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The `ndarray` → `nalgebra` copy preserves every entry.
    fn to_dmatrix_copies_entries() {
        let m = to_dmatrix(&array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m[(1, 1)], 4.0);
    }
}

//! Parameter transforms between optimizer space and model space.
//!
//! The optimizer searches over unconstrained reals. State-space models need
//! non-negative variances, stationary autoregressive polynomials and
//! invertible moving-average polynomials, so every free parameter passes
//! through one of the maps below before it reaches the system matrices.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue cutoff for pseudoinverses in inference code.
//! - [`constrain_variance`] / [`unconstrain_variance`]: `x ↦ x²` and its
//!   inverse on `[0, ∞)`.
//! - [`constrain_stationary_univariate`] / [`unconstrain_stationary_univariate`]:
//!   map ℝⁿ onto the coefficients of a stationary AR(n) polynomial
//!   `1 − φ₁L − … − φₙLⁿ` through partial autocorrelations (Monahan 1984,
//!   Jones 1980), and back.

use ndarray::{Array1, Array2};

/// Eigenvalues at or below this value are treated as zero when inverting an
/// observed information matrix.
pub const EIGEN_EPS: f64 = 1e-12;

/// Largest partial autocorrelation magnitude accepted by
/// [`unconstrain_stationary_univariate`]; values are clipped to it so the
/// inverse map stays finite on the boundary.
pub const PACF_BOUND: f64 = 1.0 - 1e-10;

/// Map an unconstrained real onto a non-negative variance: `x ↦ x²`.
#[inline]
pub fn constrain_variance(x: f64) -> f64 {
    x * x
}

/// Inverse of [`constrain_variance`] on `[0, ∞)`: `σ² ↦ √σ²`.
///
/// Negative inputs are clamped to zero.
#[inline]
pub fn unconstrain_variance(sigma2: f64) -> f64 {
    sigma2.max(0.0).sqrt()
}

/// Map `n` unconstrained reals onto the coefficients `φ₁..φₙ` of a stationary
/// AR polynomial `1 − Σ φᵢ Lⁱ`.
///
/// Each input becomes `rₖ = xₖ / √(1 + xₖ²)` in `(−1, 1)` and `−rₖ` is used
/// as the k-th partial autocorrelation; the Durbin–Levinson recursion then
/// turns the partial autocorrelations into polynomial coefficients. Every
/// output is stationary and every stationary polynomial is reachable.
///
/// An MA polynomial `1 + Σ θᵢ Lⁱ` is made invertible with `θ = −φ`.
///
/// # Example
/// ```rust
/// # use rust_statespace::optimization::numerical_stability::constrain_stationary_univariate;
/// let phi = constrain_stationary_univariate(&[0.0]);
/// assert_eq!(phi[0], 0.0);
/// ```
pub fn constrain_stationary_univariate(unconstrained: &[f64]) -> Array1<f64> {
    let n = unconstrained.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    let pacf: Vec<f64> = unconstrained.iter().map(|&x| x / (1.0 + x * x).sqrt()).collect();
    let mut y = Array2::<f64>::zeros((n, n));
    for k in 0..n {
        for i in 0..k {
            y[[k, i]] = y[[k - 1, i]] + pacf[k] * y[[k - 1, k - i - 1]];
        }
        y[[k, k]] = pacf[k];
    }
    y.row(n - 1).mapv(|v| -v)
}

/// Inverse of [`constrain_stationary_univariate`].
///
/// Runs the Durbin–Levinson recursion backwards to recover the partial
/// autocorrelations, clips them into `[−PACF_BOUND, PACF_BOUND]` and maps
/// each through `r ↦ r / √(1 − r²)`. Inputs that are not stationary are not
/// rejected; they produce the unconstrained vector of the clipped path.
pub fn unconstrain_stationary_univariate(constrained: &[f64]) -> Array1<f64> {
    let n = constrained.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    let mut y = Array2::<f64>::zeros((n, n));
    for (i, &c) in constrained.iter().enumerate() {
        y[[n - 1, i]] = -c;
    }
    for k in (1..n).rev() {
        let r_k = y[[k, k]].clamp(-PACF_BOUND, PACF_BOUND);
        let denom = 1.0 - r_k * r_k;
        for i in 0..k {
            y[[k - 1, i]] = (y[[k, i]] - r_k * y[[k, k - i - 1]]) / denom;
        }
    }
    Array1::from_iter((0..n).map(|k| {
        let r = y[[k, k]].clamp(-PACF_BOUND, PACF_BOUND);
        r / (1.0 - r * r).sqrt()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Variance maps and their clamping.
    // - Closed forms of the stationarity map for orders 1 and 2.
    // - Round trips through the stationarity map and its inverse.
    // - Stationarity of mapped AR(2) polynomials via the triangle conditions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `x ↦ x²` and its inverse agree on non-negative inputs; negatives clamp.
    fn variance_maps_invert_each_other() {
        for &s in &[0.0, 1e-8, 0.3, 2.5, 1e4] {
            assert_relative_eq!(constrain_variance(unconstrain_variance(s)), s, max_relative = 1e-12);
        }
        assert_eq!(unconstrain_variance(-1.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Order one is the negated PACF map `φ = −x / √(1 + x²)`.
    //
    // Given
    // -----
    // - x = 1 and x = −3.
    //
    // Expect
    // ------
    // - φ = −1/√2 and φ = 3/√10.
    fn order_one_matches_closed_form() {
        assert_relative_eq!(
            constrain_stationary_univariate(&[1.0])[0],
            -1.0 / 2.0_f64.sqrt(),
            epsilon = 1e-15
        );
        assert_relative_eq!(
            constrain_stationary_univariate(&[-3.0])[0],
            3.0 / 10.0_f64.sqrt(),
            epsilon = 1e-15
        );
    }

    #[test]
    // Purpose
    // -------
    // Order two follows Durbin–Levinson with partial autocorrelations −r₁, −r₂:
    // φ₂ = −r₂, φ₁ = −r₁ (1 + r₂).
    fn order_two_matches_durbin_levinson() {
        let x = [0.5, -0.8];
        let r1 = 0.5 / (1.25_f64).sqrt();
        let r2 = -0.8 / (1.64_f64).sqrt();

        let phi = constrain_stationary_univariate(&x);

        assert_relative_eq!(phi[1], -r2, epsilon = 1e-14);
        assert_relative_eq!(phi[0], -r1 * (1.0 + r2), epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Mapped AR(2) coefficients always satisfy the stationarity triangle
    // φ₂ + φ₁ < 1, φ₂ − φ₁ < 1, |φ₂| < 1, including for large inputs.
    fn mapped_ar2_is_stationary() {
        for &a in &[-50.0, -2.0, -0.1, 0.0, 0.7, 5.0, 40.0] {
            for &b in &[-30.0, -1.0, 0.0, 0.4, 3.0, 25.0] {
                let phi = constrain_stationary_univariate(&[a, b]);
                assert!(phi[1] + phi[0] < 1.0, "a={a}, b={b}, phi={phi:?}");
                assert!(phi[1] - phi[0] < 1.0, "a={a}, b={b}, phi={phi:?}");
                assert!(phi[1].abs() < 1.0, "a={a}, b={b}, phi={phi:?}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The inverse recovers the unconstrained input for moderate orders.
    //
    // Given
    // -----
    // - Unconstrained vectors of length 1, 3 and 4 with mixed signs.
    //
    // Expect
    // ------
    // - unconstrain(constrain(x)) ≈ x.
    fn stationarity_map_round_trips() {
        for x in [vec![0.3], vec![-1.2, 0.4, 0.9], vec![0.1, -0.2, 0.3, -0.4]] {
            let back = unconstrain_stationary_univariate(
                constrain_stationary_univariate(&x).as_slice().expect("contiguous"),
            );
            for (a, b) in x.iter().zip(back.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Empty inputs map to empty outputs.
    fn empty_inputs_are_passed_through() {
        assert_eq!(constrain_stationary_univariate(&[]).len(), 0);
        assert_eq!(unconstrain_stationary_univariate(&[]).len(), 0);
    }
}

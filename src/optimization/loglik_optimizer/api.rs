//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the objective in an [`ArgMinAdapter`] (which *minimizes*
//! `-ℓ(θ)`), and delegates the run to [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` using L-BFGS with the line search chosen in `opts`.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Builds the solver from `opts` and runs it from `theta0`.
///
/// # Errors
/// - Propagates errors from `f.check`, from the solver builders, and from the
///   run itself (objective failures, line-search failures, invalid outcome).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_statespace::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta},
/// };
///
/// struct Quadratic;
/// impl LogLikelihood for Quadratic {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Quadratic, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_statespace::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptError, loglik_optimizer::Tolerances};
    use approx::assert_relative_eq;
    use ndarray::array;

    // Concave quadratic ℓ(θ) = -Σ (θ_i - c_i)² with known maximizer `c`.
    struct ShiftedQuadratic;

    impl LogLikelihood for ShiftedQuadratic {
        type Data = Theta;

        fn value(&self, theta: &Theta, center: &Theta) -> OptResult<f64> {
            let diff = theta - center;
            Ok(-diff.dot(&diff))
        }

        fn check(&self, theta: &Theta, center: &Theta) -> OptResult<()> {
            if theta.len() != center.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: center.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the maximizer of a concave quadratic using
    // finite-difference gradients.
    //
    // Given
    // -----
    // - ℓ(θ) = -||θ - c||² with c = (1, -2).
    //
    // Expect
    // ------
    // - θ̂ ≈ c and ℓ(θ̂) ≈ 0 for both line searchers.
    fn maximize_recovers_quadratic_optimum() {
        let center = array![1.0, -2.0];
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let opts = MLEOptions::new(Tolerances::default(), ls, false, None).unwrap();
            let out = maximize(&ShiftedQuadratic, array![0.0, 0.0], &center, &opts)
                .expect("quadratic should be maximized");
            assert_relative_eq!(out.theta_hat[0], 1.0, epsilon = 1e-5);
            assert_relative_eq!(out.theta_hat[1], -2.0, epsilon = 1e-5);
            assert!(out.value.abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the solver and its error is surfaced unchanged.
    fn maximize_propagates_check_error() {
        let center = array![1.0, -2.0];
        let err = maximize(&ShiftedQuadratic, array![0.0], &center, &MLEOptions::default())
            .expect_err("length mismatch should be rejected");
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 1 });
    }
}

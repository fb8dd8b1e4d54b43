//! loglik_optimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the state-space likelihoods with the line search
//! chosen in [`MLEOptions`], applying gradient and cost-change tolerances in
//! one place.
//!
//! Conventions
//! -----------
//! - Builders never set `theta0` or `max_iters`; [`run_lbfgs`](super::run::run_lbfgs)
//!   owns those runtime settings.
//! - The history size is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`] when unset.
//! - Argmin's tolerance errors surface as `OptError` through `From<Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Propagates tolerance rejections from [`configure_lbfgs`].
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with a More–Thuente line search (the default for model fits).
///
/// # Errors
/// Propagates tolerance rejections from [`configure_lbfgs`].
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional tolerances in `opts.tols` to an L-BFGS solver.
///
/// A `None` tolerance leaves Argmin's default in place.
///
/// # Errors
/// Returns the converted Argmin error when a tolerance is rejected.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

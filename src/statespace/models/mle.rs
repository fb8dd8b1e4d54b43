//! Maximum-likelihood machinery shared by every state-space model.
//!
//! Purpose
//! -------
//! Define what a model must provide ([`StateSpaceModel`]) and implement, once,
//! everything that follows from it: evaluating the likelihood at model-space
//! parameters, running the filter, and fitting by numerical optimization with
//! optional concentration of the scale.
//!
//! Key behaviors
//! -------------
//! - [`ModelLikelihood`] adapts a model to the optimizer's
//!   [`LogLikelihood`] trait. It owns a scratch [`Representation`] behind a
//!   `RefCell`, so each evaluation rewrites the system matrices in place.
//! - The optimizer maximizes the **average** log-likelihood `ℓ(θ) / n_eff` in
//!   unconstrained space; [`fit`] maps `θ̂` back to model space and reruns the
//!   filter at the optimum.
//! - With [`ScaleEstimation::ConcentratedWithFallback`], a concentrated fit
//!   that fails or yields an unusable scale is redone with the model's
//!   unconcentrated counterpart.
//!
//! Invariants & assumptions
//! ------------------------
//! - `transform_params ∘ untransform_params` is the identity on admissible
//!   model-space parameters.
//! - `update` writes every entry that depends on the parameters; entries it
//!   never touches keep the values from the previous call.
//! - `prepare_data` is applied to the raw data before anything else (e.g.
//!   differencing for integrated models).
use crate::{
    inference::hessian::calc_standard_errors,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{LogLikelihood, Theta, maximize},
    },
    statespace::{
        core::{
            data::SSMData,
            init::Initialization,
            kalman::{FilterOutput, kalman_filter},
            options::{FitOptions, ScaleEstimation},
            representation::Representation,
        },
        errors::{SSMError, SSMResult},
        models::results::FitResults,
    },
};
use ndarray::Array1;
use std::cell::RefCell;

/// A univariate linear Gaussian state-space model with free parameters.
///
/// Required:
/// - `k_states`, `param_names`, `start_params`, `transform_params`,
///   `untransform_params`, `update`, `initialization`, `concentrate_scale`,
///   `unconcentrated`.
///
/// Optional:
/// - `k_posdef` (1), `prepare_data` (identity), `loglikelihood_burn`
///   (from the initialization), `full_params` / `full_param_names`
///   (identity for unconcentrated models), `model_name`.
pub trait StateSpaceModel {
    // Required methods
    fn k_states(&self) -> usize;
    fn param_names(&self) -> Vec<String>;
    /// Model-space starting values for the optimizer.
    fn start_params(&self, data: &SSMData) -> SSMResult<Array1<f64>>;
    /// Unconstrained optimizer vector → admissible model-space parameters.
    fn transform_params(&self, unconstrained: &Array1<f64>) -> SSMResult<Array1<f64>>;
    /// Inverse of [`transform_params`](Self::transform_params).
    fn untransform_params(&self, constrained: &Array1<f64>) -> SSMResult<Array1<f64>>;
    /// Write the system matrices implied by model-space `params`.
    fn update(&self, params: &Array1<f64>, repr: &mut Representation) -> SSMResult<()>;
    fn initialization(&self) -> Initialization;
    /// Whether the scale is profiled out of the likelihood.
    fn concentrate_scale(&self) -> bool;
    /// The same model with the scale as an ordinary parameter, if this model
    /// concentrates it.
    fn unconcentrated(&self) -> Option<Self>
    where
        Self: Sized;

    // Optional methods
    fn k_posdef(&self) -> usize {
        1
    }

    fn k_params(&self) -> usize {
        self.param_names().len()
    }

    fn model_name(&self) -> String {
        "StateSpaceModel".to_string()
    }

    fn prepare_data(&self, data: &SSMData) -> SSMResult<SSMData> {
        Ok(data.clone())
    }

    fn loglikelihood_burn(&self) -> usize {
        self.initialization().loglikelihood_burn(self.k_states())
    }

    /// Express concentrated estimates `params` with scale `scale` in the
    /// parameterization of [`unconcentrated`](Self::unconcentrated).
    fn full_params(&self, params: &Array1<f64>, _scale: f64) -> SSMResult<Array1<f64>> {
        Ok(params.clone())
    }

    /// Names matching [`full_params`](Self::full_params).
    fn full_param_names(&self) -> Vec<String> {
        self.param_names()
    }

    /// Length and finiteness checks for a model-space parameter vector.
    fn validate_params(&self, params: &Array1<f64>) -> SSMResult<()> {
        let expected = self.k_params();
        if params.len() != expected {
            return Err(SSMError::ParamLengthMismatch { expected, actual: params.len() });
        }
        if let Some((index, &value)) = params.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SSMError::NonFiniteParam { index, value });
        }
        Ok(())
    }
}

/// Optimizer-facing view of a model: `θ ↦ ℓ(transform(θ)) / n_eff`.
#[derive(Debug)]
pub struct ModelLikelihood<'a, M: StateSpaceModel> {
    model: &'a M,
    init: Initialization,
    burn: usize,
    scratch: RefCell<Representation>,
}

impl<'a, M: StateSpaceModel> ModelLikelihood<'a, M> {
    /// # Errors
    /// `SSMError::InvalidStateDimension` from the scratch representation.
    pub fn new(model: &'a M) -> SSMResult<Self> {
        Ok(Self {
            model,
            init: model.initialization(),
            burn: model.loglikelihood_burn(),
            scratch: RefCell::new(Representation::new(model.k_states(), model.k_posdef())?),
        })
    }

    /// Filter `data` (already prepared) at model-space `params`.
    pub fn filter_at(&self, params: &Array1<f64>, data: &SSMData) -> SSMResult<FilterOutput> {
        let mut repr = self.scratch.borrow_mut();
        self.model.update(params, &mut repr)?;
        kalman_filter(&repr, &self.init, data, self.model.concentrate_scale(), self.burn)
    }

    /// Copy of the scratch representation after the last `filter_at`.
    pub fn representation(&self) -> Representation {
        self.scratch.borrow().clone()
    }
}

impl<'a, M: StateSpaceModel> LogLikelihood for ModelLikelihood<'a, M> {
    type Data = SSMData;

    /// Average log-likelihood at the transformed `θ`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = self.model.transform_params(theta)?;
        Ok(self.filter_at(&params, data)?.avg_llf())
    }

    /// `θ` must have one entry per free parameter, all finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        let expected = self.model.k_params();
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }
}

/// Log-likelihood of `model` at model-space `params`.
///
/// # Errors
/// Parameter validation, data preparation and filter errors.
pub fn loglike<M: StateSpaceModel>(model: &M, data: &SSMData, params: &Array1<f64>) -> SSMResult<f64> {
    Ok(filter(model, data, params)?.llf)
}

/// Full filter output of `model` at model-space `params`.
///
/// # Errors
/// Parameter validation, data preparation and filter errors.
pub fn filter<M: StateSpaceModel>(
    model: &M, data: &SSMData, params: &Array1<f64>,
) -> SSMResult<FilterOutput> {
    model.validate_params(params)?;
    let prepared = model.prepare_data(data)?;
    ModelLikelihood::new(model)?.filter_at(params, &prepared)
}

/// Fit `model` to `data` by maximum likelihood.
///
/// # Steps
/// 1. Prepare the data and pick starting values (`opts.start_params` or the
///    model's own).
/// 2. Maximize the average log-likelihood over `θ = untransform(params)`.
/// 3. Transform `θ̂` back, refilter, and assemble [`FitResults`]; standard
///    errors are attached when `opts.std_errors` is set and the observed
///    information can be computed.
/// 4. Under [`ScaleEstimation::ConcentratedWithFallback`], a concentrated
///    fit that errors or returns a non-positive / non-finite scale is
///    replaced by a fit of [`StateSpaceModel::unconcentrated`].
///
/// # Errors
/// - Data preparation and parameter validation errors.
/// - `SSMError::OptimizationFailed` (and the model errors carried through
///   the optimizer) when the search fails and no fallback applies.
pub fn fit<M: StateSpaceModel>(model: &M, data: &SSMData, opts: &FitOptions) -> SSMResult<FitResults> {
    let fallback = opts.scale_estimation == ScaleEstimation::ConcentratedWithFallback
        && model.concentrate_scale();
    if !fallback {
        return fit_as_specified(model, data, opts);
    }
    let primary = fit_as_specified(model, data, opts);
    let usable = matches!(&primary, Ok(res) if res.scale.is_finite() && res.scale > 0.0);
    if usable {
        return primary;
    }
    match model.unconcentrated() {
        Some(full) => {
            let mut res = fit_as_specified(&full, data, &opts.without_start())?;
            res.scale_fallback = true;
            Ok(res)
        }
        None => primary,
    }
}

// ---- Helper methods ----

fn fit_as_specified<M: StateSpaceModel>(
    model: &M, data: &SSMData, opts: &FitOptions,
) -> SSMResult<FitResults> {
    let prepared = model.prepare_data(data)?;
    let start = match &opts.start_params {
        Some(start) => start.clone(),
        None => model.start_params(&prepared)?,
    };
    model.validate_params(&start)?;
    let theta0 = model.untransform_params(&start)?;

    let likelihood = ModelLikelihood::new(model)?;
    let optim = maximize(&likelihood, theta0, &prepared, &opts.mle_opts)?;
    let params = model.transform_params(&optim.theta_hat)?;
    let filter_output = likelihood.filter_at(&params, &prepared)?;
    let representation = likelihood.representation();

    let bse = if opts.std_errors {
        standard_errors(&likelihood, &params, &prepared, filter_output.nobs_effective)
    } else {
        None
    };

    Ok(FitResults::new(
        model.model_name(),
        params,
        model.param_names(),
        optim,
        filter_output,
        representation,
        bse,
    ))
}

/// Observed-information standard errors in model space, or `None` when the
/// Hessian cannot be formed (e.g. an estimate on the boundary).
fn standard_errors<M: StateSpaceModel>(
    likelihood: &ModelLikelihood<'_, M>, params: &Array1<f64>, data: &SSMData, n_eff: usize,
) -> Option<Array1<f64>> {
    let neg_avg_llf = |p: &Array1<f64>| match likelihood.filter_at(p, data) {
        Ok(out) => -out.avg_llf(),
        Err(_) => f64::NAN,
    };
    let se = calc_standard_errors(&neg_avg_llf, params).ok()?;
    // Restore the scratch matrices to the estimate.
    likelihood.filter_at(params, data).ok()?;
    Some(se / (n_eff as f64).sqrt())
}

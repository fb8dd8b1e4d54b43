//! SARIMAX(p, d, q)×(P, D, Q, s) in Harvey state-space form.
//!
//! Purpose
//! -------
//! Seasonal ARIMA with optional measurement error, estimated either with the
//! innovation variance `sigma2` as a free parameter or with `sigma2`
//! concentrated out of the likelihood.
//!
//! Key behaviors
//! -------------
//! - Integration is handled by differencing the data once in
//!   [`StateSpaceModel::prepare_data`]; the filter sees an ARMA process.
//! - Reduced lag polynomials are the products
//!   `φ(L)Φ(Lˢ)` and `θ(L)Θ(Lˢ)` of the non-seasonal and seasonal parts.
//! - State dimension `r = max(p + sP, q + sQ + 1)` with
//!   `T[i, 0] = φ*ᵢ₊₁`, `T[i, i + 1] = 1`, `R = (1, θ*₁, …, θ*ᵣ₋₁)ᵀ`,
//!   `Z = e₁`, `Q = sigma2` (1 when concentrated), `H = sigma2.measurement`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter order: `ar.L*`, `ma.L*`, `ar.S.L*`, `ma.S.L*`,
//!   `sigma2.measurement` (with measurement error), `sigma2` (unless
//!   concentrated).
//! - With `enforce_stationarity` each AR block goes through
//!   [`constrain_stationary_univariate`]; with `enforce_invertibility` each
//!   MA block uses its negation. Variances use `x ↦ x²`.
//! - Stationary initialization when stationarity is enforced, approximate
//!   diffuse otherwise.
//!
//! Conventions
//! -----------
//! - AR polynomials are `1 − Σ φᵢ Lⁱ`, MA polynomials `1 + Σ θᵢ Lⁱ`.
//! - When concentrated, `sigma2.measurement` is relative to the scale.
use crate::{
    optimization::numerical_stability::{
        constrain_stationary_univariate, constrain_variance, unconstrain_stationary_univariate,
        unconstrain_variance,
    },
    statespace::{
        core::{data::SSMData, init::Initialization, representation::Representation},
        errors::{SSMError, SSMResult},
        models::mle::StateSpaceModel,
    },
};
use ndarray::{Array1, s};

/// Bound on starting partial autocorrelations.
const START_PACF_BOUND: f64 = 0.9;

/// Starting measurement variance relative to the sample variance.
const START_MEASUREMENT_SHARE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sarimax {
    /// `(p, d, q)`.
    pub order: (usize, usize, usize),
    /// `(P, D, Q, s)`.
    pub seasonal_order: (usize, usize, usize, usize),
    pub measurement_error: bool,
    pub enforce_stationarity: bool,
    pub enforce_invertibility: bool,
    pub concentrate_scale: bool,
}

impl Sarimax {
    /// SARIMAX with stationarity and invertibility enforced, no measurement
    /// error and `sigma2` as a free parameter.
    ///
    /// # Errors
    /// `SSMError::InvalidSpecification` when seasonal terms are requested
    /// with a period `s < 2`.
    pub fn new(
        order: (usize, usize, usize), seasonal_order: (usize, usize, usize, usize),
    ) -> SSMResult<Self> {
        let (sp, sd, sq, period) = seasonal_order;
        if (sp > 0 || sd > 0 || sq > 0) && period < 2 {
            return Err(SSMError::InvalidSpecification {
                reason: format!("seasonal period must be at least 2 when seasonal terms are present; got {period}"),
            });
        }
        Ok(Self {
            order,
            seasonal_order,
            measurement_error: false,
            enforce_stationarity: true,
            enforce_invertibility: true,
            concentrate_scale: false,
        })
    }

    pub fn with_measurement_error(mut self, measurement_error: bool) -> Self {
        self.measurement_error = measurement_error;
        self
    }

    pub fn with_enforce_stationarity(mut self, enforce: bool) -> Self {
        self.enforce_stationarity = enforce;
        self
    }

    pub fn with_enforce_invertibility(mut self, enforce: bool) -> Self {
        self.enforce_invertibility = enforce;
        self
    }

    pub fn with_concentrate_scale(mut self, concentrate: bool) -> Self {
        self.concentrate_scale = concentrate;
        self
    }

    fn period(&self) -> usize {
        self.seasonal_order.3
    }

    /// Block lengths `(p, q, P, Q)`.
    fn blocks(&self) -> (usize, usize, usize, usize) {
        (self.order.0, self.order.2, self.seasonal_order.0, self.seasonal_order.2)
    }

    fn k_coefficients(&self) -> usize {
        let (p, q, sp, sq) = self.blocks();
        p + q + sp + sq
    }

    /// Reduced AR coefficients `φ*` of `φ(L)Φ(Lˢ) = 1 − Σ φ*ₖ Lᵏ`.
    pub fn reduced_ar(&self, params: &Array1<f64>) -> Array1<f64> {
        let (p, q, sp, _) = self.blocks();
        let ar = params.slice(s![0..p]);
        let seasonal_ar = params.slice(s![p + q..p + q + sp]);
        let nonseasonal = lag_polynomial(ar.iter().map(|v| -v), 1);
        let seasonal = lag_polynomial(seasonal_ar.iter().map(|v| -v), self.period());
        let product = poly_mul(&nonseasonal, &seasonal);
        Array1::from_iter(product.iter().skip(1).map(|v| -v))
    }

    /// Reduced MA coefficients `θ*` of `θ(L)Θ(Lˢ) = 1 + Σ θ*ₖ Lᵏ`.
    pub fn reduced_ma(&self, params: &Array1<f64>) -> Array1<f64> {
        let (p, q, sp, sq) = self.blocks();
        let ma = params.slice(s![p..p + q]);
        let seasonal_ma = params.slice(s![p + q + sp..p + q + sp + sq]);
        let nonseasonal = lag_polynomial(ma.iter().copied(), 1);
        let seasonal = lag_polynomial(seasonal_ma.iter().copied(), self.period());
        let product = poly_mul(&nonseasonal, &seasonal);
        Array1::from_iter(product.iter().skip(1).copied())
    }

    /// Map AR blocks with `ar_map` when stationarity is enforced, MA blocks
    /// with `ma_map` when invertibility is enforced, and the trailing
    /// variances with `var_map`.
    fn map_blocks(
        &self, values: &Array1<f64>, ar_map: fn(&[f64]) -> Array1<f64>,
        ma_map: fn(&[f64]) -> Array1<f64>, var_map: fn(f64) -> f64,
    ) -> SSMResult<Array1<f64>> {
        self.validate_params(values)?;
        let (p, q, sp, sq) = self.blocks();
        let mut out = values.clone();
        let mut start = 0;
        for (len, is_ar) in [(p, true), (q, false), (sp, true), (sq, false)] {
            let block = values.slice(s![start..start + len]).to_vec();
            let mapped = match (is_ar, self.enforce_stationarity, self.enforce_invertibility) {
                (true, true, _) => ar_map(&block),
                (false, _, true) => ma_map(&block),
                _ => Array1::from(block),
            };
            out.slice_mut(s![start..start + len]).assign(&mapped);
            start += len;
        }
        for v in out.slice_mut(s![start..]).iter_mut() {
            *v = var_map(*v);
        }
        Ok(out)
    }
}

impl StateSpaceModel for Sarimax {
    fn k_states(&self) -> usize {
        let (p, q, sp, sq) = self.blocks();
        let s = self.period();
        (p + s * sp).max(q + s * sq + 1)
    }

    fn param_names(&self) -> Vec<String> {
        let (p, q, sp, sq) = self.blocks();
        let s = self.period();
        let mut names: Vec<String> = (1..=p).map(|i| format!("ar.L{i}")).collect();
        names.extend((1..=q).map(|i| format!("ma.L{i}")));
        names.extend((1..=sp).map(|i| format!("ar.S.L{}", i * s)));
        names.extend((1..=sq).map(|i| format!("ma.S.L{}", i * s)));
        if self.measurement_error {
            names.push("sigma2.measurement".to_string());
        }
        if !self.concentrate_scale {
            names.push("sigma2".to_string());
        }
        names
    }

    fn model_name(&self) -> String {
        let (p, d, q) = self.order;
        let (sp, sd, sq, s) = self.seasonal_order;
        if sp + sd + sq == 0 {
            format!("SARIMAX({p}, {d}, {q})")
        } else {
            format!("SARIMAX({p}, {d}, {q})x({sp}, {sd}, {sq}, {s})")
        }
    }

    /// Differenced-data starting values.
    ///
    /// - AR blocks: Durbin–Levinson on the sample autocorrelations at lags
    ///   `1..p` (resp. `s, 2s, …, Ps`), partial autocorrelations clipped to
    ///   `±0.9`, so the start is stationary.
    /// - MA blocks: zero.
    /// - `sigma2`: sample variance; measurement variance a tenth of it
    ///   (a tenth of the scale when concentrated).
    ///
    /// # Errors
    /// `SSMError::InvalidSpecification` when the model has no free parameter.
    fn start_params(&self, data: &SSMData) -> SSMResult<Array1<f64>> {
        if self.k_params() == 0 {
            return Err(SSMError::InvalidSpecification {
                reason: "concentrated model without free parameters; nothing to estimate".to_string(),
            });
        }
        let (p, q, sp, sq) = self.blocks();
        let (_, var) = data.observed_moments();
        let var = if var.is_finite() && var > 0.0 { var } else { 1.0 };

        let mut start = Vec::with_capacity(self.k_params());
        start.extend(start_ar(data, p, 1).iter());
        start.extend(std::iter::repeat(0.0).take(q));
        start.extend(start_ar(data, sp, self.period()).iter());
        start.extend(std::iter::repeat(0.0).take(sq));
        if self.measurement_error {
            let share = if self.concentrate_scale { 1.0 } else { var };
            start.push(share * START_MEASUREMENT_SHARE);
        }
        if !self.concentrate_scale {
            start.push(var);
        }
        Ok(Array1::from(start))
    }

    fn transform_params(&self, unconstrained: &Array1<f64>) -> SSMResult<Array1<f64>> {
        self.map_blocks(
            unconstrained,
            constrain_stationary_univariate,
            |x| -constrain_stationary_univariate(x),
            constrain_variance,
        )
    }

    fn untransform_params(&self, constrained: &Array1<f64>) -> SSMResult<Array1<f64>> {
        self.map_blocks(
            constrained,
            unconstrain_stationary_univariate,
            |theta| {
                let negated: Vec<f64> = theta.iter().map(|v| -v).collect();
                unconstrain_stationary_univariate(&negated)
            },
            unconstrain_variance,
        )
    }

    fn update(&self, params: &Array1<f64>, repr: &mut Representation) -> SSMResult<()> {
        let r = self.k_states();
        let ar = self.reduced_ar(params);
        let ma = self.reduced_ma(params);
        let k = self.k_coefficients();
        let (measurement, sigma2) = match (self.measurement_error, self.concentrate_scale) {
            (true, true) => (params[k], 1.0),
            (true, false) => (params[k], params[k + 1]),
            (false, true) => (0.0, 1.0),
            (false, false) => (0.0, params[k]),
        };

        repr.design.fill(0.0);
        repr.design[0] = 1.0;
        repr.transition.fill(0.0);
        for i in 0..r {
            repr.transition[[i, 0]] = ar.get(i).copied().unwrap_or(0.0);
            if i + 1 < r {
                repr.transition[[i, i + 1]] = 1.0;
            }
        }
        repr.selection.fill(0.0);
        repr.selection[[0, 0]] = 1.0;
        for i in 1..r {
            repr.selection[[i, 0]] = ma.get(i - 1).copied().unwrap_or(0.0);
        }
        repr.state_cov[[0, 0]] = sigma2;
        repr.obs_cov = measurement;
        Ok(())
    }

    fn initialization(&self) -> Initialization {
        if self.enforce_stationarity {
            Initialization::Stationary
        } else {
            Initialization::default()
        }
    }

    fn concentrate_scale(&self) -> bool {
        self.concentrate_scale
    }

    fn unconcentrated(&self) -> Option<Self> {
        self.concentrate_scale.then(|| self.with_concentrate_scale(false))
    }

    fn prepare_data(&self, data: &SSMData) -> SSMResult<SSMData> {
        data.difference(self.order.1, self.seasonal_order.1, self.period())
    }

    /// Coefficients unchanged; relative measurement variance times `scale`,
    /// then `sigma2 = scale`.
    fn full_params(&self, params: &Array1<f64>, scale: f64) -> SSMResult<Array1<f64>> {
        self.validate_params(params)?;
        if !self.concentrate_scale {
            return Ok(params.clone());
        }
        let mut full = params.to_vec();
        if self.measurement_error {
            let k = self.k_coefficients();
            full[k] *= scale;
        }
        full.push(scale);
        Ok(Array1::from(full))
    }

    fn full_param_names(&self) -> Vec<String> {
        self.with_concentrate_scale(false).param_names()
    }
}

// ---- Helper methods ----

/// `1 + Σ cᵢ L^{i·period}` as a dense coefficient vector.
fn lag_polynomial(coeffs: impl Iterator<Item = f64>, period: usize) -> Vec<f64> {
    let coeffs: Vec<f64> = coeffs.collect();
    let mut poly = vec![0.0; coeffs.len() * period + 1];
    poly[0] = 1.0;
    for (i, c) in coeffs.into_iter().enumerate() {
        poly[(i + 1) * period] = c;
    }
    poly
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Sample autocorrelation at `lag`, over pairs where both values are observed.
fn autocorrelation(data: &SSMData, mean: f64, var: f64, lag: usize) -> f64 {
    let y = &data.endog;
    let n = data.nobs_observed() as f64;
    if lag >= y.len() || var <= 0.0 {
        return 0.0;
    }
    let cov: f64 = y
        .iter()
        .zip(y.iter().skip(lag))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum();
    cov / (n * var)
}

/// Stationary AR(`order`) start in `L^period` from Durbin–Levinson.
fn start_ar(data: &SSMData, order: usize, period: usize) -> Array1<f64> {
    if order == 0 {
        return Array1::zeros(0);
    }
    let (mean, var) = data.observed_moments();
    let rho: Vec<f64> =
        (0..=order).map(|k| if k == 0 { 1.0 } else { autocorrelation(data, mean, var, k * period) }).collect();

    // Durbin–Levinson: phi[k] holds the AR(k) coefficients.
    let mut phi: Vec<f64> = Vec::with_capacity(order);
    let mut unconstrained = Vec::with_capacity(order);
    for k in 1..=order {
        let num = rho[k] - (1..k).map(|j| phi[j - 1] * rho[k - j]).sum::<f64>();
        let den = 1.0 - (1..k).map(|j| phi[j - 1] * rho[j]).sum::<f64>();
        let pacf = if den.abs() > f64::EPSILON { num / den } else { 0.0 };
        let pacf = pacf.clamp(-START_PACF_BOUND, START_PACF_BOUND);
        let previous = phi.clone();
        for j in 1..k {
            phi[j - 1] = previous[j - 1] - pacf * previous[k - j - 1];
        }
        phi.push(pacf);
        let r = -pacf;
        unconstrained.push(r / (1.0 - r * r).sqrt());
    }
    constrain_stationary_univariate(&unconstrained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::{
        core::init::is_stationary,
        models::mle::{filter, loglike},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter naming and state dimension.
    // - Seasonal polynomial products and the Harvey system matrices.
    // - Transform round trips under enforcement.
    // - Concentrated vs full likelihood identity for AR(1).
    // - Differencing and starting values.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Parameter names follow block order and the concentration flag.
    fn parameter_names_and_dimension() {
        let model = Sarimax::new((1, 0, 1), (1, 0, 0, 4)).unwrap().with_measurement_error(true);

        assert_eq!(
            model.param_names(),
            vec!["ar.L1", "ma.L1", "ar.S.L4", "sigma2.measurement", "sigma2"]
        );
        assert_eq!(model.k_states(), 5);
        let conc = model.with_concentrate_scale(true);
        assert_eq!(conc.param_names(), vec!["ar.L1", "ma.L1", "ar.S.L4", "sigma2.measurement"]);
        assert_eq!(conc.full_param_names(), model.param_names());
        assert_eq!(conc.unconcentrated(), Some(model));
        assert_eq!(model.model_name(), "SARIMAX(1, 0, 1)x(1, 0, 0, 4)");
    }

    #[test]
    // Purpose
    // -------
    // Seasonal terms without a period are rejected.
    fn seasonal_without_period_is_rejected() {
        assert!(matches!(
            Sarimax::new((1, 0, 0), (1, 0, 0, 0)),
            Err(SSMError::InvalidSpecification { .. })
        ));
        assert!(Sarimax::new((1, 0, 0), (0, 0, 0, 0)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Multiplicative seasonal AR and MA expand to the right reduced
    // polynomials and land in T and R.
    //
    // Given
    // -----
    // - (1 − 0.5L)(1 − 0.3L⁴) and (1 + 0.4L)(1 + 0.2L⁴).
    //
    // Expect
    // ------
    // - φ* = (0.5, 0, 0, 0.3, −0.15), θ* = (0.4, 0, 0, 0.2, 0.08).
    // - T first column = φ*, superdiagonal ones, R = (1, θ*).
    fn seasonal_products_fill_harvey_form() {
        let model = Sarimax::new((1, 0, 1), (1, 0, 1, 4)).unwrap();
        let params = array![0.5, 0.4, 0.3, 0.2, 2.0];
        let mut repr = Representation::new(model.k_states(), 1).unwrap();

        model.update(&params, &mut repr).unwrap();

        let ar = model.reduced_ar(&params);
        let ma = model.reduced_ma(&params);
        let expected_ar = [0.5, 0.0, 0.0, 0.3, -0.15];
        let expected_ma = [0.4, 0.0, 0.0, 0.2, 0.08];
        for i in 0..5 {
            assert_relative_eq!(ar[i], expected_ar[i], epsilon = 1e-12);
            assert_relative_eq!(ma[i], expected_ma[i], epsilon = 1e-12);
        }
        assert_eq!(repr.k_states, 6);
        for i in 0..5 {
            assert_relative_eq!(repr.transition[[i, 0]], expected_ar[i], epsilon = 1e-12);
            assert_eq!(repr.transition[[i, i + 1]], 1.0);
            assert_relative_eq!(repr.selection[[i + 1, 0]], expected_ma[i], epsilon = 1e-12);
        }
        assert_eq!(repr.transition[[5, 0]], 0.0);
        assert_eq!(repr.selection[[0, 0]], 1.0);
        assert_eq!(repr.state_cov[[0, 0]], 2.0);
        assert_eq!(repr.obs_cov, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Transforms invert each other and enforce the constraints.
    //
    // Given
    // -----
    // - ARMA(2, 1) with arbitrary unconstrained values.
    //
    // Expect
    // ------
    // - Constrained AR part is stationary; MA root outside the unit circle.
    // - untransform(transform(x)) == x.
    fn transforms_enforce_and_round_trip() {
        let model = Sarimax::new((2, 0, 1), (0, 0, 0, 0)).unwrap();
        let x = array![1.3, -0.7, 2.1, 0.8];

        let params = model.transform_params(&x).unwrap();
        let back = model.untransform_params(&params).unwrap();

        let mut repr = Representation::new(model.k_states(), 1).unwrap();
        model.update(&params, &mut repr).unwrap();
        assert!(is_stationary(&repr.transition));
        assert!(params[2].abs() < 1.0);
        assert!(params[3] > 0.0);
        for i in 0..4 {
            assert_relative_eq!(back[i], x[i], epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // With stationary initialization the concentrated AR(1) likelihood is
    // exactly the full likelihood at σ² = σ̂².
    fn concentrated_ar1_matches_full() {
        let data = SSMData::new(array![0.3, -0.2, 0.5, 1.1, 0.4, -0.6, -0.1, 0.7, 0.2, -0.3]).unwrap();
        let full = Sarimax::new((1, 0, 0), (0, 0, 0, 0)).unwrap();
        let conc = full.with_concentrate_scale(true);

        let out = filter(&conc, &data, &array![0.4]).unwrap();
        let implied = conc.full_params(&array![0.4], out.scale).unwrap();
        let llf_full = loglike(&full, &data, &implied).unwrap();

        assert_eq!(implied.len(), 2);
        assert_relative_eq!(implied[1], out.scale, epsilon = 1e-15);
        assert_relative_eq!(out.llf, llf_full, epsilon = 1e-9);
        assert_eq!(out.nobs_effective, 10);
    }

    #[test]
    // Purpose
    // -------
    // With measurement error, concentrating the scale makes the measurement
    // variance relative to it, and the implied full parameters reproduce the
    // concentrated likelihood.
    //
    // Given
    // -----
    // - AR(1) plus measurement error, φ = 0.5 and relative h = 0.7.
    //
    // Expect
    // ------
    // - `update` writes H = 0.7 and Q = 1.
    // - Implied full parameters (φ, 0.7 σ̂², σ̂²) give the same llf (1e-9).
    fn concentrated_measurement_error_matches_full() {
        let data = SSMData::new(array![0.3, -0.2, 0.5, 1.1, 0.4, -0.6, -0.1, 0.7, 0.2, -0.3]).unwrap();
        let full = Sarimax::new((1, 0, 0), (0, 0, 0, 0)).unwrap().with_measurement_error(true);
        let conc = full.with_concentrate_scale(true);
        let params = array![0.5, 0.7];
        let mut repr = Representation::new(conc.k_states(), 1).unwrap();

        conc.update(&params, &mut repr).unwrap();
        let out = filter(&conc, &data, &params).unwrap();
        let implied = conc.full_params(&params, out.scale).unwrap();
        let llf_full = loglike(&full, &data, &implied).unwrap();

        assert_eq!(repr.obs_cov, 0.7);
        assert_eq!(repr.state_cov[[0, 0]], 1.0);
        assert_eq!(implied.len(), 3);
        assert_relative_eq!(implied[0], 0.5);
        assert_relative_eq!(implied[1], 0.7 * out.scale, epsilon = 1e-15);
        assert_relative_eq!(implied[2], out.scale, epsilon = 1e-15);
        assert_relative_eq!(out.llf, llf_full, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Integrated models filter the differenced series.
    fn differencing_shortens_series() {
        let data = SSMData::new(array![1.0, 3.0, 4.0, 8.0, 9.0, 13.0]).unwrap();
        let model = Sarimax::new((0, 1, 1), (0, 0, 0, 0)).unwrap();

        let prepared = model.prepare_data(&data).unwrap();
        let out = filter(&model, &data, &array![0.2, 1.0]).unwrap();

        assert_eq!(prepared.endog, array![2.0, 1.0, 4.0, 1.0, 4.0]);
        assert_eq!(out.nobs_effective, 5);
    }

    #[test]
    // Purpose
    // -------
    // Starting values are admissible even for strongly persistent data.
    //
    // Given
    // -----
    // - A linear trend (autocorrelations close to one).
    //
    // Expect
    // ------
    // - AR(2) start is stationary, MA start is zero, sigma2 positive.
    fn start_params_are_stationary() {
        let data = SSMData::new(Array1::from_iter((0..40).map(|t| t as f64))).unwrap();
        let model = Sarimax::new((2, 0, 1), (0, 0, 0, 0)).unwrap();

        let start = model.start_params(&data).unwrap();

        let mut repr = Representation::new(model.k_states(), 1).unwrap();
        model.update(&start, &mut repr).unwrap();
        assert!(is_stationary(&repr.transition));
        assert_eq!(start[2], 0.0);
        assert!(start[3] > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A concentrated model with nothing left to estimate is reported.
    fn concentrated_without_parameters_is_rejected() {
        let data = SSMData::new(array![1.0, 2.0, 0.5]).unwrap();
        let model = Sarimax::new((0, 0, 0), (0, 0, 0, 0)).unwrap().with_concentrate_scale(true);

        assert!(matches!(
            model.start_params(&data),
            Err(SSMError::InvalidSpecification { .. })
        ));
    }
}

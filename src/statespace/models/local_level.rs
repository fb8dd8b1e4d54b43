//! Local level model — random walk plus noise.
//!
//! ```text
//! y_t     = μ_t + ε_t,      ε_t ~ N(0, σ²_ε)
//! μ_{t+1} = μ_t + η_t,      η_t ~ N(0, σ²_η)
//! ```
//!
//! Purpose
//! -------
//! The smallest model with two variance parameters, used to show that the
//! scale can be concentrated out by fixing either variance to 1.
//!
//! Key behaviors
//! -------------
//! - [`ScaleNormalization::None`]: both variances are free,
//!   `params = [sigma2.level, sigma2.irregular]`.
//! - [`ScaleNormalization::Level`]: `σ²_η = 1` in the system matrices and the
//!   scale is `σ²_η`; `params = [ratio.irregular] = [σ²_ε / σ²_η]`.
//! - [`ScaleNormalization::Irregular`]: `σ²_ε = 1` in the system matrices and
//!   the scale is `σ²_ε`; `params = [ratio.level] = [σ²_η / σ²_ε]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Z = T = R = 1`; initialization is approximate diffuse, so the first
//!   observation is burned.
//! - Free parameters are variances (or variance ratios) mapped with `x ↦ x²`.
use crate::{
    optimization::numerical_stability::{constrain_variance, unconstrain_variance},
    statespace::{
        core::{
            data::SSMData,
            init::Initialization,
            representation::{Representation, SystemMatrix},
        },
        errors::{SSMError, SSMResult},
        models::mle::StateSpaceModel,
    },
};
use ndarray::{Array1, array};
use std::str::FromStr;

/// Which variance, if any, is fixed to 1 and concentrated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleNormalization {
    #[default]
    None,
    Level,
    Irregular,
}

impl FromStr for ScaleNormalization {
    type Err = SSMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ScaleNormalization::None),
            "level" => Ok(ScaleNormalization::Level),
            "irregular" => Ok(ScaleNormalization::Irregular),
            _ => Err(SSMError::InvalidSpecification {
                reason: format!(
                    "unknown scale normalization '{s}'; expected 'none', 'level' or 'irregular'"
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalLevel {
    pub normalization: ScaleNormalization,
}

impl LocalLevel {
    pub fn new(normalization: ScaleNormalization) -> Self {
        Self { normalization }
    }

    /// `(σ²_η, σ²_ε)` written into the system matrices for `params`.
    fn variances(&self, params: &Array1<f64>) -> (f64, f64) {
        match self.normalization {
            ScaleNormalization::None => (params[0], params[1]),
            ScaleNormalization::Level => (1.0, params[0]),
            ScaleNormalization::Irregular => (params[0], 1.0),
        }
    }
}

impl StateSpaceModel for LocalLevel {
    fn k_states(&self) -> usize {
        1
    }

    fn param_names(&self) -> Vec<String> {
        let names: &[&str] = match self.normalization {
            ScaleNormalization::None => &["sigma2.level", "sigma2.irregular"],
            ScaleNormalization::Level => &["ratio.irregular"],
            ScaleNormalization::Irregular => &["ratio.level"],
        };
        names.iter().map(|n| n.to_string()).collect()
    }

    fn model_name(&self) -> String {
        match self.normalization {
            ScaleNormalization::None => "LocalLevel".to_string(),
            ScaleNormalization::Level => "LocalLevel (scale = sigma2.level)".to_string(),
            ScaleNormalization::Irregular => "LocalLevel (scale = sigma2.irregular)".to_string(),
        }
    }

    fn start_params(&self, _data: &SSMData) -> SSMResult<Array1<f64>> {
        Ok(Array1::ones(self.k_params()))
    }

    fn transform_params(&self, unconstrained: &Array1<f64>) -> SSMResult<Array1<f64>> {
        Ok(unconstrained.mapv(constrain_variance))
    }

    fn untransform_params(&self, constrained: &Array1<f64>) -> SSMResult<Array1<f64>> {
        Ok(constrained.mapv(unconstrain_variance))
    }

    fn update(&self, params: &Array1<f64>, repr: &mut Representation) -> SSMResult<()> {
        let (sigma2_level, sigma2_irregular) = self.variances(params);
        repr.set(SystemMatrix::Design, 0, 0, 1.0)?;
        repr.set(SystemMatrix::Transition, 0, 0, 1.0)?;
        repr.set(SystemMatrix::Selection, 0, 0, 1.0)?;
        repr.set(SystemMatrix::StateCov, 0, 0, sigma2_level)?;
        repr.set(SystemMatrix::ObsCov, 0, 0, sigma2_irregular)
    }

    fn initialization(&self) -> Initialization {
        Initialization::default()
    }

    fn concentrate_scale(&self) -> bool {
        self.normalization != ScaleNormalization::None
    }

    fn unconcentrated(&self) -> Option<Self> {
        match self.normalization {
            ScaleNormalization::None => None,
            _ => Some(LocalLevel::new(ScaleNormalization::None)),
        }
    }

    /// `[σ²_η, σ²_ε]` implied by the estimates and the scale.
    fn full_params(&self, params: &Array1<f64>, scale: f64) -> SSMResult<Array1<f64>> {
        self.validate_params(params)?;
        let (level, irregular) = self.variances(params);
        Ok(match self.normalization {
            ScaleNormalization::None => params.clone(),
            _ => array![scale * level, scale * irregular],
        })
    }

    fn full_param_names(&self) -> Vec<String> {
        vec!["sigma2.level".to_string(), "sigma2.irregular".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statespace::models::mle::{filter, loglike};
    use ndarray::array;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter layout per normalization.
    // - System matrices written by `update`.
    // - The identity between concentrated and full likelihoods.
    // -------------------------------------------------------------------------

    fn data() -> SSMData {
        SSMData::new(array![4.4, 4.0, 3.5, 3.8, 4.6, 5.1, 4.9, 5.5, 6.0, 5.2]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Each normalization exposes the right parameters and concentration flag.
    fn parameter_layout_per_normalization() {
        let full = LocalLevel::new(ScaleNormalization::None);
        let level = LocalLevel::new(ScaleNormalization::Level);
        let irregular: LocalLevel = LocalLevel::new("Irregular".parse().unwrap());

        assert_eq!(full.param_names(), vec!["sigma2.level", "sigma2.irregular"]);
        assert_eq!(level.param_names(), vec!["ratio.irregular"]);
        assert_eq!(irregular.param_names(), vec!["ratio.level"]);
        assert!(!full.concentrate_scale());
        assert!(level.concentrate_scale() && irregular.concentrate_scale());
        assert_eq!(level.unconcentrated(), Some(full));
        assert_eq!(full.unconcentrated(), None);
        assert!("both".parse::<ScaleNormalization>().is_err());
    }

    #[test]
    // Purpose
    // -------
    // `update` writes the variances where the normalization says.
    fn update_writes_normalized_variances() {
        let model = LocalLevel::new(ScaleNormalization::Irregular);
        let mut repr = Representation::new(1, 1).unwrap();

        model.update(&array![0.3], &mut repr).unwrap();

        assert_eq!(repr.design[0], 1.0);
        assert_eq!(repr.transition[[0, 0]], 1.0);
        assert_eq!(repr.state_cov[[0, 0]], 0.3);
        assert_eq!(repr.obs_cov, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Concentrated likelihoods coincide with the full likelihood at the
    // implied variances.
    //
    // Given
    // -----
    // - Ratio q = 0.4 under both normalizations.
    //
    // Expect
    // ------
    // - `loglike(concentrated, [q]) ≈ loglike(full, full_params)` for each
    //   normalization, where `full_params` uses the filter's σ̂². The diffuse
    //   prior is relative in one case and absolute in the other, so agreement
    //   is up to O(1/κ).
    fn concentrated_matches_full_at_implied_variances() {
        let data = data();
        let full = LocalLevel::new(ScaleNormalization::None);
        for norm in [ScaleNormalization::Level, ScaleNormalization::Irregular] {
            let model = LocalLevel::new(norm);
            let params = array![0.4];
            let out = filter(&model, &data, &params).unwrap();

            let implied = model.full_params(&params, out.scale).unwrap();
            let llf_full = loglike(&full, &data, &implied).unwrap();

            assert_relative_eq!(out.llf, llf_full, epsilon = 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // Transforms round-trip on positive variances.
    fn transforms_round_trip() {
        let model = LocalLevel::new(ScaleNormalization::None);
        let params = array![0.7, 2.5];

        let back = model.transform_params(&model.untransform_params(&params).unwrap()).unwrap();

        assert_relative_eq!(back[0], 0.7, epsilon = 1e-12);
        assert_relative_eq!(back[1], 2.5, epsilon = 1e-12);
    }
}

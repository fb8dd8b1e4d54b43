//! System matrices of a univariate linear Gaussian state-space model.
//!
//! Purpose
//! -------
//! Hold the matrices of
//!
//! ```text
//! y_t     = Z α_t + d + ε_t,        ε_t ~ N(0, H)
//! α_{t+1} = T α_t + c + R η_t,      η_t ~ N(0, Q)
//! ```
//!
//! and let models write individual entries by matrix name and position,
//! with bounds checks, instead of reaching into raw arrays.
//!
//! Key behaviors
//! -------------
//! - [`Representation::new`] allocates zeroed matrices for `m = k_states`
//!   states and `g = k_posdef` state disturbances.
//! - [`Representation::set`] / [`Representation::get`] address an entry by
//!   [`SystemMatrix`] and `(row, col)`; scalars and vectors use the shapes
//!   listed on [`SystemMatrix::shape`].
//! - [`Representation::validate`] checks finiteness and non-negative
//!   variances before filtering.
//!
//! Conventions
//! -----------
//! - The observation is univariate: Z is stored as a length-`m` vector,
//!   d and H as scalars.
//! - When a model concentrates the scale, every covariance written here is
//!   *relative* to that scale.
use crate::statespace::errors::{SSMError, SSMResult};
use ndarray::{Array1, Array2};
use std::str::FromStr;

/// Names of the system matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMatrix {
    /// Z, 1 × m.
    Design,
    /// d, 1 × 1.
    ObsIntercept,
    /// H, 1 × 1.
    ObsCov,
    /// T, m × m.
    Transition,
    /// c, m × 1.
    StateIntercept,
    /// R, m × g.
    Selection,
    /// Q, g × g.
    StateCov,
}

impl SystemMatrix {
    /// Canonical lowercase name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            SystemMatrix::Design => "design",
            SystemMatrix::ObsIntercept => "obs_intercept",
            SystemMatrix::ObsCov => "obs_cov",
            SystemMatrix::Transition => "transition",
            SystemMatrix::StateIntercept => "state_intercept",
            SystemMatrix::Selection => "selection",
            SystemMatrix::StateCov => "state_cov",
        }
    }

    /// `(rows, cols)` of the matrix for `m` states and `g` disturbances.
    pub fn shape(&self, k_states: usize, k_posdef: usize) -> (usize, usize) {
        match self {
            SystemMatrix::Design => (1, k_states),
            SystemMatrix::ObsIntercept | SystemMatrix::ObsCov => (1, 1),
            SystemMatrix::Transition => (k_states, k_states),
            SystemMatrix::StateIntercept => (k_states, 1),
            SystemMatrix::Selection => (k_states, k_posdef),
            SystemMatrix::StateCov => (k_posdef, k_posdef),
        }
    }
}

impl FromStr for SystemMatrix {
    type Err = SSMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "design" => Ok(SystemMatrix::Design),
            "obs_intercept" => Ok(SystemMatrix::ObsIntercept),
            "obs_cov" => Ok(SystemMatrix::ObsCov),
            "transition" => Ok(SystemMatrix::Transition),
            "state_intercept" => Ok(SystemMatrix::StateIntercept),
            "selection" => Ok(SystemMatrix::Selection),
            "state_cov" => Ok(SystemMatrix::StateCov),
            _ => Err(SSMError::UnknownMatrix { name: s.to_string() }),
        }
    }
}

/// System matrices `(Z, d, H, T, c, R, Q)` of a univariate model.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub k_states: usize,
    pub k_posdef: usize,
    pub design: Array1<f64>,
    pub obs_intercept: f64,
    pub obs_cov: f64,
    pub transition: Array2<f64>,
    pub state_intercept: Array1<f64>,
    pub selection: Array2<f64>,
    pub state_cov: Array2<f64>,
}

impl Representation {
    /// Zeroed representation with `k_states` states and `k_posdef`
    /// disturbances.
    ///
    /// # Errors
    /// `SSMError::InvalidStateDimension` when either dimension is zero.
    pub fn new(k_states: usize, k_posdef: usize) -> SSMResult<Self> {
        if k_states == 0 || k_posdef == 0 || k_posdef > k_states {
            return Err(SSMError::InvalidStateDimension { k_states, k_posdef });
        }
        Ok(Self {
            k_states,
            k_posdef,
            design: Array1::zeros(k_states),
            obs_intercept: 0.0,
            obs_cov: 0.0,
            transition: Array2::zeros((k_states, k_states)),
            state_intercept: Array1::zeros(k_states),
            selection: Array2::zeros((k_states, k_posdef)),
            state_cov: Array2::zeros((k_posdef, k_posdef)),
        })
    }

    /// Write `value` into entry `(row, col)` of `matrix`.
    ///
    /// Vectors use `col = 0` (c) or `row = 0` (Z); scalars use `(0, 0)`.
    ///
    /// # Errors
    /// `SSMError::IndexOutOfBounds` when `(row, col)` lies outside the matrix.
    ///
    /// # Example
    /// ```rust
    /// # use rust_statespace::statespace::core::representation::{Representation, SystemMatrix};
    /// let mut repr = Representation::new(2, 1).unwrap();
    /// repr.set(SystemMatrix::Transition, 0, 1, 1.0).unwrap();
    /// assert_eq!(repr.transition[[0, 1]], 1.0);
    /// assert!(repr.set(SystemMatrix::Design, 1, 0, 1.0).is_err());
    /// ```
    pub fn set(&mut self, matrix: SystemMatrix, row: usize, col: usize, value: f64) -> SSMResult<()> {
        self.check_index(matrix, row, col)?;
        match matrix {
            SystemMatrix::Design => self.design[col] = value,
            SystemMatrix::ObsIntercept => self.obs_intercept = value,
            SystemMatrix::ObsCov => self.obs_cov = value,
            SystemMatrix::Transition => self.transition[[row, col]] = value,
            SystemMatrix::StateIntercept => self.state_intercept[row] = value,
            SystemMatrix::Selection => self.selection[[row, col]] = value,
            SystemMatrix::StateCov => self.state_cov[[row, col]] = value,
        }
        Ok(())
    }

    /// Read entry `(row, col)` of `matrix`.
    ///
    /// # Errors
    /// `SSMError::IndexOutOfBounds` when `(row, col)` lies outside the matrix.
    pub fn get(&self, matrix: SystemMatrix, row: usize, col: usize) -> SSMResult<f64> {
        self.check_index(matrix, row, col)?;
        Ok(match matrix {
            SystemMatrix::Design => self.design[col],
            SystemMatrix::ObsIntercept => self.obs_intercept,
            SystemMatrix::ObsCov => self.obs_cov,
            SystemMatrix::Transition => self.transition[[row, col]],
            SystemMatrix::StateIntercept => self.state_intercept[row],
            SystemMatrix::Selection => self.selection[[row, col]],
            SystemMatrix::StateCov => self.state_cov[[row, col]],
        })
    }

    /// `R Q Rᵀ`, the covariance of the state disturbance `R η_t`.
    pub fn selected_state_cov(&self) -> Array2<f64> {
        self.selection.dot(&self.state_cov).dot(&self.selection.t())
    }

    /// Check every entry for finiteness and variances for non-negativity.
    ///
    /// # Errors
    /// - `SSMError::NonFiniteMatrix` for the first non-finite entry.
    /// - `SSMError::NegativeVariance` for a negative `H` or diagonal of `Q`.
    pub fn validate(&self) -> SSMResult<()> {
        check_finite(SystemMatrix::ObsIntercept, std::iter::once(((0, 0), self.obs_intercept)))?;
        check_finite(SystemMatrix::ObsCov, std::iter::once(((0, 0), self.obs_cov)))?;
        check_finite(SystemMatrix::Design, self.design.indexed_iter().map(|(j, &v)| ((0, j), v)))?;
        check_finite(
            SystemMatrix::StateIntercept,
            self.state_intercept.indexed_iter().map(|(i, &v)| ((i, 0), v)),
        )?;
        check_finite(SystemMatrix::Transition, self.transition.indexed_iter().map(|(ij, &v)| (ij, v)))?;
        check_finite(SystemMatrix::Selection, self.selection.indexed_iter().map(|(ij, &v)| (ij, v)))?;
        check_finite(SystemMatrix::StateCov, self.state_cov.indexed_iter().map(|(ij, &v)| (ij, v)))?;
        if self.obs_cov < 0.0 {
            return Err(SSMError::NegativeVariance { matrix: "obs_cov", index: 0, value: self.obs_cov });
        }
        for (index, &value) in self.state_cov.diag().iter().enumerate() {
            if value < 0.0 {
                return Err(SSMError::NegativeVariance { matrix: "state_cov", index, value });
            }
        }
        Ok(())
    }

    // ---- Helper methods ----

    fn check_index(&self, matrix: SystemMatrix, row: usize, col: usize) -> SSMResult<()> {
        let shape = matrix.shape(self.k_states, self.k_posdef);
        if row >= shape.0 || col >= shape.1 {
            return Err(SSMError::IndexOutOfBounds { matrix: matrix.name(), row, col, shape });
        }
        Ok(())
    }
}

fn check_finite(
    matrix: SystemMatrix, entries: impl Iterator<Item = ((usize, usize), f64)>,
) -> SSMResult<()> {
    for ((row, col), value) in entries {
        if !value.is_finite() {
            return Err(SSMError::NonFiniteMatrix { matrix: matrix.name(), row, col, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Named entries land in the right place and respect matrix shapes.
    //
    // Given
    // -----
    // - A 2-state, 1-disturbance representation.
    //
    // Expect
    // ------
    // - `set` then `get` returns the value for every matrix kind.
    // - Writing outside Selection (2 × 1) fails with `IndexOutOfBounds`.
    fn set_and_get_by_name() {
        let mut repr = Representation::new(2, 1).expect("valid dims");
        repr.set(SystemMatrix::Design, 0, 1, 0.5).unwrap();
        repr.set(SystemMatrix::ObsCov, 0, 0, 2.0).unwrap();
        repr.set(SystemMatrix::StateIntercept, 1, 0, -1.0).unwrap();
        repr.set(SystemMatrix::Selection, 1, 0, 3.0).unwrap();
        repr.set(SystemMatrix::StateCov, 0, 0, 4.0).unwrap();

        assert_eq!(repr.design, array![0.0, 0.5]);
        assert_eq!(repr.get(SystemMatrix::ObsCov, 0, 0).unwrap(), 2.0);
        assert_eq!(repr.get(SystemMatrix::StateIntercept, 1, 0).unwrap(), -1.0);
        assert_eq!(repr.get(SystemMatrix::Selection, 1, 0).unwrap(), 3.0);
        assert!(matches!(
            repr.set(SystemMatrix::Selection, 0, 1, 1.0),
            Err(SSMError::IndexOutOfBounds { matrix: "selection", shape: (2, 1), .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Matrix names parse case-insensitively and unknown names are rejected.
    fn system_matrix_parses_names() {
        assert_eq!("Transition".parse::<SystemMatrix>(), Ok(SystemMatrix::Transition));
        assert_eq!("state_cov".parse::<SystemMatrix>(), Ok(SystemMatrix::StateCov));
        assert!(matches!("loading".parse::<SystemMatrix>(), Err(SSMError::UnknownMatrix { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `R Q Rᵀ` is computed as an outer product for one disturbance.
    fn selected_state_cov_is_rqr() {
        let mut repr = Representation::new(2, 1).expect("valid dims");
        repr.selection = array![[1.0], [0.5]];
        repr.state_cov = array![[2.0]];
        assert_eq!(repr.selected_state_cov(), array![[2.0, 1.0], [1.0, 0.5]]);
    }

    #[test]
    // Purpose
    // -------
    // Validation flags non-finite entries and negative variances, and rejects
    // zero dimensions at construction.
    fn validate_rejects_bad_systems() {
        assert!(matches!(
            Representation::new(0, 1),
            Err(SSMError::InvalidStateDimension { k_states: 0, .. })
        ));

        let mut repr = Representation::new(1, 1).expect("valid dims");
        assert!(repr.validate().is_ok());
        repr.transition[[0, 0]] = f64::NAN;
        assert!(matches!(repr.validate(), Err(SSMError::NonFiniteMatrix { matrix: "transition", .. })));
        repr.transition[[0, 0]] = 1.0;
        repr.obs_cov = -0.1;
        assert!(matches!(repr.validate(), Err(SSMError::NegativeVariance { matrix: "obs_cov", .. })));
    }
}

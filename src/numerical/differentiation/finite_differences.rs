//! Right, left and central difference estimators.
//!
//! Each scheme is a `Differentiator`: it only says how to estimate y'(x_i) from the sampled
//! values, the provided methods build the grid, compare against the reference derivative and
//! collect the samples. Boundary points use the shared 3-point formulas from `diff_common`.
//!
//! # Example
//! ```
//! use matan::numerical::differentiation::finite_differences::{DifferenceScheme, Differentiator};
//! use matan::numerical::evaluable::{DerivativeTruth, SymbolicFunction};
//! let f = SymbolicFunction::from_string("x^3").unwrap();
//! let central = DifferenceScheme::Central.differentiator();
//! let result = central
//!     .differentiate(&f, DerivativeTruth::Analytic(&f), 0.0, 2.0, 0.1)
//!     .unwrap();
//! assert_eq!(result.samples.len(), 21);
//! assert!(result.rmse < 0.05);
//! ```

use crate::numerical::differentiation::diff_common::{
    left_boundary_derivative, right_boundary_derivative, rmse,
};
use crate::numerical::differentiation::grid::{Grid, build_grid};
use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::{DerivativeTruth, Evaluable};
use log::info;
use strum_macros::{Display, EnumIter, EnumString};

/// one grid point of a differentiation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeSample {
    pub i: usize,
    pub x: f64,
    pub fx: f64,
    pub d_true: f64,
    pub d_est: f64,
    /// d_est - d_true
    pub err: f64,
}

/// result of one scheme on one grid
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeResult {
    pub method: String,
    pub h: f64,
    pub rmse: f64,
    pub samples: Vec<DerivativeSample>,
}

impl DerivativeResult {
    pub fn new(method: &str, h: f64) -> Self {
        Self {
            method: method.to_string(),
            h,
            rmse: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn log_sample(&mut self, i: usize, x: f64, fx: f64, d_true: f64, d_est: f64) {
        self.samples.push(DerivativeSample {
            i,
            x,
            fx,
            d_true,
            d_est,
            err: d_est - d_true,
        });
    }

    pub fn finalize(&mut self) {
        self.rmse = rmse(self.samples.iter().map(|s| s.err));
    }
}

/// A finite-difference scheme.
pub trait Differentiator {
    fn method_name(&self) -> &'static str;

    /// estimate of y'(x_i) from the samples `y` with step `h`; `y` has at least 3 entries
    fn estimate(&self, y: &[f64], i: usize, h: f64) -> f64;

    /// Builds the grid for (a, b, h) and differentiates f on it.
    fn differentiate(
        &self,
        f: &dyn Evaluable,
        truth: DerivativeTruth,
        a: f64,
        b: f64,
        h: f64,
    ) -> Result<DerivativeResult, NumericalError> {
        let grid = build_grid(f, a, b, h)?;
        let result = self.differentiate_on_grid(&grid, truth)?;
        info!(
            "{} difference of {} on [{}, {}], h = {}: RMSE = {:e}",
            self.method_name(),
            f.name(),
            a,
            b,
            h,
            result.rmse
        );
        Ok(result)
    }

    /// Differentiates on an existing grid, one sample per grid point in order.
    fn differentiate_on_grid(
        &self,
        grid: &Grid,
        truth: DerivativeTruth,
    ) -> Result<DerivativeResult, NumericalError> {
        let mut result = DerivativeResult::new(self.method_name(), grid.h);
        for (i, (&x, &fx)) in grid.x.iter().zip(&grid.y).enumerate() {
            let d_true = truth.at(x)?;
            let d_est = self.estimate(&grid.y, i, grid.h);
            result.log_sample(i, x, fx, d_true, d_est);
        }
        result.finalize();
        Ok(result)
    }
}

/// forward difference (y[i+1] - y[i])/h, 3-point backward formula at the last point
pub struct RightDifference;

impl Differentiator for RightDifference {
    fn method_name(&self) -> &'static str {
        "right"
    }

    fn estimate(&self, y: &[f64], i: usize, h: f64) -> f64 {
        if i == y.len() - 1 {
            right_boundary_derivative(y, h)
        } else {
            (y[i + 1] - y[i]) / h
        }
    }
}

/// backward difference (y[i] - y[i-1])/h, 3-point forward formula at the first point
pub struct LeftDifference;

impl Differentiator for LeftDifference {
    fn method_name(&self) -> &'static str {
        "left"
    }

    fn estimate(&self, y: &[f64], i: usize, h: f64) -> f64 {
        if i == 0 {
            left_boundary_derivative(y, h)
        } else {
            (y[i] - y[i - 1]) / h
        }
    }
}

/// central difference (y[i+1] - y[i-1])/(2h), 3-point formulas at both ends
pub struct CentralDifference;

impl Differentiator for CentralDifference {
    fn method_name(&self) -> &'static str {
        "central"
    }

    fn estimate(&self, y: &[f64], i: usize, h: f64) -> f64 {
        if i == 0 {
            left_boundary_derivative(y, h)
        } else if i == y.len() - 1 {
            right_boundary_derivative(y, h)
        } else {
            (y[i + 1] - y[i - 1]) / (2.0 * h)
        }
    }
}

/// Scheme selector used by configuration and the task layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DifferenceScheme {
    Right,
    Left,
    Central,
}

impl DifferenceScheme {
    pub fn differentiator(&self) -> Box<dyn Differentiator> {
        match self {
            DifferenceScheme::Right => Box::new(RightDifference),
            DifferenceScheme::Left => Box::new(LeftDifference),
            DifferenceScheme::Central => Box::new(CentralDifference),
        }
    }
}

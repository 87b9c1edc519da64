//! Shared pieces of the bracketing minimizers: the iteration trace, the result type,
//! argument checks and the `Minimizer` trait with its factory.

use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::Evaluable;
use crate::numerical::optimization::dichotomy::Dichotomy;
use crate::numerical::optimization::golden_section::GoldenSection;
use log::{debug, info, warn};
use strum_macros::{Display, EnumIter, EnumString};
use tabled::{builder::Builder, settings::Style};

/// smallest tolerance the minimizers work with; smaller eps is raised to this value
pub const MIN_EPS: f64 = 1e-12;

/// One step of a bracketing search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationState {
    pub k: usize,
    /// bracket at the start of the step
    pub a: f64,
    pub b: f64,
    /// interior trial points and their values
    pub y: f64,
    pub z: f64,
    pub fy: f64,
    pub fz: f64,
    /// bracket midpoint
    pub x_star: f64,
    /// b - a
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimizationResult {
    pub x_min: f64,
    pub f_min: f64,
    pub method: String,
    /// chronological trace, empty only when the initial bracket was already small enough
    pub iterations: Vec<IterationState>,
}

impl MinimizationResult {
    pub fn new(method: &str) -> Self {
        Self {
            x_min: f64::NAN,
            f_min: f64::NAN,
            method: method.to_string(),
            iterations: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log_iteration(&mut self, k: usize, a: f64, b: f64, y: f64, z: f64, fy: f64, fz: f64) {
        let state = IterationState {
            k,
            a,
            b,
            y,
            z,
            fy,
            fz,
            x_star: 0.5 * (a + b),
            length: b - a,
        };
        debug!(
            "{} k = {}: [{}, {}], f({}) = {}, f({}) = {}",
            self.method, k, a, b, y, fy, z, fz
        );
        self.iterations.push(state);
    }

    /// Takes the midpoint of the final bracket and evaluates f there.
    pub fn finish(mut self, f: &dyn Evaluable, a: f64, b: f64) -> Result<Self, NumericalError> {
        self.x_min = 0.5 * (a + b);
        self.f_min = f.eval(self.x_min)?;
        log_summary(&self, f.name());
        Ok(self)
    }
}

fn log_summary(result: &MinimizationResult, function_name: &str) {
    let mut builder = Builder::default();
    builder.push_record(["method".to_string(), result.method.clone()]);
    builder.push_record(["function".to_string(), function_name.to_string()]);
    builder.push_record(["iterations".to_string(), result.iterations.len().to_string()]);
    if let Some(last) = result.iterations.last() {
        builder.push_record(["final bracket".to_string(), format!("[{}, {}]", last.a, last.b)]);
    }
    builder.push_record(["x_min".to_string(), result.x_min.to_string()]);
    builder.push_record(["f_min".to_string(), result.f_min.to_string()]);
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    info!("\n \n MINIMIZATION SUMMARY \n \n {}", table);
}

/// Rejects a >= b, non-finite bounds and eps <= 0, returns eps raised to at least `MIN_EPS`.
pub fn checked_tolerance(a: f64, b: f64, eps: f64) -> Result<f64, NumericalError> {
    if !(a < b) || !(b - a).is_finite() {
        return Err(NumericalError::InvalidInterval { a, b });
    }
    if !(eps > 0.0) {
        return Err(NumericalError::InvalidTolerance { eps });
    }
    if eps < MIN_EPS {
        warn!("eps = {} is below {}, using {}", eps, MIN_EPS, MIN_EPS);
        return Ok(MIN_EPS);
    }
    Ok(eps)
}

/// A bracketing search for the minimum of a unimodal function on [a, b].
pub trait Minimizer {
    fn method_name(&self) -> &'static str;

    fn minimize(
        &self,
        f: &dyn Evaluable,
        a: f64,
        b: f64,
        eps: f64,
    ) -> Result<MinimizationResult, NumericalError>;
}

/// Method selector used by configuration and the task layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MinimizerKind {
    Golden,
    Dichotomy,
}

impl MinimizerKind {
    /// `delta` is the dichotomy offset, <= 0 picks eps/2; golden section ignores it
    pub fn minimizer(&self, delta: f64) -> Box<dyn Minimizer> {
        match self {
            MinimizerKind::Golden => Box::new(GoldenSection::new()),
            MinimizerKind::Dichotomy => Box::new(Dichotomy::new(delta)),
        }
    }
}

use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::Evaluable;
use crate::numerical::optimization::minimizer::{
    MIN_EPS, MinimizationResult, Minimizer, checked_tolerance,
};
use log::{debug, info};

/// default cap on dichotomy iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 2_000_000;

/// Dichotomy (perturbed bisection) search.
///
/// Each iteration evaluates y = mid - δ and z = mid + δ and keeps [a, z] or [y, b], so the
/// bracket tends to 2δ. The search stops once b - a <= 2 eps.
///
/// δ policy: a non-positive `delta` means eps/2; a non-finite one is rejected with
/// `InvalidPerturbation`. The value is then clamped into
/// [max(MIN_EPS/2, f64::EPSILON), (b - a)/4]. A δ that keeps the bracket above 2 eps
/// runs into `max_iterations` and fails with `IterationLimitExceeded`.
#[derive(Debug, Clone)]
pub struct Dichotomy {
    pub delta: f64,
    pub max_iterations: usize,
}

impl Default for Dichotomy {
    fn default() -> Self {
        Self {
            delta: 0.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Dichotomy {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// δ actually used on the bracket [a, b]; b - a > 2 eps >= 2 MIN_EPS
    fn effective_delta(&self, a: f64, b: f64, eps: f64) -> Result<f64, NumericalError> {
        let delta = if self.delta <= 0.0 { eps * 0.5 } else { self.delta };
        if !(delta > 0.0 && delta.is_finite()) {
            return Err(NumericalError::InvalidPerturbation { delta });
        }
        let min_delta = (MIN_EPS * 0.5).max(f64::EPSILON);
        let max_delta = 0.25 * (b - a);
        let clamped = delta.clamp(min_delta, max_delta);
        if clamped != delta {
            debug!("delta {} clamped to {}", delta, clamped);
        }
        Ok(clamped)
    }
}

impl Minimizer for Dichotomy {
    fn method_name(&self) -> &'static str {
        "dichotomy"
    }

    fn minimize(
        &self,
        f: &dyn Evaluable,
        a: f64,
        b: f64,
        eps: f64,
    ) -> Result<MinimizationResult, NumericalError> {
        let eps = checked_tolerance(a, b, eps)?;
        let result = MinimizationResult::new(self.method_name());
        if b - a <= 2.0 * eps {
            info!(
                "[{}, {}] is already within 2*eps = {}, no iterations needed",
                a,
                b,
                2.0 * eps
            );
            return result.finish(f, a, b);
        }
        let delta = self.effective_delta(a, b, eps)?;
        info!(
            "dichotomy search for {} on [{}, {}], eps = {}, delta = {}",
            f.name(),
            a,
            b,
            eps,
            delta
        );

        let mut result = result;
        let (mut a, mut b) = (a, b);
        let mut k = 0;
        loop {
            let mid = 0.5 * (a + b);
            let y = mid - delta;
            let z = mid + delta;
            let fy = f.eval(y)?;
            let fz = f.eval(z)?;
            result.log_iteration(k, a, b, y, z, fy, fz);

            if fy <= fz {
                b = z;
            } else {
                a = y;
            }
            if b - a <= 2.0 * eps {
                break;
            }
            k += 1;
            if k >= self.max_iterations {
                return Err(NumericalError::IterationLimitExceeded {
                    method: self.method_name().to_string(),
                    max_iterations: self.max_iterations,
                });
            }
        }
        result.finish(f, a, b)
    }
}

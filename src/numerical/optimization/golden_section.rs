use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::Evaluable;
use crate::numerical::optimization::minimizer::{
    MinimizationResult, Minimizer, checked_tolerance,
};
use log::{info, warn};

/// Golden-section search.
///
/// The trial points sit at fractions 1 - τ and τ of the bracket, τ = (√5 - 1)/2, so after dropping
/// one side the surviving point is already in place and each iteration costs exactly one new
/// evaluation. The bracket shrinks by τ per iteration until b - a <= eps.
#[derive(Debug, Clone, Default)]
pub struct GoldenSection;

impl GoldenSection {
    pub fn new() -> Self {
        GoldenSection
    }
}

impl Minimizer for GoldenSection {
    fn method_name(&self) -> &'static str {
        "golden"
    }

    fn minimize(
        &self,
        f: &dyn Evaluable,
        a: f64,
        b: f64,
        eps: f64,
    ) -> Result<MinimizationResult, NumericalError> {
        let eps = checked_tolerance(a, b, eps)?;
        info!(
            "golden section search for {} on [{}, {}], eps = {}",
            f.name(),
            a,
            b,
            eps
        );
        let tau = (5.0_f64.sqrt() - 1.0) * 0.5;
        let (mut a, mut b) = (a, b);
        let mut y = a + (1.0 - tau) * (b - a);
        let mut z = a + tau * (b - a);
        let mut fy = f.eval(y)?;
        let mut fz = f.eval(z)?;

        let mut result = MinimizationResult::new(self.method_name());
        let mut previous_length = f64::INFINITY;
        let mut k = 0;
        loop {
            result.log_iteration(k, a, b, y, z, fy, fz);
            let length = b - a;
            if length <= eps {
                break;
            }
            if length >= previous_length {
                warn!(
                    "bracket [{}, {}] stopped shrinking, eps = {} is below the floating-point resolution here",
                    a, b, eps
                );
                break;
            }
            previous_length = length;

            if fy <= fz {
                b = z;
                z = y;
                fz = fy;
                y = a + (1.0 - tau) * (b - a);
                fy = f.eval(y)?;
            } else {
                a = y;
                y = z;
                fy = fz;
                z = a + tau * (b - a);
                fz = f.eval(z)?;
            }
            k += 1;
        }
        result.finish(f, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::evaluable::{ClosureFunction, SymbolicFunction};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    #[test]
    fn test_bracket_shrinks_by_tau() {
        let f = ClosureFunction::new(|x: f64| (x - 0.3).powi(2) + 1.0, "parabola".to_string());
        let result = GoldenSection.minimize(&f, 0.0, 1.0, 1e-4).unwrap();
        let tau = (5.0_f64.sqrt() - 1.0) * 0.5;
        assert!(result.iterations.len() > 10);
        for pair in result.iterations.windows(2) {
            assert_relative_eq!(pair[1].length / pair[0].length, tau, max_relative = 1e-6);
            assert_eq!(pair[1].k, pair[0].k + 1);
        }
        let last = result.iterations.last().unwrap();
        assert!(last.length <= 1e-4);
        assert!(result.iterations[result.iterations.len() - 2].length > 1e-4);
        assert_eq!(result.x_min, last.x_star);
        assert_eq!(result.f_min, (result.x_min - 0.3).powi(2) + 1.0);
    }

    #[test]
    fn test_one_evaluation_per_iteration() {
        let calls = Cell::new(0usize);
        let f = ClosureFunction::new(
            |x: f64| {
                calls.set(calls.get() + 1);
                (x + 1.5).powi(2)
            },
            "counted".to_string(),
        );
        let result = GoldenSection.minimize(&f, -4.0, 3.0, 1e-6).unwrap();
        // two initial points, one per shrinking step, one for f_min
        assert_eq!(calls.get(), result.iterations.len() + 2);
    }

    #[test]
    fn test_trial_points_keep_golden_positions() {
        let f = SymbolicFunction::from_string("exp(x) - 2*x").unwrap();
        let result = GoldenSection.minimize(&f, 0.0, 2.0, 1e-5).unwrap();
        let tau = (5.0_f64.sqrt() - 1.0) * 0.5;
        for state in &result.iterations {
            assert!(state.a < state.y && state.y < state.z && state.z < state.b);
            assert_relative_eq!(state.y, state.a + (1.0 - tau) * state.length, epsilon = 1e-9);
            assert_relative_eq!(state.z, state.a + tau * state.length, epsilon = 1e-9);
            assert_eq!(state.fy, f.eval(state.y).unwrap());
        }
        assert_relative_eq!(result.x_min, 2.0_f64.ln(), epsilon = 1e-5);
    }

    #[test]
    fn test_converges_for_shrinking_eps() {
        let f = ClosureFunction::new(|x: f64| (x - 1.7).powi(2), "(x - 1.7)^2".to_string());
        for eps in [1e-2, 1e-4, 1e-6, 1e-8] {
            let result = GoldenSection.minimize(&f, -3.0, 4.0, eps).unwrap();
            assert!((result.x_min - 1.7).abs() <= eps, "eps {}: {}", eps, result.x_min);
        }
    }

    #[test]
    fn test_tiny_eps_is_clamped_and_terminates() {
        let f = ClosureFunction::new(|x: f64| (x - 0.25).powi(2), "q".to_string());
        let result = GoldenSection.minimize(&f, 0.0, 1.0, 1e-30).unwrap();
        assert!(result.iterations.len() < 100);
        assert_relative_eq!(result.x_min, 0.25, epsilon = 1e-7);
    }

    #[test]
    fn test_invalid_arguments() {
        let f = ClosureFunction::new(|x: f64| x * x, "x^2".to_string());
        assert!(matches!(
            GoldenSection.minimize(&f, 1.0, 0.0, 1e-3),
            Err(NumericalError::InvalidInterval { .. })
        ));
        let decaying = ClosureFunction::new(|x: f64| (-x).exp(), "exp(-x)".to_string());
        assert!(matches!(
            GoldenSection.minimize(&decaying, 0.0, f64::INFINITY, 1e-4),
            Err(NumericalError::InvalidInterval { .. })
        ));
        assert!(matches!(
            GoldenSection.minimize(&f, 0.0, 1.0, -1e-3),
            Err(NumericalError::InvalidTolerance { .. })
        ));
        let g = ClosureFunction::new(|x: f64| (x - 0.5).ln(), "ln(x - 0.5)".to_string());
        assert!(matches!(
            GoldenSection.minimize(&g, 0.0, 1.0, 1e-3),
            Err(NumericalError::EvaluationError { .. })
        ));
    }
}

//! Runs the right, left and central schemes side by side.
//!
//! `run_all_differences` builds a single grid and fills all three results in one pass, so
//! every scheme sees identical (x, f(x), f'(x)) triples. `run_rmse_sweep` repeats that for
//! h0, h0/2, h0/4, ... and keeps only the RMSE values. The reference derivative comes from
//! a `SymbolicDifferentiator`; without one the runner refuses to work instead of falling back
//! to numbers.

use crate::numerical::differentiation::finite_differences::{
    CentralDifference, DerivativeResult, Differentiator, LeftDifference, RightDifference,
};
use crate::numerical::differentiation::grid::{Grid, build_grid};
use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::{DerivativeTruth, SymbolicFunction};
use crate::symbolic::symbolic_engine::Expr;
use log::{info, warn};
use rayon::prelude::*;
use tabled::{Table, Tabled, settings::Style};

/// Turns formula text in `x` into the formula text of its derivative.
pub trait SymbolicDifferentiator: Send + Sync {
    fn derivative_text(&self, formula: &str) -> Result<String, NumericalError>;
}

/// symbolic differentiation with the built-in `Expr` engine
pub struct ExprDifferentiator;

impl SymbolicDifferentiator for ExprDifferentiator {
    fn derivative_text(&self, formula: &str) -> Result<String, NumericalError> {
        let expr = Expr::parse_expression(formula).map_err(NumericalError::ExpressionParse)?;
        Ok(expr.diff("x").to_string())
    }
}

/// all three schemes on one grid plus the derivative formula used as truth
#[derive(Debug, Clone, PartialEq)]
pub struct Task2Results {
    pub right: DerivativeResult,
    pub left: DerivativeResult,
    pub central: DerivativeResult,
    pub derivative_expr: String,
}

/// one line of the combined report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedRow {
    pub x: f64,
    pub fx: f64,
    pub d_true: f64,
    pub d_right: f64,
    pub d_left: f64,
    pub d_central: f64,
}

impl Task2Results {
    /// Zips the three sample sequences, refusing results of different lengths.
    pub fn combined_rows(&self) -> Result<Vec<CombinedRow>, NumericalError> {
        let (right, left, central) = (
            &self.right.samples,
            &self.left.samples,
            &self.central.samples,
        );
        if right.len() != left.len() || right.len() != central.len() {
            return Err(NumericalError::MismatchedSampleCount {
                right: right.len(),
                left: left.len(),
                central: central.len(),
            });
        }
        Ok(right
            .iter()
            .zip(left)
            .zip(central)
            .map(|((r, l), c)| CombinedRow {
                x: r.x,
                fx: r.fx,
                d_true: r.d_true,
                d_right: r.d_est,
                d_left: l.d_est,
                d_central: c.d_est,
            })
            .collect())
    }
}

/// RMSE of every scheme at one resolution
#[derive(Debug, Clone, Copy, PartialEq, Tabled)]
pub struct Task2RmseRow {
    pub h: f64,
    pub right: f64,
    pub left: f64,
    pub central: f64,
}

/// empirical order log2(rmse(2h)/rmse(h)) ending at step `h`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceOrder {
    pub h: f64,
    pub right: f64,
    pub left: f64,
    pub central: f64,
}

/// One pass over the grid filling right, left and central results.
fn estimate_all(grid: &Grid, truth: DerivativeTruth) -> Result<[DerivativeResult; 3], NumericalError> {
    let schemes: [&dyn Differentiator; 3] = [&RightDifference, &LeftDifference, &CentralDifference];
    let mut results = schemes.map(|s| DerivativeResult::new(s.method_name(), grid.h));
    for (i, (&x, &fx)) in grid.x.iter().zip(&grid.y).enumerate() {
        let d_true = truth.at(x)?;
        for (scheme, result) in schemes.iter().zip(results.iter_mut()) {
            let d_est = scheme.estimate(&grid.y, i, grid.h);
            result.log_sample(i, x, fx, d_true, d_est);
        }
    }
    for result in results.iter_mut() {
        result.finalize();
    }
    Ok(results)
}

fn rmse_row(
    f: &SymbolicFunction,
    df: &SymbolicFunction,
    a: f64,
    b: f64,
    h: f64,
) -> Result<Task2RmseRow, NumericalError> {
    let grid = build_grid(f, a, b, h)?;
    let [right, left, central] = estimate_all(&grid, DerivativeTruth::Formula(df))?;
    Ok(Task2RmseRow {
        h: grid.h,
        right: right.rmse,
        left: left.rmse,
        central: central.rmse,
    })
}

/// h0 / 2^k; 0 once 2^k leaves the exponent range
fn halved(h0: f64, k: i64) -> f64 {
    i32::try_from(k).map_or(0.0, |k| h0 * 0.5f64.powi(k))
}

/// Drives the three schemes against a symbolic reference derivative.
pub struct MultiEstimatorRunner {
    symbolic: Option<Box<dyn SymbolicDifferentiator>>,
}

impl Default for MultiEstimatorRunner {
    fn default() -> Self {
        Self::new(Some(Box::new(ExprDifferentiator)))
    }
}

impl MultiEstimatorRunner {
    pub fn new(symbolic: Option<Box<dyn SymbolicDifferentiator>>) -> Self {
        Self { symbolic }
    }

    /// runner with no symbolic collaborator; every derivative lookup fails
    pub fn without_symbolic() -> Self {
        Self::new(None)
    }

    fn derivative_text(&self, f_expr: &str) -> Result<String, NumericalError> {
        match &self.symbolic {
            Some(symbolic) => symbolic.derivative_text(f_expr),
            None => Err(NumericalError::SymbolicDerivativeUnavailable(
                "no symbolic differentiation engine installed; provide an analytic derivative"
                    .to_string(),
            )),
        }
    }

    /// parsed f and the parsed derivative text
    fn functions(
        &self,
        f_expr: &str,
    ) -> Result<(SymbolicFunction, SymbolicFunction, String), NumericalError> {
        let derivative_expr = self.derivative_text(f_expr)?;
        let f = SymbolicFunction::from_string(f_expr)?;
        let df = SymbolicFunction::from_string(&derivative_expr)?;
        Ok((f, df, derivative_expr))
    }

    /// All three schemes on one grid.
    pub fn run_all_differences(
        &self,
        f_expr: &str,
        a: f64,
        b: f64,
        h: f64,
    ) -> Result<Task2Results, NumericalError> {
        let (f, df, derivative_expr) = self.functions(f_expr)?;
        let grid = build_grid(&f, a, b, h)?;
        let [right, left, central] = estimate_all(&grid, DerivativeTruth::Formula(&df))?;
        info!(
            "f = {}, f' = {}, h = {}: RMSE right {:e}, left {:e}, central {:e}",
            f_expr, derivative_expr, h, right.rmse, left.rmse, central.rmse
        );
        Ok(Task2Results {
            right,
            left,
            central,
            derivative_expr,
        })
    }

    /// RMSE of every scheme for h0, h0/2, ... (`steps` rows); empty for steps <= 0.
    pub fn run_rmse_sweep(
        &self,
        f_expr: &str,
        a: f64,
        b: f64,
        h0: f64,
        steps: i64,
    ) -> Result<Vec<Task2RmseRow>, NumericalError> {
        if steps <= 0 {
            warn!("RMSE sweep requested with {} steps, nothing to do", steps);
            return Ok(Vec::new());
        }
        let (f, df, _) = self.functions(f_expr)?;
        let mut rows = Vec::new();
        let mut h = h0;
        for _ in 0..steps {
            rows.push(rmse_row(&f, &df, a, b, h)?);
            h *= 0.5;
        }
        log_sweep_table(&rows);
        Ok(rows)
    }

    /// Same rows as `run_rmse_sweep`, each resolution computed on the rayon pool.
    pub fn run_rmse_sweep_parallel(
        &self,
        f_expr: &str,
        a: f64,
        b: f64,
        h0: f64,
        steps: i64,
    ) -> Result<Vec<Task2RmseRow>, NumericalError> {
        if steps <= 0 {
            warn!("RMSE sweep requested with {} steps, nothing to do", steps);
            return Ok(Vec::new());
        }
        let (f, df, _) = self.functions(f_expr)?;
        let rows = (0..steps)
            .into_par_iter()
            .map(|k| rmse_row(&f, &df, a, b, halved(h0, k)))
            .collect::<Result<Vec<_>, _>>()?;
        log_sweep_table(&rows);
        Ok(rows)
    }
}

/// `run_all_differences` with the built-in symbolic engine
pub fn run_all_differences(
    f_expr: &str,
    a: f64,
    b: f64,
    h: f64,
) -> Result<Task2Results, NumericalError> {
    MultiEstimatorRunner::default().run_all_differences(f_expr, a, b, h)
}

/// `run_rmse_sweep` with the built-in symbolic engine
pub fn run_rmse_sweep(
    f_expr: &str,
    a: f64,
    b: f64,
    h0: f64,
    steps: i64,
) -> Result<Vec<Task2RmseRow>, NumericalError> {
    MultiEstimatorRunner::default().run_rmse_sweep(f_expr, a, b, h0, steps)
}

/// Empirical convergence order between consecutive sweep rows.
///
/// A zero RMSE (exact scheme) gives a non-finite order.
pub fn convergence_orders(rows: &[Task2RmseRow]) -> Vec<ConvergenceOrder> {
    rows.windows(2)
        .map(|pair| {
            let (coarse, fine) = (&pair[0], &pair[1]);
            let step = coarse.h / fine.h;
            let order = |c: f64, f: f64| (c / f).ln() / step.ln();
            ConvergenceOrder {
                h: fine.h,
                right: order(coarse.right, fine.right),
                left: order(coarse.left, fine.left),
                central: order(coarse.central, fine.central),
            }
        })
        .collect()
}

fn log_sweep_table(rows: &[Task2RmseRow]) {
    let mut table = Table::new(rows.to_vec());
    table.with(Style::modern_rounded());
    info!("\n \n RMSE SWEEP \n \n {}", table);
    for order in convergence_orders(rows) {
        info!(
            "h = {}: empirical order right {:.3}, left {:.3}, central {:.3}",
            order.h, order.right, order.left, order.central
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_differences_share_the_grid() {
        let results = run_all_differences("x^3", 0.0, 2.0, 0.1).unwrap();
        assert_eq!(results.derivative_expr, "3*x^2");
        assert_eq!(results.right.method, "right");
        assert_eq!(results.left.method, "left");
        assert_eq!(results.central.method, "central");
        assert_eq!(results.right.samples.len(), 21);
        for ((r, l), c) in results
            .right
            .samples
            .iter()
            .zip(&results.left.samples)
            .zip(&results.central.samples)
        {
            assert_eq!((r.x, r.fx, r.d_true), (l.x, l.fx, l.d_true));
            assert_eq!((r.x, r.fx, r.d_true), (c.x, c.fx, c.d_true));
        }
        assert!(results.central.rmse < results.right.rmse);
        assert!(results.central.rmse < results.left.rmse);
    }

    #[test]
    fn test_runner_matches_single_scheme() {
        let results = run_all_differences("sin(x) + x^2", -2.0, 2.0, 0.1).unwrap();
        let f = SymbolicFunction::from_string("sin(x) + x^2").unwrap();
        let single = CentralDifference
            .differentiate(&f, DerivativeTruth::Analytic(&f), -2.0, 2.0, 0.1)
            .unwrap();
        assert_eq!(single.samples.len(), results.central.samples.len());
        assert_relative_eq!(single.rmse, results.central.rmse, epsilon = 1e-12);
    }

    #[test]
    fn test_combined_rows() {
        let mut results = run_all_differences("x^2", 0.0, 1.0, 0.25).unwrap();
        let rows = results.combined_rows().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2].x, 0.5);
        assert_eq!(rows[2].d_true, 1.0);
        // central difference is exact for a quadratic
        for row in &rows {
            assert_relative_eq!(row.d_central, row.d_true, epsilon = 1e-12);
        }
        results.left.samples.pop();
        assert_eq!(
            results.combined_rows(),
            Err(NumericalError::MismatchedSampleCount {
                right: 5,
                left: 4,
                central: 5
            })
        );
    }

    #[test]
    fn test_rmse_sweep_halves_h() {
        let rows = run_rmse_sweep("x^3", 0.0, 2.0, 0.1, 5).unwrap();
        let hs: Vec<f64> = rows.iter().map(|r| r.h).collect();
        assert_eq!(hs, vec![0.1, 0.05, 0.025, 0.0125, 0.00625]);
        for pair in rows.windows(2) {
            assert!(pair[1].right < pair[0].right);
            assert!(pair[1].left < pair[0].left);
            assert!(pair[1].central < pair[0].central);
        }
    }

    #[test]
    fn test_convergence_orders() {
        let rows = run_rmse_sweep("x^3", 0.0, 2.0, 0.1, 4).unwrap();
        let orders = convergence_orders(&rows);
        assert_eq!(orders.len(), 3);
        for order in orders {
            assert!(order.central > 1.9 && order.central < 2.2, "{}", order.central);
            assert!(order.right > 0.9 && order.right < 1.2, "{}", order.right);
            assert!(order.left > 0.9 && order.left < 1.2, "{}", order.left);
        }
    }

    #[test]
    fn test_rmse_sweep_without_steps_is_empty() {
        assert!(run_rmse_sweep("x^3", 0.0, 2.0, 0.1, 0).unwrap().is_empty());
        assert!(run_rmse_sweep("x^3", 0.0, 2.0, 0.1, -3).unwrap().is_empty());
        let runner = MultiEstimatorRunner::without_symbolic();
        assert!(runner.run_rmse_sweep("x^3", 0.0, 2.0, 0.1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_parallel_sweep_matches_sequential() {
        let runner = MultiEstimatorRunner::default();
        let sequential = runner.run_rmse_sweep("exp(x)*cos(x)", -1.0, 1.0, 0.2, 6).unwrap();
        let parallel = runner
            .run_rmse_sweep_parallel("exp(x)*cos(x)", -1.0, 1.0, 0.2, 6)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_halved_step_for_large_levels() {
        assert_eq!(halved(0.1, 0), 0.1);
        assert_eq!(halved(0.1, 3), 0.1 * 0.125);
        assert_eq!(halved(0.1, i32::MAX as i64 + 1), 0.0);
        assert_eq!(halved(0.1, i64::MAX), 0.0);
        let f = SymbolicFunction::from_string("x^2").unwrap();
        let df = SymbolicFunction::from_string("2*x").unwrap();
        assert!(matches!(
            rmse_row(&f, &df, 0.0, 1.0, halved(0.1, i64::MAX)),
            Err(NumericalError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_reference_formula_is_not_differentiated() {
        let f = SymbolicFunction::from_string("sin(x)").unwrap();
        let df = SymbolicFunction::from_string("cos(x)").unwrap();
        let grid = build_grid(&f, 0.0, 1.0, 0.1).unwrap();
        let [_, _, central] = estimate_all(&grid, DerivativeTruth::Formula(&df)).unwrap();
        assert_eq!(central.samples.len(), 11);
        assert!(!df.has_compiled_derivative());
        assert!(!f.has_compiled_derivative());
    }

    #[test]
    fn test_missing_symbolic_engine() {
        let runner = MultiEstimatorRunner::without_symbolic();
        assert!(matches!(
            runner.run_all_differences("x^2", 0.0, 1.0, 0.1),
            Err(NumericalError::SymbolicDerivativeUnavailable(_))
        ));
        assert!(matches!(
            runner.run_rmse_sweep("x^2", 0.0, 1.0, 0.1, 3),
            Err(NumericalError::SymbolicDerivativeUnavailable(_))
        ));
    }

    #[test]
    fn test_custom_symbolic_engine() {
        struct Fixed;
        impl SymbolicDifferentiator for Fixed {
            fn derivative_text(&self, _formula: &str) -> Result<String, NumericalError> {
                Ok("cos(x)".to_string())
            }
        }
        let runner = MultiEstimatorRunner::new(Some(Box::new(Fixed)));
        let results = runner.run_all_differences("sin(x)", 0.0, 1.0, 0.1).unwrap();
        assert_eq!(results.derivative_expr, "cos(x)");
        assert!(results.central.rmse < 5e-3);
    }

    #[test]
    fn test_evaluation_error_through_pole() {
        assert!(matches!(
            run_all_differences("1/x", -1.0, 1.0, 0.5),
            Err(NumericalError::EvaluationError { .. })
        ));
        assert!(matches!(
            run_all_differences("x^2 +", -1.0, 1.0, 0.5),
            Err(NumericalError::ExpressionParse(_))
        ));
    }
}

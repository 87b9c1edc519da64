/// error type shared by every numerical routine
pub mod errors;
/// functions of one variable: closures, closures with derivative, symbolic formulas
pub mod evaluable;
///  Example#1
/// ```
/// use matan::numerical::differentiation::multi_estimator::{run_all_differences, run_rmse_sweep};
/// // right, left and central differences of sin(x) + x^2 on one grid
/// let results = run_all_differences("sin(x) + x^2", -2.0, 2.0, 0.1).unwrap();
/// println!("f' = {}", results.derivative_expr);
/// println!("RMSE right {} left {} central {}", results.right.rmse, results.left.rmse, results.central.rmse);
/// // the same for h = 0.1, 0.05, 0.025
/// let sweep = run_rmse_sweep("sin(x) + x^2", -2.0, 2.0, 0.1, 3).unwrap();
/// assert_eq!(sweep.len(), 3);
/// ```
pub mod differentiation;
///  Example#1
/// ```
/// use matan::numerical::evaluable::SymbolicFunction;
/// use matan::numerical::optimization::minimizer::MinimizerKind;
/// let f = SymbolicFunction::from_string("sin(x) + x^2").unwrap();
/// let result = MinimizerKind::Golden.minimizer(0.0).minimize(&f, -2.0, 2.0, 1e-4).unwrap();
/// println!("x_min = {}, f_min = {}, {} iterations", result.x_min, result.f_min, result.iterations.len());
/// ```
pub mod optimization;

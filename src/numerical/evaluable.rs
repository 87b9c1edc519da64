//! Functions of one variable as the algorithms see them.
//!
//! `Evaluable` follows the closure/symbolic wrapper pattern: plain closures, closures with a
//! hand-written derivative, and symbolic expressions whose derivative comes from `Expr::diff`.
//! Raw values are produced by `evaluate`; the provided `eval` and `derivative` methods turn
//! non-finite values into `NumericalError::EvaluationError`.

use crate::numerical::errors::NumericalError;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::sync::OnceLock;

/// Trait for representing a function f(x) of one real variable
pub trait Evaluable {
    /// Raw value at x, may be NaN or infinite
    fn evaluate(&self, x: f64) -> f64;

    /// Raw analytic derivative at x, if the function knows it
    fn analytic_derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }

    /// Value at x; fails on a non-finite result.
    fn eval(&self, x: f64) -> Result<f64, NumericalError> {
        finite(self.evaluate(x), x, self.name())
    }

    /// Analytic derivative at x; fails when unavailable or non-finite.
    fn derivative(&self, x: f64) -> Result<f64, NumericalError> {
        match self.analytic_derivative(x) {
            Some(value) => finite(value, x, &format!("derivative of {}", self.name())),
            None => Err(NumericalError::SymbolicDerivativeUnavailable(format!(
                "{} has no analytic derivative",
                self.name()
            ))),
        }
    }
}

fn finite(value: f64, x: f64, what: &str) -> Result<f64, NumericalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericalError::EvaluationError {
            x,
            value,
            what: what.to_string(),
        })
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: String) -> Self {
        Self { func, name }
    }
}

impl<F> Evaluable for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Function wrapper with analytical derivative
pub struct FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    func: F,
    derivative_func: D,
    name: String,
}

impl<F, D> FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    pub fn new(func: F, derivative_func: D, name: String) -> Self {
        Self {
            func,
            derivative_func,
            name,
        }
    }
}

impl<F, D> Evaluable for FunctionWithDerivative<F, D>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn analytic_derivative(&self, x: f64) -> Option<f64> {
        Some((self.derivative_func)(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

////////////////////////SYMBOLIC FUNCTIONS//////////////////////////////////////////
type CompiledFunction = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Symbolic function wrapper: parsed formula compiled into a closure.
///
/// The symbolic derivative and its closure are built on first use, so a formula that only
/// serves as a reference derivative is never differentiated again.
pub struct SymbolicFunction {
    expr: Expr,
    variable: String,
    name: String,
    func: CompiledFunction,
    derivative: OnceLock<(Expr, CompiledFunction)>,
}

impl SymbolicFunction {
    /// Create a new symbolic function from a string expression in the variable `x`
    pub fn from_string(expr_str: &str) -> Result<Self, NumericalError> {
        let expr = Expr::parse_expression(expr_str).map_err(NumericalError::ExpressionParse)?;
        Self::from_expr(expr, "x", Some(expr_str.trim().to_string()))
    }

    /// Create a new symbolic function from an Expr
    pub fn from_expr(
        expr: Expr,
        variable: &str,
        name: Option<String>,
    ) -> Result<Self, NumericalError> {
        let foreign: Vec<String> = expr
            .extract_variables()
            .into_iter()
            .filter(|v| v != variable)
            .collect();
        if !foreign.is_empty() {
            return Err(NumericalError::ExpressionParse(format!(
                "expression {} depends on {:?}, only '{}' is allowed",
                expr, foreign, variable
            )));
        }
        let name = name.unwrap_or_else(|| expr.to_string());
        let func = expr.lambdify1D();
        Ok(Self {
            expr,
            variable: variable.to_string(),
            name,
            func,
            derivative: OnceLock::new(),
        })
    }

    fn compiled_derivative(&self) -> &(Expr, CompiledFunction) {
        self.derivative.get_or_init(|| {
            // Compute derivative symbolically
            let derivative_expr = self.expr.diff(&self.variable);
            debug!("d/d{} [{}] = {}", self.variable, self.expr, derivative_expr);
            let derivative_func = derivative_expr.lambdify1D();
            (derivative_expr, derivative_func)
        })
    }

    /// true once the symbolic derivative has been built
    pub fn has_compiled_derivative(&self) -> bool {
        self.derivative.get().is_some()
    }

    /// Get the symbolic expression as string
    pub fn expression_string(&self) -> String {
        self.expr.to_string()
    }

    /// Get the derivative expression as string
    pub fn derivative_string(&self) -> String {
        self.compiled_derivative().0.to_string()
    }
}

impl Evaluable for SymbolicFunction {
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn analytic_derivative(&self, x: f64) -> Option<f64> {
        Some((self.compiled_derivative().1)(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Where the reference derivative of a differentiation run comes from.
#[derive(Clone, Copy)]
pub enum DerivativeTruth<'a> {
    /// the analytic derivative of an Evaluable (usually f itself)
    Analytic(&'a dyn Evaluable),
    /// a separate function whose values are the derivative
    Formula(&'a dyn Evaluable),
}

impl DerivativeTruth<'_> {
    pub fn at(&self, x: f64) -> Result<f64, NumericalError> {
        match self {
            DerivativeTruth::Analytic(f) => f.derivative(x),
            DerivativeTruth::Formula(df) => df.eval(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closure_function() {
        let f = ClosureFunction::new(|x| x * x - 4.0, "x^2 - 4".to_string());
        assert_eq!(f.eval(3.0).unwrap(), 5.0);
        assert_eq!(f.name(), "x^2 - 4");
        assert!(matches!(
            f.derivative(1.0),
            Err(NumericalError::SymbolicDerivativeUnavailable(_))
        ));
    }

    #[test]
    fn test_function_with_derivative() {
        let f = FunctionWithDerivative::new(|x| x * x, |x| 2.0 * x, "x^2".to_string());
        assert_eq!(f.derivative(3.0).unwrap(), 6.0);
        assert_eq!(DerivativeTruth::Analytic(&f).at(1.5).unwrap(), 3.0);
        assert_eq!(DerivativeTruth::Formula(&f).at(1.5).unwrap(), 2.25);
    }

    #[test]
    fn test_non_finite_values_are_errors() {
        let f = ClosureFunction::new(|x| 1.0 / x, "1/x".to_string());
        match f.eval(0.0) {
            Err(NumericalError::EvaluationError { x, what, .. }) => {
                assert_eq!(x, 0.0);
                assert_eq!(what, "1/x");
            }
            other => panic!("unexpected {:?}", other),
        }
        let g = ClosureFunction::new(|x: f64| x.ln(), "ln".to_string());
        assert!(g.eval(-1.0).is_err());
    }

    #[test]
    fn test_symbolic_function() {
        let f = SymbolicFunction::from_string("sin(x) + x^2").unwrap();
        assert_relative_eq!(f.eval(0.5).unwrap(), 0.5f64.sin() + 0.25, epsilon = 1e-15);
        assert_relative_eq!(f.derivative(0.5).unwrap(), 0.5f64.cos() + 1.0, epsilon = 1e-15);
        assert_eq!(f.expression_string(), "sin(x) + x^2");
        assert_eq!(f.derivative_string(), "cos(x) + 2*x");
        assert_eq!(f.name(), "sin(x) + x^2");
    }

    #[test]
    fn test_symbolic_derivative_is_built_on_demand() {
        let df = SymbolicFunction::from_string("3*x^2").unwrap();
        assert_eq!(DerivativeTruth::Formula(&df).at(2.0).unwrap(), 12.0);
        assert!(!df.has_compiled_derivative());
        assert_eq!(DerivativeTruth::Analytic(&df).at(2.0).unwrap(), 12.0);
        assert!(df.has_compiled_derivative());
    }

    #[test]
    fn test_symbolic_function_rejects_bad_input() {
        assert!(matches!(
            SymbolicFunction::from_string("x + y"),
            Err(NumericalError::ExpressionParse(_))
        ));
        assert!(matches!(
            SymbolicFunction::from_string("sin(x"),
            Err(NumericalError::ExpressionParse(_))
        ));
        // constants are fine
        let c = SymbolicFunction::from_string("3").unwrap();
        assert_eq!(c.derivative(1.0).unwrap(), 0.0);
    }
}

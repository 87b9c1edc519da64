#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use matan::symbolic::symbolic_engine::Expr;
/// let input = "sin(x) + x^2";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D();
/// println!("{}, Rust function: {}  \n", input, parsed_function(1.0));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds a symbolic expression of one variable
/// 2) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use matan::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("exp(x)*ln(x)").unwrap();
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x");
/// println!("df_dx = {}", df_dx);
/// // the derivative text parses back
/// let reparsed = Expr::parse_expression(&df_dx.to_string()).unwrap();
/// assert!((reparsed.eval1D(2.0) - df_dx.eval1D(2.0)).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
/// bracket and operator search helpers used by the parser
pub mod utils;

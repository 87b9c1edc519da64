//! # Symbolic Engine Module
//!
//! Core symbolic expression type for functions of one variable. The engine is deliberately
//! small: it knows how to hold an expression tree, print it back as formula text, and answer
//! a few structural questions. Parsing lives in `parse_expr`, differentiation in
//! `symbolic_engine_derivatives`, simplification in `symbolic_simplify` and conversion to
//! plain Rust closures in `symbolic_lambdify`.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg` and their inverses
//!
//! Trigonometric variants keep the mathematical notation (tg, ctg, arctg, arcctg) while the
//! parser also accepts tan, cot, atan and friends.

#![allow(non_camel_case_types)]

use std::collections::BTreeSet;
use std::fmt;

/// Symbolic expression tree.
///
/// # Examples
/// ```rust, ignore
/// use matan::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    tg(Box<Expr>),
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    arctg(Box<Expr>),
    arcctg(Box<Expr>),
}

/// Binding strength used by `Display` to decide where brackets are needed.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => 1,
        Expr::Mul(lhs, _) if is_minus_one(lhs) => 1,
        Expr::Mul(_, _) | Expr::Div(_, _) => 2,
        Expr::Pow(_, _) => 3,
        Expr::Const(val) if *val < 0.0 => 1,
        _ => 4,
    }
}

fn is_minus_one(expr: &Expr) -> bool {
    matches!(expr, Expr::Const(val) if *val == -1.0)
}

fn write_operand(f: &mut fmt::Formatter, expr: &Expr, needs_brackets: bool) -> fmt::Result {
    if needs_brackets {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Prints the expression as formula text that `Expr::parse_expression` reads back.
///
/// Brackets are emitted only where operator precedence or associativity requires them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let own = precedence(self);
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => {
                write_operand(f, lhs, precedence(lhs) < own)?;
                write!(f, " + ")?;
                write_operand(f, rhs, precedence(rhs) <= own)
            }
            Expr::Sub(lhs, rhs) => {
                write_operand(f, lhs, precedence(lhs) < own)?;
                write!(f, " - ")?;
                write_operand(f, rhs, precedence(rhs) <= own)
            }
            Expr::Mul(lhs, rhs) if is_minus_one(lhs) => {
                write!(f, "-")?;
                write_operand(f, rhs, precedence(rhs) < 2)
            }
            Expr::Mul(lhs, rhs) => {
                write_operand(f, lhs, precedence(lhs) < own)?;
                write!(f, "*")?;
                write_operand(f, rhs, precedence(rhs) <= own)
            }
            Expr::Div(lhs, rhs) => {
                write_operand(f, lhs, precedence(lhs) < own)?;
                write!(f, "/")?;
                write_operand(f, rhs, precedence(rhs) <= own)
            }
            Expr::Pow(base, exp) => {
                write_operand(f, base, precedence(base) <= own)?;
                write!(f, "^")?;
                write_operand(f, exp, precedence(exp) < own)
            }
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(val) => Expr::Const(-val),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// true if expression is Const(0.0)
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// true if expression is Const(1.0)
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    /// Returns the constant value if the expression is a bare constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Unary function variants share one argument; this gives access to it.
    pub(crate) fn unary_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::ctg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg)
            | Expr::arcctg(arg) => Some(arg),
            _ => None,
        }
    }

    /// Rebuilds the same unary function around a new argument.
    pub(crate) fn with_unary_argument(&self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::ctg(_) => Expr::ctg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            Expr::arcctg(_) => Expr::arcctg(arg),
            other => other.clone(),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            unary => unary
                .unary_argument()
                .is_some_and(|arg| arg.contains_variable(var_name)),
        }
    }

    /// Sorted names of all variables in the expression.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found.into_iter().collect()
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(found);
                rhs.collect_variables(found);
            }
            unary => {
                if let Some(arg) = unary.unary_argument() {
                    arg.collect_variables(found);
                }
            }
        }
    }
}

//! Analytical differentiation of `Expr` trees.
//!
//! Rules are applied recursively by pattern matching (sum, product, quotient and chain
//! rules). The raw result is verbose, so `diff` hands it to `simplify` before returning.

use crate::symbolic::symbolic_engine::Expr;

fn c(val: f64) -> Expr {
    Expr::Const(val)
}

impl Expr {
    /// Symbolic derivative with respect to `var`, simplified.
    ///
    /// # Examples
    /// ```
    /// use matan::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x^3").unwrap();
    /// assert_eq!(f.diff("x").to_string(), "3*x^2");
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        self.diff_raw(var).simplify()
    }

    fn diff_raw(&self, var: &str) -> Expr {
        if !self.contains_variable(var) {
            return c(0.0);
        }
        match self {
            Expr::Var(name) => {
                if name == var {
                    c(1.0)
                } else {
                    c(0.0)
                }
            }
            Expr::Const(_) => c(0.0),
            Expr::Add(lhs, rhs) => lhs.diff_raw(var) + rhs.diff_raw(var),
            Expr::Sub(lhs, rhs) => lhs.diff_raw(var) - rhs.diff_raw(var),
            Expr::Mul(lhs, rhs) => {
                let (u, v) = (lhs.as_ref().clone(), rhs.as_ref().clone());
                lhs.diff_raw(var) * v + u * rhs.diff_raw(var)
            }
            Expr::Div(lhs, rhs) => {
                let (u, v) = (lhs.as_ref().clone(), rhs.as_ref().clone());
                (lhs.diff_raw(var) * v.clone() - u * rhs.diff_raw(var)) / v.pow(c(2.0))
            }
            Expr::Pow(base, exp) => {
                let (u, n) = (base.as_ref().clone(), exp.as_ref().clone());
                if !n.contains_variable(var) {
                    // power rule: (u^n)' = n*u^(n-1)*u'
                    let lowered = match n.as_const() {
                        Some(val) => c(val - 1.0),
                        None => n.clone() - c(1.0),
                    };
                    n * u.pow(lowered) * base.diff_raw(var)
                } else {
                    // (u^v)' = u^v * (v'*ln(u) + v*u'/u)
                    self.clone()
                        * (exp.diff_raw(var) * Expr::Ln(u.clone().boxed())
                            + n * base.diff_raw(var) / u)
                }
            }
            Expr::Exp(arg) => Expr::Exp(arg.clone()) * arg.diff_raw(var),
            Expr::Ln(arg) => arg.diff_raw(var) / arg.as_ref().clone(),
            Expr::sin(arg) => Expr::cos(arg.clone()) * arg.diff_raw(var),
            Expr::cos(arg) => -Expr::sin(arg.clone()) * arg.diff_raw(var),
            Expr::tg(arg) => arg.diff_raw(var) / Expr::cos(arg.clone()).pow(c(2.0)),
            Expr::ctg(arg) => -(arg.diff_raw(var) / Expr::sin(arg.clone()).pow(c(2.0))),
            Expr::arcsin(arg) => {
                let u = arg.as_ref().clone();
                arg.diff_raw(var) / (c(1.0) - u.pow(c(2.0))).pow(c(0.5))
            }
            Expr::arccos(arg) => {
                let u = arg.as_ref().clone();
                -(arg.diff_raw(var) / (c(1.0) - u.pow(c(2.0))).pow(c(0.5)))
            }
            Expr::arctg(arg) => {
                let u = arg.as_ref().clone();
                arg.diff_raw(var) / (c(1.0) + u.pow(c(2.0)))
            }
            Expr::arcctg(arg) => {
                let u = arg.as_ref().clone();
                -(arg.diff_raw(var) / (c(1.0) + u.pow(c(2.0))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// compares the symbolic derivative against a central difference at a few points
    fn check_against_numeric(text: &str, points: &[f64]) {
        let f = Expr::parse_expression(text).unwrap();
        let df = f.diff("x");
        let h = 1e-6;
        for &x in points {
            let numeric = (f.eval1D(x + h) - f.eval1D(x - h)) / (2.0 * h);
            assert_relative_eq!(df.eval1D(x), numeric, epsilon = 1e-5, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_polynomial_derivative_text() {
        let f = Expr::parse_expression("x^3").unwrap();
        assert_eq!(f.diff("x").to_string(), "3*x^2");
        let f = Expr::parse_expression("x^2 + 5*x - 7").unwrap();
        assert_eq!(f.diff("x").to_string(), "2*x + 5");
        let f = Expr::parse_expression("x").unwrap();
        assert_eq!(f.diff("x"), Expr::Const(1.0));
    }

    #[test]
    fn test_derivative_of_other_variable_is_zero() {
        let f = Expr::parse_expression("y^2 + sin(y)").unwrap();
        assert_eq!(f.diff("x"), Expr::Const(0.0));
    }

    #[test]
    fn test_elementary_functions_match_numeric_derivative() {
        let points = [0.2, 0.45, 0.8];
        for text in [
            "sin(x) + x^2",
            "exp(2*x)*cos(x)",
            "ln(x + 1)/x",
            "tg(x) - ctg(x)",
            "arcsin(x) + arccos(x/2)",
            "arctg(x^2) + arcctg(x)",
            "sqrt(x)",
            "x^x",
            "1/x",
        ] {
            check_against_numeric(text, &points);
        }
    }
}

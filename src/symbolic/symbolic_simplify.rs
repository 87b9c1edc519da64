//! # Symbolic Expression Simplification Module
//!
//! Bottom-up algebraic clean-up applied to every derivative the engine produces:
//!
//! 1. **Constant Folding**: arithmetic and elementary functions of constants are evaluated
//!    (only when the result is finite)
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x * 0 = 0, x ^ 1 = x, x ^ 0 = 1
//! 3. **Sign Normalisation**: x + (-y) becomes x - y, constants move to the left of a product
//!
//! The rules never change the value of the expression wherever the original is defined.

use crate::symbolic::symbolic_engine::Expr;

fn fold(val: f64, fallback: impl FnOnce() -> Expr) -> Expr {
    if val.is_finite() {
        Expr::Const(val)
    } else {
        fallback()
    }
}

/// splits `-1 * e` and negative constants into their positive part
fn negated_part(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Const(val) if *val < 0.0 => Some(Expr::Const(-val)),
        Expr::Mul(lhs, rhs) => match lhs.as_const() {
            Some(val) if val == -1.0 => Some(rhs.as_ref().clone()),
            Some(val) if val < 0.0 => Some(Expr::Mul(Box::new(Expr::Const(-val)), rhs.clone())),
            _ => None,
        },
        _ => None,
    }
}

impl Expr {
    /// Simplifies the expression bottom-up.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify(), rhs.simplify()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify(), rhs.simplify()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify(), rhs.simplify()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify(), rhs.simplify()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify(), exp.simplify()),
            unary => {
                let arg = match unary.unary_argument() {
                    Some(arg) => arg.simplify(),
                    None => return unary.clone(),
                };
                let rebuilt = unary.with_unary_argument(arg);
                match rebuilt.unary_argument().and_then(Expr::as_const) {
                    Some(_) => {
                        let val = rebuilt.eval1D(0.0);
                        fold(val, || rebuilt.clone())
                    }
                    None => rebuilt,
                }
            }
        }
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs.as_const(), rhs.as_const()) {
        (Some(a), Some(b)) => return fold(a + b, || lhs.clone() + rhs.clone()),
        (Some(a), None) if a == 0.0 => return rhs,
        (None, Some(b)) if b == 0.0 => return lhs,
        _ => {}
    }
    if let Some(positive) = negated_part(&rhs) {
        return simplify_sub(lhs, positive);
    }
    if let Some(positive) = negated_part(&lhs) {
        return simplify_sub(rhs, positive);
    }
    lhs + rhs
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs.as_const(), rhs.as_const()) {
        (Some(a), Some(b)) => return fold(a - b, || lhs.clone() - rhs.clone()),
        (None, Some(b)) if b == 0.0 => return lhs,
        (Some(a), None) if a == 0.0 => return simplify_mul(Expr::Const(-1.0), rhs),
        _ => {}
    }
    if lhs == rhs {
        return Expr::Const(0.0);
    }
    if let Some(positive) = negated_part(&rhs) {
        return simplify_add(lhs, positive);
    }
    lhs - rhs
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs.as_const(), rhs.as_const()) {
        (Some(a), Some(b)) => return fold(a * b, || lhs.clone() * rhs.clone()),
        (Some(a), _) if a == 0.0 => return Expr::Const(0.0),
        (_, Some(b)) if b == 0.0 => return Expr::Const(0.0),
        (Some(a), _) if a == 1.0 => return rhs,
        (_, Some(b)) if b == 1.0 => return lhs,
        // constants first: x*3 -> 3*x
        (None, Some(_)) => return simplify_mul(rhs, lhs),
        _ => {}
    }
    // a*(b*e) -> (a*b)*e for constants a, b
    if let (Some(a), Expr::Mul(inner_lhs, inner_rhs)) = (lhs.as_const(), &rhs) {
        if let Some(b) = inner_lhs.as_const() {
            return simplify_mul(Expr::Const(a * b), inner_rhs.as_ref().clone());
        }
    }
    // (a*e)*f -> a*(e*f) keeps the constant in front
    if let Expr::Mul(inner_lhs, inner_rhs) = &lhs {
        if inner_lhs.as_const().is_some() && rhs.as_const().is_none() {
            let tail = simplify_mul(inner_rhs.as_ref().clone(), rhs);
            return simplify_mul(inner_lhs.as_ref().clone(), tail);
        }
    }
    // e*(a*f) -> a*(e*f)
    if let Expr::Mul(inner_lhs, inner_rhs) = &rhs {
        if let Some(a) = inner_lhs.as_const() {
            let tail = simplify_mul(lhs, inner_rhs.as_ref().clone());
            return simplify_mul(Expr::Const(a), tail);
        }
    }
    lhs * rhs
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs.as_const(), rhs.as_const()) {
        (Some(a), Some(b)) if b != 0.0 => return fold(a / b, || lhs.clone() / rhs.clone()),
        (Some(a), None) if a == 0.0 => return Expr::Const(0.0),
        (_, Some(b)) if b == 1.0 => return lhs,
        _ => {}
    }
    lhs / rhs
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    match (base.as_const(), exp.as_const()) {
        (Some(a), Some(b)) => fold(a.powf(b), || base.clone().pow(exp.clone())),
        (_, Some(b)) if b == 0.0 => Expr::Const(1.0),
        (_, Some(b)) if b == 1.0 => base,
        (Some(a), _) if a == 1.0 => Expr::Const(1.0),
        _ => base.pow(exp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Expr {
        Expr::parse_expression(text).unwrap()
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(parse("2 + 3*4").simplify(), Expr::Const(14.0));
        assert_eq!(parse("2^3 - 1").simplify(), Expr::Const(7.0));
        assert_eq!(parse("exp(0) + sin(0)").simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_division_by_zero_is_not_folded() {
        let expr = parse("1/0").simplify();
        assert_eq!(expr, parse("1/0"));
        let expr = parse("ln(0)").simplify();
        assert_eq!(expr, parse("ln(0)"));
    }

    #[test]
    fn test_identities() {
        assert_eq!(parse("x + 0").simplify(), parse("x"));
        assert_eq!(parse("0 + x*1").simplify(), parse("x"));
        assert_eq!(parse("x*0 + 1").simplify(), Expr::Const(1.0));
        assert_eq!(parse("x^1").simplify(), parse("x"));
        assert_eq!(parse("x^0").simplify(), Expr::Const(1.0));
        assert_eq!(parse("x - x").simplify(), Expr::Const(0.0));
        assert_eq!(parse("0/x").simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_sign_normalisation() {
        assert_eq!(parse("x + -2").simplify().to_string(), "x - 2");
        assert_eq!(parse("x + (-1)*sin(x)").simplify().to_string(), "x - sin(x)");
        assert_eq!(parse("0 - x").simplify().to_string(), "-x");
        assert_eq!(parse("x*3*2").simplify().to_string(), "6*x");
        assert_eq!(parse("2*(x*3)").simplify().to_string(), "6*x");
    }
}

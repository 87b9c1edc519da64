use crate::symbolic::symbolic_engine::Expr;

/// integral exponents go through `powi`, which also handles negative bases
fn power(base: f64, exp: f64) -> f64 {
    if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
        base.powi(exp as i32)
    } else {
        base.powf(exp)
    }
}

fn apply_unary(expr: &Expr, arg: f64) -> f64 {
    match expr {
        Expr::Exp(_) => arg.exp(),
        Expr::Ln(_) => arg.ln(),
        Expr::sin(_) => arg.sin(),
        Expr::cos(_) => arg.cos(),
        Expr::tg(_) => arg.tan(),
        Expr::ctg(_) => 1.0 / arg.tan(),
        Expr::arcsin(_) => arg.asin(),
        Expr::arccos(_) => arg.acos(),
        Expr::arctg(_) => arg.atan(),
        Expr::arcctg(_) => std::f64::consts::FRAC_PI_2 - arg.atan(),
        _ => f64::NAN,
    }
}

impl Expr {
    /// Evaluates an expression of one variable at `x` by walking the tree.
    ///
    /// Every variable is bound to `x`. Domain errors show up as NaN or infinity, the caller
    /// decides what to do with them.
    pub fn eval1D(&self, x: f64) -> f64 {
        match self {
            Expr::Var(_) => x,
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval1D(x) + rhs.eval1D(x),
            Expr::Sub(lhs, rhs) => lhs.eval1D(x) - rhs.eval1D(x),
            Expr::Mul(lhs, rhs) => lhs.eval1D(x) * rhs.eval1D(x),
            Expr::Div(lhs, rhs) => lhs.eval1D(x) / rhs.eval1D(x),
            Expr::Pow(base, exp) => power(base.eval1D(x), exp.eval1D(x)),
            unary => match unary.unary_argument() {
                Some(arg) => apply_unary(unary, arg.eval1D(x)),
                None => f64::NAN,
            },
        }
    }

    /// Converts a single-variable symbolic expression into an executable Rust closure.
    ///
    /// The closure tree mirrors the expression tree, so no parsing or matching happens at
    /// call time.
    ///
    /// # Examples
    /// ```
    /// use matan::symbolic::symbolic_engine::Expr;
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D();
                let rhs_fn = rhs.lambdify1D();
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D();
                match exp.as_const() {
                    Some(n) => Box::new(move |x| power(base_fn(x), n)),
                    None => {
                        let exp_fn = exp.lambdify1D();
                        Box::new(move |x| power(base_fn(x), exp_fn(x)))
                    }
                }
            }
            unary => {
                let Some(arg) = unary.unary_argument() else {
                    return Box::new(|_| f64::NAN);
                };
                let arg_fn = arg.lambdify1D();
                match unary {
                    Expr::Exp(_) => Box::new(move |x| arg_fn(x).exp()),
                    Expr::Ln(_) => Box::new(move |x| arg_fn(x).ln()),
                    Expr::sin(_) => Box::new(move |x| arg_fn(x).sin()),
                    Expr::cos(_) => Box::new(move |x| arg_fn(x).cos()),
                    Expr::tg(_) => Box::new(move |x| arg_fn(x).tan()),
                    Expr::ctg(_) => Box::new(move |x| 1.0 / arg_fn(x).tan()),
                    Expr::arcsin(_) => Box::new(move |x| arg_fn(x).asin()),
                    Expr::arccos(_) => Box::new(move |x| arg_fn(x).acos()),
                    Expr::arctg(_) => Box::new(move |x| arg_fn(x).atan()),
                    _ => Box::new(move |x| std::f64::consts::FRAC_PI_2 - arg_fn(x).atan()),
                }
            }
        }
    }
}

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    brackets_are_balanced, find_char_position_outside_brackets, find_pair_to_this_bracket,
    find_rightmost_operator_outside_brackets, is_identifier,
};
use log::debug;
use std::f64::consts::PI;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use matan::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 - 3*sin(x)").unwrap();
/// let f = parsed_expression.lambdify1D();
/// assert!((f(0.0)).abs() < 1e-15);
/// ```
//                  search recursion diagram
//                "y^2+exp(x)-log(x)/y"             |
//                |       left  | right             |
//                |_________________________________|
//                |  rightmost + or - outside ()    |
//                |_________________________________|
//                | y^2+exp(x)  |  log(x)/y         |
//                |       |     |          |        |
//                |_____ \|/    |         \|/       |
//                |   split by +      split by /    |
//                |_________________________________|
//                  then ^, then functions, brackets, numbers and variables

const FUNCTIONS: &[&str] = &[
    "exp", "ln", "log", "sin", "cos", "tg", "tan", "ctg", "cot", "arcsin", "asin", "arccos",
    "acos", "arctg", "arctan", "atan", "arcctg", "acot", "sqrt",
];

fn apply_function(name: &str, arg: Expr) -> Result<Expr, String> {
    let arg = arg.boxed();
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tg" | "tan" => Expr::tg(arg),
        "ctg" | "cot" => Expr::ctg(arg),
        "arcsin" | "asin" => Expr::arcsin(arg),
        "arccos" | "acos" => Expr::arccos(arg),
        "arctg" | "arctan" | "atan" => Expr::arctg(arg),
        "arcctg" | "acot" => Expr::arcctg(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        _ => return Err(format!("unknown function '{}'", name)),
    };
    Ok(expr)
}

/// Parses one (already trimmed-or-not) piece of formula text.
///
/// Precedence, loosest first: binary `+ -` (left associative), unary sign, `* /` (left
/// associative), `^` (right associative), function calls, brackets, literals and variables.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }

    // Handling addition and subtraction
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['+', '-']) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(match op {
            '+' => Expr::Add(left.boxed(), right.boxed()),
            _ => Expr::Sub(left.boxed(), right.boxed()),
        });
    }

    // Handling unary sign
    if let Some(rest) = input.strip_prefix('-') {
        let inner = parse_expression_func(rest)?;
        return Ok(-inner);
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(rest);
    }

    // Handling multiplication and division
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/']) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(match op {
            '*' => Expr::Mul(left.boxed(), right.boxed()),
            _ => Expr::Div(left.boxed(), right.boxed()),
        });
    }

    // Handling power: the leftmost '^' splits, so a^b^c is a^(b^c)
    if let Some(pos) = find_char_position_outside_brackets(input, '^') {
        let base = parse_expression_func(&input[..pos])?;
        let exponent = parse_expression_func(&input[pos + 1..])?;
        return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
    }

    // Handling functions like sin(...)
    if let Some(bracket_start) = input.find('(') {
        let name = input[..bracket_start].trim();
        let bracket_end = find_pair_to_this_bracket(input, bracket_start)
            .ok_or_else(|| format!("unmatched bracket in '{}'", input))?;
        if bracket_end != input.len() - 1 {
            return Err(format!("unexpected text after ')' in '{}'", input));
        }
        let inner = parse_expression_func(&input[bracket_start + 1..bracket_end])?;
        if name.is_empty() {
            return Ok(inner);
        }
        if FUNCTIONS.contains(&name) {
            return apply_function(name, inner);
        }
        return Err(format!("unknown function '{}'", name));
    }

    // Handling constants and variables
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }
    if input == "pi" {
        return Ok(Expr::Const(PI));
    }
    if is_identifier(input) {
        return Ok(Expr::Var(input.to_string()));
    }
    Err(format!("invalid expression format: '{}'", input))
}

impl Expr {
    /// Parses formula text like `sin(x) + x^2` into an expression tree.
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        if !brackets_are_balanced(input) {
            return Err(format!("unmatched brackets in '{}'", input));
        }
        let parsed = parse_expression_func(input)?;
        debug!("parsed '{}' as {}", input, parsed);
        Ok(parsed)
    }
}

use std::fmt;

/// Failures of the grid builder, the difference estimators, the minimizers and the runner.
///
/// Every variant carries the values that caused it so the caller can decide how to retry
/// (narrow the interval, change h or eps). Nothing is retried inside the library.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// a >= b
    InvalidInterval { a: f64, b: f64 },
    /// h <= 0 or h does not divide b - a
    InvalidStep { h: f64, detail: String },
    /// the grid would have fewer than 3 points
    InvalidGrid { points: usize },
    /// eps <= 0 or NaN
    InvalidTolerance { eps: f64 },
    /// dichotomy offset still <= 0 after defaulting
    InvalidPerturbation { delta: f64 },
    /// non-finite value of a function or of the reference derivative
    EvaluationError { x: f64, value: f64, what: String },
    /// dichotomy safety cap hit
    IterationLimitExceeded { method: String, max_iterations: usize },
    /// no symbolic differentiation collaborator installed or it refused the formula
    SymbolicDerivativeUnavailable(String),
    /// right/left/central results of different lengths
    MismatchedSampleCount { right: usize, left: usize, central: usize },
    /// formula text rejected by the expression parser
    ExpressionParse(String),
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumericalError::InvalidInterval { a, b } => {
                write!(f, "Invalid interval: a must be less than b (a = {}, b = {})", a, b)
            }
            NumericalError::InvalidStep { h, detail } => write!(f, "Invalid h = {}: {}", h, detail),
            NumericalError::InvalidGrid { points } => write!(
                f,
                "Invalid grid: need at least 3 points, got {}",
                points
            ),
            NumericalError::InvalidTolerance { eps } => {
                write!(f, "Invalid eps = {}: must be positive", eps)
            }
            NumericalError::InvalidPerturbation { delta } => {
                write!(f, "Invalid delta = {}: must be positive", delta)
            }
            NumericalError::EvaluationError { x, value, what } => write!(
                f,
                "Non-finite value {} of {} at x = {}; narrow the interval away from singularities",
                value, what, x
            ),
            NumericalError::IterationLimitExceeded {
                method,
                max_iterations,
            } => write!(
                f,
                "{}: iteration limit {} exceeded; eps may be too small",
                method, max_iterations
            ),
            NumericalError::SymbolicDerivativeUnavailable(msg) => {
                write!(f, "Symbolic derivative unavailable: {}", msg)
            }
            NumericalError::MismatchedSampleCount {
                right,
                left,
                central,
            } => write!(
                f,
                "Mismatched sample sizes: right = {}, left = {}, central = {}",
                right, left, central
            ),
            NumericalError::ExpressionParse(msg) => write!(f, "Failed to parse expression: {}", msg),
        }
    }
}

impl std::error::Error for NumericalError {}

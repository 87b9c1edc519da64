use crate::numerical::errors::NumericalError;
use crate::numerical::evaluable::Evaluable;
use log::debug;

/// largest allowed distance of (b - a)/h from the nearest integer
const DIVISIBILITY_TOLERANCE: f64 = 1e-9;

/// upper bound on the number of grid intervals n
pub const MAX_GRID_INTERVALS: usize = 100_000_000;

/// Uniform sample grid x0 = a, ..., xn = b with f(xi) alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub h: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Grid {
    /// number of points (n + 1)
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Checks (a, b, h) and returns the number of intervals n, at most `MAX_GRID_INTERVALS`.
pub fn grid_intervals(a: f64, b: f64, h: f64) -> Result<usize, NumericalError> {
    if !(a < b) || !(b - a).is_finite() {
        return Err(NumericalError::InvalidInterval { a, b });
    }
    if !(h > 0.0) || !h.is_finite() {
        return Err(NumericalError::InvalidStep {
            h,
            detail: "must be positive and finite".to_string(),
        });
    }
    let n_raw = (b - a) / h;
    let n = n_raw.round();
    if !(n <= MAX_GRID_INTERVALS as f64) {
        return Err(NumericalError::InvalidStep {
            h,
            detail: format!(
                "(b - a)/h = {:e} exceeds the limit of {} intervals",
                n_raw, MAX_GRID_INTERVALS
            ),
        });
    }
    if n < 2.0 {
        return Err(NumericalError::InvalidGrid {
            points: n.max(0.0) as usize + 1,
        });
    }
    if (n_raw - n).abs() > DIVISIBILITY_TOLERANCE {
        return Err(NumericalError::InvalidStep {
            h,
            detail: format!("(b - a) = {} must be divisible by h", b - a),
        });
    }
    Ok(n as usize)
}

/// Builds the grid and evaluates f at every abscissa in order.
///
/// The last abscissa is stored as `b` itself so both ends are exact. The first non-finite
/// value aborts construction.
pub fn build_grid(f: &dyn Evaluable, a: f64, b: f64, h: f64) -> Result<Grid, NumericalError> {
    let n = grid_intervals(a, b, h)?;
    let mut x = Vec::with_capacity(n + 1);
    let mut y = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let xi = if i == n { b } else { a + i as f64 * h };
        y.push(f.eval(xi)?);
        x.push(xi);
    }
    debug!("grid on [{}, {}] with h = {}: {} points", a, b, h, n + 1);
    Ok(Grid { h, x, y })
}

// 3-point one-sided boundary formulas shared by all difference schemes, plus RMSE.
// Both formulas are second order, the same as the central interior stencil.

/// f'(x0) ~ (-3y0 + 4y1 - y2)/(2h); needs at least 3 samples
pub fn left_boundary_derivative(y: &[f64], h: f64) -> f64 {
    (-3.0 * y[0] + 4.0 * y[1] - y[2]) / (2.0 * h)
}

/// f'(xn) ~ (y[n-2] - 4y[n-1] + 3y[n])/(2h); needs at least 3 samples
pub fn right_boundary_derivative(y: &[f64], h: f64) -> f64 {
    let n = y.len();
    (y[n - 3] - 4.0 * y[n - 2] + 3.0 * y[n - 1]) / (2.0 * h)
}

/// root of the mean squared error, 0 for no errors at all
pub fn rmse<I>(errors: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (count, sum_sq) = errors
        .into_iter()
        .fold((0usize, 0.0), |(count, sum), err| (count + 1, sum + err * err));
    if count == 0 {
        0.0
    } else {
        (sum_sq / count as f64).sqrt()
    }
}

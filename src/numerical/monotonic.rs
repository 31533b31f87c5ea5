//! Strict monotonicity tests by dense sampling.
use crate::numerical::window::SearchWindow;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;

fn sampled(expr: &Expr, var: &str, a: f64, b: f64, window: &SearchWindow) -> Option<Vec<f64>> {
    let sub = window.covering(a, b)?;
    let values = expr.calc_vector_lambdified1D(var, &linspace(sub.start, sub.end, sub.samples + 1));
    if values.iter().all(|v| v.is_finite()) {
        Some(values)
    } else {
        None
    }
}

/// Equal neighbours only pass when both have underflowed to (almost) zero, as in the tails
/// of `exp(-x^2)`; the ends must still differ in the direction of `step`.
fn ordered(values: &[f64], step: impl Fn(f64, f64) -> bool) -> bool {
    let underflow = |v: f64| v.abs() < f64::MIN_POSITIVE;
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return false;
    };
    step(*first, *last)
        && values
            .windows(2)
            .all(|w| step(w[0], w[1]) || (w[0] == w[1] && underflow(w[0])))
}

/// true when the expression is finite and strictly increasing on `[a, b]`. Infinite ends are
/// cut at the window edge. An empty or inverted interval is not increasing.
pub fn is_strictly_increasing(expr: &Expr, var: &str, a: f64, b: f64, window: &SearchWindow) -> bool {
    match sampled(expr, var, a, b, window) {
        Some(values) => ordered(&values, |x, y| y > x),
        None => false,
    }
}

/// true when the expression is finite and strictly decreasing on `[a, b]`. Infinite ends are
/// cut at the window edge. An empty or inverted interval is not decreasing.
pub fn is_strictly_decreasing(expr: &Expr, var: &str, a: f64, b: f64, window: &SearchWindow) -> bool {
    match sampled(expr, var, a, b, window) {
        Some(values) => ordered(&values, |x, y| y < x),
        None => false,
    }
}

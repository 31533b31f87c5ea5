//! Where an expression is defined: singular points, continuous domain and range.
use crate::numerical::limits::{Direction, LimitValue, limit};
use crate::numerical::root_finding::{SymbolicFunction, solve};
use crate::numerical::window::SearchWindow;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, snap_nice, sorted_unique};
use log::debug;

const BOUNDARY_SNAP: f64 = 1e-9;

fn collect_singularities(expr: &Expr, var: &str, window: &SearchWindow, out: &mut Vec<f64>) {
    if !expr.contains_variable(var) {
        return;
    }
    match expr {
        Expr::Div(_, den) if den.contains_variable(var) => {
            out.extend(solve(den, var, window));
        }
        Expr::Pow(base, exp) => {
            if let Some(e) = exp.as_const() {
                if e < 0.0 {
                    out.extend(solve(base, var, window));
                }
            }
        }
        Expr::Ln(arg) => out.extend(solve(arg, var, window)),
        Expr::tg(arg) => out.extend(solve(&Expr::cos(arg.clone()), var, window)),
        Expr::ctg(arg) => out.extend(solve(&Expr::sin(arg.clone()), var, window)),
        _ => {}
    }
    for child in expr.children() {
        collect_singularities(child, var, window, out);
    }
}

/// Points of the window where the expression is undefined: zeros of denominators, zeros of
/// bases raised to a negative power, zeros of logarithm arguments and poles of `tan`/`cot`.
///
/// # Examples
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// use DerivativeXpert::numerical::domain::singularities;
/// use DerivativeXpert::numerical::window::SearchWindow;
/// let f = Expr::parse_expression("1/(x^2 - 4)").unwrap();
/// assert_eq!(singularities(&f, "x", &SearchWindow::default()), vec![-2.0, 2.0]);
/// ```
pub fn singularities(expr: &Expr, var: &str, window: &SearchWindow) -> Vec<f64> {
    let mut points = Vec::new();
    collect_singularities(&expr.simplify(), var, window, &mut points);
    points.retain(|p| *p >= window.start && *p <= window.end);
    sorted_unique(points, 1e-9)
}

fn is_defined(expr: &Expr, var: &str, x: f64) -> bool {
    expr.eval1D(var, x).is_finite()
}

/// Bisects between a point where the expression is defined and one where it is not.
fn refine_boundary(expr: &Expr, var: &str, mut inside: f64, mut outside: f64) -> f64 {
    for _ in 0..200 {
        let mid = (inside + outside) / 2.0;
        if mid == inside || mid == outside {
            break;
        }
        if is_defined(expr, var, mid) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    snap_nice(inside, BOUNDARY_SNAP)
}

/// Runs of finite samples inside the open piece `(lo, hi)` between two consecutive breaks.
fn defined_runs(expr: &Expr, var: &str, lo: f64, hi: f64, samples: usize) -> Vec<(f64, f64)> {
    let xs = linspace(lo, hi, samples + 1);
    let ok: Vec<bool> = xs.iter().map(|x| is_defined(expr, var, *x)).collect();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < xs.len() {
        if !ok[i] {
            i += 1;
            continue;
        }
        let first = i;
        while i + 1 < xs.len() && ok[i + 1] {
            i += 1;
        }
        let last = i;
        let start = if first == 0 {
            lo
        } else {
            refine_boundary(expr, var, xs[first], xs[first - 1])
        };
        let end = if last == xs.len() - 1 {
            hi
        } else {
            refine_boundary(expr, var, xs[last], xs[last + 1])
        };
        if start < end {
            runs.push((start, end));
        }
        i += 1;
    }
    runs
}

/// Sub-intervals of the window on which the expression is finite, as `(start, end)` pairs.
///
/// The window is cut at every singularity; each piece is sampled and the runs of defined
/// samples become intervals whose inner boundaries are located by bisection. Ends that reach
/// the window edge are reported as `±inf`.
///
/// # Examples
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// use DerivativeXpert::numerical::domain::continuous_domain;
/// use DerivativeXpert::numerical::window::SearchWindow;
/// let f = Expr::parse_expression("sqrt(x - 1)").unwrap();
/// assert_eq!(continuous_domain(&f, "x", &SearchWindow::default()), vec![(1.0, f64::INFINITY)]);
/// ```
pub fn continuous_domain(expr: &Expr, var: &str, window: &SearchWindow) -> Vec<(f64, f64)> {
    if !expr.contains_variable(var) {
        return if expr.eval1D(var, 0.0).is_finite() {
            vec![(f64::NEG_INFINITY, f64::INFINITY)]
        } else {
            Vec::new()
        };
    }
    let mut breaks = vec![window.start];
    breaks.extend(
        singularities(expr, var, window)
            .into_iter()
            .filter(|s| *s > window.start && *s < window.end),
    );
    breaks.push(window.end);

    let mut domain = Vec::new();
    for piece in breaks.windows(2) {
        let (lo, hi) = (piece[0], piece[1]);
        let samples = match window.restrict(lo, hi) {
            Some(sub) => sub.samples,
            None => continue,
        };
        // the singular ends themselves are excluded, the runs start just inside them
        for (start, end) in defined_runs(expr, var, lo, hi, samples) {
            let start = if start == lo && lo == window.start {
                f64::NEG_INFINITY
            } else {
                start
            };
            let end = if end == hi && hi == window.end {
                f64::INFINITY
            } else {
                end
            };
            domain.push((start, end));
        }
    }
    debug!("continuous domain of {}: {:?}", expr, domain);
    domain
}

fn widen(bounds: &mut (f64, f64), value: LimitValue) {
    match value {
        LimitValue::Finite(v) => {
            bounds.0 = bounds.0.min(v);
            bounds.1 = bounds.1.max(v);
        }
        LimitValue::PosInfinity => bounds.1 = f64::INFINITY,
        LimitValue::NegInfinity => bounds.0 = f64::NEG_INFINITY,
        LimitValue::Undefined => {}
    }
}

/// Smallest interval containing the values the expression takes over `domain`.
///
/// Each component is sampled densely (clamped to the window), the values at the zeros of the
/// derivative are added, and the bounds are widened by the limits at the component ends.
/// `None` when the expression takes no finite value on the domain.
pub fn function_range(
    expr: &Expr,
    var: &str,
    domain: &[(f64, f64)],
    window: &SearchWindow,
) -> Option<(f64, f64)> {
    let mut bounds = (f64::INFINITY, f64::NEG_INFINITY);
    let function = SymbolicFunction::from_expr(expr, var);
    for &(lo, hi) in domain {
        let sub = match window.restrict(lo, hi) {
            Some(sub) => sub,
            None => continue,
        };
        let mut xs = linspace(sub.start, sub.end, sub.samples + 1);
        xs.extend(solve(function.derivative_expression(), var, &sub));
        for x in xs {
            let y = expr.eval1D(var, x);
            if y.is_finite() {
                bounds.0 = bounds.0.min(y);
                bounds.1 = bounds.1.max(y);
            }
        }
        widen(&mut bounds, limit(expr, var, lo, Direction::Right));
        widen(&mut bounds, limit(expr, var, hi, Direction::Left));
    }
    if bounds.0 <= bounds.1 {
        Some((snap_nice(bounds.0, BOUNDARY_SNAP), snap_nice(bounds.1, BOUNDARY_SNAP)))
    } else {
        None
    }
}

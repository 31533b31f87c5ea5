//! Numerical one- and two-sided limits of one-variable expressions.
//!
//! The expression is sampled on a geometric sequence of points approaching the limit point
//! (offsets `1e-2 .. 1e-9`, scaled by the size of the point; `1e2 .. 1e9` towards infinity).
//! The samples are then classified:
//! - any `NaN` sample: no limit
//! - an infinite sample, or magnitudes growing monotonically with one sign: signed infinity
//! - the last samples settling down: a finite value, snapped to a nearby integer, multiple of
//!   pi or `E`
//! - anything else (oscillation): no limit
use crate::symbolic::symbolic_engine::{Expr, format_number};
use crate::symbolic::utils::snap_nice;
use log::debug;
use std::f64::consts::E;
use std::fmt;

const OFFSETS: [f64; 8] = [1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9];

/// Value of a limit over the extended reals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitValue {
    Finite(f64),
    PosInfinity,
    NegInfinity,
    /// the limit does not exist (oscillation, sides disagree, undefined nearby)
    Undefined,
}

impl LimitValue {
    /// The limit as a plain `f64` (`±inf` for infinite limits, `NaN` when undefined).
    pub fn as_f64(&self) -> f64 {
        match self {
            LimitValue::Finite(v) => *v,
            LimitValue::PosInfinity => f64::INFINITY,
            LimitValue::NegInfinity => f64::NEG_INFINITY,
            LimitValue::Undefined => f64::NAN,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, LimitValue::PosInfinity | LimitValue::NegInfinity)
    }

    fn from_f64(value: f64) -> LimitValue {
        if value.is_nan() {
            LimitValue::Undefined
        } else if value == f64::INFINITY {
            LimitValue::PosInfinity
        } else if value == f64::NEG_INFINITY {
            LimitValue::NegInfinity
        } else {
            LimitValue::Finite(value)
        }
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Finite(v) => write!(f, "{}", format_number(*v).0),
            LimitValue::PosInfinity => write!(f, "oo"),
            LimitValue::NegInfinity => write!(f, "-oo"),
            LimitValue::Undefined => write!(f, "nan"),
        }
    }
}

/// Side from which the limit point is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// from below, `x -> a-`
    Left,
    /// from above, `x -> a+`
    Right,
    Both,
}

fn sample_points(point: f64, side: f64) -> Vec<f64> {
    if point.is_infinite() {
        let sign = point.signum();
        OFFSETS.iter().map(|h| sign / h).collect()
    } else {
        let scale = point.abs().max(1.0);
        OFFSETS.iter().map(|h| point + side * h * scale).collect()
    }
}

fn snap_limit(value: f64, tol: f64) -> f64 {
    if (value - E).abs() <= tol {
        return E;
    }
    if (value + E).abs() <= tol {
        return -E;
    }
    let snapped = snap_nice(value, tol);
    if snapped == value && value.abs() <= tol {
        0.0
    } else {
        snapped
    }
}

/// Classifies a sequence of samples taken closer and closer to the limit point.
fn classify_samples(values: &[f64]) -> LimitValue {
    if values.iter().any(|v| v.is_nan()) {
        return LimitValue::Undefined;
    }
    if let Some(inf) = values.iter().find(|v| v.is_infinite()) {
        // signed by the finite samples before the blow-up, if any
        let positive = values
            .iter()
            .find(|v| v.is_finite() && **v != 0.0)
            .map(|v| *v > 0.0)
            .unwrap_or(*inf > 0.0);
        return if positive {
            LimitValue::PosInfinity
        } else {
            LimitValue::NegInfinity
        };
    }

    let n = values.len();
    let all_positive = values.iter().all(|v| *v > 0.0);
    let all_negative = values.iter().all(|v| *v < 0.0);
    let magnitudes_increasing = values.windows(2).all(|w| w[1].abs() > w[0].abs());
    if magnitudes_increasing
        && (all_positive || all_negative)
        && values[n - 1].abs() > 2.0 * values[0].abs()
    {
        return if all_positive {
            LimitValue::PosInfinity
        } else {
            LimitValue::NegInfinity
        };
    }

    let last = values[n - 1];
    let d_last = (last - values[n - 2]).abs();
    let d_prev = (values[n - 2] - values[n - 3]).abs();
    let scale = last.abs().max(1.0);
    if d_last < 1e-10 || (d_last <= 1e-3 * scale && d_prev <= 1e-2 * scale) {
        let tol = (10.0 * d_last).clamp(1e-9, 1e-3);
        return LimitValue::Finite(snap_limit(last, tol * scale));
    }
    LimitValue::Undefined
}

fn one_sided(expr: &Expr, var: &str, point: f64, side: f64) -> LimitValue {
    let values: Vec<f64> = sample_points(point, side)
        .into_iter()
        .map(|x| expr.eval1D(var, x))
        .collect();
    classify_samples(&values)
}

fn sides_agree(left: LimitValue, right: LimitValue) -> bool {
    match (left, right) {
        (LimitValue::Finite(l), LimitValue::Finite(r)) => {
            (l - r).abs() <= 1e-9 * l.abs().max(r.abs()).max(1.0)
        }
        (LimitValue::Undefined, _) | (_, LimitValue::Undefined) => false,
        (l, r) => l == r,
    }
}

/// Limit of `expr` as `var` approaches `point`.
///
/// `point` may be `f64::INFINITY` or `f64::NEG_INFINITY`; the direction is then implied and
/// `dir` is ignored. A two-sided limit exists only when both one-sided limits agree.
///
/// # Examples
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// use DerivativeXpert::numerical::limits::{limit, Direction, LimitValue};
/// let f = Expr::parse_expression("1/x").unwrap();
/// assert_eq!(limit(&f, "x", 0.0, Direction::Right), LimitValue::PosInfinity);
/// assert_eq!(limit(&f, "x", 0.0, Direction::Left), LimitValue::NegInfinity);
/// assert_eq!(limit(&f, "x", 0.0, Direction::Both), LimitValue::Undefined);
/// assert_eq!(limit(&f, "x", f64::INFINITY, Direction::Both), LimitValue::Finite(0.0));
/// ```
pub fn limit(expr: &Expr, var: &str, point: f64, dir: Direction) -> LimitValue {
    if point.is_nan() {
        return LimitValue::Undefined;
    }
    if !expr.contains_variable(var) {
        return LimitValue::from_f64(expr.eval1D(var, 0.0));
    }
    let result = if point.is_infinite() {
        one_sided(expr, var, point, 0.0)
    } else {
        match dir {
            Direction::Left => one_sided(expr, var, point, -1.0),
            Direction::Right => one_sided(expr, var, point, 1.0),
            Direction::Both => {
                let left = one_sided(expr, var, point, -1.0);
                let right = one_sided(expr, var, point, 1.0);
                if sides_agree(left, right) {
                    right
                } else {
                    LimitValue::Undefined
                }
            }
        }
    };
    debug!("lim {} as {} -> {} ({:?}) = {}", expr, var, point, dir, result);
    result
}

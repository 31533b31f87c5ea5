//! Algebraic simplification of expression trees.
//!
//! Applied bottom-up until the tree stops changing:
//! - constant folding for every operator and function (only when the result is finite)
//! - identities `x + 0`, `x * 1`, `x * 0`, `x ^ 1`, `x ^ 0`, `1 ^ x`, `x / 1`, `x / x`
//! - sums: like terms are collected (`x + 2*x - x` -> `2*x`) and constants summed
//! - products: constant factors collected to the front, equal bases merged into powers
//!   (`x * x^2` -> `x^3`)
//! - nested integer powers `(x^2)^3` -> `x^6`, `ln(exp(u))` -> `u`, `sqrt(u^2)` -> `abs(u)`

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::snap_to_integer;

const MAX_PASSES: usize = 8;

/// Folded constants closer than this to an integer are snapped to it, so `sin(pi)` becomes `0`.
const SNAP_TOL: f64 = 1e-12;

fn folded(value: f64) -> Option<Expr> {
    if value.is_finite() {
        Some(Expr::Const(snap_to_integer(value, SNAP_TOL)))
    } else {
        None
    }
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Splits a term into numeric coefficient and the rest: `3*x` -> `(3, x)`.
fn split_coefficient(e: &Expr) -> (f64, Expr) {
    match e {
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(k) => (*k, rhs.as_ref().clone()),
            _ => (1.0, e.clone()),
        },
        _ => (1.0, e.clone()),
    }
}

/// Splits a factor into base and exponent: `x^3` -> `(x, 3)`, `x` -> `(x, 1)`.
fn split_power(e: &Expr) -> (Expr, Expr) {
    match e {
        Expr::Pow(base, exp) => (base.as_ref().clone(), exp.as_ref().clone()),
        _ => (e.clone(), Expr::Const(1.0)),
    }
}

fn scaled(k: f64, term: Expr) -> Expr {
    if k == 1.0 {
        term
    } else {
        Expr::Mul(Expr::Const(k).boxed(), term.boxed())
    }
}

fn collect_terms(e: &Expr, sign: f64, constant: &mut f64, terms: &mut Vec<(f64, Expr)>) {
    match e {
        Expr::Add(lhs, rhs) => {
            collect_terms(lhs, sign, constant, terms);
            collect_terms(rhs, sign, constant, terms);
        }
        Expr::Sub(lhs, rhs) => {
            collect_terms(lhs, sign, constant, terms);
            collect_terms(rhs, -sign, constant, terms);
        }
        Expr::Const(c) => *constant += sign * c,
        _ => {
            let (k, rest) = split_coefficient(e);
            match terms.iter_mut().find(|(_, t)| *t == rest) {
                Some(entry) => entry.0 += sign * k,
                None => terms.push((sign * k, rest)),
            }
        }
    }
}

fn simplify_sum(e: &Expr) -> Expr {
    let mut constant = 0.0;
    let mut terms = Vec::new();
    collect_terms(e, 1.0, &mut constant, &mut terms);
    if !constant.is_finite() {
        return e.clone();
    }
    let constant = snap_to_integer(constant, SNAP_TOL);

    let mut result: Option<Expr> = None;
    for (k, term) in terms.into_iter().filter(|(k, _)| *k != 0.0) {
        result = Some(match result {
            None => scaled(k, term),
            Some(acc) if k < 0.0 => Expr::Sub(acc.boxed(), scaled(-k, term).boxed()),
            Some(acc) => Expr::Add(acc.boxed(), scaled(k, term).boxed()),
        });
    }
    match result {
        None => Expr::Const(constant),
        Some(acc) if constant > 0.0 => Expr::Add(acc.boxed(), Expr::Const(constant).boxed()),
        Some(acc) if constant < 0.0 => Expr::Sub(acc.boxed(), Expr::Const(-constant).boxed()),
        Some(acc) => acc,
    }
}

fn collect_factors(e: &Expr, coeff: &mut f64, factors: &mut Vec<(Expr, Expr)>) {
    match e {
        Expr::Mul(lhs, rhs) => {
            collect_factors(lhs, coeff, factors);
            collect_factors(rhs, coeff, factors);
        }
        Expr::Const(c) => *coeff *= c,
        _ => {
            let (base, exp) = split_power(e);
            match factors.iter_mut().find(|(b, _)| *b == base) {
                Some(entry) => {
                    let sum = Expr::Add(entry.1.clone().boxed(), exp.boxed());
                    entry.1 = simplify_sum(&sum);
                }
                None => factors.push((base, exp)),
            }
        }
    }
}

fn simplify_product(e: &Expr) -> Expr {
    let mut coeff = 1.0;
    let mut factors = Vec::new();
    collect_factors(e, &mut coeff, &mut factors);

    let mut kept = Vec::with_capacity(factors.len());
    for (base, exp) in factors {
        if exp.is_zero() {
            continue;
        }
        let factor = if exp.is_one() {
            base
        } else {
            simplify_power(base, exp)
        };
        // a factor may fold to a constant, e.g. 2^3
        match factor {
            Expr::Const(c) => coeff *= c,
            other => kept.push(other),
        }
    }
    if !coeff.is_finite() {
        return e.clone();
    }
    if coeff == 0.0 {
        return Expr::Const(0.0);
    }
    let coeff = snap_to_integer(coeff, SNAP_TOL);

    let product = kept
        .into_iter()
        .reduce(|acc, factor| Expr::Mul(acc.boxed(), factor.boxed()));
    match product {
        None => Expr::Const(coeff),
        Some(p) => scaled(coeff, p),
    }
}

fn simplify_power(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (Expr::Const(b), Expr::Const(e)) => {
            folded(b.powf(*e)).unwrap_or_else(|| Expr::Pow(base.boxed(), exp.boxed()))
        }
        (_, Expr::Const(e)) if *e == 0.0 => Expr::Const(1.0),
        (_, Expr::Const(e)) if *e == 1.0 => base,
        (Expr::Const(b), _) if *b == 1.0 => Expr::Const(1.0),
        (Expr::Pow(inner_base, inner_exp), Expr::Const(e)) => match inner_exp.as_ref() {
            Expr::Const(ie) if is_integer(*ie) && is_integer(*e) => {
                simplify_power(inner_base.as_ref().clone(), Expr::Const(ie * e))
            }
            _ => Expr::Pow(base.boxed(), exp.boxed()),
        },
        _ => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

fn simplify_division(num: Expr, den: Expr) -> Expr {
    match (&num, &den) {
        (Expr::Const(a), Expr::Const(b)) => {
            folded(a / b).unwrap_or_else(|| Expr::Div(num.boxed(), den.boxed()))
        }
        (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
        (_, Expr::Const(b)) if *b == 1.0 => num,
        (_, Expr::Const(b)) if *b == -1.0 => simplify_product(&-num),
        _ if num == den => Expr::Const(1.0),
        (Expr::Mul(lhs, rhs), Expr::Const(c)) => match lhs.as_ref() {
            Expr::Const(k) if *c != 0.0 && is_integer(k / c) => {
                simplify_product(&Expr::Mul(Expr::Const(k / c).boxed(), rhs.clone()))
            }
            _ => Expr::Div(num.boxed(), den.boxed()),
        },
        // pull constant factors out of the fraction: (-2)/x -> -1*(2/x), (3*u)/v -> 3*(u/v)
        (Expr::Const(a), _) if *a < 0.0 => simplify_product(&Expr::Mul(
            Expr::Const(-1.0).boxed(),
            Expr::Div(Expr::Const(-a).boxed(), den.boxed()).boxed(),
        )),
        (Expr::Mul(lhs, rhs), _) if lhs.as_const().is_some() => simplify_product(&Expr::Mul(
            lhs.clone(),
            simplify_division(rhs.as_ref().clone(), den.clone()).boxed(),
        )),
        _ => {
            let (nb, ne) = split_power(&num);
            let (db, de) = split_power(&den);
            if nb == db && !matches!(nb, Expr::Const(_)) {
                let exp = simplify_sum(&Expr::Sub(ne.boxed(), de.boxed()));
                simplify_power(nb, exp)
            } else {
                Expr::Div(num.boxed(), den.boxed())
            }
        }
    }
}

fn fold_function(e: &Expr) -> Option<Expr> {
    let arg = e.unary_arg()?.as_const()?;
    let value = match e {
        Expr::Exp(_) => arg.exp(),
        Expr::Ln(_) => arg.ln(),
        Expr::sqrt(_) => arg.sqrt(),
        Expr::abs(_) => arg.abs(),
        Expr::sin(_) => arg.sin(),
        Expr::cos(_) => arg.cos(),
        Expr::tg(_) => arg.tan(),
        Expr::ctg(_) => 1.0 / arg.tan(),
        Expr::arcsin(_) => arg.asin(),
        Expr::arccos(_) => arg.acos(),
        Expr::arctg(_) => arg.atan(),
        Expr::arcctg(_) => std::f64::consts::FRAC_PI_2 - arg.atan(),
        Expr::sinh(_) => arg.sinh(),
        Expr::cosh(_) => arg.cosh(),
        Expr::tanh(_) => arg.tanh(),
        _ => return None,
    };
    // tan(pi/2) is finite in floating point but undefined mathematically
    if value.abs() > 1e15 {
        return None;
    }
    folded(value)
}

impl Expr {
    /// Simplifies the expression until a fixed point is reached.
    ///
    /// # Returns
    /// Equivalent expression (same value wherever the input is defined)
    ///
    /// # Examples
    /// ```
    /// use DerivativeXpert::symbolic::symbolic_engine::Expr;
    /// let e = Expr::parse_expression("x + 2*x - x + 0*sin(x)").unwrap();
    /// assert_eq!(e.simplify().to_string(), "2*x");
    /// ```
    pub fn simplify(&self) -> Expr {
        let mut current = self.simplify_pass();
        for _ in 0..MAX_PASSES {
            let next = current.simplify_pass();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn simplify_pass(&self) -> Expr {
        let e = self.map_args(|child| child.simplify_pass());
        e.simplify_node()
    }

    /// One rewriting step on a node whose children are already simplified.
    fn simplify_node(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(_, _) | Expr::Sub(_, _) => simplify_sum(self),
            Expr::Mul(_, _) => simplify_product(self),
            Expr::Div(num, den) => simplify_division(num.as_ref().clone(), den.as_ref().clone()),
            Expr::Pow(base, exp) => simplify_power(base.as_ref().clone(), exp.as_ref().clone()),
            Expr::Ln(arg) => match arg.as_ref() {
                Expr::Exp(inner) => inner.as_ref().clone(),
                _ => fold_function(self).unwrap_or_else(|| self.clone()),
            },
            Expr::sqrt(arg) => match arg.as_ref() {
                Expr::Pow(base, exp) if exp.as_const() == Some(2.0) => Expr::abs(base.clone()),
                _ => fold_function(self).unwrap_or_else(|| self.clone()),
            },
            _ => fold_function(self).unwrap_or_else(|| self.clone()),
        }
    }

    /// true when the simplified expression has no variables left
    pub fn is_constant(&self) -> bool {
        self.all_arguments_are_variables().is_empty()
    }
}

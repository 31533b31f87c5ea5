//! # Symbolic Engine Module
//!
//! Core expression tree of the calculator. A textual formula such as `x^2 + 2*x + 1`
//! is parsed (see `parse_expr`) into an [`Expr`] tree that can then be simplified,
//! differentiated, evaluated and printed back.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)`
//! - **Constants**: `Const(f64)`; the named constants `pi` and `E` are stored as constants
//!   and printed back by name
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sqrt`, `abs`, `sin`, `cos`, `tg`, `ctg`, `arcsin`,
//!   `arccos`, `arctg`, `arcctg`, `sinh`, `cosh`, `tanh`
//!
//! ### Key Methods
//! - `set_variable()` - substitute a variable with a number
//! - `substitute_variable()` - substitute a variable with an expression
//! - `contains_variable()` - occurrence check
//! - `map_args()` - rebuild a node with every direct child transformed
//!
//! Function variants keep the mathematical notation (tg, ctg, arctg) but are printed with the
//! names users type at the prompt (tan, cot, atan).

#![allow(non_camel_case_types)]

use std::f64::consts::{E, PI};
use std::fmt;

/// Symbolic expression tree.
///
/// # Examples
/// ```rust, ignore
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "t")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Square root
    sqrt(Box<Expr>),
    /// Absolute value
    abs(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Hyperbolic sine
    sinh(Box<Expr>),
    /// Hyperbolic cosine
    cosh(Box<Expr>),
    /// Hyperbolic tangent
    tanh(Box<Expr>),
}

// binding strength used by the printer: sums < products < unary minus < powers < atoms
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Prints a constant the way a student would write it: integers without a fractional
/// part, `pi`, `E` and simple multiples of pi by name.
pub fn format_number(val: f64) -> (String, u8) {
    if val.is_nan() {
        return ("nan".to_string(), PREC_ATOM);
    }
    if val.is_infinite() {
        let s = if val > 0.0 { "oo" } else { "-oo" };
        return (s.to_string(), if val > 0.0 { PREC_ATOM } else { PREC_NEG });
    }
    if val == 0.0 {
        return ("0".to_string(), PREC_ATOM);
    }
    let prec = if val < 0.0 { PREC_NEG } else { PREC_ATOM };
    let magnitude = val.abs();
    if magnitude >= 1e16 || magnitude < 1e-6 {
        return (format!("{:e}", val), prec);
    }
    if val.fract() == 0.0 {
        return (format!("{}", val), prec);
    }
    if val == E {
        return ("E".to_string(), PREC_ATOM);
    }
    if val == -E {
        return ("-E".to_string(), PREC_NEG);
    }
    // k*pi/q for small denominators
    for q in [1.0, 2.0, 3.0, 4.0, 6.0] {
        let k = val * q / PI;
        let k_rounded = k.round();
        if k_rounded != 0.0 && k_rounded.abs() <= 24.0 && (k - k_rounded).abs() < 1e-12 {
            let sign = if k_rounded < 0.0 { "-" } else { "" };
            let k_abs = k_rounded.abs();
            let numerator = if k_abs == 1.0 {
                "pi".to_string()
            } else {
                format!("{}*pi", k_abs)
            };
            let s = if q == 1.0 {
                format!("{}{}", sign, numerator)
            } else {
                format!("{}{}/{}", sign, numerator, q)
            };
            let p = if k_rounded < 0.0 {
                PREC_NEG
            } else if q == 1.0 && k_abs == 1.0 {
                PREC_ATOM
            } else {
                PREC_PRODUCT
            };
            return (s, p);
        }
    }
    (format!("{}", val), prec)
}

fn wrap(s: (String, u8), needs_parens: bool) -> String {
    if needs_parens {
        format!("({})", s.0)
    } else {
        s.0
    }
}

impl Expr {
    /// If `self` is a negated term (`-c` or `-1*e`), returns the positive counterpart.
    fn negated_part(&self) -> Option<Expr> {
        match self {
            Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
                Expr::Const(c) if *c < 0.0 => {
                    Some(Expr::Mul(Expr::Const(-c).boxed(), rhs.clone()))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Infix rendering together with the binding strength of the outermost operator.
    fn to_infix(&self) -> (String, u8) {
        match self {
            Expr::Var(name) => (name.clone(), PREC_ATOM),
            Expr::Const(val) => format_number(*val),
            Expr::Add(lhs, rhs) => {
                let l = lhs.to_infix();
                let l_paren = l.1 < PREC_SUM;
                match rhs.negated_part() {
                    Some(positive) => {
                        let r = positive.to_infix();
                        let r_paren = r.1 <= PREC_SUM;
                        (
                            format!("{} - {}", wrap(l, l_paren), wrap(r, r_paren)),
                            PREC_SUM,
                        )
                    }
                    None => {
                        let r = rhs.to_infix();
                        let r_paren = r.1 < PREC_SUM;
                        (
                            format!("{} + {}", wrap(l, l_paren), wrap(r, r_paren)),
                            PREC_SUM,
                        )
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                let l = lhs.to_infix();
                let r = rhs.to_infix();
                let l_paren = l.1 < PREC_SUM;
                let r_paren = r.1 <= PREC_SUM;
                (
                    format!("{} - {}", wrap(l, l_paren), wrap(r, r_paren)),
                    PREC_SUM,
                )
            }
            Expr::Mul(lhs, rhs) => {
                if let Expr::Const(c) = lhs.as_ref() {
                    if *c == -1.0 {
                        let r = rhs.to_infix();
                        let r_paren = r.1 < PREC_PRODUCT || r.1 == PREC_NEG;
                        return (format!("-{}", wrap(r, r_paren)), PREC_NEG);
                    }
                }
                let l = lhs.to_infix();
                let r = rhs.to_infix();
                let l_paren = l.1 < PREC_PRODUCT;
                let r_paren = r.1 < PREC_PRODUCT || r.1 == PREC_NEG;
                let prec = if l.1 == PREC_NEG && !l_paren {
                    PREC_NEG
                } else {
                    PREC_PRODUCT
                };
                (
                    format!("{}*{}", wrap(l, l_paren), wrap(r, r_paren)),
                    prec,
                )
            }
            Expr::Div(lhs, rhs) => {
                let l = lhs.to_infix();
                let r = rhs.to_infix();
                let l_paren = l.1 < PREC_PRODUCT;
                let r_paren = r.1 <= PREC_PRODUCT || r.1 == PREC_NEG;
                (
                    format!("{}/{}", wrap(l, l_paren), wrap(r, r_paren)),
                    PREC_PRODUCT,
                )
            }
            Expr::Pow(base, exp) => {
                let b = base.to_infix();
                let e = exp.to_infix();
                let b_paren = b.1 <= PREC_POW;
                let e_paren = e.1 < PREC_POW;
                (format!("{}^{}", wrap(b, b_paren), wrap(e, e_paren)), PREC_POW)
            }
            _ => {
                // every remaining variant is a one-argument function
                let name = self.function_name().unwrap_or("?");
                let arg = self
                    .unary_arg()
                    .map(|a| a.to_infix().0)
                    .unwrap_or_default();
                (format!("{}({})", name, arg), PREC_ATOM)
            }
        }
    }

    /// Name under which a function variant is printed.
    pub fn function_name(&self) -> Option<&'static str> {
        let name = match self {
            Expr::Exp(_) => "exp",
            Expr::Ln(_) => "ln",
            Expr::sqrt(_) => "sqrt",
            Expr::abs(_) => "abs",
            Expr::sin(_) => "sin",
            Expr::cos(_) => "cos",
            Expr::tg(_) => "tan",
            Expr::ctg(_) => "cot",
            Expr::arcsin(_) => "asin",
            Expr::arccos(_) => "acos",
            Expr::arctg(_) => "atan",
            Expr::arcctg(_) => "acot",
            Expr::sinh(_) => "sinh",
            Expr::cosh(_) => "cosh",
            Expr::tanh(_) => "tanh",
            _ => return None,
        };
        Some(name)
    }

    /// Argument of a one-argument function node.
    pub fn unary_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(a)
            | Expr::Ln(a)
            | Expr::sqrt(a)
            | Expr::abs(a)
            | Expr::sin(a)
            | Expr::cos(a)
            | Expr::tg(a)
            | Expr::ctg(a)
            | Expr::arcsin(a)
            | Expr::arccos(a)
            | Expr::arctg(a)
            | Expr::arcctg(a)
            | Expr::sinh(a)
            | Expr::cosh(a)
            | Expr::tanh(a) => Some(a.as_ref()),
            _ => None,
        }
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Uses the minimal number of parentheses, so `Add(x, Mul(2, x))` prints as `x + 2*x`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_infix().0)
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Rebuilds the node with `f` applied to every direct child.
    ///
    /// Leaves (`Var`, `Const`) are returned unchanged.
    pub fn map_args<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Mul(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Div(lhs, rhs) => Expr::Div(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Pow(base, exp) => Expr::Pow(f(base).boxed(), f(exp).boxed()),
            Expr::Exp(a) => Expr::Exp(f(a).boxed()),
            Expr::Ln(a) => Expr::Ln(f(a).boxed()),
            Expr::sqrt(a) => Expr::sqrt(f(a).boxed()),
            Expr::abs(a) => Expr::abs(f(a).boxed()),
            Expr::sin(a) => Expr::sin(f(a).boxed()),
            Expr::cos(a) => Expr::cos(f(a).boxed()),
            Expr::tg(a) => Expr::tg(f(a).boxed()),
            Expr::ctg(a) => Expr::ctg(f(a).boxed()),
            Expr::arcsin(a) => Expr::arcsin(f(a).boxed()),
            Expr::arccos(a) => Expr::arccos(f(a).boxed()),
            Expr::arctg(a) => Expr::arctg(f(a).boxed()),
            Expr::arcctg(a) => Expr::arcctg(f(a).boxed()),
            Expr::sinh(a) => Expr::sinh(f(a).boxed()),
            Expr::cosh(a) => Expr::cosh(f(a).boxed()),
            Expr::tanh(a) => Expr::tanh(f(a).boxed()),
        }
    }

    /// Direct children of the node, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) => Vec::new(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            _ => self.unary_arg().into_iter().collect(),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    ///
    /// # Arguments
    /// * `var` - Name of the variable to substitute
    /// * `value` - Numerical value to substitute for the variable
    ///
    /// # Returns
    /// New expression with the variable substituted
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_args(|child| child.set_variable(var, value)),
        }
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_args(|child| child.substitute_variable(var, expr)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            _ => self
                .children()
                .iter()
                .any(|child| child.contains_variable(var_name)),
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Checks if expression is exactly one (constant 1.0).
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    /// Value of a `Const` node.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }
}

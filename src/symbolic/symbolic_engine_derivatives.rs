//! # Symbolic Engine Derivatives Module
//!
//! Differentiation and numerical evaluation of [`Expr`] trees.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - analytical derivative, raw (not simplified)
//! - `n_th_derivative1D()` - higher-order derivatives, simplified after every step
//!
//! ### Function evaluation
//! - `eval_expression()` - direct evaluation for several variables
//! - `eval1D()` - evaluation of a one-variable expression
//! - `lambdify1D()` - closure `f64 -> f64` for repeated evaluation
//! - `calc_vector_lambdified1D()` - evaluation over a vector of points
//!
//! ### Utilities
//! - `all_arguments_are_variables()` - sorted free variable names
//!
//! Evaluation never panics: values outside the real domain of a function come out as `NaN`
//! (or `±inf` at poles), exactly as the `f64` operations produce them.

use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::FRAC_PI_2;

impl Expr {
    /// Computes the analytical derivative with respect to `var`.
    ///
    /// Implements the sum, product, quotient, power and chain rules for every variant.
    /// The result is not simplified; callers normally follow it with [`Expr::simplify`].
    ///
    /// # Arguments
    /// * `var` - Variable to differentiate with respect to
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => lhs.diff(var) + rhs.diff(var),
            Expr::Sub(lhs, rhs) => lhs.diff(var) - rhs.diff(var),
            Expr::Mul(lhs, rhs) => {
                lhs.diff(var) * rhs.as_ref().clone() + lhs.as_ref().clone() * rhs.diff(var)
            }
            Expr::Div(lhs, rhs) => {
                (lhs.diff(var) * rhs.as_ref().clone() - lhs.as_ref().clone() * rhs.diff(var))
                    / rhs.as_ref().clone().pow(Expr::Const(2.0))
            }
            Expr::Pow(base, exp) => {
                let b = base.as_ref().clone();
                let e = exp.as_ref().clone();
                match (base.contains_variable(var), exp.contains_variable(var)) {
                    (false, false) => Expr::Const(0.0),
                    // power rule
                    (true, false) => {
                        e.clone() * b.pow(e - Expr::Const(1.0)) * base.diff(var)
                    }
                    // exponential with a constant base
                    (false, true) => b.clone().pow(e) * b.ln() * exp.diff(var),
                    // u^v = exp(v ln u)
                    (true, true) => {
                        b.clone().pow(e.clone())
                            * (exp.diff(var) * b.clone().ln() + e * base.diff(var) / b)
                    }
                }
            }
            Expr::Exp(expr) => expr.as_ref().clone().exp() * expr.diff(var),
            Expr::Ln(expr) => expr.diff(var) / expr.as_ref().clone(),
            Expr::sqrt(expr) => {
                expr.diff(var) / (Expr::Const(2.0) * Expr::sqrt(expr.clone()))
            }
            Expr::abs(expr) => {
                expr.as_ref().clone() * expr.diff(var) / Expr::abs(expr.clone())
            }
            Expr::sin(expr) => Expr::cos(expr.clone()) * expr.diff(var),
            Expr::cos(expr) => -Expr::sin(expr.clone()) * expr.diff(var),
            Expr::tg(expr) => expr.diff(var) / Expr::cos(expr.clone()).pow(Expr::Const(2.0)),
            Expr::ctg(expr) => -expr.diff(var) / Expr::sin(expr.clone()).pow(Expr::Const(2.0)),
            Expr::arcsin(expr) => {
                expr.diff(var)
                    / Expr::sqrt(
                        (Expr::Const(1.0) - expr.as_ref().clone().pow(Expr::Const(2.0))).boxed(),
                    )
            }
            Expr::arccos(expr) => {
                -expr.diff(var)
                    / Expr::sqrt(
                        (Expr::Const(1.0) - expr.as_ref().clone().pow(Expr::Const(2.0))).boxed(),
                    )
            }
            Expr::arctg(expr) => {
                expr.diff(var) / (Expr::Const(1.0) + expr.as_ref().clone().pow(Expr::Const(2.0)))
            }
            Expr::arcctg(expr) => {
                -expr.diff(var) / (Expr::Const(1.0) + expr.as_ref().clone().pow(Expr::Const(2.0)))
            }
            Expr::sinh(expr) => Expr::cosh(expr.clone()) * expr.diff(var),
            Expr::cosh(expr) => Expr::sinh(expr.clone()) * expr.diff(var),
            Expr::tanh(expr) => {
                expr.diff(var) / Expr::cosh(expr.clone()).pow(Expr::Const(2.0))
            }
        }
    }

    /// Computes the nth derivative of a single-variable expression.
    ///
    /// Repeatedly applies differentiation and simplification.
    ///
    /// # Arguments
    /// * `var_name` - Variable to differentiate with respect to
    /// * `n` - Order of derivative (0 = original function, 1 = first derivative, etc.)
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.simplify();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    /// Evaluates the expression for the given variable values.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Returns
    /// Numerical result; `NaN` when a variable has no value or the point lies outside the
    /// real domain
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|x| *x == name.as_str())
                .and_then(|index| values.get(index).copied())
                .unwrap_or(f64::NAN),
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(vars, values) + rhs.eval_expression(vars, values),
            Expr::Sub(lhs, rhs) => lhs.eval_expression(vars, values) - rhs.eval_expression(vars, values),
            Expr::Mul(lhs, rhs) => lhs.eval_expression(vars, values) * rhs.eval_expression(vars, values),
            Expr::Div(lhs, rhs) => lhs.eval_expression(vars, values) / rhs.eval_expression(vars, values),
            Expr::Pow(base, exp) => {
                let b = base.eval_expression(vars, values);
                let e = exp.eval_expression(vars, values);
                // negative base with a fractional exponent is NaN, as over the reals
                b.powf(e)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sqrt(expr) => expr.eval_expression(vars, values).sqrt(),
            Expr::abs(expr) => expr.eval_expression(vars, values).abs(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values).tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values).asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values).acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values).atan(),
            Expr::arcctg(expr) => FRAC_PI_2 - expr.eval_expression(vars, values).atan(),
            Expr::sinh(expr) => expr.eval_expression(vars, values).sinh(),
            Expr::cosh(expr) => expr.eval_expression(vars, values).cosh(),
            Expr::tanh(expr) => expr.eval_expression(vars, values).tanh(),
        }
    }

    /// Evaluates a one-variable expression at `value`.
    pub fn eval1D(&self, var: &str, value: f64) -> f64 {
        self.eval_expression(&[var], &[value])
    }

    /// Turns the expression into a closure of its single variable.
    pub fn lambdify1D<'a>(&'a self, var: &'a str) -> impl Fn(f64) -> f64 + 'a {
        move |x| self.eval1D(var, x)
    }

    /// Evaluates 1D function over a vector of input values.
    pub fn calc_vector_lambdified1D(&self, var: &str, x: &[f64]) -> Vec<f64> {
        let f = self.lambdify1D(var);
        x.iter().map(|xi| f(*xi)).collect()
    }

    /// Returns all variable names in the expression, sorted and deduplicated.
    ///
    /// # Example
    /// ```
    /// use DerivativeXpert::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("y + sin(x) * y").unwrap();
    /// assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y"]);
    /// ```
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            _ => {
                for child in self.children() {
                    vars.extend(child.all_arguments_are_variables());
                }
            }
        }
        vars.sort();
        vars.dedup();
        vars
    }
}

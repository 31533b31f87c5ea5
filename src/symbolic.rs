#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// let input = "x^2 + 2*x + 1";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let f = parsed_expression.lambdify1D("x");
/// assert_eq!(f(1.0), 4.0);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree and its printer
/// 2) differentiates a symbolic expression
/// 3) evaluates a symbolic expression numerically
///# Example#
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// let input = "exp(x) + ln(x)";
/// let f = Expr::parse_expression(input).unwrap();
/// // derivative, simplified
/// let df_dx = f.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// // all variables of the expression
/// assert_eq!(f.all_arguments_are_variables(), vec!["x".to_string()]);
/// // second derivative
/// let d2 = f.n_th_derivative1D("x", 2);
/// println!("d2 = {}", d2);
/// assert!((d2.eval1D("x", 1.0) - (1f64.exp() - 1.0)).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// algebraic simplification: constant folding, like terms, power merging
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// the collection of numeric utility functions: linspace, rounding, deduplication
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
#[cfg(test)]
mod symbolic_engine_tests;

use crate::error::{CalcError, CalcResult};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::round_to;
use log::debug;
use std::fmt;

/// Number of decimals results are rounded to.
pub const DECIMALS: i32 = 3;

/// Parses `text` into a number: any expression without variables is accepted (`2`, `pi/2`,
/// `E^2`, `-1e-3`).
///
/// # Examples
/// ```
/// use DerivativeXpert::calculus::function::parse_constant;
/// assert_eq!(parse_constant("3*2").unwrap(), 6.0);
/// assert!(parse_constant("x + 1").is_err());
/// ```
pub fn parse_constant(text: &str) -> CalcResult<f64> {
    let expr = Expr::parse_expression(text)
        .map_err(|e| CalcError::InvalidValue(e.to_string()))?
        .simplify();
    if !expr.is_constant() {
        return Err(CalcError::InvalidValue(format!(
            "'{}' is not a number",
            text.trim()
        )));
    }
    let value = expr.eval_expression(&[], &[]);
    if !value.is_finite() {
        return Err(CalcError::InvalidValue(format!("'{}' is not finite", text.trim())));
    }
    Ok(value)
}

/// A real function of at most one variable, validated on construction.
///
/// The stored expression is already simplified. Derived functions (derivatives) are new,
/// independently owned instances.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarExpression {
    expression: Expr,
    variable: Option<String>,
    domain_check: bool,
}

impl ScalarExpression {
    /// Parses and validates `text`.
    ///
    /// # Errors
    /// `InvalidExpression` when the text does not parse or has more than one free variable
    ///
    /// # Examples
    /// ```
    /// use DerivativeXpert::calculus::function::ScalarExpression;
    /// let f = ScalarExpression::create("x**2").unwrap();
    /// assert_eq!(f.evaluate("2").unwrap(), 4.0);
    /// assert!(ScalarExpression::create("x**y").is_err());
    /// ```
    pub fn create(text: &str) -> CalcResult<Self> {
        let (expression, variable) = Self::validate(text)?;
        Ok(Self {
            expression,
            variable,
            domain_check: true,
        })
    }

    /// Wraps an already built expression; the free-variable rule still applies.
    pub fn from_expr(expr: &Expr) -> CalcResult<Self> {
        let expression = expr.simplify();
        let variable = Self::single_variable(&expression)?;
        Ok(Self {
            expression,
            variable,
            domain_check: true,
        })
    }

    /// Derived instance that keeps `variable` even when `expression` no longer mentions it.
    pub(crate) fn derived(&self, expression: Expr) -> Self {
        Self {
            expression,
            variable: self.variable.clone(),
            domain_check: self.domain_check,
        }
    }

    fn single_variable(expression: &Expr) -> CalcResult<Option<String>> {
        let mut vars = expression.all_arguments_are_variables();
        if vars.len() > 1 {
            return Err(CalcError::InvalidExpression(format!(
                "at most one variable is allowed, found {}",
                vars.join(", ")
            )));
        }
        Ok(vars.pop())
    }

    fn validate(text: &str) -> CalcResult<(Expr, Option<String>)> {
        let expression = Expr::parse_expression(text)?.simplify();
        let variable = Self::single_variable(&expression)?;
        debug!("validated '{}' as {} (variable {:?})", text, expression, variable);
        Ok((expression, variable))
    }

    /// Replaces the expression; on failure the current one is kept.
    pub fn assign(&mut self, text: &str) -> CalcResult<()> {
        let (expression, variable) = Self::validate(text)?;
        self.expression = expression;
        self.variable = variable;
        Ok(())
    }

    /// Enables or disables the domain check of [`ScalarExpression::evaluate`].
    pub fn with_domain_check(mut self, domain_check: bool) -> Self {
        self.domain_check = domain_check;
        self
    }

    pub fn domain_check(&self) -> bool {
        self.domain_check
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    /// the bound variable, or `x` for a constant function
    pub fn variable_or_default(&self) -> &str {
        self.variable.as_deref().unwrap_or("x")
    }

    /// true when the expression has no free variable left
    pub fn is_constant(&self) -> bool {
        self.expression.is_constant()
    }

    /// Evaluates the function at the number written in `value`, rounded to 3 decimals.
    ///
    /// # Errors
    /// `InvalidValue` when `value` is not a number, or lies outside the domain of the function
    /// (only while the domain check is on)
    pub fn evaluate(&self, value: &str) -> CalcResult<f64> {
        if self.is_constant() {
            return self.evaluate_at(0.0);
        }
        self.evaluate_at(parse_constant(value)?)
    }

    /// Same as [`ScalarExpression::evaluate`] for a numeric argument.
    pub fn evaluate_at(&self, value: f64) -> CalcResult<f64> {
        let result = self.raw_value(value);
        if !result.is_finite() && self.domain_check {
            return Err(CalcError::InvalidValue(format!(
                "{} is outside the domain of f({}) = {}",
                value,
                self.variable_or_default(),
                self.expression
            )));
        }
        Ok(round_to(result, DECIMALS))
    }

    /// Unrounded, unchecked value at `value` (`NaN`/`±inf` outside the domain).
    pub fn raw_value(&self, value: f64) -> f64 {
        self.expression.eval1D(self.variable_or_default(), value)
    }
}

impl fmt::Display for ScalarExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

use crate::calculus::function::DECIMALS;
use crate::error::{CalcError, CalcResult};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::round_to;

/// Calculator for expressions without variables.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCalculator {
    expression: Expr,
}

impl BasicCalculator {
    /// # Errors
    /// `InvalidExpression` when `text` does not parse or contains a variable
    ///
    /// # Examples
    /// ```
    /// use DerivativeXpert::calculus::basic_calc::BasicCalculator;
    /// let calc = BasicCalculator::new("ln(E**2)").unwrap();
    /// assert_eq!(calc.evaluate_expression(), 2.0);
    /// ```
    pub fn new(text: &str) -> CalcResult<Self> {
        Ok(Self {
            expression: Self::validate(text)?,
        })
    }

    fn validate(text: &str) -> CalcResult<Expr> {
        let expression = Expr::parse_expression(text)?.simplify();
        let vars = expression.all_arguments_are_variables();
        if !vars.is_empty() {
            return Err(CalcError::InvalidExpression(format!(
                "a basic calculation cannot contain variables, found {}",
                vars.join(", ")
            )));
        }
        Ok(expression)
    }

    /// Replaces the expression; on failure the current one is kept.
    pub fn set_expression(&mut self, text: &str) -> CalcResult<()> {
        self.expression = Self::validate(text)?;
        Ok(())
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// The value rounded to 3 decimals; `NaN` or `±inf` when the expression is undefined.
    pub fn evaluate_expression(&self) -> f64 {
        round_to(self.expression.eval_expression(&[], &[]), DECIMALS)
    }
}

use crate::calculus::function::ScalarExpression;
use crate::error::CalcResult;
use log::debug;

/// Derivative of order `order` of `function` with respect to its variable.
///
/// Each step differentiates the simplified result of the previous one. Order `0` returns the
/// simplified function. The variable stays bound on the result even when it no longer occurs.
///
/// # Examples
/// ```
/// use DerivativeXpert::calculus::function::ScalarExpression;
/// use DerivativeXpert::calculus::derivative::differentiate;
/// let f = ScalarExpression::create("x^3").unwrap();
/// assert_eq!(differentiate(&f, 1).to_string(), "3*x^2");
/// assert_eq!(differentiate(&f, 4).to_string(), "0");
/// ```
pub fn differentiate(function: &ScalarExpression, order: usize) -> ScalarExpression {
    let var = function.variable_or_default();
    let expr = function.expression().n_th_derivative1D(var, order);
    debug!("{} of {} is {}", derivative_label(order), function, expr);
    function.derived(expr)
}

/// `f`, `f'`, `f''`, `f'''`, then `f^(4)` and up.
pub fn derivative_label(order: usize) -> String {
    if order <= 3 {
        format!("f{}", "'".repeat(order))
    } else {
        format!("f^({})", order)
    }
}

/// Differentiation of a fixed order bound to one function.
#[derive(Debug, Clone)]
pub struct DerivativeEngine {
    function: ScalarExpression,
    order: usize,
}

impl DerivativeEngine {
    pub fn new(function: ScalarExpression, order: usize) -> Self {
        Self { function, order }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn function(&self) -> &ScalarExpression {
        &self.function
    }

    /// The derivative of the configured order.
    pub fn derivative(&self) -> ScalarExpression {
        differentiate(&self.function, self.order)
    }

    /// Value of the derivative at the number written in `value`, rounded to 3 decimals.
    pub fn evaluate(&self, value: &str) -> CalcResult<f64> {
        self.derivative().evaluate(value)
    }
}

/// a validated function of one variable
///# Example
/// ```
/// use DerivativeXpert::calculus::function::ScalarExpression;
/// let f = ScalarExpression::create("x**3").unwrap();
/// assert_eq!(f.evaluate("2").unwrap(), 8.0);
/// ```
pub mod function;
/// derivatives of any order of a [`function::ScalarExpression`]
pub mod derivative;
/// intervals and the labelled interval maps returned by the analysis
pub mod intervals;
///____________________________________________________________________________________________
/// slope, critical points, extrema, monotonicity, inflection points, concavity, asymptotes,
/// domain and range
/// ____________________________________________________________________________________________
pub mod analysis;
/// arithmetic on expressions without variables
pub mod basic_calc;
#[cfg(test)]
mod analysis_tests;

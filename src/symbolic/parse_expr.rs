//! Parsing of textual formulas into [`Expr`] trees.
//!
//! Grammar (lowest binding first):
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | call | constant | variable | '(' expr ')'
//! ```
//! `^` and `**` are both exponentiation and are right associative, so `-x^2` is `-(x^2)`
//! and `2^-1` is `0.5`. `log` is the natural logarithm, `log(x, b)` the logarithm to base `b`.

use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, map_res, not, opt, recognize},
    error::ErrorKind,
    multi::{many0, separated_list1},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};
use std::fmt;

/// Failure to turn a string into an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub input: String,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cannot parse '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for ParseError {}

type PResult<'a, O> = IResult<&'a str, O>;

/// Deepest grammar nesting accepted; the parser recurses once per level.
pub const MAX_NESTING: usize = 64;

/// Names accepted in function-call position.
pub const FUNCTION_NAMES: [&str; 22] = [
    "sin", "cos", "tan", "tg", "cot", "ctg", "asin", "arcsin", "acos", "arccos", "atan",
    "arctg", "arctan", "acot", "arcctg", "sinh", "cosh", "tanh", "exp", "ln", "log", "sqrt",
];

fn is_function_name(name: &str) -> bool {
    FUNCTION_NAMES.contains(&name) || name == "abs"
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_function(name: &str, mut args: Vec<Expr>) -> Option<Expr> {
    if name == "log" && args.len() == 2 {
        let base = args.pop()?;
        let arg = args.pop()?;
        return Some(Expr::Div(arg.ln().boxed(), base.ln().boxed()));
    }
    if args.len() != 1 {
        return None;
    }
    let arg = args.pop()?.boxed();
    let expr = match name {
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctg" | "arctan" => Expr::arctg(arg),
        "acot" | "arcctg" => Expr::arcctg(arg),
        "sinh" => Expr::sinh(arg),
        "cosh" => Expr::cosh(arg),
        "tanh" => Expr::tanh(arg),
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sqrt" => Expr::sqrt(arg),
        "abs" => Expr::abs(arg),
        _ => return None,
    };
    Some(expr)
}

fn failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(input, ErrorKind::Verify))
}

fn number(input: &str) -> PResult<'_, Expr> {
    map_res(recognize_float, |s: &str| s.parse::<f64>().map(Expr::Const)).parse(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn call_or_symbol(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, args) = opt(delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), expr),
        ws(char(')')),
    ))
    .parse(rest)?;
    match args {
        Some(args) => match build_function(name, args) {
            Some(e) => Ok((rest, e)),
            None => Err(failure(input)),
        },
        None => match name {
            "pi" => Ok((rest, Expr::Const(PI))),
            "E" => Ok((rest, Expr::Const(E))),
            _ if is_function_name(name) => Err(failure(input)),
            _ => Ok((rest, Expr::Var(name.to_string()))),
        },
    }
}

fn parenthesized(input: &str) -> PResult<'_, Expr> {
    delimited(ws(char('(')), expr, ws(char(')'))).parse(input)
}

fn primary(input: &str) -> PResult<'_, Expr> {
    ws(alt((number, call_or_symbol, parenthesized))).parse(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = primary(input)?;
    let (input, exponent) = opt(preceded(ws(alt((tag("**"), tag("^")))), unary)).parse(input)?;
    match exponent {
        Some(exponent) => Ok((input, base.pow(exponent))),
        None => Ok((input, base)),
    }
}

fn negate(e: Expr) -> Expr {
    match e {
        Expr::Const(val) => Expr::Const(-val),
        other => -other,
    }
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), negate),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(input)
}

fn mul_op(input: &str) -> PResult<'_, char> {
    ws(alt((terminated(char('*'), not(char('*'))), char('/')))).parse(input)
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(mul_op, unary)).parse(input)?;
    let folded = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, folded))
}

fn expr(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(alt((char('+'), char('-')))), term)).parse(input)?;
    let folded = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, folded))
}

/// Nesting the recursive descent will reach: open parentheses plus the chains of `^`/`**`
/// and sign prefixes inside each of them.
fn nesting_depth(input: &str) -> usize {
    let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    // one chain counter per open parenthesis
    let mut chains = vec![0usize];
    let mut deepest = 0;
    let mut prev: Option<char> = None;
    for (i, &c) in chars.iter().enumerate() {
        let prefix = matches!(prev, None | Some('(' | ',' | '+' | '-' | '*' | '/' | '^'));
        let last = chains.len() - 1;
        match c {
            '(' => chains.push(0),
            ')' if chains.len() > 1 => {
                chains.pop();
            }
            '*' if chars.get(i + 1) == Some(&'*') => {}
            '^' => chains[last] += 1,
            '*' if prev == Some('*') => chains[last] += 1,
            '+' | '-' if prefix => chains[last] += 1,
            '+' | '-' | '*' | '/' | ',' => chains[last] = 0,
            _ => {}
        }
        deepest = deepest.max(chains.len() + chains.iter().sum::<usize>());
        prev = Some(c);
    }
    deepest
}

impl Expr {
    /// Parses a formula into an expression tree.
    ///
    /// # Examples
    /// ```
    /// use DerivativeXpert::symbolic::symbolic_engine::Expr;
    /// let e = Expr::parse_expression("x**2 + 1").unwrap();
    /// assert_eq!(e.to_string(), "x^2 + 1");
    /// assert!(Expr::parse_expression("ln(2))").is_err());
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        let make_error = |message: String| ParseError {
            input: input.to_string(),
            message,
        };
        if input.trim().is_empty() {
            return Err(make_error("empty expression".to_string()));
        }
        if nesting_depth(input) > MAX_NESTING {
            return Err(make_error(format!(
                "expression nested too deeply (more than {} levels)",
                MAX_NESTING
            )));
        }
        match expr(input) {
            Ok((rest, parsed)) => {
                if rest.trim().is_empty() {
                    Ok(parsed)
                } else {
                    Err(make_error(format!("unexpected input near '{}'", rest.trim())))
                }
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let near = e.input.trim();
                if near.is_empty() {
                    Err(make_error("unexpected end of input".to_string()))
                } else {
                    Err(make_error(format!("unexpected input near '{}'", near)))
                }
            }
            Err(nom::Err::Incomplete(_)) => Err(make_error("incomplete input".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_parse_power_both_notations() {
        let a = Expr::parse_expression("x**2").unwrap();
        let b = Expr::parse_expression("x^2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, x().pow(Expr::Const(2.0)));
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_minus() {
        let e = Expr::parse_expression("-x^2").unwrap();
        assert_eq!(e, -(x().pow(Expr::Const(2.0))));
        let e = Expr::parse_expression("2^3^2").unwrap();
        assert_eq!(
            e,
            Expr::Const(2.0).pow(Expr::Const(3.0).pow(Expr::Const(2.0)))
        );
        let e = Expr::parse_expression("x**-1").unwrap();
        assert_eq!(e, x().pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_precedence_of_products() {
        let e = Expr::parse_expression("1 + 2*x").unwrap();
        assert_eq!(e, Expr::Const(1.0) + Expr::Const(2.0) * x());
        let e = Expr::parse_expression("x / 2 * 3").unwrap();
        assert_eq!(e, (x() / Expr::Const(2.0)) * Expr::Const(3.0));
    }

    #[test]
    fn test_functions_and_constants() {
        let e = Expr::parse_expression("sin(pi) + tan(x) + log(E)").unwrap();
        assert_eq!(
            e,
            Expr::sin(Expr::Const(PI).boxed()) + Expr::tg(x().boxed()) + Expr::Ln(Expr::Const(E).boxed())
        );
        let e = Expr::parse_expression("log(8, 2)").unwrap();
        assert_eq!(
            e,
            Expr::Div(
                Expr::Const(8.0).ln().boxed(),
                Expr::Const(2.0).ln().boxed()
            )
        );
    }

    #[test]
    fn test_scientific_literals_and_spaces() {
        let e = Expr::parse_expression("  1.5e3 *  x  ").unwrap();
        assert_eq!(e, Expr::Const(1500.0) * x());
        let e = Expr::parse_expression(".5").unwrap();
        assert_eq!(e, Expr::Const(0.5));
    }

    #[test]
    fn test_invalid_inputs() {
        for bad in ["", "ln(2))", "(x", "2x", "sin", "foo(x)", "x +", "sin(x, 2)", "3 $ 4"] {
            assert!(Expr::parse_expression(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let deep = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        let err = Expr::parse_expression(&deep).unwrap_err();
        assert!(err.message.contains("nested too deeply"), "{}", err.message);
        let signs = format!("{}x", "-".repeat(300));
        assert!(Expr::parse_expression(&signs).is_err());
        let tower = vec!["x"; 100].join("^");
        assert!(Expr::parse_expression(&tower).is_err());
        let calls = format!("{}x{}", "sin(".repeat(100), ")".repeat(100));
        assert!(Expr::parse_expression(&calls).is_err());
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let nested = format!("{}x{}", "(".repeat(40), ")".repeat(40));
        assert_eq!(Expr::parse_expression(&nested).unwrap(), x());
        // long flat sums do not nest
        let sum = vec!["x^2"; 200].join(" + ");
        assert!(Expr::parse_expression(&sum).is_ok());
        assert_eq!(nesting_depth("-(x^-2)"), 5);
        assert_eq!(nesting_depth("x ** 2 * y ** 2"), 2);
    }

    #[test]
    fn test_multiple_variables_are_kept() {
        let e = Expr::parse_expression("x**y").unwrap();
        assert_eq!(e, x().pow(Expr::Var("y".to_string())));
    }
}

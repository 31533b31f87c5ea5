#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    //___________________________________DISPLAY___________________________________

    #[test]
    fn test_display_minimal_parentheses() {
        assert_eq!(parse("x^2 + 2*x + 1").to_string(), "x^2 + 2*x + 1");
        assert_eq!(parse("(x + 1)*(x - 1)").to_string(), "(x + 1)*(x - 1)");
        assert_eq!(parse("x - (y - z)").to_string(), "x - (y - z)");
        assert_eq!(parse("(x^2)^3").to_string(), "(x^2)^3");
        assert_eq!(parse("x^(1/2)").to_string(), "x^(1/2)");
        assert_eq!(parse("-x^2").to_string(), "-x^2");
        assert_eq!(parse("tg(x) + arctg(x)").to_string(), "tan(x) + atan(x)");
    }

    #[test]
    fn test_display_named_constants() {
        assert_eq!(Expr::Const(PI).to_string(), "pi");
        assert_eq!(Expr::Const(PI / 2.0).to_string(), "pi/2");
        assert_eq!(Expr::Const(3.0 * PI / 2.0).to_string(), "3*pi/2");
        assert_eq!(Expr::Const(E).to_string(), "E");
        assert_eq!(Expr::Const(-0.0).to_string(), "0");
        assert_eq!(Expr::Const(2.5).to_string(), "2.5");
    }

    //___________________________________SIMPLIFY___________________________________

    #[test]
    fn test_simplify_identities() {
        assert_eq!(parse("x + 0").simplify(), parse("x"));
        assert_eq!(parse("1*x").simplify(), parse("x"));
        assert_eq!(parse("0*sin(x)").simplify(), Expr::Const(0.0));
        assert_eq!(parse("x^1").simplify(), parse("x"));
        assert_eq!(parse("x^0").simplify(), Expr::Const(1.0));
        assert_eq!(parse("x - x").simplify(), Expr::Const(0.0));
        assert_eq!(parse("x/x").simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_simplify_collects_terms_and_powers() {
        assert_eq!(parse("x + 2*x - x").simplify().to_string(), "2*x");
        assert_eq!(parse("x*x*x").simplify().to_string(), "x^3");
        assert_eq!(parse("2*x*3").simplify().to_string(), "6*x");
        assert_eq!(parse("(x^2)^3").simplify().to_string(), "x^6");
        assert_eq!(parse("x^3/x").simplify().to_string(), "x^2");
        assert_eq!(parse("1 + x + 2").simplify().to_string(), "x + 3");
    }

    #[test]
    fn test_simplify_folds_constants() {
        assert_eq!(parse("sin(pi)").simplify(), Expr::Const(0.0));
        assert_eq!(parse("cos(pi) + tan(pi/4)").simplify(), Expr::Const(0.0));
        assert_eq!(parse("ln(E^2)").simplify(), Expr::Const(2.0));
        assert_eq!(parse("3^2").simplify(), Expr::Const(9.0));
        // undefined constants are left alone
        assert_eq!(parse("1/0").simplify(), parse("1/0"));
        assert_eq!(parse("ln(-1)").simplify(), parse("ln(-1)"));
    }

    #[test]
    fn test_simplify_preserves_value() {
        let exprs = [
            "(x + 1)^2 - x*(x + 2)",
            "sin(x)^2 + cos(x)^2",
            "x*exp(x)/x^2",
            "3*x/6 + ln(exp(x))",
        ];
        for s in exprs {
            let e = parse(s);
            let simplified = e.simplify();
            for x in [0.3, 1.7, 2.9] {
                assert_relative_eq!(e.eval1D("x", x), simplified.eval1D("x", x), epsilon = 1e-9);
            }
        }
    }

    //___________________________________DIFF___________________________________

    #[test]
    fn test_diff_polynomial() {
        let f = parse("x^2 + 2*x + 1");
        assert_eq!(f.diff("x").simplify().to_string(), "2*x + 2");
        assert_eq!(f.n_th_derivative1D("x", 2), Expr::Const(2.0));
        assert_eq!(f.n_th_derivative1D("x", 3), Expr::Const(0.0));
        assert_eq!(f.n_th_derivative1D("x", 0), f.simplify());
    }

    #[test]
    fn test_diff_elementary_functions() {
        let cases = [
            ("sin(x)", "cos(x)"),
            ("cos(x)", "-sin(x)"),
            ("exp(x)", "exp(x)"),
            ("ln(x)", "1/x"),
        ];
        for (f, expected) in cases {
            assert_eq!(parse(f).diff("x").simplify().to_string(), expected, "d/dx {}", f);
        }
    }

    #[test]
    fn test_diff_matches_numerical_derivative() {
        let exprs = [
            "tan(x)*x",
            "cot(x)",
            "asin(x/2)",
            "acos(x/2)",
            "atan(x^2)",
            "acot(x)",
            "sqrt(x + 3)",
            "abs(x - 5)",
            "2^x",
            "x^x",
            "sinh(x) + cosh(x) + tanh(x)",
            "(x^2 + 1)/(x - 4)",
        ];
        let h = 1e-6;
        for s in exprs {
            let f = parse(s);
            let df = f.diff("x").simplify();
            for x in [0.4, 1.1, 1.6] {
                let numerical = (f.eval1D("x", x + h) - f.eval1D("x", x - h)) / (2.0 * h);
                assert_relative_eq!(df.eval1D("x", x), numerical, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_diff_other_variable_is_constant() {
        let f = parse("y^2 + x");
        assert_eq!(f.diff("y").simplify().to_string(), "2*y");
        assert_eq!(f.diff("x").simplify(), Expr::Const(1.0));
    }

    //___________________________________EVAL___________________________________

    #[test]
    fn test_eval_outside_domain_is_not_a_panic() {
        assert!(parse("ln(x)").eval1D("x", -1.0).is_nan());
        assert!(parse("sqrt(x)").eval1D("x", -1.0).is_nan());
        assert!(parse("x^0.5").eval1D("x", -4.0).is_nan());
        assert!(parse("1/x").eval1D("x", 0.0).is_infinite());
        assert!(parse("asin(x)").eval1D("x", 2.0).is_nan());
        // unknown variable
        assert!(parse("y").eval1D("x", 1.0).is_nan());
    }

    #[test]
    fn test_eval_expression_several_variables() {
        let f = parse("x*y + z");
        assert_eq!(f.eval_expression(&["x", "y", "z"], &[2.0, 3.0, 4.0]), 10.0);
        assert_eq!(f.all_arguments_are_variables(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_set_and_substitute_variable() {
        let f = parse("x^2 + x");
        assert_eq!(f.set_variable("x", 3.0).simplify(), Expr::Const(12.0));
        let g = f.substitute_variable("x", &parse("t + 1"));
        assert!(g.contains_variable("t"));
        assert!(!g.contains_variable("x"));
        assert_relative_eq!(g.eval1D("t", 1.0), 6.0);
    }

    #[test]
    fn test_lambdify_and_vector_eval() {
        let f = parse("x^3");
        let values = f.calc_vector_lambdified1D("x", &[1.0, 2.0, 3.0]);
        for (v, expected) in values.iter().zip([1.0, 8.0, 27.0]) {
            assert_relative_eq!(*v, expected, epsilon = 1e-12);
        }
        let g = f.lambdify1D("x");
        assert_relative_eq!(g(-2.0), -8.0, epsilon = 1e-12);
    }
}

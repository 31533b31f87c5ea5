#[cfg(test)]
mod tests {
    use crate::calculus::analysis::{
        AnalysisConfig, AnalysisFacade, AsymptoteReport, ConcavityReport, DomainRange,
    };
    use crate::calculus::function::ScalarExpression;
    use crate::calculus::intervals::{Concavity, Interval, Monotonicity};
    use crate::error::CalcError;
    use crate::numerical::limits::LimitValue;
    use crate::numerical::window::SearchWindow;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const INF: f64 = f64::INFINITY;

    fn func(text: &str) -> ScalarExpression {
        ScalarExpression::create(text).unwrap()
    }

    fn analysis() -> AnalysisFacade {
        AnalysisFacade::new()
    }

    //___________________________________SLOPE___________________________________

    #[test]
    fn test_slope() {
        let f = func("x**2");
        assert_eq!(analysis().slope(&f, "2").unwrap(), 4.0);
        assert_eq!(analysis().slope(&f, "-1").unwrap(), -2.0);
        assert_eq!(analysis().slope(&func("sin(x)"), "0").unwrap(), 1.0);
        assert!(matches!(
            analysis().slope(&func("ln(x)"), "0"),
            Err(CalcError::InvalidValue(_))
        ));
    }

    //___________________________________CRITICAL POINTS___________________________________

    #[test]
    fn test_critical_points() {
        assert_eq!(analysis().critical_points(&func("x**2"), None), vec![0.0]);
        assert_eq!(analysis().critical_points(&func("x**2 + 2*x + 1"), None), vec![-1.0]);
        assert_eq!(analysis().critical_points(&func("x^3 - 3*x"), None), vec![-1.0, 1.0]);
        // singular points count as critical
        assert_eq!(analysis().critical_points(&func("1/x"), None), vec![0.0]);
        assert_eq!(analysis().critical_points(&func("abs(x - 2)"), None), vec![2.0]);
    }

    #[test]
    fn test_critical_points_of_sine_on_interval() {
        let points = analysis().critical_points(&func("sin(x)"), Some(Interval::new(0.0, 2.0 * PI)));
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0], PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(points[1], 3.0 * PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_critical_points_of_constant_is_empty() {
        assert!(analysis().critical_points(&func("5"), None).is_empty());
        assert!(analysis()
            .critical_points(&func("pi^2"), Some(Interval::new(-1.0, 1.0)))
            .is_empty());
    }

    #[test]
    fn test_flat_tails_are_not_critical() {
        // the derivative underflows to exactly zero far from the origin
        let f = func("exp(-x^2)");
        assert_eq!(analysis().critical_points(&f, None), vec![0.0]);
        let map = analysis().intervals_of_increase_decreasing(&f, None);
        assert_eq!(map.get(Monotonicity::Increasing), &[Interval::new(-INF, 0.0)]);
        assert_eq!(map.get(Monotonicity::Decreasing), &[Interval::new(0.0, INF)]);
        assert!(map.get(Monotonicity::Constant).is_empty());
    }

    #[test]
    fn test_critical_points_outside_the_window() {
        let f = func("x^2 - 500*x");
        assert_eq!(
            analysis().critical_points(&f, Some(Interval::new(200.0, 300.0))),
            vec![250.0]
        );
        assert_eq!(
            analysis().critical_points(&f, Some(Interval::new(-50.0, 400.0))),
            vec![250.0]
        );
    }

    //___________________________________EXTREMA___________________________________

    #[test]
    fn test_extrema() {
        let e = analysis().extrema(&func("x**2"), Interval::new(-1.0, 2.0)).unwrap();
        assert_eq!(e.min, 0.0);
        assert_eq!(e.max, 4.0);
        let e = analysis()
            .extrema(&func("x^3 - 3*x"), Interval::new(-3.0, 3.0))
            .unwrap();
        assert_eq!((e.min, e.max), (-18.0, 18.0));
        let e = analysis().extrema(&func("7"), Interval::new(0.0, 1.0)).unwrap();
        assert_eq!((e.min, e.max), (7.0, 7.0));
    }

    #[test]
    fn test_extrema_outside_the_window() {
        let e = analysis()
            .extrema(&func("x^2 - 500*x"), Interval::new(200.0, 300.0))
            .unwrap();
        assert_eq!(e.max, -60000.0);
        assert_eq!(e.min, -62500.0);
        let e = analysis().extrema(&func("x"), Interval::new(150.0, 150.0)).unwrap();
        assert_eq!((e.min, e.max), (150.0, 150.0));
    }

    #[test]
    fn test_extrema_invalid_intervals() {
        assert!(matches!(
            analysis().extrema(&func("x"), Interval::new(2.0, 1.0)),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            analysis().extrema(&func("ln(x)"), Interval::new(-2.0, -1.0)),
            Err(CalcError::InvalidValue(_))
        ));
    }

    //___________________________________MONOTONICITY___________________________________

    #[test]
    fn test_monotonicity_of_square() {
        let map = analysis()
            .intervals_of_increase_decreasing(&func("x**2"), Some(Interval::new(-10.0, 10.0)));
        assert_eq!(map.get(Monotonicity::Decreasing), &[Interval::new(-10.0, 0.0)]);
        assert_eq!(map.get(Monotonicity::Increasing), &[Interval::new(0.0, 10.0)]);
        assert!(map.get(Monotonicity::Constant).is_empty());
    }

    #[test]
    fn test_monotonicity_over_domain() {
        let map = analysis().intervals_of_increase_decreasing(&func("1/x"), None);
        assert_eq!(
            map.get(Monotonicity::Decreasing),
            &[Interval::new(-INF, 0.0), Interval::new(0.0, INF)]
        );
        let map = analysis().intervals_of_increase_decreasing(&func("3"), None);
        assert_eq!(map.get(Monotonicity::Constant), &[Interval::real_line()]);
    }

    #[test]
    fn test_narrow_pieces_fall_back_to_constant() {
        // the two pieces next to the origin are narrower than the two-unit test offset
        let map = analysis().intervals_of_increase_decreasing(
            &func("x^4 - x^2"),
            Some(Interval::new(-5.0, 5.0)),
        );
        assert_eq!(map.get(Monotonicity::Decreasing).len(), 1);
        assert_eq!(map.get(Monotonicity::Increasing).len(), 1);
        assert_eq!(map.get(Monotonicity::Constant).len(), 2);
    }

    //___________________________________INFLECTION & CONCAVITY___________________________________

    #[test]
    fn test_inflection_points() {
        assert_eq!(analysis().inflection_points(&func("x^3"), None), vec![0.0]);
        assert!(analysis().inflection_points(&func("x^2"), None).is_empty());
    }

    #[test]
    fn test_inflection_points_on_interval_ends() {
        let points =
            analysis().inflection_points(&func("sin(x)"), Some(Interval::new(0.0, 2.0 * PI)));
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], 0.0);
        assert_relative_eq!(points[1], PI, epsilon = 1e-12);
        assert_relative_eq!(points[2], 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_concavity() {
        match analysis().concavity(&func("x**3"), None) {
            ConcavityReport::Map(map) => {
                assert_eq!(map.get(Concavity::ConcaveDown), &[Interval::new(-INF, 0.0)]);
                assert_eq!(map.get(Concavity::ConcaveUp), &[Interval::new(0.0, INF)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match analysis().concavity(&func("2*x + 1"), None) {
            ConcavityReport::Map(map) => {
                assert_eq!(map.get(Concavity::Linear), &[Interval::real_line()]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(analysis().concavity(&func("4"), None), ConcavityReport::ConstantFunction);
    }

    //___________________________________ASYMPTOTES___________________________________

    #[test]
    fn test_asymptotes_of_reciprocal() {
        match analysis().asymptotes(&func("1/x")) {
            AsymptoteReport::Found { vertical, horizontal } => {
                assert_eq!(vertical.len(), 1);
                assert_eq!(vertical[0].at, 0.0);
                assert_eq!(vertical[0].left, LimitValue::NegInfinity);
                assert_eq!(vertical[0].right, LimitValue::PosInfinity);
                assert_eq!(horizontal.at_pos_infinity, LimitValue::Finite(0.0));
                assert_eq!(horizontal.at_neg_infinity, LimitValue::Finite(0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_asymptotes_of_polynomial_and_constant() {
        match analysis().asymptotes(&func("x^2")) {
            AsymptoteReport::Found { vertical, horizontal } => {
                assert!(vertical.is_empty());
                assert_eq!(horizontal.at_pos_infinity, LimitValue::PosInfinity);
                assert_eq!(horizontal.at_neg_infinity, LimitValue::PosInfinity);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(analysis().asymptotes(&func("3")), AsymptoteReport::NoAsymptotes);
    }

    //___________________________________DOMAIN & RANGE___________________________________

    #[test]
    fn test_domain_and_range() {
        let DomainRange { domain, range } = analysis().domain_and_range(&func("sqrt(x)"));
        assert_eq!(domain, vec![Interval::new(0.0, INF)]);
        assert_eq!(range, Some(Interval::new(0.0, INF)));
        let DomainRange { domain, range } = analysis().domain_and_range(&func("2"));
        assert_eq!(domain, vec![Interval::real_line()]);
        assert_eq!(range, Some(Interval::new(2.0, 2.0)));
    }

    //___________________________________CONFIG & PURITY___________________________________

    #[test]
    fn test_custom_window() {
        let facade = AnalysisFacade::with_config(AnalysisConfig {
            window: SearchWindow::new(0.0, 10.0, 2000),
        });
        let points = facade.critical_points(&func("cos(x)"), None);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], 0.0);
        assert_relative_eq!(points[3], 3.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_queries_are_repeatable() {
        let f = func("x^3 - 3*x");
        let a = analysis();
        assert_eq!(a.critical_points(&f, None), a.critical_points(&f, None));
        assert_eq!(
            a.intervals_of_increase_decreasing(&f, None),
            a.intervals_of_increase_decreasing(&f, None)
        );
    }
}

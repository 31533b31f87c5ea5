//! # Function analysis
//!
//! Calculus questions about a [`ScalarExpression`]: slope, critical points, extrema, intervals
//! of increase and decrease, inflection points, concavity, asymptotes, domain and range.
//!
//! Every routine is a pure function of the expression and an optional interval; `None` stands
//! for the continuous domain of the expression. Unbounded domains are searched numerically
//! inside the analysis window (default `[-100, 100]`), so e.g. a periodic function reports the
//! critical points that fall in the window.
//!
//! ## Example
//! ```
//! use DerivativeXpert::calculus::function::ScalarExpression;
//! use DerivativeXpert::calculus::analysis::AnalysisFacade;
//! use DerivativeXpert::calculus::intervals::{Interval, Monotonicity};
//! let f = ScalarExpression::create("x**2").unwrap();
//! let analysis = AnalysisFacade::new();
//! assert_eq!(analysis.critical_points(&f, None), vec![0.0]);
//! let map = analysis.intervals_of_increase_decreasing(&f, Some(Interval::new(-10.0, 10.0)));
//! assert_eq!(map.get(Monotonicity::Increasing), &[Interval::new(0.0, 10.0)]);
//! ```
use crate::calculus::derivative::{DerivativeEngine, differentiate};
use crate::calculus::function::ScalarExpression;
use crate::calculus::intervals::{ClassificationMap, Concavity, Interval, Monotonicity};
use crate::error::{CalcError, CalcResult};
use crate::numerical::domain::{continuous_domain, function_range, singularities};
use crate::numerical::limits::{Direction, LimitValue, limit};
use crate::numerical::monotonic::{is_strictly_decreasing, is_strictly_increasing};
use crate::numerical::root_finding::solve;
use crate::numerical::window::SearchWindow;
use crate::symbolic::utils::sorted_unique;
use log::{debug, info};

/// Inward offset applied to every sub-interval before testing monotonicity on it.
const MONOTONICITY_OFFSET: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcavityReport {
    ConstantFunction,
    Map(ClassificationMap<Concavity>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalAsymptote {
    pub at: f64,
    /// limit from the left, `x -> at-`
    pub left: LimitValue,
    /// limit from the right, `x -> at+`
    pub right: LimitValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalAsymptotes {
    pub at_pos_infinity: LimitValue,
    pub at_neg_infinity: LimitValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsymptoteReport {
    NoAsymptotes,
    Found {
        vertical: Vec<VerticalAsymptote>,
        horizontal: HorizontalAsymptotes,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainRange {
    pub domain: Vec<Interval>,
    /// `None` when the function takes no real value at all
    pub range: Option<Interval>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub window: SearchWindow,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: SearchWindow::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisFacade {
    config: AnalysisConfig,
}

impl AnalysisFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn window(&self) -> &SearchWindow {
        &self.config.window
    }

    /// The intervals a query runs over: the given one, or the continuous domain.
    fn regions(&self, f: &ScalarExpression, interval: Option<Interval>) -> Vec<Interval> {
        match interval {
            Some(interval) => vec![interval],
            None => self.domain(f),
        }
    }

    fn domain(&self, f: &ScalarExpression) -> Vec<Interval> {
        continuous_domain(f.expression(), f.variable_or_default(), self.window())
            .into_iter()
            .map(Interval::from)
            .collect()
    }

    /// Value of the first derivative at the number written in `value`.
    pub fn slope(&self, f: &ScalarExpression, value: &str) -> CalcResult<f64> {
        DerivativeEngine::new(f.clone(), 1).evaluate(value)
    }

    /// Singular points of the function and of its derivative together with the zeros of the
    /// derivative, sorted. Empty for a constant function.
    pub fn critical_points(&self, f: &ScalarExpression, interval: Option<Interval>) -> Vec<f64> {
        if f.is_constant() {
            return Vec::new();
        }
        let var = f.variable_or_default();
        let df = differentiate(f, 1);
        let mut points = Vec::new();
        for region in self.regions(f, interval) {
            let sub = match self.window().covering(region.start, region.end) {
                Some(sub) => sub,
                None => continue,
            };
            let mut found = singularities(f.expression(), var, &sub);
            found.extend(singularities(df.expression(), var, &sub));
            found.extend(solve(df.expression(), var, &sub));
            points.extend(found.into_iter().filter(|p| region.contains(*p)));
        }
        let points = sorted_unique(points, 1e-9);
        debug!("critical points of {}: {:?}", f, points);
        points
    }

    /// Largest and smallest value among the interval ends and the critical points inside.
    ///
    /// # Errors
    /// `InvalidValue` when the function has no finite value at any of those points
    pub fn extrema(&self, f: &ScalarExpression, interval: Interval) -> CalcResult<Extrema> {
        let (a, b) = match self.window().covering(interval.start, interval.end) {
            Some(sub) => (sub.start, sub.end),
            // a single point is a valid degenerate interval
            None if interval.start == interval.end && interval.start.is_finite() => {
                (interval.start, interval.end)
            }
            None => {
                return Err(CalcError::InvalidInput(format!("empty interval {}", interval)));
            }
        };
        let mut candidates = vec![a, b];
        candidates.extend(self.critical_points(f, Some(Interval::new(a, b))));
        let values: Vec<f64> = candidates
            .iter()
            .map(|x| f.raw_value(*x))
            .filter(|y| y.is_finite())
            .collect();
        if values.is_empty() {
            return Err(CalcError::InvalidValue(format!(
                "{} has no finite value on {}",
                f, interval
            )));
        }
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(Extrema { max, min })
    }

    /// Splits the region(s) at the critical points and labels each piece by the strict
    /// monotonicity of the function on the piece shrunk by one unit at both ends. Pieces
    /// narrower than two units leave an empty test interval and are labelled `Constant`.
    pub fn intervals_of_increase_decreasing(
        &self,
        f: &ScalarExpression,
        interval: Option<Interval>,
    ) -> ClassificationMap<Monotonicity> {
        let var = f.variable_or_default();
        let critical = self.critical_points(f, interval);
        let mut map = ClassificationMap::new();
        for region in self.regions(f, interval) {
            let mut bounds = vec![region.start];
            bounds.extend(
                critical
                    .iter()
                    .copied()
                    .filter(|p| *p > region.start && *p < region.end),
            );
            bounds.push(region.end);
            for piece in bounds.windows(2) {
                let (a, b) = (piece[0], piece[1]);
                let (lo, hi) = (a + MONOTONICITY_OFFSET, b - MONOTONICITY_OFFSET);
                let label = if is_strictly_increasing(f.expression(), var, lo, hi, self.window()) {
                    Monotonicity::Increasing
                } else if is_strictly_decreasing(f.expression(), var, lo, hi, self.window()) {
                    Monotonicity::Decreasing
                } else {
                    Monotonicity::Constant
                };
                map.push(label, Interval::new(a, b));
            }
        }
        map
    }

    /// Critical points of the first derivative.
    pub fn inflection_points(&self, f: &ScalarExpression, interval: Option<Interval>) -> Vec<f64> {
        self.critical_points(&differentiate(f, 1), interval)
    }

    /// Concavity from the monotonicity of the first derivative: increasing slope is concave up,
    /// decreasing slope concave down, constant slope linear.
    pub fn concavity(&self, f: &ScalarExpression, interval: Option<Interval>) -> ConcavityReport {
        if f.is_constant() {
            return ConcavityReport::ConstantFunction;
        }
        let df = differentiate(f, 1);
        ConcavityReport::Map(
            self.intervals_of_increase_decreasing(&df, interval)
                .relabel(Concavity::from),
        )
    }

    /// One vertical asymptote per singular point of the window, with both one-sided limits,
    /// and the limits at both infinities.
    pub fn asymptotes(&self, f: &ScalarExpression) -> AsymptoteReport {
        if f.is_constant() {
            return AsymptoteReport::NoAsymptotes;
        }
        let expr = f.expression();
        let var = f.variable_or_default();
        let vertical = singularities(expr, var, self.window())
            .into_iter()
            .map(|at| VerticalAsymptote {
                at,
                left: limit(expr, var, at, Direction::Left),
                right: limit(expr, var, at, Direction::Right),
            })
            .collect();
        let horizontal = HorizontalAsymptotes {
            at_pos_infinity: limit(expr, var, f64::INFINITY, Direction::Left),
            at_neg_infinity: limit(expr, var, f64::NEG_INFINITY, Direction::Right),
        };
        info!("asymptotes of {} computed", f);
        AsymptoteReport::Found {
            vertical,
            horizontal,
        }
    }

    /// Continuous domain and the range of values over it.
    pub fn domain_and_range(&self, f: &ScalarExpression) -> DomainRange {
        if f.is_constant() {
            let value = f.raw_value(0.0);
            return if value.is_finite() {
                DomainRange {
                    domain: vec![Interval::real_line()],
                    range: Some(Interval::new(value, value)),
                }
            } else {
                DomainRange {
                    domain: Vec::new(),
                    range: None,
                }
            };
        }
        let var = f.variable_or_default();
        let domain = continuous_domain(f.expression(), var, self.window());
        let range = function_range(f.expression(), var, &domain, self.window()).map(Interval::from);
        DomainRange {
            domain: domain.into_iter().map(Interval::from).collect(),
            range,
        }
    }
}

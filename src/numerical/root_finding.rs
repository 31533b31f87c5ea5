//! Scalar root finding.
//!
//! `ScalarRootFinder` offers bisection for a single bracket and `find_all_roots` for every real
//! root inside a finite search window:
//! 1. the window is sampled densely
//! 2. isolated exact zeros on the grid are taken as they are (runs of zeros are flat tails); a
//!    window end whose value is rounding residue next to a clearly nonzero neighbour is a root
//! 3. every sign change is refined by bisection; a bracket whose midpoint value blows up instead
//!    of shrinking is a pole, not a root, and is dropped
//! 4. a local minimum of `|f|` without a sign change (even multiplicity root such as `x^2`) is
//!    refined on the derivative and accepted when `f` vanishes there
//! 5. roots are snapped to nearby integers and multiples of pi, sorted and deduplicated
use crate::numerical::window::SearchWindow;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, snap_nice, sorted_unique};
use log::{debug, info};
use std::fmt;

/// largest ratio of an end value to its neighbour that is still read as a root at the end
const END_ROOT_RATIO: f64 = 1e-9;

/// Error types for root finding methods
#[derive(Debug, Clone, PartialEq)]
pub enum RootFindingError {
    MaxIterationsReached,
    InvalidInterval,
    InvalidInput(String),
}

impl fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootFindingError::MaxIterationsReached => write!(f, "Maximum iterations reached"),
            RootFindingError::InvalidInterval => write!(f, "Invalid interval for bisection method"),
            RootFindingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}
//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////
impl std::error::Error for RootFindingError {}

/// Trait for representing a nonlinear equation f(x) = 0
pub trait NonlinearFunction {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> f64;

    /// Evaluate the derivative at point x (optional, for methods that can use it)
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: String) -> Self {
        Self { func, name }
    }
}

impl<F> NonlinearFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

////////////////////////SYMBOLIC FUNCTIONS//////////////////////////////////////////
/// One-variable symbolic expression together with its symbolic derivative
pub struct SymbolicFunction {
    expr: Expr,
    derivative_expr: Expr,
    variable: String,
    name: String,
}

impl SymbolicFunction {
    /// Wraps an expression; the derivative is computed and simplified once here
    pub fn from_expr(expr: &Expr, variable: &str) -> Self {
        let derivative_expr = expr.diff(variable).simplify();
        Self {
            expr: expr.clone(),
            derivative_expr,
            variable: variable.to_string(),
            name: expr.to_string(),
        }
    }

    pub fn derivative_expression(&self) -> &Expr {
        &self.derivative_expr
    }
}

impl NonlinearFunction for SymbolicFunction {
    fn evaluate(&self, x: f64) -> f64 {
        self.expr.eval1D(&self.variable, x)
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(self.derivative_expr.eval1D(&self.variable, x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

///////////////////////////////////////////SETTERS AND GETTERS///////////////////////////////////////////
/// Result structure for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingResult {
    pub root: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub converged: bool,
    pub method: String,
}

/// Configuration for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingConfig {
    /// tolerance on the bracket width (relative for |x| > 1) and on |f|
    pub tolerance: f64,
    pub max_iterations: usize,
    /// number of grid intervals used by `find_all_roots`
    pub samples: usize,
    /// roots closer than this to a "nice" value are snapped to it
    pub snap_tolerance: f64,
    pub verbose: bool,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 200,
            samples: 4000,
            snap_tolerance: 1e-9,
            verbose: false,
        }
    }
}

/// An exact zero on the grid counts only when it is isolated: a run of zeros, or a zero next to
/// values that have underflowed, is a flat tail such as `x*exp(-x^2)` far from the origin.
fn is_exact_root(fs: &[f64], i: usize) -> bool {
    if fs[i] != 0.0 {
        return false;
    }
    let neighbours = [i.checked_sub(1), Some(i + 1)];
    let mut any = false;
    for j in neighbours.into_iter().flatten().filter(|j| *j < fs.len()) {
        if fs[j] == 0.0 || fs[j].abs() < f64::MIN_POSITIVE {
            return false;
        }
        any = true;
    }
    any
}

/// A window end whose value is rounding residue next to a clearly nonzero neighbour, e.g.
/// `sin(2*pi)`.
fn is_end_root(fs: &[f64], i: usize) -> bool {
    let neighbour = match i {
        0 if fs.len() > 1 => fs[1],
        _ if i + 1 == fs.len() && i > 0 => fs[i - 1],
        _ => return false,
    };
    let value = fs[i];
    value != 0.0
        && value.is_finite()
        && neighbour.is_finite()
        && neighbour.abs() >= f64::MIN_POSITIVE
        && value.abs() <= END_ROOT_RATIO * neighbour.abs()
}

/// Main structure for scalar root finding methods
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    /// Create a new ScalarRootFinder with default configuration
    pub fn new() -> Self {
        Self {
            config: RootFindingConfig::default(),
        }
    }

    /// Create a new ScalarRootFinder with custom configuration
    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    fn converged(&self, a: f64, b: f64) -> bool {
        (b - a).abs() / 2.0 <= self.config.tolerance * a.abs().max(b.abs()).max(1.0)
    }

    /////////////////////////////////////////METHODS///////////////////////////////////////////

    /// Bisection method for finding roots
    /// Requires that f(a) and f(b) have opposite signs
    pub fn bisection<F>(
        &self,
        function: &F,
        mut a: f64,
        mut b: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NonlinearFunction,
    {
        if !a.is_finite() || !b.is_finite() {
            return Err(RootFindingError::InvalidInput(
                "bisection needs a finite bracket".to_string(),
            ));
        }
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        let mut fa = function.evaluate(a);
        let fb = function.evaluate(b);

        if fa == 0.0 {
            return Ok(RootFindingResult {
                root: a,
                function_value: fa,
                iterations: 0,
                converged: true,
                method: "bisection".to_string(),
            });
        }
        if fb == 0.0 {
            return Ok(RootFindingResult {
                root: b,
                function_value: fb,
                iterations: 0,
                converged: true,
                method: "bisection".to_string(),
            });
        }
        // Check if the function values have opposite signs
        if !(fa * fb < 0.0) {
            return Err(RootFindingError::InvalidInterval);
        }

        if self.config.verbose {
            debug!(
                "Bisection method for function: {} on [{}, {}]",
                function.name(),
                a,
                b
            );
        }

        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            let c = (a + b) / 2.0;
            let fc = function.evaluate(c);

            if fc == 0.0 || self.converged(a, b) || c == a || c == b {
                return Ok(RootFindingResult {
                    root: c,
                    function_value: fc,
                    iterations: iterations + 1,
                    converged: true,
                    method: "bisection".to_string(),
                });
            }

            // Update interval
            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
            iterations += 1;
        }

        Err(RootFindingError::MaxIterationsReached)
    }

    /// Golden-section search for the minimiser of `|f|` on `[a, b]`
    fn minimize_abs<F>(&self, function: &F, mut a: f64, mut b: f64) -> f64
    where
        F: NonlinearFunction,
    {
        let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
        let mut c = b - inv_phi * (b - a);
        let mut d = a + inv_phi * (b - a);
        for _ in 0..self.config.max_iterations {
            if self.converged(a, b) {
                break;
            }
            if function.evaluate(c).abs() < function.evaluate(d).abs() {
                b = d;
            } else {
                a = c;
            }
            c = b - inv_phi * (b - a);
            d = a + inv_phi * (b - a);
        }
        (a + b) / 2.0
    }

    /// Refines a candidate even-multiplicity root near the grid point `x_mid`
    fn refine_touching_root<F>(&self, function: &F, a: f64, x_mid: f64, b: f64) -> Option<f64>
    where
        F: NonlinearFunction,
    {
        let derivative_sign_change = match (function.derivative(a), function.derivative(b)) {
            (Some(da), Some(db)) => da.is_finite() && db.is_finite() && da * db < 0.0,
            _ => false,
        };
        let candidate = if derivative_sign_change {
            let slope = ClosureFunction::new(
                |x| function.derivative(x).unwrap_or(f64::NAN),
                "derivative".to_string(),
            );
            self.bisection(&slope, a, b).ok()?.root
        } else {
            self.minimize_abs(function, a, b)
        };
        let value = function.evaluate(candidate);
        let scale = function.evaluate(x_mid).abs().max(1.0);
        if value.is_finite() && value.abs() <= 1e-9 * scale {
            Some(candidate)
        } else {
            None
        }
    }

    /// Finds every real root of `function` inside `[a, b]`.
    ///
    /// # Returns
    /// Sorted, deduplicated roots; empty when there are none or the window is empty
    pub fn find_all_roots<F>(&self, function: &F, a: f64, b: f64) -> Vec<f64>
    where
        F: NonlinearFunction,
    {
        if !(a < b) || !a.is_finite() || !b.is_finite() {
            return Vec::new();
        }
        let xs = linspace(a, b, self.config.samples + 1);
        let fs: Vec<f64> = xs.iter().map(|x| function.evaluate(*x)).collect();
        let mut roots = Vec::new();

        for i in 0..xs.len() {
            if is_exact_root(&fs, i) || is_end_root(&fs, i) {
                roots.push(xs[i]);
            }
        }

        for i in 0..xs.len() - 1 {
            let (f0, f1) = (fs[i], fs[i + 1]);
            if !(f0.is_finite() && f1.is_finite()) || !(f0 * f1 < 0.0) {
                continue;
            }
            match self.bisection(function, xs[i], xs[i + 1]) {
                Ok(result) => {
                    let fr = result.function_value;
                    // across a pole the bracket shrinks onto a blow-up
                    if fr.is_finite() && fr.abs() <= 1e-6 * (1.0 + f0.abs().max(f1.abs())) {
                        roots.push(result.root);
                    } else {
                        debug!("{}: sign change at {} is a pole", function.name(), result.root);
                    }
                }
                Err(e) => debug!("{}: bisection failed: {}", function.name(), e),
            }
        }

        for i in 1..xs.len().saturating_sub(1) {
            let (fl, fm, fr) = (fs[i - 1], fs[i], fs[i + 1]);
            if !(fl.is_finite() && fm.is_finite() && fr.is_finite()) || fm == 0.0 {
                continue;
            }
            let same_sign = fl.signum() == fm.signum() && fm.signum() == fr.signum();
            let local_min = fm.abs() < fl.abs() && fm.abs() <= fr.abs();
            if same_sign && local_min {
                if let Some(root) = self.refine_touching_root(function, xs[i - 1], xs[i], xs[i + 1]) {
                    roots.push(root);
                }
            }
        }

        let roots: Vec<f64> = roots
            .into_iter()
            .map(|r| snap_nice(r, self.config.snap_tolerance))
            .collect();
        let roots = sorted_unique(roots, 1e-7);
        if self.config.verbose {
            info!("{}: {} root(s) in [{}, {}]", function.name(), roots.len(), a, b);
        }
        roots
    }
}

impl Default for ScalarRootFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// All real roots of `expr(var) = 0` inside the search window
pub fn solve(expr: &Expr, var: &str, window: &SearchWindow) -> Vec<f64> {
    let function = SymbolicFunction::from_expr(expr, var);
    let solver = ScalarRootFinder::with_config(RootFindingConfig {
        samples: window.samples.max(2),
        verbose: log::log_enabled!(log::Level::Debug),
        ..RootFindingConfig::default()
    });
    solver.find_all_roots(&function, window.start, window.end)
}

/////////////////////////////////////////TESTS////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_closure_function() {
        let func = ClosureFunction::new(|x| x * x - 4.0, "x^2 - 4".to_string());
        assert_eq!(func.evaluate(2.0), 0.0);
        assert_eq!(func.evaluate(0.0), -4.0);
        assert_eq!(func.name(), "x^2 - 4");
        assert_eq!(func.derivative(1.0), None);
    }

    #[test]
    fn test_bisection_cubic() {
        let solver = ScalarRootFinder::new();
        let func = ClosureFunction::new(|x| x * x * x - x - 1.0, "x^3 - x - 1".to_string());
        let result = solver.bisection(&func, 1.0, 2.0).unwrap();
        assert_relative_eq!(result.root, 1.324717957244746, epsilon = 1e-12);
        assert!(result.converged);
        assert_eq!(result.method, "bisection");
    }

    #[test]
    fn test_bisection_invalid_interval() {
        let solver = ScalarRootFinder::new();
        let func = ClosureFunction::new(|x| x * x + 1.0, "x^2 + 1".to_string());
        let result = solver.bisection(&func, -1.0, 1.0);
        assert!(matches!(result, Err(RootFindingError::InvalidInterval)));
    }

    #[test]
    fn test_bisection_root_at_endpoint() {
        let solver = ScalarRootFinder::new();
        let func = ClosureFunction::new(|x| x - 2.0, "x - 2".to_string());
        let result = solver.bisection(&func, 1.0, 2.0).unwrap();
        assert_eq!(result.root, 2.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_find_all_roots_sign_changes() {
        let roots = solve(&parse("x^2 - 4"), "x", &SearchWindow::new(-100.0, 100.0, 4000));
        assert_eq!(roots, vec![-2.0, 2.0]);
        let roots = solve(&parse("cos(x)"), "x", &SearchWindow::new(0.0, 2.0 * PI, 4000));
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 3.0 * PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_find_all_roots_touching_root() {
        assert_eq!(solve(&parse("x^2"), "x", &SearchWindow::new(-100.0, 100.0, 4000)), vec![0.0]);
        assert_eq!(solve(&parse("(x - 1/3)^2"), "x", &SearchWindow::new(-10.0, 10.0, 4000)).len(), 1);
        assert!(solve(&parse("x^2 + 1e-3"), "x", &SearchWindow::new(-10.0, 10.0, 4000)).is_empty());
    }

    #[test]
    fn test_find_all_roots_skips_poles() {
        assert!(solve(&parse("1/x"), "x", &SearchWindow::new(-100.0, 100.0, 4000)).is_empty());
        let roots = solve(&parse("tan(x)"), "x", &SearchWindow::new(-2.0, 2.0, 4000));
        assert_eq!(roots, vec![0.0]);
    }

    #[test]
    fn test_find_all_roots_empty_window() {
        assert!(solve(&parse("x"), "x", &SearchWindow::new(1.0, 1.0, 4000)).is_empty());
        assert!(solve(&parse("x"), "x", &SearchWindow::new(2.0, 1.0, 4000)).is_empty());
    }

    #[test]
    fn test_underflowed_tail_is_not_a_root() {
        // the derivative of exp(-x^2) is exactly 0.0 for |x| > ~27
        let roots = solve(&parse("-2*x*exp(-x^2)"), "x", &SearchWindow::default());
        assert_eq!(roots, vec![0.0]);
        assert!(solve(&parse("exp(-x^2)"), "x", &SearchWindow::default()).is_empty());
    }

    #[test]
    fn test_root_on_window_ends() {
        let roots = solve(&parse("sin(x)"), "x", &SearchWindow::new(0.0, 2.0 * PI, 4000));
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0], 0.0);
        assert_relative_eq!(roots[1], PI, epsilon = 1e-12);
        assert_relative_eq!(roots[2], 2.0 * PI, epsilon = 1e-12);
        let roots = solve(&parse("-sin(x)"), "x", &SearchWindow::new(-2.0 * PI, 0.0, 4000));
        assert_relative_eq!(roots[0], -2.0 * PI, epsilon = 1e-12);
        // an end that is merely small is not a root
        assert!(solve(&parse("exp(x)"), "x", &SearchWindow::new(-100.0, -50.0, 1000)).is_empty());
    }
}

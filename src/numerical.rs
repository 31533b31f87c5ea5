/// Bisection, Newton-Raphson and the all-roots search used to solve `f(x) = 0` inside a window
///  Example#1
/// ```
/// use DerivativeXpert::symbolic::symbolic_engine::Expr;
/// use DerivativeXpert::numerical::root_finding::solve;
/// use DerivativeXpert::numerical::window::SearchWindow;
/// let f = Expr::parse_expression("x^3 - x").unwrap();
/// let roots = solve(&f, "x", &SearchWindow::default());
/// assert_eq!(roots, vec![-1.0, 0.0, 1.0]);
/// ```
pub mod root_finding;
/// numerical limits at finite points and at infinity
pub mod limits;
/// singular points, continuous domain and range of an expression
pub mod domain;
/// strict monotonicity by dense sampling
pub mod monotonic;
/// the finite search window with its sampling density
pub mod window;

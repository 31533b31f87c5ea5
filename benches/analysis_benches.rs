use DerivativeXpert::calculus::analysis::AnalysisFacade;
use DerivativeXpert::calculus::function::ScalarExpression;
use DerivativeXpert::calculus::intervals::Interval;
use DerivativeXpert::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse and simplify", |b| {
        b.iter(|| Expr::parse_expression(black_box("x^3 - 3*x + sin(x)/(x^2 + 1)")).map(|e| e.simplify()))
    });
}

fn bench_monotonicity(c: &mut Criterion) {
    let analysis = AnalysisFacade::new();
    let f = ScalarExpression::create("x^3 - 3*x").unwrap();
    c.bench_function("intervals of increase and decrease", |b| {
        b.iter(|| analysis.intervals_of_increase_decreasing(black_box(&f), Some(Interval::new(-10.0, 10.0))))
    });
}

fn bench_critical_points(c: &mut Criterion) {
    let analysis = AnalysisFacade::new();
    let f = ScalarExpression::create("sin(x)*x").unwrap();
    c.bench_function("critical points over the window", |b| {
        b.iter(|| analysis.critical_points(black_box(&f), None))
    });
}

criterion_group!(benches, bench_parse, bench_monotonicity, bench_critical_points);
criterion_main!(benches);

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tripartite_rs::api::{ChartConfig, LineSeries, TripartiteChart};
use tripartite_rs::core::{
    DataPoint, DiagonalFamily, PlotRange, TripartiteUnitOption, Viewport, generate_lines,
    generate_steps,
};
use tripartite_rs::render::RecordingBackend;

fn bench_log_steps_six_decades(c: &mut Criterion) {
    c.bench_function("log_steps_six_decades", |b| {
        b.iter(|| {
            let _ = generate_steps(
                black_box(10.0),
                black_box(0.013),
                black_box(47_000.0),
                black_box(true),
            )
            .expect("valid range");
        })
    });
}

fn bench_diagonal_lines_both_families(c: &mut Criterion) {
    let unit = TripartiteUnitOption::InchesG.unit();
    let range = PlotRange::new(0.1, 1_000.0, 0.001, 100.0);

    c.bench_function("diagonal_lines_both_families", |b| {
        b.iter(|| {
            for family in [DiagonalFamily::Displacement, DiagonalFamily::Acceleration] {
                let _ = generate_lines(family, black_box(range), &unit, true, 10.0)
                    .expect("valid range");
            }
        })
    });
}

fn bench_measure_pass_2k(c: &mut Criterion) {
    let config = ChartConfig::new(Viewport::new(1600, 900)).with_title("Shock response spectrum");
    let mut chart = TripartiteChart::new(RecordingBackend::new(), config).expect("chart init");

    let points: Vec<DataPoint> = (0..2_000)
        .map(|i| {
            let frequency = 0.1 * 1.005_f64.powi(i);
            let velocity = 1.0 + (f64::from(i) * 0.01).sin().abs() * 40.0;
            DataPoint::new(frequency, velocity)
        })
        .collect();
    let series = LineSeries::new("srs", points).expect("finite points");
    chart.add_series(Box::new(series)).expect("series on axis 0");

    c.bench_function("measure_pass_2k", |b| {
        b.iter(|| {
            chart.measure().expect("measure should succeed");
            chart.backend_mut().finish_animations();
            let _ = black_box(chart.complete_transitions());
        })
    });
}

criterion_group!(
    benches,
    bench_log_steps_six_decades,
    bench_diagonal_lines_both_families,
    bench_measure_pass_2k
);
criterion_main!(benches);

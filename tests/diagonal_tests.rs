use proptest::prelude::*;
use tripartite_rs::core::{
    AxisBounds, AxisOrientation, AxisScaler, AxisSpec, DataPoint, DiagonalFamily, DiagonalLine,
    LABEL_PADDING_PX, PlotRange, Point, Rect, Size, TripartiteUnitOption, acceleration,
    displacement, generate_acceleration_lines, generate_displacement_lines,
    generate_displacement_reciprocal_lines, generate_lines, place_label,
};

fn assert_inside(lines: &[DiagonalLine], range: PlotRange) {
    let tolerance = 1e-9;
    for line in lines {
        for point in [line.start, line.end] {
            assert!(
                point.x >= range.min_f * (1.0 - tolerance)
                    && point.x <= range.max_f * (1.0 + tolerance)
                    && point.y >= range.min_v * (1.0 - tolerance)
                    && point.y <= range.max_v * (1.0 + tolerance),
                "line {} leaves the plot range at ({}, {})",
                line.value,
                point.x,
                point.y
            );
        }
        assert_ne!(line.start, line.end);
    }
}

#[test]
fn displacement_lines_stay_inside_the_plot_rectangle() {
    let unit = TripartiteUnitOption::InchesG.unit();
    let range = PlotRange::new(0.1, 1000.0, 0.001, 10.0);

    let lines = generate_displacement_lines(0.1, 1000.0, 0.001, 10.0, &unit, true, 10.0)
        .expect("valid range");

    assert!(!lines.is_empty());
    assert_inside(&lines, range);
    assert!(lines.iter().all(|line| line.family == DiagonalFamily::Displacement));

    let min_displacement = displacement(1000.0, 0.001, &unit);
    let max_displacement = displacement(0.1, 10.0, &unit);
    let labeled_decade = lines.iter().find(|line| {
        let exponent = line.value.log10();
        line.label.is_some()
            && (exponent - exponent.round()).abs() < 1e-9
            && line.value > min_displacement
            && line.value < max_displacement
    });
    let labeled_decade = labeled_decade.expect("a labeled displacement decade");
    let label = labeled_decade.label.as_deref().unwrap_or_default();
    assert!(label.ends_with(" in."), "unexpected label {label}");
}

#[test]
fn acceleration_lines_fall_with_frequency() {
    let unit = TripartiteUnitOption::MetersPerSecondSquared.unit();
    let range = PlotRange::new(1.0, 100.0, 0.01, 1.0);

    let lines =
        generate_acceleration_lines(1.0, 100.0, 0.01, 1.0, &unit, false, 10.0).expect("valid");

    assert!(!lines.is_empty());
    assert_inside(&lines, range);
    for line in &lines {
        assert!(line.start.x < line.end.x);
        assert!(line.start.y > line.end.y);
        let start_value = acceleration(line.start.x, line.start.y, &unit);
        assert!((start_value - line.value).abs() <= line.value * 1e-6);
    }
}

#[test]
fn period_axis_flips_displacement_slope() {
    let unit = TripartiteUnitOption::InchesGPeriod.unit();
    let lines = generate_displacement_reciprocal_lines(0.01, 10.0, 0.1, 100.0, &unit, false, 10.0)
        .expect("valid range");

    assert!(!lines.is_empty());
    for line in &lines {
        assert!(line.start.y > line.end.y);
    }
}

#[test]
fn invalid_ranges_are_rejected() {
    let unit = TripartiteUnitOption::InchesG.unit();
    assert!(generate_displacement_lines(0.0, 10.0, 0.1, 1.0, &unit, false, 10.0).is_err());
    assert!(generate_displacement_lines(10.0, 1.0, 0.1, 1.0, &unit, false, 10.0).is_err());
    assert!(generate_displacement_lines(1.0, 10.0, 1.0, 1.0, &unit, false, 10.0).is_err());
}

#[test]
fn labels_near_the_edges_or_the_center_are_suppressed() {
    let margin = Rect::new(Point::new(0.0, 0.0), Size::new(1000.0, 1000.0));
    let x_spec = AxisSpec::new(AxisOrientation::X);
    let y_spec = AxisSpec::new(AxisOrientation::Y);
    let x = AxisScaler::new(margin.origin, margin.size, &x_spec, AxisBounds::new(0.0, 1000.0))
        .expect("x scaler");
    let y = AxisScaler::new(margin.origin, margin.size, &y_spec, AxisBounds::new(0.0, 1000.0))
        .expect("y scaler");
    let line = |start: (f64, f64), end: (f64, f64)| DiagonalLine {
        family: DiagonalFamily::Displacement,
        value: 1.0,
        start: DataPoint::new(start.0, start.1),
        end: DataPoint::new(end.0, end.1),
        label: Some("1 in.".to_owned()),
    };

    let through_center = line((0.0, 0.0), (1000.0, 1000.0));
    assert!(place_label(&through_center, &x, &y, margin).is_none());

    let hugging_edge = line((0.0, 5.0), (10.0, 5.0));
    assert!(place_label(&hugging_edge, &x, &y, margin).is_none());

    let clear = line((100.0, 200.0), (300.0, 400.0));
    let placement = place_label(&clear, &x, &y, margin).expect("label placed");
    assert!((placement.position.x - 200.0).abs() < 1e-3);
    assert!((placement.position.y - 700.0).abs() < 1e-3);
    assert!((placement.rotation_deg + 45.0).abs() < 1e-3);
    assert!(placement.position.x > LABEL_PADDING_PX);
}

proptest! {
    #[test]
    fn generated_lines_never_leave_the_range(
        min_f in 0.01f64..100.0,
        f_ratio in 1.5f64..1e4,
        min_v in 0.001f64..10.0,
        v_ratio in 1.5f64..1e4,
        option_index in 0usize..12,
        acceleration_family in any::<bool>(),
        with_subseparators in any::<bool>()
    ) {
        let unit = TripartiteUnitOption::ALL[option_index].unit();
        let range = PlotRange::new(min_f, min_f * f_ratio, min_v, min_v * v_ratio);
        let family = if acceleration_family {
            DiagonalFamily::Acceleration
        } else {
            DiagonalFamily::Displacement
        };

        let lines = generate_lines(family, range, &unit, with_subseparators, 10.0)
            .expect("valid range");

        let tolerance = 1e-9;
        for line in &lines {
            prop_assert!(line.start != line.end);
            for point in [line.start, line.end] {
                prop_assert!(point.x >= range.min_f * (1.0 - tolerance));
                prop_assert!(point.x <= range.max_f * (1.0 + tolerance));
                prop_assert!(point.y >= range.min_v * (1.0 - tolerance));
                prop_assert!(point.y <= range.max_v * (1.0 + tolerance));
            }
        }
    }
}

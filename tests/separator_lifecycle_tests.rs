use tripartite_rs::api::{
    AxisConfig, ChartConfig, LabelFormatError, Labeler, SeparatorKey, SeparatorState,
    TripartiteChart, VisualSeparator,
};
use tripartite_rs::core::{AxisOrientation, AxisSpec, Viewport};
use tripartite_rs::render::{CanvasLayerKind, RecordingBackend};
use tripartite_rs::ChartError;

fn linear_chart(x_spec: AxisSpec) -> TripartiteChart<RecordingBackend> {
    let y_spec = AxisSpec::new(AxisOrientation::Y).with_limits(Some(0.0), Some(10.0));
    let config = ChartConfig::new(Viewport::new(800, 600))
        .with_x_axes(vec![AxisConfig::new(x_spec)])
        .with_y_axes(vec![AxisConfig::new(y_spec)])
        .with_diagonal_axes(Vec::new());
    TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart")
}

fn stepped_x(min: f64, max: f64) -> AxisSpec {
    AxisSpec::new(AxisOrientation::X)
        .with_step(Some(1.0))
        .with_limits(Some(min), Some(max))
}

fn x_separator(chart: &TripartiteChart<RecordingBackend>, value: f64) -> Option<VisualSeparator> {
    chart.x_axes()[0]
        .separators(chart.id())
        .and_then(|separators| separators.get(&SeparatorKey::for_value(value)))
        .cloned()
}

#[test]
fn separator_absent_from_next_pass_fades_then_disappears() {
    let mut chart = linear_chart(stepped_x(0.0, 10.0));
    chart.measure().expect("first pass");

    let separator = x_separator(&chart, 8.0).expect("8 measured");
    assert_eq!(separator.state, SeparatorState::Active);
    let line = separator.line.expect("grid line");

    chart.set_x_limits(0, Some(0.0), Some(5.0)).expect("x axis");
    chart.measure().expect("second pass");

    let fading = x_separator(&chart, 8.0).expect("8 still tracked");
    assert_eq!(fading.state, SeparatorState::FadingOut);
    assert!(chart.backend().is_pending_removal(line.into()));
    assert_eq!(chart.backend().line_target(line).map(|line| line.opacity), Some(0.0));
    assert_eq!(
        x_separator(&chart, 3.0).map(|separator| separator.state),
        Some(SeparatorState::Active)
    );

    chart.backend_mut().finish_animations();
    assert_eq!(chart.complete_transitions(), 5);
    assert!(x_separator(&chart, 8.0).is_none());
    assert!(!chart.backend().is_alive(line.into()));
}

#[test]
fn fading_separator_is_revived_with_fresh_geometry() {
    let mut chart = linear_chart(stepped_x(0.0, 10.0));
    chart.measure().expect("first pass");
    let old_line = x_separator(&chart, 8.0).and_then(|s| s.line).expect("line");

    chart.set_x_limits(0, Some(0.0), Some(5.0)).expect("x axis");
    chart.measure().expect("second pass");
    chart.set_x_limits(0, Some(0.0), Some(10.0)).expect("x axis");
    chart.measure().expect("third pass");

    let revived = x_separator(&chart, 8.0).expect("8 tracked");
    assert_eq!(revived.state, SeparatorState::Active);
    let new_line = revived.line.expect("line");
    assert_ne!(new_line, old_line);
    assert!(!chart.backend().is_alive(old_line.into()));
    assert!(!chart.backend().is_pending_removal(new_line.into()));
}

#[test]
fn first_pass_appears_at_full_opacity_and_later_ones_fade_in() {
    let mut chart = linear_chart(stepped_x(0.0, 10.0));
    chart.measure().expect("first pass");
    let first = x_separator(&chart, 4.0).and_then(|s| s.line).expect("line");
    assert_eq!(chart.backend().line(first).map(|line| line.opacity), Some(1.0));

    chart.set_x_limits(0, Some(0.0), Some(20.0)).expect("x axis");
    chart.measure().expect("second pass");
    let added = x_separator(&chart, 15.0).and_then(|s| s.line).expect("line");
    assert_eq!(chart.backend().line(added).map(|line| line.opacity), Some(0.0));
    assert_eq!(chart.backend().line_target(added).map(|line| line.opacity), Some(1.0));

    chart.backend_mut().finish_animations();
    assert_eq!(chart.backend().line(added).map(|line| line.opacity), Some(1.0));
}

#[test]
fn zero_step_over_a_huge_range_is_rejected() {
    let spec = AxisSpec::new(AxisOrientation::X)
        .with_step(Some(0.0))
        .with_limits(Some(0.0), Some(1e9));
    let mut chart = linear_chart(spec);

    let err = chart.measure().expect_err("runaway enumeration");
    assert!(matches!(
        err,
        ChartError::ExcessiveSeparators {
            orientation: AxisOrientation::X,
            ..
        }
    ));
    assert!(chart.x_axes()[0].separators(chart.id()).is_none());
}

#[test]
fn snapped_separator_below_the_range_is_not_labeled() {
    let spec = AxisSpec::new(AxisOrientation::X)
        .with_step(Some(0.5))
        .with_limits(Some(0.3), Some(2.0));
    let mut chart = linear_chart(spec);
    chart.measure().expect("pass");

    let below = x_separator(&chart, 0.0).expect("snapped start tracked");
    assert!(!below.is_labeled);
    assert!(below.label.is_none());
    assert!(below.line.is_some());

    let first_in_range = x_separator(&chart, 0.5).expect("0.5 tracked");
    assert!(first_in_range.is_labeled);
    let label = first_in_range.label.expect("label");
    let text = chart.backend().label(label).map(|label| label.text.clone());
    assert_eq!(text.as_deref(), Some("0.5"));

    let margin = chart.draw_margin();
    assert!(
        chart
            .backend()
            .labels_on(CanvasLayerKind::AxisLabels)
            .iter()
            .filter(|label| label.position.y > margin.bottom())
            .all(|label| label.position.x >= margin.left() - 1.0)
    );
}

#[test]
fn failing_labeler_leaves_an_empty_label() {
    let mut chart = linear_chart(stepped_x(0.0, 10.0));
    chart
        .x_axis_mut(0)
        .expect("x axis")
        .set_labeler(Labeler::custom(|value| {
            if value == 5.0 {
                Err(LabelFormatError("no label for five".to_owned()))
            } else {
                Ok(format!("{value} Hz"))
            }
        }));
    chart.measure().expect("labeler failures are recovered");

    let label_text = |value: f64| {
        x_separator(&chart, value)
            .and_then(|separator| separator.label)
            .and_then(|label| chart.backend().label_target(label))
            .map(|label| label.text.clone())
    };
    assert_eq!(label_text(5.0).as_deref(), Some(""));
    assert_eq!(label_text(4.0).as_deref(), Some("4 Hz"));
}

#[test]
fn custom_separators_replace_the_step() {
    let spec = AxisSpec::new(AxisOrientation::X)
        .with_limits(Some(0.0), Some(10.0))
        .with_custom_separators(Some(vec![1.0, 2.5, 7.0]));
    let mut chart = linear_chart(spec);
    chart.x_axis_mut(0).expect("x axis").set_labeler(Labeler::list([
        "zero", "one", "two", "three", "four", "five", "six", "seven",
    ]));
    chart.measure().expect("pass");

    let separators = chart.x_axes()[0].separators(chart.id()).expect("tracked");
    let values: Vec<f64> = separators.values().map(|separator| separator.value).collect();
    assert_eq!(values, vec![1.0, 2.5, 7.0]);

    let texts: Vec<String> = chart
        .backend()
        .labels_on(CanvasLayerKind::AxisLabels)
        .into_iter()
        .map(|label| label.text.clone())
        .collect();
    assert!(texts.contains(&"one".to_owned()));
    assert!(texts.contains(&"seven".to_owned()));
}

#[test]
fn hidden_axis_fades_every_separator() {
    let mut chart = linear_chart(stepped_x(0.0, 10.0));
    chart.measure().expect("first pass");

    chart.x_axis_mut(0).expect("x axis").set_visible(false);
    chart.measure().expect("second pass");

    let separators = chart.x_axes()[0].separators(chart.id()).expect("tracked");
    assert!(!separators.is_empty());
    assert!(
        separators
            .values()
            .all(|separator| separator.state == SeparatorState::FadingOut)
    );
}

#[test]
fn releasing_the_chart_drops_all_geometry() {
    let config = ChartConfig::new(Viewport::new(900, 700)).with_title("Shock response");
    let mut chart = TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart");
    chart.measure().expect("pass");
    assert!(chart.backend().line_count() > 0);
    assert!(chart.backend().label_count() > 0);

    let backend = chart.into_backend();
    assert_eq!(backend.line_count(), 0);
    assert_eq!(backend.label_count(), 0);
}

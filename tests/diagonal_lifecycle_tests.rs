use tripartite_rs::api::{
    AxisConfig, ChartConfig, DrawMarginOverride, MeasureContext, SeparatorKey, SeparatorMap,
    SeparatorState, TripartiteChart,
};
use tripartite_rs::core::{AxisOrientation, AxisSpec, Viewport};
use tripartite_rs::render::{CanvasLayerKind, RecordingBackend};

const FAMILIES: [AxisOrientation; 2] = [
    AxisOrientation::Displacement,
    AxisOrientation::Acceleration,
];

fn log_axis(orientation: AxisOrientation, min: f64, max: f64) -> AxisConfig {
    AxisConfig::new(AxisSpec::logarithmic(orientation, 10.0).with_limits(Some(min), Some(max)))
}

fn log_chart(config: ChartConfig) -> TripartiteChart<RecordingBackend> {
    let config = config
        .with_x_axes(vec![log_axis(AxisOrientation::X, 1.0, 100.0)])
        .with_y_axes(vec![log_axis(AxisOrientation::Y, 1.0, 100.0)]);
    TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart")
}

fn diagonal_separators(
    chart: &TripartiteChart<RecordingBackend>,
    orientation: AxisOrientation,
) -> SeparatorMap {
    chart
        .diagonal_axis(orientation)
        .expect("diagonal family configured")
        .separators(chart.id())
        .cloned()
        .unwrap_or_default()
}

fn count_in_state(chart: &TripartiteChart<RecordingBackend>, state: SeparatorState) -> usize {
    FAMILIES
        .iter()
        .map(|family| {
            diagonal_separators(chart, *family)
                .values()
                .filter(|separator| separator.state == state)
                .count()
        })
        .sum()
}

#[test]
fn default_chart_draws_both_diagonal_families() {
    let mut chart = log_chart(ChartConfig::new(Viewport::new(900, 700)));
    chart.measure().expect("pass");

    assert!(!chart.backend().lines_on(CanvasLayerKind::Diagonals).is_empty());
    assert!(
        chart
            .backend()
            .labels_on(CanvasLayerKind::DiagonalLabels)
            .iter()
            .any(|label| !label.text.is_empty())
    );
    for family in FAMILIES {
        let axis = chart.diagonal_axis(family).expect("family configured");
        let tracked = axis.separators(chart.id()).map_or(0, SeparatorMap::len);
        assert!(tracked > 0);
        assert!(tracked <= axis.lines(chart.id()).len());
    }
}

#[test]
fn narrowed_range_keeps_shared_diagonals_and_fades_the_rest() {
    let mut chart = log_chart(ChartConfig::new(Viewport::new(900, 700)));
    chart.measure().expect("first pass");
    let before = diagonal_separators(&chart, AxisOrientation::Displacement);
    assert_eq!(count_in_state(&chart, SeparatorState::FadingOut), 0);

    chart.set_x_limits(0, Some(10.0), Some(100.0)).expect("x axis");
    chart.set_y_limits(0, Some(10.0), Some(100.0)).expect("y axis");
    chart.measure().expect("second pass");

    let after = diagonal_separators(&chart, AxisOrientation::Displacement);
    let shared: Vec<_> = after
        .iter()
        .filter(|(_, separator)| separator.state == SeparatorState::Active)
        .filter_map(|(key, separator)| before.get(key).map(|previous| (previous, separator)))
        .collect();
    assert!(!shared.is_empty());
    // Geometry is rebuilt only when a line gains or loses its label.
    for (previous, current) in &shared {
        if previous.label.is_some() == current.label.is_some() {
            assert_eq!(previous.line, current.line);
        }
    }

    let fading: Vec<_> = FAMILIES
        .iter()
        .flat_map(|family| diagonal_separators(&chart, *family).into_values())
        .filter(|separator| separator.state == SeparatorState::FadingOut)
        .collect();
    assert!(!fading.is_empty());
    for separator in &fading {
        let line = separator.line.expect("diagonal line");
        assert!(chart.backend().is_pending_removal(line.into()));
        assert_eq!(
            chart.backend().line_target(line).map(|line| line.opacity),
            Some(0.0)
        );
    }

    chart.backend_mut().finish_animations();
    assert!(chart.complete_transitions() >= fading.len());
    assert_eq!(count_in_state(&chart, SeparatorState::FadingOut), 0);
    for separator in &fading {
        let line = separator.line.expect("diagonal line");
        assert!(!chart.backend().is_alive(line.into()));
    }
}

#[test]
fn hidden_diagonal_family_fades_all_of_its_lines() {
    let mut chart = log_chart(ChartConfig::new(Viewport::new(900, 700)));
    chart.measure().expect("first pass");
    assert!(!diagonal_separators(&chart, AxisOrientation::Acceleration).is_empty());

    chart
        .diagonal_axis_mut(AxisOrientation::Acceleration)
        .expect("acceleration family")
        .set_visible(false);
    chart.measure().expect("second pass");

    let hidden = diagonal_separators(&chart, AxisOrientation::Acceleration);
    assert!(
        hidden
            .values()
            .all(|separator| separator.state == SeparatorState::FadingOut)
    );
    assert!(
        diagonal_separators(&chart, AxisOrientation::Displacement)
            .values()
            .all(|separator| separator.state == SeparatorState::Active)
    );
}

#[test]
fn range_without_positive_frequencies_fades_every_diagonal() {
    let config = ChartConfig::new(Viewport::new(900, 700))
        .with_x_axes(vec![AxisConfig::new(
            AxisSpec::new(AxisOrientation::X).with_limits(Some(1.0), Some(100.0)),
        )])
        .with_y_axes(vec![log_axis(AxisOrientation::Y, 1.0, 100.0)]);
    let mut chart = TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart");
    chart.measure().expect("first pass");
    assert!(count_in_state(&chart, SeparatorState::Active) > 0);

    chart.set_x_limits(0, Some(-10.0), Some(-1.0)).expect("x axis");
    chart.measure().expect("invalid diagonal range is skipped, not fatal");

    assert_eq!(count_in_state(&chart, SeparatorState::Active), 0);
    assert!(count_in_state(&chart, SeparatorState::FadingOut) > 0);
    for family in FAMILIES {
        let axis = chart.diagonal_axis(family).expect("family configured");
        assert!(axis.lines(chart.id()).is_empty());
    }
}

#[test]
fn margin_reserves_axis_labels_but_not_diagonal_labels() {
    let mut chart = log_chart(ChartConfig::new(Viewport::new(900, 700)));
    chart.measure().expect("pass");
    let mut bare =
        log_chart(ChartConfig::new(Viewport::new(900, 700)).with_diagonal_axes(Vec::new()));
    bare.measure().expect("pass");

    let ctx = MeasureContext::provisional(chart.id(), chart.viewport().size());
    let y_axis = &chart.y_axes()[0];
    let y_labels = y_axis
        .get_possible_size(&ctx, chart.backend())
        .expect("log labels");
    let y_name = y_axis.get_name_size(chart.backend());
    assert!(y_labels.width > 0.0);

    let margin = chart.draw_margin();
    assert!(margin.left() + 1e-3 >= y_labels.width + y_name.width);

    let x_labels = chart.x_axes()[0]
        .get_possible_size(&ctx, chart.backend())
        .expect("log labels");
    let reserved_bottom = chart.viewport().size().height - margin.bottom();
    assert!(reserved_bottom + 1e-3 >= x_labels.height);

    assert_eq!(margin, bare.draw_margin());
}

#[test]
fn log_axis_sub_steps_draw_lines_without_labels() {
    let config = ChartConfig::new(Viewport::new(900, 700))
        .with_x_axes(vec![log_axis(AxisOrientation::X, 0.1, 1000.0)])
        .with_y_axes(vec![log_axis(AxisOrientation::Y, 1.0, 100.0)]);
    let mut chart = TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart");
    chart.measure().expect("pass");

    let separators = chart.x_axes()[0].separators(chart.id()).expect("tracked");
    let (labeled, unlabeled): (Vec<_>, Vec<_>) =
        separators.values().partition(|separator| separator.is_labeled);
    assert_eq!(labeled.len(), 6);
    assert_eq!(unlabeled.len(), 5);
    assert!(unlabeled.iter().all(|separator| {
        separator.label.is_none() && separator.line.is_some() && separator.value < 1.0
    }));

    let half = separators
        .get(&SeparatorKey::for_value(0.5))
        .expect("half step below the first decade");
    assert!(!half.is_labeled);
    let sixth = separators
        .get(&SeparatorKey::for_value(1.0 / 6.0))
        .expect("first sub-step");
    assert!(sixth.label.is_none());

    let decade = separators
        .get(&SeparatorKey::for_value(1.0))
        .and_then(|separator| separator.label)
        .expect("labeled decade");
    let text = chart.backend().label(decade).map(|label| label.text.clone());
    assert_eq!(text.as_deref(), Some("1"));
}

#[test]
fn collapsed_draw_margin_fades_every_separator() {
    let mut chart = log_chart(ChartConfig::new(Viewport::new(900, 700)).with_draw_margin(
        DrawMarginOverride {
            left: Some(400.0),
            ..DrawMarginOverride::default()
        },
    ));
    chart.measure().expect("first pass");
    assert!(count_in_state(&chart, SeparatorState::Active) > 0);

    chart.set_viewport(Viewport::new(300, 700)).expect("viewport");
    chart.measure().expect("collapsed pass");
    assert!(chart.draw_margin().is_empty());

    let x_separators = chart.x_axes()[0].separators(chart.id()).expect("tracked");
    let y_separators = chart.y_axes()[0].separators(chart.id()).expect("tracked");
    assert!(!x_separators.is_empty());
    assert!(
        x_separators
            .values()
            .chain(y_separators.values())
            .all(|separator| separator.state == SeparatorState::FadingOut)
    );
    assert_eq!(count_in_state(&chart, SeparatorState::Active), 0);
    assert!(count_in_state(&chart, SeparatorState::FadingOut) > 0);

    chart.backend_mut().finish_animations();
    chart.complete_transitions();
    assert!(chart.backend().lines_on(CanvasLayerKind::Separators).is_empty());
    assert!(chart.backend().lines_on(CanvasLayerKind::Diagonals).is_empty());
}

use tripartite_rs::api::{ChartConfig, TripartiteChart};
use tripartite_rs::core::{Point, Rect, Size, Viewport};
use tripartite_rs::render::{
    CanvasLayerKind, Color, LinePrimitive, RecordingBackend, RectPrimitive, RenderFrame,
    SceneSnapshot,
};
use tripartite_rs::ChartError;

#[test]
fn faded_color_scales_only_alpha() {
    let color = Color::rgba(0.5, 0.5, 0.5, 0.6).faded(0.5);
    assert_eq!((color.red, color.green, color.blue), (0.5, 0.5, 0.5));
    assert!((color.alpha - 0.3).abs() < 1e-6);
    assert_eq!(Color::rgb(0.1, 0.2, 0.3).faded(4.0).alpha, 1.0);
}

#[test]
fn frame_with_non_finite_geometry_is_rejected() {
    let line = LinePrimitive::new(
        Point::new(0.0, 0.0),
        Point::new(f32::NAN, 10.0),
        1.0,
        Color::rgb(0.0, 0.0, 0.0),
    );
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    frame.lines.push(line);
    assert!(matches!(frame.validate(), Err(ChartError::InvalidData(_))));

    let zoom_box = RectPrimitive::new(
        Rect::new(Point::new(10.0, 10.0), Size::new(-5.0, 20.0)),
        Color::rgba(0.25, 0.45, 0.85, 0.2),
    );
    let frame = RenderFrame::new(Viewport::new(200, 100)).with_rect(zoom_box);
    assert!(frame.validate().is_err());
}

#[test]
fn snapshot_skips_invisible_and_empty_geometry() {
    let config = ChartConfig::new(Viewport::new(900, 700)).with_title("Shock response");
    let mut chart = TripartiteChart::new(RecordingBackend::new(), config).expect("valid chart");
    chart.measure().expect("pass");

    let frame = chart.backend().snapshot(chart.viewport());
    frame.validate().expect("measured scene is drawable");
    assert!(!frame.lines.is_empty());
    assert!(frame.texts.iter().all(|text| !text.text.is_empty()));

    let title = frame
        .texts
        .iter()
        .find(|text| text.text == "Shock response")
        .expect("title drawn");
    assert!((title.anchor.x - 450.0).abs() < 1e-3);

    let visible_separators = chart
        .backend()
        .lines_on(CanvasLayerKind::Separators)
        .into_iter()
        .filter(|line| line.opacity > 0.0)
        .count();
    assert!(frame.lines.len() >= visible_separators);
}

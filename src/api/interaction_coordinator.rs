use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    DataPoint, Point, Rect, format_number, formatted_acceleration, formatted_displacement,
};
use crate::error::ChartResult;
use crate::interaction::{CrosshairSnap, ZoomBoxRelease, ZoomMode};
use crate::render::{CanvasLayerKind, GeometryBackend, TextHAlign};

use super::axis::TripartiteAxis;
use super::engine::{CrosshairGeometry, TripartiteChart};
use super::series::{ChartPoint, SeriesScalers};

const CROSSHAIR_LABEL_OFFSET_PX: f32 = 8.0;

/// Values under the crosshair in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairReadout {
    pub pointer: Point,
    /// Snapped series point when a snap is active, else the scaled pointer.
    pub data: DataPoint,
    pub is_snapped: bool,
    /// Displacement through `data`, with its unit.
    pub displacement: String,
    pub acceleration: String,
}

pub(super) struct InteractionCoordinator;

impl InteractionCoordinator {
    pub(super) fn pointer_down<B: GeometryBackend>(
        chart: &mut TripartiteChart<B>,
        point: Point,
    ) -> bool {
        if chart.zoom_mode == ZoomMode::None || !chart.draw_margin.contains(point) {
            trace!(x = point.x, y = point.y, "pointer down ignored");
            return false;
        }
        chart.interaction.begin_zoom_box(point);
        true
    }

    pub(super) fn pointer_move<B: GeometryBackend>(
        chart: &mut TripartiteChart<B>,
        point: Point,
    ) -> ChartResult<()> {
        let margin = chart.draw_margin;
        if margin.is_empty() {
            Self::pointer_leave(chart);
            return Ok(());
        }

        if !margin.contains(point) {
            if chart.interaction.zoom_box().is_some() {
                chart.interaction.on_pointer_move(clamp_to(margin, point));
            }
            Self::pointer_leave(chart);
            return Ok(());
        }

        chart.interaction.on_pointer_move(point);
        let snap_enabled = chart
            .x_axes
            .iter()
            .chain(chart.y_axes.iter())
            .any(|axis| axis.config.crosshair_snap_enabled);
        let snap = if snap_enabled {
            Self::find_snap(chart, point)?
        } else {
            None
        };
        chart.interaction.set_crosshair_snap(snap);
        Self::update_crosshair_geometry(chart);
        Ok(())
    }

    pub(super) fn pointer_up<B: GeometryBackend>(
        chart: &mut TripartiteChart<B>,
        point: Point,
    ) -> ChartResult<ZoomBoxRelease> {
        let release = chart
            .interaction
            .on_pointer_up(clamp_to(chart.draw_margin, point));
        if let ZoomBoxRelease::Commit(rect) = release {
            Self::commit_zoom(chart, rect)?;
            chart.measure()?;
        }
        debug!(?release, "zoom box released");
        Ok(release)
    }

    pub(super) fn pointer_leave<B: GeometryBackend>(chart: &mut TripartiteChart<B>) {
        chart.interaction.on_pointer_leave();
        Self::release_crosshair(chart);
    }

    pub(super) fn crosshair_readout<B: GeometryBackend>(
        chart: &TripartiteChart<B>,
    ) -> Option<CrosshairReadout> {
        let crosshair = chart.interaction.crosshair();
        if !crosshair.is_tracking() {
            return None;
        }
        let data = match crosshair.snap {
            Some(snap) => snap.data,
            None => chart.scale_ui_point(crosshair.pointer, 0, 0).ok()?,
        };
        Some(CrosshairReadout {
            pointer: crosshair.pointer,
            data,
            is_snapped: crosshair.snap.is_some(),
            displacement: formatted_displacement(data.x, data.y, &chart.unit),
            acceleration: formatted_acceleration(data.x, data.y, &chart.unit),
        })
    }

    pub(super) fn zoom_box<B: GeometryBackend>(chart: &TripartiteChart<B>) -> Option<Rect> {
        let rect = chart.interaction.zoom_box()?;
        let margin = chart.draw_margin;
        let (left, right) = if chart.zoom_mode.zooms_x() {
            (rect.left(), rect.right())
        } else {
            (margin.left(), margin.right())
        };
        let (top, bottom) = if chart.zoom_mode.zooms_y() {
            (rect.top(), rect.bottom())
        } else {
            (margin.top(), margin.bottom())
        };
        Some(Rect::from_corners(
            Point::new(left, top),
            Point::new(right, bottom),
        ))
    }

    pub(super) fn release_crosshair<B: GeometryBackend>(chart: &mut TripartiteChart<B>) {
        if let Some(geometry) = chart.crosshair_geometry.take() {
            chart.backend.release(geometry.vertical.into());
            chart.backend.release(geometry.horizontal.into());
            chart.backend.release(geometry.label.into());
        }
    }

    /// Turns the released pixel rectangle into limits on every zoomed axis.
    fn commit_zoom<B: GeometryBackend>(chart: &mut TripartiteChart<B>, rect: Rect) -> ChartResult<()> {
        let margin = chart.draw_margin;
        if chart.zoom_mode.zooms_x() {
            for axis in &mut chart.x_axes {
                let scaler = axis.scaler(margin)?;
                let from = scaler.to_chart_values(rect.left());
                let to = scaler.to_chart_values(rect.right());
                zoom_axis(axis, from, to);
            }
        }
        if chart.zoom_mode.zooms_y() {
            for axis in &mut chart.y_axes {
                let scaler = axis.scaler(margin)?;
                let from = scaler.to_chart_values(rect.top());
                let to = scaler.to_chart_values(rect.bottom());
                zoom_axis(axis, from, to);
            }
        }
        Ok(())
    }

    /// Nearest hit point over every visible series.
    fn find_snap<B: GeometryBackend>(
        chart: &TripartiteChart<B>,
        pointer: Point,
    ) -> ChartResult<Option<CrosshairSnap>> {
        let mut best: Option<ChartPoint> = None;
        for series in chart.series.iter().filter(|series| series.is_visible()) {
            let (Some(x_axis), Some(y_axis)) = (
                chart.x_axes.get(series.x_axis_index()),
                chart.y_axes.get(series.y_axis_index()),
            ) else {
                continue;
            };
            let x = x_axis.scaler(chart.draw_margin)?;
            let y = y_axis.scaler(chart.draw_margin)?;
            let hits = series.find_hit_points(SeriesScalers { x: &x, y: &y }, pointer, chart.hit_strategy);
            best = best
                .into_iter()
                .chain(hits)
                .min_by_key(|hit| OrderedFloat(hit.distance_px));
        }
        Ok(best.map(|hit| CrosshairSnap {
            pixel: hit.pixel,
            data: hit.data,
        }))
    }

    fn update_crosshair_geometry<B: GeometryBackend>(chart: &mut TripartiteChart<B>) {
        let crosshair = chart.interaction.crosshair();
        let margin = chart.draw_margin;
        let geometry = *chart
            .crosshair_geometry
            .get_or_insert_with(|| CrosshairGeometry {
                vertical: chart.backend.create_line(CanvasLayerKind::Crosshair),
                horizontal: chart.backend.create_line(CanvasLayerKind::Crosshair),
                label: chart.backend.create_label(CanvasLayerKind::CrosshairLabels),
            });

        let anchor = crosshair.anchor();
        chart.backend.set_line_endpoints(
            geometry.vertical,
            Point::new(anchor.x, margin.top()),
            Point::new(anchor.x, margin.bottom()),
        );
        chart.backend.set_line_endpoints(
            geometry.horizontal,
            Point::new(margin.left(), anchor.y),
            Point::new(margin.right(), anchor.y),
        );

        let text = Self::crosshair_readout(chart)
            .map(|readout| {
                format!(
                    "{} {}, {} {}",
                    format_number(readout.data.x),
                    chart.unit.x_unit,
                    format_number(readout.data.y),
                    chart.unit.y_unit
                )
            })
            .unwrap_or_default();
        chart
            .backend
            .set_label_text(geometry.label, text.trim_end(), chart.theme.crosshair_text_size_px);
        chart.backend.set_label_position(
            geometry.label,
            Point::new(
                anchor.x + CROSSHAIR_LABEL_OFFSET_PX,
                anchor.y - CROSSHAIR_LABEL_OFFSET_PX,
            ),
            TextHAlign::Left,
        );
    }
}

fn clamp_to(margin: Rect, point: Point) -> Point {
    Point::new(
        point.x.clamp(margin.left(), margin.right()),
        point.y.clamp(margin.top(), margin.bottom()),
    )
}

/// Applies a zoom span to one axis, honoring its limits and minimum span.
///
/// A span narrower than the minimum keeps the current width, recentered on
/// the box, when both limits are set; otherwise the axis is left alone.
fn zoom_axis(axis: &mut TripartiteAxis, from: f64, to: f64) {
    let spec = axis.spec();
    let mut min = from.min(to);
    let mut max = from.max(to);
    if let Some(limit) = spec.max_limit {
        max = max.min(limit);
    }
    if let Some(limit) = spec.min_limit {
        min = min.max(limit);
    }

    let min_span = spec
        .min_zoom_delta
        .unwrap_or(axis.data_bounds.min_delta * 3.0);
    if max - min > min_span {
        debug!(orientation = ?spec.orientation, min, max, "zoom committed");
        axis.set_limits(Some(min), Some(max));
    } else if let (Some(low), Some(high)) = (spec.min_limit, spec.max_limit) {
        let correction = ((high - low) - (max - min)) * 0.5;
        debug!(orientation = ?spec.orientation, min, max, correction, "zoom span below minimum");
        axis.set_limits(Some(min - correction), Some(max + correction));
    } else {
        trace!(orientation = ?spec.orientation, span = max - min, min_span, "zoom ignored");
    }
}

use tracing::{debug, trace, warn};

use crate::core::{AxisBounds, AxisPosition, DataPoint, Margin, PlotRange, Point, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::{CanvasLayerKind, GeometryBackend, LayerStack, TextHAlign};

use super::axis::TripartiteAxis;
use super::axis_layout::MeasureContext;
use super::diagonal_separators::{DiagonalContext, generate_family_lines};
use super::engine::TripartiteChart;

pub(super) struct LayoutCoordinator;

/// Distances from the attached control edge, resolved for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisOffsets {
    label: f32,
    name: f32,
}

#[derive(Debug)]
struct MarginPass {
    margin: Margin,
    title_height: f32,
    x_offsets: Vec<AxisOffsets>,
    y_offsets: Vec<AxisOffsets>,
}

impl LayoutCoordinator {
    pub(super) fn measure<B: GeometryBackend>(chart: &mut TripartiteChart<B>) -> ChartResult<()> {
        Self::reset_bounds(chart);

        let pass = Self::resolve_margin(chart)?;
        chart.draw_margin = pass.margin.inner_rect(chart.viewport);
        debug!(
            chart = chart.id.0,
            left = pass.margin.left,
            top = pass.margin.top,
            right = pass.margin.right,
            bottom = pass.margin.bottom,
            "resolved draw margin"
        );

        Self::update_title(chart, pass.title_height);
        if chart.draw_margin.is_empty() {
            Self::fade_everything(chart);
            debug!(chart = chart.id.0, "draw margin collapsed, skipping measure");
            return Ok(());
        }

        for layer in LayerStack::canonical().layers {
            if layer.is_plot_area() {
                chart.backend.set_clip_rectangle(layer, Some(chart.draw_margin));
            }
        }

        let control_size = chart.viewport.size();
        for (axes, offsets) in [
            (&mut chart.x_axes, &pass.x_offsets),
            (&mut chart.y_axes, &pass.y_offsets),
        ] {
            for (axis, offsets) in axes.iter_mut().zip(offsets) {
                let ctx = MeasureContext {
                    chart: chart.id,
                    control_size,
                    draw_margin: chart.draw_margin,
                    label_offset: offsets.label,
                    name_offset: offsets.name,
                    transition: chart.theme.transition,
                };
                axis.measure(&ctx, &mut chart.backend)?;
            }
        }

        Self::measure_diagonals(chart)
    }

    pub(super) fn scale_ui_point<B: GeometryBackend>(
        chart: &TripartiteChart<B>,
        point: Point,
        x_index: usize,
        y_index: usize,
    ) -> ChartResult<DataPoint> {
        let x_axis = chart
            .x_axes
            .get(x_index)
            .ok_or_else(|| ChartError::InvalidData(format!("x axis {x_index} does not exist")))?;
        let y_axis = chart
            .y_axes
            .get(y_index)
            .ok_or_else(|| ChartError::InvalidData(format!("y axis {y_index} does not exist")))?;
        Ok(DataPoint::new(
            x_axis.scaler(chart.draw_margin)?.to_chart_values(point.x),
            y_axis.scaler(chart.draw_margin)?.to_chart_values(point.y),
        ))
    }

    /// Nothing can be placed in a collapsed margin, so whatever the previous
    /// pass drew fades out instead of lingering at stale positions.
    fn fade_everything<B: GeometryBackend>(chart: &mut TripartiteChart<B>) {
        let chart_id = chart.id;
        let mut faded = 0;
        for axis in chart.x_axes.iter_mut().chain(chart.y_axes.iter_mut()) {
            faded += axis.fade_all(chart_id, &mut chart.backend);
        }
        for axis in &mut chart.diagonal_axes {
            axis.separators.fade_all(chart_id, &mut chart.backend);
        }
        trace!(chart = chart_id.0, faded, "faded axis separators of a collapsed margin");
    }

    fn reset_bounds<B: GeometryBackend>(chart: &mut TripartiteChart<B>) {
        let mut x_bounds = vec![AxisBounds::empty(); chart.x_axes.len()];
        let mut y_bounds = vec![AxisBounds::empty(); chart.y_axes.len()];
        for series in chart.series.iter().filter(|series| series.is_visible()) {
            let bounds = series.bounds();
            if let Some(target) = x_bounds.get_mut(series.x_axis_index()) {
                target.append_bounds(bounds.primary);
            }
            if let Some(target) = y_bounds.get_mut(series.y_axis_index()) {
                target.append_bounds(bounds.secondary);
            }
        }

        for (axis, gathered) in chart.x_axes.iter_mut().zip(x_bounds) {
            axis.reset_bounds(gathered);
        }
        for (axis, gathered) in chart.y_axes.iter_mut().zip(y_bounds) {
            axis.reset_bounds(gathered);
        }
    }

    /// Reserves room for the title and for every visible axis, stacking
    /// axes outwards from the draw margin in configuration order.
    fn resolve_margin<B: GeometryBackend>(chart: &TripartiteChart<B>) -> ChartResult<MarginPass> {
        let title_height = Self::title_height(chart);
        let control_size = chart.viewport.size();
        // Label sizes depend on the step, which depends on the margin; the
        // previous margin is close enough for one pass.
        let provisional = MeasureContext {
            draw_margin: if chart.draw_margin.is_empty() {
                MeasureContext::provisional(chart.id, control_size).draw_margin
            } else {
                chart.draw_margin
            },
            ..MeasureContext::provisional(chart.id, control_size)
        };

        let mut reserved = Margin::new(0.0, title_height, 0.0, 0.0);
        let mut floor = Margin::default();

        let mut x_offsets = Vec::with_capacity(chart.x_axes.len());
        for axis in &chart.x_axes {
            let Some((labels, name, tick)) = Self::axis_extent(axis, &provisional, &chart.backend)?
            else {
                x_offsets.push(AxisOffsets::default());
                continue;
            };
            let edge = match axis.spec().position {
                AxisPosition::Start => &mut reserved.bottom,
                AxisPosition::End => &mut reserved.top,
            };
            x_offsets.push(AxisOffsets {
                name: *edge + name.height * 0.5,
                label: *edge + name.height + labels.height * 0.5,
            });
            *edge += labels.height + name.height + tick;
            floor.left = floor.left.max(labels.width * 0.5);
            floor.right = floor.right.max(labels.width * 0.5);
        }

        let mut y_offsets = Vec::with_capacity(chart.y_axes.len());
        for axis in &chart.y_axes {
            let Some((labels, name, tick)) = Self::axis_extent(axis, &provisional, &chart.backend)?
            else {
                y_offsets.push(AxisOffsets::default());
                continue;
            };
            let edge = match axis.spec().position {
                AxisPosition::Start => &mut reserved.left,
                AxisPosition::End => &mut reserved.right,
            };
            y_offsets.push(AxisOffsets {
                name: *edge + name.width * 0.5,
                label: *edge + name.width + labels.width * 0.5,
            });
            *edge += labels.width + name.width + tick;
            floor.top = floor.top.max(labels.height * 0.5);
            floor.bottom = floor.bottom.max(labels.height * 0.5);
        }

        let overrides = chart.draw_margin_override;
        let margin = Margin::new(
            overrides.left.unwrap_or(reserved.left.max(floor.left)),
            overrides.top.unwrap_or(reserved.top.max(floor.top)),
            overrides.right.unwrap_or(reserved.right.max(floor.right)),
            overrides.bottom.unwrap_or(reserved.bottom.max(floor.bottom)),
        );
        trace!(
            title_height,
            reserved_left = reserved.left,
            reserved_top = reserved.top,
            reserved_right = reserved.right,
            reserved_bottom = reserved.bottom,
            "reserved axis margin"
        );

        Ok(MarginPass {
            margin,
            title_height,
            x_offsets,
            y_offsets,
        })
    }

    /// Label box, name box and tick length of a visible axis.
    fn axis_extent<B: GeometryBackend>(
        axis: &TripartiteAxis,
        ctx: &MeasureContext,
        backend: &B,
    ) -> ChartResult<Option<(Size, Size, f32)>> {
        if !axis.config.is_visible {
            return Ok(None);
        }
        let labels = axis.get_possible_size(ctx, backend)?;
        let name = axis.get_name_size(backend);
        let style = &axis.config.style;
        let tick = if style.show_ticks {
            style.tick_length_px
        } else {
            0.0
        };
        Ok(Some((labels, name, tick)))
    }

    fn title_height<B: GeometryBackend>(chart: &TripartiteChart<B>) -> f32 {
        chart
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .map_or(0.0, |title| {
                chart
                    .backend
                    .measure_text(title, chart.theme.title_text_size_px)
                    .height
            })
    }

    fn update_title<B: GeometryBackend>(chart: &mut TripartiteChart<B>, title_height: f32) {
        let Some(title) = chart.title.as_deref().filter(|title| !title.is_empty()) else {
            if let Some(label) = chart.title_label.take() {
                chart.backend.release(label.into());
            }
            return;
        };
        let label = *chart
            .title_label
            .get_or_insert_with(|| chart.backend.create_label(CanvasLayerKind::Title));
        chart
            .backend
            .set_label_text(label, title, chart.theme.title_text_size_px);
        chart.backend.set_label_position(
            label,
            Point::new(chart.viewport.size().width * 0.5, title_height * 0.5),
            TextHAlign::Center,
        );
    }

    /// Diagonals are drawn against the first X and Y axes, the pair that
    /// defines the frequency/pseudo-velocity plane.
    fn measure_diagonals<B: GeometryBackend>(chart: &mut TripartiteChart<B>) -> ChartResult<()> {
        let chart_id = chart.id;
        let (Some(x_axis), Some(y_axis)) = (chart.x_axes.first(), chart.y_axes.first()) else {
            return Ok(());
        };
        let x_scaler = x_axis.scaler(chart.draw_margin)?;
        let y_scaler = y_axis.scaler(chart.draw_margin)?;
        let x_bounds = x_axis.visible_bounds().clamped_positive();
        let y_bounds = y_axis.visible_bounds().clamped_positive();
        let range = PlotRange::new(x_bounds.min, x_bounds.max, y_bounds.min, y_bounds.max);

        let ctx = DiagonalContext {
            chart: chart_id,
            draw_margin: chart.draw_margin,
            x_scaler: &x_scaler,
            y_scaler: &y_scaler,
            transition: chart.theme.transition,
        };

        for axis in &mut chart.diagonal_axes {
            if !axis.config.is_visible {
                axis.separators.fade_all(chart_id, &mut chart.backend);
                continue;
            }
            let family = axis.family()?;
            if let Err(err) = range.validate() {
                warn!(error = %err, ?family, "skipping diagonal family for this pass");
                axis.separators.fade_all(chart_id, &mut chart.backend);
                continue;
            }
            let lines = generate_family_lines(
                family,
                range,
                &chart.unit,
                axis.config.spec.subseparator_count > 0,
                axis.config.spec.log_base.unwrap_or(10.0),
            )?;
            axis.separators
                .measure(&axis.config, lines, &ctx, &mut chart.backend);
        }
        Ok(())
    }
}

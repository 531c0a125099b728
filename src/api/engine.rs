use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::core::{
    AxisOrientation, DataPoint, Point, Rect, TripartiteUnit, TripartiteUnitOption, UnitTable,
    Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CrosshairState, InteractionState, ZoomBoxRelease, ZoomMode};
use crate::render::{
    Color, GeometryBackend, LabelHandle, LineHandle, RectPrimitive, Renderer, SceneSnapshot,
};

use super::axis::TripartiteAxis;
use super::chart_config::{ChartConfig, ChartTheme, DrawMarginOverride, UnitSelection};
use super::diagonal_separators::DiagonalAxis;
use super::interaction_coordinator::{CrosshairReadout, InteractionCoordinator};
use super::layout_coordinator::LayoutCoordinator;
use super::separators::ChartId;
use super::series::{ChartSeries, HitStrategy};

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

const ZOOM_BOX_FILL: Color = Color::rgba(0.25, 0.45, 0.85, 0.2);

/// Crosshair geometry, alive while the pointer tracks inside the margin.
#[derive(Debug, Clone, Copy)]
pub(super) struct CrosshairGeometry {
    pub(super) vertical: LineHandle,
    pub(super) horizontal: LineHandle,
    pub(super) label: LabelHandle,
}

/// Main orchestration facade consumed by host applications.
///
/// `TripartiteChart` owns the axes, series and interaction state of one
/// chart and drives a retained-mode `GeometryBackend`: every `measure` pass
/// recomputes bounds and margins, then updates separator and diagonal
/// geometry in place.
pub struct TripartiteChart<B: GeometryBackend> {
    pub(super) backend: B,
    pub(super) id: ChartId,
    pub(super) viewport: Viewport,
    pub(super) draw_margin_override: DrawMarginOverride,
    pub(super) draw_margin: Rect,
    pub(super) title: Option<String>,
    pub(super) title_label: Option<LabelHandle>,
    pub(super) x_axes: Vec<TripartiteAxis>,
    pub(super) y_axes: Vec<TripartiteAxis>,
    pub(super) diagonal_axes: Vec<DiagonalAxis>,
    pub(super) units: UnitTable,
    pub(super) unit_selection: UnitSelection,
    pub(super) unit: TripartiteUnit,
    pub(super) zoom_mode: ZoomMode,
    pub(super) hit_strategy: HitStrategy,
    pub(super) theme: ChartTheme,
    pub(super) series: Vec<Box<dyn ChartSeries>>,
    pub(super) interaction: InteractionState,
    pub(super) crosshair_geometry: Option<CrosshairGeometry>,
}

impl<B: GeometryBackend> TripartiteChart<B> {
    /// Builds a chart over the standard unit presets.
    pub fn new(backend: B, config: ChartConfig) -> ChartResult<Self> {
        Self::with_units(backend, config, UnitTable::standard())
    }

    /// Builds a chart resolving its unit against `units`.
    pub fn with_units(backend: B, config: ChartConfig, units: UnitTable) -> ChartResult<Self> {
        config.validate()?;
        let unit = config.unit.resolve(&units)?;
        let id = ChartId(NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed));
        debug!(
            chart = id.0,
            width = config.viewport.width,
            height = config.viewport.height,
            x_axes = config.x_axes.len(),
            y_axes = config.y_axes.len(),
            diagonal_axes = config.diagonal_axes.len(),
            "create tripartite chart"
        );

        Ok(Self {
            backend,
            id,
            viewport: config.viewport,
            draw_margin_override: config.draw_margin,
            draw_margin: Rect::new(Point::default(), config.viewport.size()),
            title: config.title,
            title_label: None,
            x_axes: config.x_axes.into_iter().map(TripartiteAxis::new).collect(),
            y_axes: config.y_axes.into_iter().map(TripartiteAxis::new).collect(),
            diagonal_axes: config
                .diagonal_axes
                .into_iter()
                .map(DiagonalAxis::new)
                .collect(),
            units,
            unit_selection: config.unit,
            unit,
            zoom_mode: config.zoom_mode,
            hit_strategy: config.hit_strategy,
            theme: config.theme,
            series: Vec::new(),
            interaction: InteractionState::default(),
            crosshair_geometry: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        viewport.validate()?;
        self.viewport = viewport;
        Ok(())
    }

    /// Draw margin resolved by the latest `measure` pass.
    #[must_use]
    pub fn draw_margin(&self) -> Rect {
        self.draw_margin
    }

    #[must_use]
    pub fn theme(&self) -> ChartTheme {
        self.theme
    }

    #[must_use]
    pub fn unit(&self) -> &TripartiteUnit {
        &self.unit
    }

    #[must_use]
    pub fn unit_selection(&self) -> &UnitSelection {
        &self.unit_selection
    }

    pub fn set_unit(&mut self, option: TripartiteUnitOption) {
        self.unit_selection = UnitSelection::Preset(option);
        self.unit = self.units.preset(option).clone();
    }

    pub fn set_named_unit(&mut self, name: &str) -> ChartResult<()> {
        let selection = UnitSelection::Named(name.to_owned());
        self.unit = selection.resolve(&self.units)?;
        self.unit_selection = selection;
        Ok(())
    }

    #[must_use]
    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn set_zoom_mode(&mut self, zoom_mode: ZoomMode) {
        self.zoom_mode = zoom_mode;
        if zoom_mode == ZoomMode::None {
            self.interaction.cancel_zoom_box();
        }
    }

    #[must_use]
    pub fn x_axes(&self) -> &[TripartiteAxis] {
        &self.x_axes
    }

    #[must_use]
    pub fn y_axes(&self) -> &[TripartiteAxis] {
        &self.y_axes
    }

    #[must_use]
    pub fn diagonal_axes(&self) -> &[DiagonalAxis] {
        &self.diagonal_axes
    }

    #[must_use]
    pub fn x_axis_mut(&mut self, index: usize) -> Option<&mut TripartiteAxis> {
        self.x_axes.get_mut(index)
    }

    #[must_use]
    pub fn y_axis_mut(&mut self, index: usize) -> Option<&mut TripartiteAxis> {
        self.y_axes.get_mut(index)
    }

    /// Diagonal axis drawing the given family, if configured.
    #[must_use]
    pub fn diagonal_axis(&self, orientation: AxisOrientation) -> Option<&DiagonalAxis> {
        self.diagonal_axes
            .iter()
            .find(|axis| axis.config.spec.orientation == orientation)
    }

    #[must_use]
    pub fn diagonal_axis_mut(&mut self, orientation: AxisOrientation) -> Option<&mut DiagonalAxis> {
        self.diagonal_axes
            .iter_mut()
            .find(|axis| axis.config.spec.orientation == orientation)
    }

    /// Adds a series and returns its index.
    pub fn add_series(&mut self, series: Box<dyn ChartSeries>) -> ChartResult<usize> {
        if series.x_axis_index() >= self.x_axes.len() || series.y_axis_index() >= self.y_axes.len()
        {
            return Err(ChartError::InvalidData(format!(
                "series `{}` refers to axes ({}, {}) that do not exist",
                series.name(),
                series.x_axis_index(),
                series.y_axis_index()
            )));
        }
        self.series.push(series);
        debug!(count = self.series.len(), "add series");
        Ok(self.series.len() - 1)
    }

    #[must_use]
    pub fn series(&self) -> &[Box<dyn ChartSeries>] {
        &self.series
    }

    pub fn clear_series(&mut self) {
        self.series.clear();
    }

    /// Sets user limits of an X axis; `None` falls back to the data bounds.
    pub fn set_x_limits(
        &mut self,
        index: usize,
        min_limit: Option<f64>,
        max_limit: Option<f64>,
    ) -> ChartResult<()> {
        let axis = self
            .x_axes
            .get_mut(index)
            .ok_or_else(|| ChartError::InvalidData(format!("x axis {index} does not exist")))?;
        axis.set_limits(min_limit, max_limit);
        Ok(())
    }

    pub fn set_y_limits(
        &mut self,
        index: usize,
        min_limit: Option<f64>,
        max_limit: Option<f64>,
    ) -> ChartResult<()> {
        let axis = self
            .y_axes
            .get_mut(index)
            .ok_or_else(|| ChartError::InvalidData(format!("y axis {index} does not exist")))?;
        axis.set_limits(min_limit, max_limit);
        Ok(())
    }

    /// Runs one full layout pass: bounds, draw margin, axes and diagonals.
    pub fn measure(&mut self) -> ChartResult<()> {
        LayoutCoordinator::measure(self)
    }

    /// Signals that every running transition finished; forgets separators
    /// that were fading out. Returns how many were dropped.
    pub fn complete_transitions(&mut self) -> usize {
        let chart = self.id;
        let removed = self
            .x_axes
            .iter_mut()
            .chain(self.y_axes.iter_mut())
            .map(|axis| axis.complete_fade_out(chart))
            .sum::<usize>()
            + self
                .diagonal_axes
                .iter_mut()
                .map(|axis| axis.separators.complete_fade_out(chart))
                .sum::<usize>();
        debug!(chart = chart.0, removed, "completed transitions");
        removed
    }

    /// Converts a pixel inside the control to data values of the given axes.
    pub fn scale_ui_point(
        &self,
        point: Point,
        x_index: usize,
        y_index: usize,
    ) -> ChartResult<DataPoint> {
        LayoutCoordinator::scale_ui_point(self, point, x_index, y_index)
    }

    pub fn pointer_down(&mut self, point: Point) -> bool {
        InteractionCoordinator::pointer_down(self, point)
    }

    pub fn pointer_move(&mut self, point: Point) -> ChartResult<()> {
        InteractionCoordinator::pointer_move(self, point)
    }

    /// Ends a zoom drag; a committed zoom re-measures the chart.
    pub fn pointer_up(&mut self, point: Point) -> ChartResult<ZoomBoxRelease> {
        InteractionCoordinator::pointer_up(self, point)
    }

    pub fn pointer_leave(&mut self) {
        InteractionCoordinator::pointer_leave(self);
    }

    #[must_use]
    pub fn crosshair(&self) -> CrosshairState {
        self.interaction.crosshair()
    }

    /// Values under the crosshair, snapped when a snap is active.
    #[must_use]
    pub fn crosshair_readout(&self) -> Option<CrosshairReadout> {
        InteractionCoordinator::crosshair_readout(self)
    }

    /// Zoom rectangle being dragged, spanning the whole margin along axes
    /// the zoom mode leaves untouched.
    #[must_use]
    pub fn zoom_box(&self) -> Option<Rect> {
        InteractionCoordinator::zoom_box(self)
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Releases every geometry this chart created and returns the backend.
    #[must_use]
    pub fn into_backend(mut self) -> B {
        self.release_geometry();
        self.backend
    }

    /// Releases every geometry this chart created.
    pub fn release_geometry(&mut self) {
        let chart = self.id;
        for axis in self.x_axes.iter_mut().chain(self.y_axes.iter_mut()) {
            axis.remove_chart(chart, &mut self.backend);
        }
        for axis in &mut self.diagonal_axes {
            axis.separators.remove_chart(chart, &mut self.backend);
        }
        if let Some(label) = self.title_label.take() {
            self.backend.release(label.into());
        }
        InteractionCoordinator::release_crosshair(self);
        debug!(chart = chart.0, "released chart geometry");
    }

    /// Flattens the backend scene, overlays the zoom box and hands the frame
    /// to `renderer`.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()>
    where
        B: SceneSnapshot,
    {
        let mut frame = self.backend.snapshot(self.viewport);
        if let Some(zoom_box) = self.zoom_box() {
            frame = frame.with_rect(RectPrimitive::new(zoom_box, ZOOM_BOX_FILL));
        }
        frame.validate()?;
        renderer.render(&frame)
    }
}

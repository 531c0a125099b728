use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{
    AxisOrientation, AxisScaler, DiagonalFamily, DiagonalLabelPlacement, DiagonalLine, PlotRange,
    Point, Rect, TripartiteUnit, generate_acceleration_lines,
    generate_acceleration_reciprocal_lines, generate_displacement_lines,
    generate_displacement_reciprocal_lines, place_label,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{CanvasLayerKind, GeometryBackend, GeometryHandle, TextHAlign, Transition};

use super::axis::AxisConfig;
use super::separators::{
    ChartId, SeparatorKey, SeparatorMap, SeparatorState, UpdateMode, VisualSeparator, drop_faded,
    fade_unmeasured,
};

/// Pixel frame the diagonal lines of one pass are drawn into.
#[derive(Debug, Clone, Copy)]
pub struct DiagonalContext<'a> {
    pub chart: ChartId,
    pub draw_margin: Rect,
    pub x_scaler: &'a AxisScaler,
    pub y_scaler: &'a AxisScaler,
    pub transition: Transition,
}

#[derive(Debug, Default)]
struct DiagonalState {
    separators: SeparatorMap,
    lines: Vec<DiagonalLine>,
    has_previous_state: bool,
}

type LineGenerator =
    fn(f64, f64, f64, f64, &TripartiteUnit, bool, f64) -> ChartResult<Vec<DiagonalLine>>;

/// Family a diagonal axis draws.
pub fn family_of(orientation: AxisOrientation) -> ChartResult<DiagonalFamily> {
    match orientation {
        AxisOrientation::Displacement => Ok(DiagonalFamily::Displacement),
        AxisOrientation::Acceleration => Ok(DiagonalFamily::Acceleration),
        AxisOrientation::X | AxisOrientation::Y => Err(ChartError::InvalidData(format!(
            "{orientation:?} axis does not draw diagonal lines"
        ))),
    }
}

/// Generates the lines of `family` for the current unit, picking the period
/// variant when the X axis is reciprocal.
pub fn generate_family_lines(
    family: DiagonalFamily,
    range: PlotRange,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    let generate: LineGenerator = match (family, unit.is_x_reciprocal) {
        (DiagonalFamily::Displacement, false) => generate_displacement_lines,
        (DiagonalFamily::Displacement, true) => generate_displacement_reciprocal_lines,
        (DiagonalFamily::Acceleration, false) => generate_acceleration_lines,
        (DiagonalFamily::Acceleration, true) => generate_acceleration_reciprocal_lines,
    };
    generate(
        range.min_f,
        range.max_f,
        range.min_v,
        range.max_v,
        unit,
        has_subseparators,
        log_base,
    )
}

/// Diagonal grid of one family, diffed across passes by line value.
#[derive(Debug, Default)]
pub struct DiagonalSeparators {
    charts: IndexMap<ChartId, DiagonalState>,
}

impl DiagonalSeparators {
    #[must_use]
    pub fn separators(&self, chart: ChartId) -> Option<&SeparatorMap> {
        self.charts.get(&chart).map(|state| &state.separators)
    }

    /// Lines generated by the latest pass on `chart`.
    #[must_use]
    pub fn lines(&self, chart: ChartId) -> &[DiagonalLine] {
        self.charts
            .get(&chart)
            .map(|state| state.lines.as_slice())
            .unwrap_or_default()
    }

    /// Draws `lines`, reusing geometry of values already on screen and
    /// fading out the ones that left.
    pub fn measure<B: GeometryBackend + ?Sized>(
        &mut self,
        config: &AxisConfig,
        lines: Vec<DiagonalLine>,
        ctx: &DiagonalContext<'_>,
        backend: &mut B,
    ) -> usize {
        let state = self.charts.entry(ctx.chart).or_default();
        let mut measured = IndexSet::with_capacity(lines.len());
        let mut labeled = 0;

        for line in &lines {
            let key = SeparatorKey::for_value(line.value);
            if !measured.insert(key.clone()) {
                continue;
            }

            let start = Point::new(
                ctx.x_scaler.to_pixels(line.start.x),
                ctx.y_scaler.to_pixels(line.start.y),
            );
            let end = Point::new(
                ctx.x_scaler.to_pixels(line.end.x),
                ctx.y_scaler.to_pixels(line.end.y),
            );
            let placement = line
                .label
                .as_ref()
                .and_then(|_| place_label(line, ctx.x_scaler, ctx.y_scaler, ctx.draw_margin));

            let (separator, created) =
                resolve_diagonal(&mut state.separators, key, line, backend);
            let drawn = DrawnDiagonal {
                start,
                end,
                label: placement.zip(line.label.as_deref()),
            };
            if created {
                // Diagonals have no previous position to grow from, so new
                // ones fade in where they land.
                drawn.apply(separator, config.style.text_size_px, backend);
                for geometry in separator.geometries().collect::<SmallVec<[GeometryHandle; 2]>>() {
                    UpdateMode::UpdateAndComplete {
                        has_previous_state: state.has_previous_state,
                    }
                    .apply(backend, geometry);
                }
                separator.animate_all(backend, ctx.transition);
            }

            drawn.apply(separator, config.style.text_size_px, backend);
            if drawn.label.is_some() {
                labeled += 1;
            }
            for geometry in separator.geometries().collect::<SmallVec<[GeometryHandle; 2]>>() {
                UpdateMode::Update.apply(backend, geometry);
            }
        }

        let faded = fade_unmeasured(&mut state.separators, &measured, backend);
        state.lines = lines;
        state.has_previous_state = true;
        debug!(
            chart = ctx.chart.0,
            orientation = ?config.spec.orientation,
            lines = measured.len(),
            labeled,
            faded,
            "measured diagonal separators"
        );
        measured.len()
    }

    /// Fades every line of `chart`, used while the family cannot be drawn.
    pub fn fade_all<B: GeometryBackend + ?Sized>(&mut self, chart: ChartId, backend: &mut B) {
        if let Some(state) = self.charts.get_mut(&chart) {
            let faded = fade_unmeasured(&mut state.separators, &IndexSet::new(), backend);
            state.lines.clear();
            trace!(chart = chart.0, faded, "faded all diagonal separators");
        }
    }

    pub fn complete_fade_out(&mut self, chart: ChartId) -> usize {
        self.charts
            .get_mut(&chart)
            .map_or(0, |state| drop_faded(&mut state.separators))
    }

    pub fn remove_chart<B: GeometryBackend + ?Sized>(&mut self, chart: ChartId, backend: &mut B) {
        if let Some(mut state) = self.charts.shift_remove(&chart) {
            for separator in state.separators.values_mut() {
                separator.release(backend);
            }
        }
    }
}

/// Pixel geometry of one diagonal in the current pass.
struct DrawnDiagonal<'a> {
    start: Point,
    end: Point,
    /// Present when the label survives the padding rules.
    label: Option<(DiagonalLabelPlacement, &'a str)>,
}

impl DrawnDiagonal<'_> {
    fn apply<B: GeometryBackend + ?Sized>(
        &self,
        separator: &VisualSeparator,
        text_size_px: f32,
        backend: &mut B,
    ) {
        if let Some(line) = separator.line {
            backend.set_line_endpoints(line, self.start, self.end);
        }
        let Some(label) = separator.label else {
            return;
        };
        match self.label {
            Some((placement, text)) => {
                backend.set_label_text(label, text, text_size_px);
                backend.set_label_position(label, placement.position, TextHAlign::Center);
                backend.set_label_rotation(label, placement.rotation_deg);
            }
            None => backend.set_label_text(label, "", text_size_px),
        }
    }
}

fn resolve_diagonal<'m, B: GeometryBackend + ?Sized>(
    separators: &'m mut SeparatorMap,
    key: SeparatorKey,
    line: &DiagonalLine,
    backend: &mut B,
) -> (&'m mut VisualSeparator, bool) {
    let is_labeled = line.label.is_some();
    let (separator, created) = match separators.entry(key) {
        Entry::Occupied(entry) => {
            let separator = entry.into_mut();
            let reusable = separator.state == SeparatorState::Active
                && separator.line.is_some()
                && separator.label.is_some() == is_labeled;
            if !reusable {
                separator.release(backend);
            }
            (separator, !reusable)
        }
        Entry::Vacant(entry) => {
            let key = entry.key().clone();
            (
                entry.insert(VisualSeparator::new(key, line.value, is_labeled)),
                true,
            )
        }
    };

    separator.value = line.value;
    separator.is_labeled = is_labeled;
    separator.state = SeparatorState::Active;
    if created {
        separator.line = Some(backend.create_line(CanvasLayerKind::Diagonals));
        separator.label = is_labeled.then(|| backend.create_label(CanvasLayerKind::DiagonalLabels));
    }
    (separator, created)
}

/// A diagonal family axis together with the lines it draws.
#[derive(Debug)]
pub struct DiagonalAxis {
    pub(super) config: AxisConfig,
    pub(super) separators: DiagonalSeparators,
}

impl DiagonalAxis {
    #[must_use]
    pub fn new(config: AxisConfig) -> Self {
        Self {
            config,
            separators: DiagonalSeparators::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        self.config.is_visible = is_visible;
    }

    pub fn family(&self) -> ChartResult<DiagonalFamily> {
        family_of(self.config.spec.orientation)
    }

    #[must_use]
    pub fn lines(&self, chart: ChartId) -> &[DiagonalLine] {
        self.separators.lines(chart)
    }

    #[must_use]
    pub fn separators(&self, chart: ChartId) -> Option<&SeparatorMap> {
        self.separators.separators(chart)
    }
}

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::ticks::target_spacing_px;
use crate::core::{
    AxisBounds, AxisOrientation, AxisPosition, AxisScaler, AxisSpec, MAX_SEPARATORS, Point, Rect,
    Size, generate_steps, linear_separator_values, nice_tick,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, GeometryBackend, GeometryHandle, LabelHandle, TextHAlign, Transition,
};

use super::axis::{AxisConfig, AxisStyle};
use super::labeler::Labeler;
use super::separators::{
    ChartId, SeparatorKey, SeparatorMap, SeparatorState, UpdateMode, VisualSeparator, drop_faded,
    fade_unmeasured,
};

/// Where one axis sits during a measure pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureContext {
    pub chart: ChartId,
    pub control_size: Size,
    pub draw_margin: Rect,
    /// Distance from the control edge the axis is attached to, to the center
    /// of its labels.
    pub label_offset: f32,
    /// Same distance for the axis name.
    pub name_offset: f32,
    pub transition: Transition,
}

impl MeasureContext {
    /// Context for a dry run before the draw margin is known: the whole
    /// control stands in for it.
    #[must_use]
    pub fn provisional(chart: ChartId, control_size: Size) -> Self {
        Self {
            chart,
            control_size,
            draw_margin: Rect::new(Point::default(), control_size),
            label_offset: 0.0,
            name_offset: 0.0,
            transition: Transition::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SeparatorValue {
    value: f64,
    is_labeled: bool,
}

#[derive(Debug, Default)]
struct Enumeration {
    values: Vec<SeparatorValue>,
    /// Linear step, when subseparators can be interpolated from it.
    step: Option<f64>,
}

#[derive(Debug, Default)]
struct ChartSeparators {
    separators: SeparatorMap,
    name_label: Option<LabelHandle>,
    previous_scaler: Option<AxisScaler>,
    has_previous_state: bool,
}

/// Keeps the separators of one axis alive across layout passes.
///
/// Each pass enumerates separator values, diffs them against the previous
/// pass by `SeparatorKey` and only creates, moves or fades geometry. New
/// separators start where the previous scale would have drawn them, so a
/// zoom animates them into place.
#[derive(Debug, Default)]
pub struct AxisLayoutEngine {
    charts: IndexMap<ChartId, ChartSeparators>,
}

impl AxisLayoutEngine {
    #[must_use]
    pub fn separators(&self, chart: ChartId) -> Option<&SeparatorMap> {
        self.charts.get(&chart).map(|state| &state.separators)
    }

    #[must_use]
    pub fn name_label(&self, chart: ChartId) -> Option<LabelHandle> {
        self.charts.get(&chart).and_then(|state| state.name_label)
    }

    pub fn measure<B: GeometryBackend + ?Sized>(
        &mut self,
        config: &AxisConfig,
        labeler: &Labeler,
        bounds: AxisBounds,
        ctx: &MeasureContext,
        backend: &mut B,
    ) -> ChartResult<()> {
        let orientation = config.spec.orientation;

        if !config.is_visible {
            let faded = self.fade_all(ctx.chart, backend);
            trace!(?orientation, faded, "hidden axis faded its separators");
            return Ok(());
        }

        // Everything fallible runs before the separator map is touched.
        let scaler =
            AxisScaler::new(ctx.draw_margin.origin, ctx.draw_margin.size, &config.spec, bounds)?;
        let enumeration = enumerate(&config.spec, bounds, ctx.draw_margin)?;

        let state = self.charts.entry(ctx.chart).or_default();
        let current = Placer::new(config, scaler, ctx, enumeration.step);
        let previous = Placer::new(
            config,
            state.previous_scaler.unwrap_or(scaler),
            ctx,
            enumeration.step,
        );

        let mut measured = IndexSet::with_capacity(enumeration.values.len());
        for separator_value in &enumeration.values {
            let key = SeparatorKey::for_value(separator_value.value);
            if !measured.insert(key.clone()) {
                continue;
            }

            let text = separator_value
                .is_labeled
                .then(|| labeler.format_or_log(orientation, separator_value.value));
            let target = current.place(*separator_value);
            let (separator, created) = resolve_separator(
                &mut state.separators,
                key,
                *separator_value,
                &target,
                backend,
            );

            if created {
                let initial = previous.place(*separator_value);
                apply_placement(separator, &initial, text.as_deref(), &config.style, backend);
                for geometry in separator.geometries().collect::<SmallVec<[GeometryHandle; 8]>>() {
                    UpdateMode::UpdateAndComplete {
                        has_previous_state: state.has_previous_state,
                    }
                    .apply(backend, geometry);
                }
                separator.animate_all(backend, ctx.transition);
            }

            apply_placement(separator, &target, text.as_deref(), &config.style, backend);
            for geometry in separator.geometries().collect::<SmallVec<[GeometryHandle; 8]>>() {
                UpdateMode::Update.apply(backend, geometry);
            }
        }

        let faded = fade_unmeasured(&mut state.separators, &measured, backend);
        update_name(state, config, ctx, backend);
        state.previous_scaler = Some(scaler);
        state.has_previous_state = true;

        debug!(
            chart = ctx.chart.0,
            ?orientation,
            measured = measured.len(),
            faded,
            tracked = state.separators.len(),
            "measured axis separators"
        );
        Ok(())
    }

    /// Fades every separator of `chart` and drops the name label. Returns
    /// how many separators started fading.
    pub fn fade_all<B: GeometryBackend + ?Sized>(
        &mut self,
        chart: ChartId,
        backend: &mut B,
    ) -> usize {
        let Some(state) = self.charts.get_mut(&chart) else {
            return 0;
        };
        let faded = fade_unmeasured(&mut state.separators, &IndexSet::new(), backend);
        if let Some(name) = state.name_label.take() {
            backend.release(name.into());
        }
        faded
    }

    /// Largest label box the axis would draw for `bounds`, padding included.
    ///
    /// Runs the same enumeration as `measure` without touching any tracked
    /// separator, so the layout can reserve margin before measuring.
    pub fn get_possible_size<B: GeometryBackend + ?Sized>(
        &self,
        config: &AxisConfig,
        labeler: &Labeler,
        bounds: AxisBounds,
        ctx: &MeasureContext,
        backend: &B,
    ) -> ChartResult<Size> {
        let orientation = config.spec.orientation;
        if !config.is_visible
            || bounds.is_empty()
            || matches!(
                orientation,
                AxisOrientation::Acceleration | AxisOrientation::Displacement
            )
        {
            return Ok(Size::default());
        }

        let enumeration = enumerate(&config.spec, bounds, ctx.draw_margin)?;
        let style = &config.style;
        let mut size = Size::default();
        for separator_value in enumeration.values.iter().filter(|value| value.is_labeled) {
            let text = labeler.format_or_log(orientation, separator_value.value);
            if text.is_empty() {
                continue;
            }
            let measured = rotated_bounds(
                backend.measure_text(&text, style.text_size_px),
                style.labels_rotation_deg,
            );
            size = size.max(padded(measured, style));
        }
        Ok(size)
    }

    /// Box the axis name needs, rotated for vertical axes.
    #[must_use]
    pub fn get_name_size<B: GeometryBackend + ?Sized>(config: &AxisConfig, backend: &B) -> Size {
        let Some(name) = visible_name(config) else {
            return Size::default();
        };
        let measured = padded(
            backend.measure_text(name, config.style.name_text_size_px),
            &config.style,
        );
        if config.spec.orientation.is_horizontal() {
            measured
        } else {
            Size::new(measured.height, measured.width)
        }
    }

    /// Forgets separators of `chart` whose fade-out has finished.
    pub fn complete_fade_out(&mut self, chart: ChartId) -> usize {
        let Some(state) = self.charts.get_mut(&chart) else {
            return 0;
        };
        let removed = drop_faded(&mut state.separators);
        trace!(chart = chart.0, removed, "completed separator fade-out");
        removed
    }

    /// Releases every geometry this axis owns on `chart`.
    pub fn remove_chart<B: GeometryBackend + ?Sized>(&mut self, chart: ChartId, backend: &mut B) {
        let Some(mut state) = self.charts.shift_remove(&chart) else {
            return;
        };
        for separator in state.separators.values_mut() {
            separator.release(backend);
        }
        if let Some(name) = state.name_label.take() {
            backend.release(name.into());
        }
        debug!(chart = chart.0, "removed axis geometry for chart");
    }
}

fn enumerate(spec: &AxisSpec, bounds: AxisBounds, draw_margin: Rect) -> ChartResult<Enumeration> {
    if bounds.is_empty() {
        return Ok(Enumeration::default());
    }

    if let Some(custom) = &spec.custom_separators {
        if custom.len() > MAX_SEPARATORS {
            return Err(ChartError::ExcessiveSeparators {
                orientation: spec.orientation,
                count: custom.len(),
            });
        }
        let values = custom
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .map(|value| SeparatorValue {
                value,
                is_labeled: true,
            })
            .collect();
        return Ok(Enumeration { values, step: None });
    }

    if let Some(log_base) = spec.log_base {
        let positive = bounds.clamped_positive();
        let steps = generate_steps(
            log_base,
            positive.min,
            positive.max,
            spec.subseparator_count > 0,
        )?;
        if steps.len() > MAX_SEPARATORS {
            return Err(ChartError::ExcessiveSeparators {
                orientation: spec.orientation,
                count: steps.len(),
            });
        }
        let values = steps
            .into_iter()
            .map(|step| SeparatorValue {
                value: step.value,
                is_labeled: step.is_labeled,
            })
            .collect();
        return Ok(Enumeration { values, step: None });
    }

    let span_px = if spec.orientation.is_horizontal() {
        draw_margin.size.width
    } else {
        draw_margin.size.height
    };
    let step = resolve_step(spec, bounds, f64::from(span_px));
    // The first value is snapped down to a step multiple and may sit below
    // `min`; it keeps its line but gets no label.
    let tolerance = (step.abs() * 1e-9).max(f64::EPSILON);
    let values = linear_separator_values(bounds.min, bounds.max, step, spec.orientation)?
        .into_iter()
        .map(|value| SeparatorValue {
            value,
            is_labeled: value >= bounds.min - tolerance && value <= bounds.max + tolerance,
        })
        .collect();
    Ok(Enumeration {
        values,
        step: Some(step),
    })
}

fn resolve_step(spec: &AxisSpec, bounds: AxisBounds, span_px: f64) -> f64 {
    if let Some(step) = spec.step {
        return step;
    }
    let mut step = nice_tick(
        bounds.min,
        bounds.max,
        span_px,
        target_spacing_px(spec.orientation),
    )
    .value;
    if step < spec.min_step {
        step = spec.min_step;
    }
    if spec.force_step_to_min {
        step = spec.min_step;
    }
    step
}

type Segment = (Point, Point);

/// Pixel geometry of one separator under one scaler.
#[derive(Debug, Clone, PartialEq, Default)]
struct SeparatorPlacement {
    is_labeled: bool,
    line: Option<Segment>,
    tick: Option<Segment>,
    label: Option<Point>,
    subseparators: SmallVec<[Segment; 4]>,
    subticks: SmallVec<[Segment; 4]>,
}

impl SeparatorPlacement {
    fn matches(&self, separator: &VisualSeparator) -> bool {
        separator.state == SeparatorState::Active
            && separator.is_labeled == self.is_labeled
            && separator.line.is_some() == self.line.is_some()
            && separator.tick.is_some() == self.tick.is_some()
            && separator.label.is_some() == self.label.is_some()
            && separator.subseparators.len() == self.subseparators.len()
            && separator.subticks.len() == self.subticks.len()
    }
}

struct Placer<'a> {
    config: &'a AxisConfig,
    scaler: AxisScaler,
    ctx: &'a MeasureContext,
    step: Option<f64>,
}

impl<'a> Placer<'a> {
    fn new(
        config: &'a AxisConfig,
        scaler: AxisScaler,
        ctx: &'a MeasureContext,
        step: Option<f64>,
    ) -> Self {
        Self {
            config,
            scaler,
            ctx,
            step,
        }
    }

    fn place(&self, separator: SeparatorValue) -> SeparatorPlacement {
        let style = &self.config.style;
        let mut placement = SeparatorPlacement {
            is_labeled: separator.is_labeled,
            ..SeparatorPlacement::default()
        };

        let pixel = self.scaler.to_pixels(separator.value);
        if style.show_separator_lines {
            placement.line = Some(self.grid_line(pixel));
        }
        if style.show_ticks {
            placement.tick = Some(self.tick(pixel, style.tick_length_px));
        }
        if separator.is_labeled {
            placement.label = Some(self.label_anchor(pixel));
        }

        let count = self.config.spec.subseparator_count;
        if let Some(step) = self.step.filter(|step| *step > 0.0 && count > 0) {
            for index in 1..=count {
                let value = separator.value + step * index as f64 / (count + 1) as f64;
                let pixel = self.scaler.to_pixels(value);
                if style.show_separator_lines {
                    placement.subseparators.push(self.grid_line(pixel));
                }
                if style.show_ticks {
                    placement
                        .subticks
                        .push(self.tick(pixel, style.tick_length_px * 0.5));
                }
            }
        }
        placement
    }

    fn grid_line(&self, pixel: f32) -> Segment {
        let margin = self.ctx.draw_margin;
        if self.config.spec.orientation.is_horizontal() {
            (Point::new(pixel, margin.top()), Point::new(pixel, margin.bottom()))
        } else {
            (Point::new(margin.left(), pixel), Point::new(margin.right(), pixel))
        }
    }

    fn tick(&self, pixel: f32, length: f32) -> Segment {
        let margin = self.ctx.draw_margin;
        match (
            self.config.spec.orientation.is_horizontal(),
            self.config.spec.position,
        ) {
            (true, AxisPosition::Start) => (
                Point::new(pixel, margin.bottom()),
                Point::new(pixel, margin.bottom() + length),
            ),
            (true, AxisPosition::End) => (
                Point::new(pixel, margin.top() - length),
                Point::new(pixel, margin.top()),
            ),
            (false, AxisPosition::Start) => (
                Point::new(margin.left() - length, pixel),
                Point::new(margin.left(), pixel),
            ),
            (false, AxisPosition::End) => (
                Point::new(margin.right(), pixel),
                Point::new(margin.right() + length, pixel),
            ),
        }
    }

    fn label_anchor(&self, pixel: f32) -> Point {
        edge_anchor(
            self.config,
            self.ctx.control_size,
            pixel,
            self.ctx.label_offset,
        )
    }
}

/// Point `offset` pixels in from the control edge the axis is attached to,
/// at `along` on the axis direction.
fn edge_anchor(config: &AxisConfig, control_size: Size, along: f32, offset: f32) -> Point {
    match (config.spec.orientation.is_horizontal(), config.spec.position) {
        (true, AxisPosition::Start) => Point::new(along, control_size.height - offset),
        (true, AxisPosition::End) => Point::new(along, offset),
        (false, AxisPosition::Start) => Point::new(offset, along),
        (false, AxisPosition::End) => Point::new(control_size.width - offset, along),
    }
}

/// Finds the tracked separator for `key` or creates one, returning whether
/// its geometry is new.
///
/// A fading separator that reappears, or one whose geometry set no longer
/// matches the placement, drops its old geometry and starts over.
fn resolve_separator<'m, B: GeometryBackend + ?Sized>(
    separators: &'m mut SeparatorMap,
    key: SeparatorKey,
    separator_value: SeparatorValue,
    placement: &SeparatorPlacement,
    backend: &mut B,
) -> (&'m mut VisualSeparator, bool) {
    let (separator, created) = match separators.entry(key) {
        Entry::Occupied(entry) => {
            let separator = entry.into_mut();
            if placement.matches(separator) {
                (separator, false)
            } else {
                trace!(key = %separator.key, "recreating separator geometry");
                separator.release(backend);
                (separator, true)
            }
        }
        Entry::Vacant(entry) => {
            let key = entry.key().clone();
            let separator = entry.insert(VisualSeparator::new(
                key,
                separator_value.value,
                separator_value.is_labeled,
            ));
            (separator, true)
        }
    };

    separator.value = separator_value.value;
    separator.is_labeled = separator_value.is_labeled;
    separator.state = SeparatorState::Active;
    if created {
        create_geometry(separator, placement, backend);
    }
    (separator, created)
}

fn create_geometry<B: GeometryBackend + ?Sized>(
    separator: &mut VisualSeparator,
    placement: &SeparatorPlacement,
    backend: &mut B,
) {
    let (line_layer, tick_layer) = if placement.is_labeled {
        (CanvasLayerKind::Separators, CanvasLayerKind::Ticks)
    } else {
        (CanvasLayerKind::Subseparators, CanvasLayerKind::Subticks)
    };
    separator.line = placement.line.map(|_| backend.create_line(line_layer));
    separator.tick = placement.tick.map(|_| backend.create_line(tick_layer));
    separator.label = placement
        .label
        .map(|_| backend.create_label(CanvasLayerKind::AxisLabels));
    separator.subseparators = placement
        .subseparators
        .iter()
        .map(|_| backend.create_line(CanvasLayerKind::Subseparators))
        .collect();
    separator.subticks = placement
        .subticks
        .iter()
        .map(|_| backend.create_line(CanvasLayerKind::Subticks))
        .collect();
}

fn apply_placement<B: GeometryBackend + ?Sized>(
    separator: &VisualSeparator,
    placement: &SeparatorPlacement,
    text: Option<&str>,
    style: &AxisStyle,
    backend: &mut B,
) {
    if let (Some(line), Some((start, end))) = (separator.line, placement.line) {
        backend.set_line_endpoints(line, start, end);
    }
    if let (Some(tick), Some((start, end))) = (separator.tick, placement.tick) {
        backend.set_line_endpoints(tick, start, end);
    }
    if let (Some(label), Some(position)) = (separator.label, placement.label) {
        backend.set_label_text(label, text.unwrap_or_default(), style.text_size_px);
        backend.set_label_position(label, position, TextHAlign::Center);
        backend.set_label_rotation(label, style.labels_rotation_deg);
    }
    for (line, (start, end)) in separator.subseparators.iter().zip(&placement.subseparators) {
        backend.set_line_endpoints(*line, *start, *end);
    }
    for (line, (start, end)) in separator.subticks.iter().zip(&placement.subticks) {
        backend.set_line_endpoints(*line, *start, *end);
    }
}

fn update_name<B: GeometryBackend + ?Sized>(
    state: &mut ChartSeparators,
    config: &AxisConfig,
    ctx: &MeasureContext,
    backend: &mut B,
) {
    let Some(name) = visible_name(config) else {
        if let Some(label) = state.name_label.take() {
            backend.release(label.into());
        }
        return;
    };

    let label = *state
        .name_label
        .get_or_insert_with(|| backend.create_label(CanvasLayerKind::AxisNames));
    let center = ctx.draw_margin.center();
    let (along, rotation_deg) = if config.spec.orientation.is_horizontal() {
        (center.x, 0.0)
    } else {
        (center.y, -90.0)
    };
    backend.set_label_text(label, name, config.style.name_text_size_px);
    backend.set_label_position(
        label,
        edge_anchor(config, ctx.control_size, along, ctx.name_offset),
        TextHAlign::Center,
    );
    backend.set_label_rotation(label, rotation_deg);
}

fn visible_name(config: &AxisConfig) -> Option<&str> {
    config
        .name
        .as_deref()
        .filter(|name| config.is_visible && !name.is_empty())
}

fn padded(size: Size, style: &AxisStyle) -> Size {
    let padding = style.label_padding;
    Size::new(
        size.width + padding.left + padding.right,
        size.height + padding.top + padding.bottom,
    )
}

/// Axis-aligned box of `size` rotated by `rotation_deg`.
fn rotated_bounds(size: Size, rotation_deg: f32) -> Size {
    if rotation_deg == 0.0 {
        return size;
    }
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    Size::new(
        (size.width * cos).abs() + (size.height * sin).abs(),
        (size.width * sin).abs() + (size.height * cos).abs(),
    )
}

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{AxisBounds, AxisOrientation, AxisScaler, AxisSpec, Margin, Rect, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::GeometryBackend;

use super::axis_layout::{AxisLayoutEngine, MeasureContext};
use super::labeler::Labeler;
use super::separators::{ChartId, SeparatorMap};

/// Text and stroke settings of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    #[serde(default = "default_text_size_px")]
    pub text_size_px: f32,
    #[serde(default = "default_name_text_size_px")]
    pub name_text_size_px: f32,
    #[serde(default = "default_tick_length_px")]
    pub tick_length_px: f32,
    #[serde(default = "default_true")]
    pub show_separator_lines: bool,
    #[serde(default = "default_true")]
    pub show_ticks: bool,
    #[serde(default)]
    pub labels_rotation_deg: f32,
    /// Space kept around every label when the axis reserves margin.
    #[serde(default = "default_label_padding")]
    pub label_padding: Margin,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            text_size_px: default_text_size_px(),
            name_text_size_px: default_name_text_size_px(),
            tick_length_px: default_tick_length_px(),
            show_separator_lines: true,
            show_ticks: true,
            labels_rotation_deg: 0.0,
            label_padding: default_label_padding(),
        }
    }
}

impl AxisStyle {
    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("text size", self.text_size_px),
            ("name text size", self.name_text_size_px),
            ("tick length", self.tick_length_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "axis {name} must be finite and >= 0"
                )));
            }
        }
        if !self.labels_rotation_deg.is_finite() {
            return Err(ChartError::InvalidData(
                "axis label rotation must be finite".to_owned(),
            ));
        }
        self.label_padding.validate()
    }
}

fn default_text_size_px() -> f32 {
    12.0
}

fn default_name_text_size_px() -> f32 {
    14.0
}

fn default_tick_length_px() -> f32 {
    6.0
}

fn default_true() -> bool {
    true
}

fn default_label_padding() -> Margin {
    Margin::uniform(3.0)
}

/// Serializable part of an axis: what it measures and how it looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub spec: AxisSpec,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub crosshair_snap_enabled: bool,
    #[serde(default)]
    pub style: AxisStyle,
}

impl AxisConfig {
    #[must_use]
    pub fn new(spec: AxisSpec) -> Self {
        Self {
            spec,
            name: None,
            is_visible: true,
            crosshair_snap_enabled: false,
            style: AxisStyle::default(),
        }
    }

    /// Log-10 frequency axis along the bottom edge.
    #[must_use]
    pub fn frequency() -> Self {
        Self::new(AxisSpec::logarithmic(AxisOrientation::X, 10.0))
    }

    /// Log-10 pseudo-velocity axis along the left edge.
    #[must_use]
    pub fn pseudo_velocity() -> Self {
        Self::new(AxisSpec::logarithmic(AxisOrientation::Y, 10.0))
    }

    /// Log-10 diagonal family axis.
    #[must_use]
    pub fn diagonal(orientation: AxisOrientation) -> Self {
        Self::new(AxisSpec::logarithmic(orientation, 10.0))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    #[must_use]
    pub fn with_crosshair_snap(mut self, enabled: bool) -> Self {
        self.crosshair_snap_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.spec.validate()?;
        self.style.validate()
    }
}

/// Live axis: configuration plus the bounds and separators of the latest
/// layout pass.
#[derive(Debug)]
pub struct TripartiteAxis {
    pub(super) config: AxisConfig,
    pub(super) labeler: Labeler,
    pub(super) data_bounds: AxisBounds,
    pub(super) visible_bounds: AxisBounds,
    pub(super) layout: AxisLayoutEngine,
}

impl TripartiteAxis {
    #[must_use]
    pub fn new(config: AxisConfig) -> Self {
        Self {
            config,
            labeler: Labeler::default(),
            data_bounds: AxisBounds::empty(),
            visible_bounds: AxisBounds::empty(),
            layout: AxisLayoutEngine::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    #[must_use]
    pub fn spec(&self) -> &AxisSpec {
        &self.config.spec
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.config.spec.orientation
    }

    #[must_use]
    pub fn labeler(&self) -> &Labeler {
        &self.labeler
    }

    pub fn set_labeler(&mut self, labeler: Labeler) {
        self.labeler = labeler;
    }

    /// A hidden axis fades its separators on the next pass and reserves no
    /// margin.
    pub fn set_visible(&mut self, is_visible: bool) {
        self.config.is_visible = is_visible;
    }

    /// Bounds gathered from series, seeded and widened, before user limits.
    #[must_use]
    pub fn data_bounds(&self) -> AxisBounds {
        self.data_bounds
    }

    /// Bounds the axis actually spans after limits were applied.
    #[must_use]
    pub fn visible_bounds(&self) -> AxisBounds {
        self.visible_bounds
    }

    #[must_use]
    pub fn limits(&self) -> (Option<f64>, Option<f64>) {
        (self.config.spec.min_limit, self.config.spec.max_limit)
    }

    pub fn set_limits(&mut self, min_limit: Option<f64>, max_limit: Option<f64>) {
        self.config.spec.min_limit = min_limit;
        self.config.spec.max_limit = max_limit;
    }

    #[must_use]
    pub fn separators(&self, chart: ChartId) -> Option<&SeparatorMap> {
        self.layout.separators(chart)
    }

    /// Recomputes data and visible bounds from the extent gathered off the
    /// visible series of this axis.
    pub(super) fn reset_bounds(&mut self, gathered: AxisBounds) {
        let spec = &self.config.spec;
        let logarithmic = spec.is_logarithmic();

        let mut data = if gathered.is_empty() {
            AxisBounds {
                min: 0.0,
                max: 10.0 * spec.unit_width,
                min_delta: 10.0 * spec.unit_width,
            }
        } else {
            gathered
        };
        if logarithmic {
            data = data.clamped_positive();
        }
        data = data.widened_if_flat(spec.unit_width, logarithmic);

        let mut visible = AxisBounds {
            min: spec.min_limit.unwrap_or(data.min),
            max: spec.max_limit.unwrap_or(data.max),
            min_delta: data.min_delta,
        };
        if logarithmic {
            visible = visible.clamped_positive();
        }
        if visible.min >= visible.max {
            // A single limit can cross the data extent.
            visible = AxisBounds {
                min_delta: data.min_delta,
                ..AxisBounds::new(visible.min, visible.max)
                    .widened_if_flat(spec.unit_width, logarithmic)
            };
        }

        trace!(
            orientation = ?spec.orientation,
            data_min = data.min,
            data_max = data.max,
            visible_min = visible.min,
            visible_max = visible.max,
            "reset axis bounds"
        );
        self.data_bounds = data;
        self.visible_bounds = visible;
    }

    /// Scaler over the visible bounds for the given draw margin.
    pub fn scaler(&self, draw_margin: Rect) -> ChartResult<AxisScaler> {
        AxisScaler::new(
            draw_margin.origin,
            draw_margin.size,
            &self.config.spec,
            self.visible_bounds,
        )
    }

    pub fn measure<B: GeometryBackend + ?Sized>(
        &mut self,
        ctx: &MeasureContext,
        backend: &mut B,
    ) -> ChartResult<()> {
        self.layout
            .measure(&self.config, &self.labeler, self.visible_bounds, ctx, backend)
    }

    pub fn get_possible_size<B: GeometryBackend + ?Sized>(
        &self,
        ctx: &MeasureContext,
        backend: &B,
    ) -> ChartResult<Size> {
        self.layout
            .get_possible_size(&self.config, &self.labeler, self.visible_bounds, ctx, backend)
    }

    #[must_use]
    pub fn get_name_size<B: GeometryBackend + ?Sized>(&self, backend: &B) -> Size {
        AxisLayoutEngine::get_name_size(&self.config, backend)
    }

    pub fn fade_all<B: GeometryBackend + ?Sized>(
        &mut self,
        chart: ChartId,
        backend: &mut B,
    ) -> usize {
        self.layout.fade_all(chart, backend)
    }

    /// Drops separators that finished fading out on `chart`.
    pub fn complete_fade_out(&mut self, chart: ChartId) -> usize {
        self.layout.complete_fade_out(chart)
    }

    pub fn remove_chart<B: GeometryBackend + ?Sized>(&mut self, chart: ChartId, backend: &mut B) {
        self.layout.remove_chart(chart, backend);
    }
}

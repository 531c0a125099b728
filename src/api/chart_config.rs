use serde::{Deserialize, Serialize};

use crate::core::{AxisOrientation, TripartiteUnit, TripartiteUnitOption, UnitTable, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::ZoomMode;
use crate::render::Transition;

use super::axis::AxisConfig;
use super::series::HitStrategy;

/// Presentation settings shared by every part of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    #[serde(default)]
    pub transition: Transition,
    #[serde(default = "default_title_text_size_px")]
    pub title_text_size_px: f32,
    #[serde(default = "default_crosshair_text_size_px")]
    pub crosshair_text_size_px: f32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            transition: Transition::default(),
            title_text_size_px: default_title_text_size_px(),
            crosshair_text_size_px: default_crosshair_text_size_px(),
        }
    }
}

fn default_title_text_size_px() -> f32 {
    18.0
}

fn default_crosshair_text_size_px() -> f32 {
    12.0
}

/// Per-side draw margin override; `None` sides are computed from the axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawMarginOverride {
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub right: Option<f32>,
    #[serde(default)]
    pub bottom: Option<f32>,
}

impl DrawMarginOverride {
    #[must_use]
    pub fn uniform(value: f32) -> Self {
        Self {
            left: Some(value),
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
        }
    }

    fn validate(self) -> ChartResult<()> {
        for (side, value) in [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ChartError::InvalidData(format!(
                        "draw margin `{side}` must be finite and >= 0"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Where the chart takes its unit from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitSelection {
    Preset(TripartiteUnitOption),
    /// Name registered in the `UnitTable` the chart is built with.
    Named(String),
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::Preset(TripartiteUnitOption::default())
    }
}

impl UnitSelection {
    pub fn resolve(&self, units: &UnitTable) -> ChartResult<TripartiteUnit> {
        match self {
            Self::Preset(option) => Ok(units.preset(*option).clone()),
            Self::Named(name) => units.custom(name).cloned().ok_or_else(|| {
                ChartError::InvalidData(format!("unit `{name}` is not registered"))
            }),
        }
    }
}

/// Public chart bootstrap configuration.
///
/// Serializable so hosts can persist a chart setup as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub draw_margin: DrawMarginOverride,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_x_axes")]
    pub x_axes: Vec<AxisConfig>,
    #[serde(default = "default_y_axes")]
    pub y_axes: Vec<AxisConfig>,
    #[serde(default = "default_diagonal_axes")]
    pub diagonal_axes: Vec<AxisConfig>,
    #[serde(default)]
    pub unit: UnitSelection,
    #[serde(default)]
    pub zoom_mode: ZoomMode,
    #[serde(default)]
    pub hit_strategy: HitStrategy,
    #[serde(default)]
    pub theme: ChartTheme,
}

fn default_x_axes() -> Vec<AxisConfig> {
    vec![AxisConfig::frequency()]
}

fn default_y_axes() -> Vec<AxisConfig> {
    vec![AxisConfig::pseudo_velocity()]
}

fn default_diagonal_axes() -> Vec<AxisConfig> {
    vec![
        AxisConfig::diagonal(AxisOrientation::Displacement),
        AxisConfig::diagonal(AxisOrientation::Acceleration),
    ]
}

impl ChartConfig {
    /// Log-log frequency/pseudo-velocity chart with both diagonal families.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            draw_margin: DrawMarginOverride::default(),
            title: None,
            x_axes: default_x_axes(),
            y_axes: default_y_axes(),
            diagonal_axes: default_diagonal_axes(),
            unit: UnitSelection::default(),
            zoom_mode: ZoomMode::default(),
            hit_strategy: HitStrategy::default(),
            theme: ChartTheme::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_draw_margin(mut self, draw_margin: DrawMarginOverride) -> Self {
        self.draw_margin = draw_margin;
        self
    }

    #[must_use]
    pub fn with_x_axes(mut self, axes: Vec<AxisConfig>) -> Self {
        self.x_axes = axes;
        self
    }

    #[must_use]
    pub fn with_y_axes(mut self, axes: Vec<AxisConfig>) -> Self {
        self.y_axes = axes;
        self
    }

    #[must_use]
    pub fn with_diagonal_axes(mut self, axes: Vec<AxisConfig>) -> Self {
        self.diagonal_axes = axes;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: TripartiteUnitOption) -> Self {
        self.unit = UnitSelection::Preset(unit);
        self
    }

    #[must_use]
    pub fn with_named_unit(mut self, name: impl Into<String>) -> Self {
        self.unit = UnitSelection::Named(name.into());
        self
    }

    #[must_use]
    pub fn with_zoom_mode(mut self, zoom_mode: ZoomMode) -> Self {
        self.zoom_mode = zoom_mode;
        self
    }

    #[must_use]
    pub fn with_hit_strategy(mut self, hit_strategy: HitStrategy) -> Self {
        self.hit_strategy = hit_strategy;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.validate()?;
        self.draw_margin.validate()?;
        if self.x_axes.is_empty() || self.y_axes.is_empty() {
            return Err(ChartError::InvalidData(
                "a tripartite chart needs at least one X and one Y axis".to_owned(),
            ));
        }

        for (expected, axes) in [
            (Some(AxisOrientation::X), &self.x_axes),
            (Some(AxisOrientation::Y), &self.y_axes),
            (None, &self.diagonal_axes),
        ] {
            for axis in axes {
                axis.validate()?;
                let orientation = axis.spec.orientation;
                let misplaced = match expected {
                    Some(expected) => orientation != expected,
                    None => matches!(orientation, AxisOrientation::X | AxisOrientation::Y),
                };
                if misplaced {
                    return Err(ChartError::InvalidData(format!(
                        "{orientation:?} axis configured in the wrong axis list"
                    )));
                }
            }
        }

        if !self.theme.title_text_size_px.is_finite() || self.theme.title_text_size_px < 0.0 {
            return Err(ChartError::InvalidData(
                "title text size must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

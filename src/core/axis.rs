use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Which physical quantity an axis measures and how it is laid out.
///
/// `Acceleration` and `Displacement` axes are the diagonal families; they share
/// the vertical pixel mapping of `Y` when scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrientation {
    X,
    Y,
    Acceleration,
    Displacement,
}

impl AxisOrientation {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::X)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisPosition {
    #[default]
    Start,
    End,
}

/// Static configuration of one axis.
///
/// Bounds are not stored here; they are recomputed every layout pass and
/// live in the axis runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub orientation: AxisOrientation,
    #[serde(default)]
    pub position: AxisPosition,
    #[serde(default)]
    pub log_base: Option<f64>,
    #[serde(default)]
    pub min_step: f64,
    #[serde(default)]
    pub force_step_to_min: bool,
    #[serde(default)]
    pub is_inverted: bool,
    #[serde(default)]
    pub custom_separators: Option<Vec<f64>>,
    #[serde(default)]
    pub subseparator_count: usize,
    /// Explicit separator step; used verbatim when set, zero included.
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub min_limit: Option<f64>,
    #[serde(default)]
    pub max_limit: Option<f64>,
    #[serde(default)]
    pub min_zoom_delta: Option<f64>,
    #[serde(default = "default_unit_width")]
    pub unit_width: f64,
}

fn default_unit_width() -> f64 {
    1.0
}

impl AxisSpec {
    #[must_use]
    pub fn new(orientation: AxisOrientation) -> Self {
        Self {
            orientation,
            position: AxisPosition::Start,
            log_base: None,
            min_step: 0.0,
            force_step_to_min: false,
            is_inverted: false,
            custom_separators: None,
            subseparator_count: 0,
            step: None,
            min_limit: None,
            max_limit: None,
            min_zoom_delta: None,
            unit_width: default_unit_width(),
        }
    }

    /// Log-scaled axis with subseparators, the usual tripartite setup.
    #[must_use]
    pub fn logarithmic(orientation: AxisOrientation, log_base: f64) -> Self {
        Self::new(orientation)
            .with_log_base(Some(log_base))
            .with_subseparator_count(5)
    }

    #[must_use]
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_log_base(mut self, log_base: Option<f64>) -> Self {
        self.log_base = log_base;
        self
    }

    #[must_use]
    pub fn with_min_step(mut self, min_step: f64, force_step_to_min: bool) -> Self {
        self.min_step = min_step;
        self.force_step_to_min = force_step_to_min;
        self
    }

    #[must_use]
    pub fn with_inverted(mut self, is_inverted: bool) -> Self {
        self.is_inverted = is_inverted;
        self
    }

    #[must_use]
    pub fn with_custom_separators(mut self, separators: Option<Vec<f64>>) -> Self {
        self.custom_separators = separators;
        self
    }

    #[must_use]
    pub fn with_subseparator_count(mut self, count: usize) -> Self {
        self.subseparator_count = count;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: Option<f64>) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, min_limit: Option<f64>, max_limit: Option<f64>) -> Self {
        self.min_limit = min_limit;
        self.max_limit = max_limit;
        self
    }

    #[must_use]
    pub fn with_min_zoom_delta(mut self, min_zoom_delta: Option<f64>) -> Self {
        self.min_zoom_delta = min_zoom_delta;
        self
    }

    #[must_use]
    pub fn is_logarithmic(&self) -> bool {
        self.log_base.is_some()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some(base) = self.log_base {
            if !base.is_finite() || base <= 1.0 {
                return Err(ChartError::InvalidRange(format!(
                    "log base must be finite and > 1, got {base}"
                )));
            }
        }
        if !self.min_step.is_finite() || self.min_step < 0.0 {
            return Err(ChartError::InvalidData(
                "axis min step must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(step) = self.step {
            if !step.is_finite() {
                return Err(ChartError::InvalidData(
                    "axis step must be finite".to_owned(),
                ));
            }
        }
        if !self.unit_width.is_finite() || self.unit_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis unit width must be finite and > 0".to_owned(),
            ));
        }
        for (name, limit) in [("min", self.min_limit), ("max", self.max_limit)] {
            if let Some(value) = limit {
                if !value.is_finite() {
                    return Err(ChartError::InvalidData(format!(
                        "axis {name} limit must be finite"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_limit, self.max_limit) {
            if min >= max {
                return Err(ChartError::InvalidRange(format!(
                    "axis min limit {min} must be < max limit {max}"
                )));
            }
        }
        if let Some(delta) = self.min_zoom_delta {
            if !delta.is_finite() || delta < 0.0 {
                return Err(ChartError::InvalidData(
                    "axis min zoom delta must be finite and >= 0".to_owned(),
                ));
            }
        }
        if let Some(separators) = &self.custom_separators {
            if separators.iter().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(
                    "custom separators must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

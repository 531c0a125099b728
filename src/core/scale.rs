use crate::core::axis::{AxisOrientation, AxisSpec};
use crate::core::bounds::{AxisBounds, MIN_POSITIVE_BOUND};
use crate::core::types::{Point, Size};
use crate::error::{ChartError, ChartResult};

/// Maps data values of one axis to pixels inside the draw margin and back.
///
/// Log axes are linear in log space: bounds are transformed once at
/// construction and every value is transformed on the way in (and
/// exponentiated on the way out), so callers always pass raw data values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScaler {
    start_px: f64,
    length_px: f64,
    scale_min: f64,
    scale_max: f64,
    log_base: Option<f64>,
}

impl AxisScaler {
    pub fn new(
        draw_origin: Point,
        draw_size: Size,
        spec: &AxisSpec,
        bounds: AxisBounds,
    ) -> ChartResult<Self> {
        if bounds.is_empty() || bounds.min == bounds.max {
            return Err(ChartError::InvalidRange(format!(
                "{:?} axis bounds {}..{} cannot be scaled",
                spec.orientation, bounds.min, bounds.max
            )));
        }

        let (start_px, length_px) = match spec.orientation {
            AxisOrientation::X => (f64::from(draw_origin.x), f64::from(draw_size.width)),
            AxisOrientation::Y | AxisOrientation::Acceleration | AxisOrientation::Displacement => (
                f64::from(draw_origin.y) + f64::from(draw_size.height),
                -f64::from(draw_size.height),
            ),
        };
        if !start_px.is_finite() || !length_px.is_finite() || length_px == 0.0 {
            return Err(ChartError::InvalidRange(format!(
                "{:?} axis has no pixel extent to scale into",
                spec.orientation
            )));
        }
        let (start_px, length_px) = if spec.is_inverted {
            (start_px + length_px, -length_px)
        } else {
            (start_px, length_px)
        };

        let (scale_min, scale_max) = match spec.log_base {
            Some(base) => {
                if !base.is_finite() || base <= 1.0 {
                    return Err(ChartError::InvalidRange(format!(
                        "log base must be finite and > 1, got {base}"
                    )));
                }
                if bounds.min <= 0.0 {
                    return Err(ChartError::InvalidRange(format!(
                        "log axis bounds must be > 0, got {}..{}",
                        bounds.min, bounds.max
                    )));
                }
                (bounds.min.log(base), bounds.max.log(base))
            }
            None => (bounds.min, bounds.max),
        };

        Ok(Self {
            start_px,
            length_px,
            scale_min,
            scale_max,
            log_base: spec.log_base,
        })
    }

    /// Scale-space bounds (log-transformed on log axes).
    #[must_use]
    pub fn scale_bounds(&self) -> (f64, f64) {
        (self.scale_min, self.scale_max)
    }

    #[must_use]
    pub fn to_pixels(&self, value: f64) -> f32 {
        let scaled = self.to_scale_space(value);
        let ratio = (scaled - self.scale_min) / (self.scale_max - self.scale_min);
        (self.start_px + ratio * self.length_px) as f32
    }

    #[must_use]
    pub fn to_chart_values(&self, pixel: f32) -> f64 {
        let ratio = (f64::from(pixel) - self.start_px) / self.length_px;
        let scaled = self.scale_min + ratio * (self.scale_max - self.scale_min);
        self.from_scale_space(scaled)
    }

    /// Pixel length of `delta`, expressed in scale-space units.
    #[must_use]
    pub fn measure_in_pixels(&self, delta: f64) -> f32 {
        (delta / (self.scale_max - self.scale_min) * self.length_px).abs() as f32
    }

    #[must_use]
    pub fn to_scale_space(&self, value: f64) -> f64 {
        match self.log_base {
            Some(base) => value.max(MIN_POSITIVE_BOUND).log(base),
            None => value,
        }
    }

    #[must_use]
    pub fn from_scale_space(&self, scaled: f64) -> f64 {
        match self.log_base {
            Some(base) => base.powf(scaled),
            None => scaled,
        }
    }
}

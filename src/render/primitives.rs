use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color, every channel in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Same color drawn at a geometry's current opacity.
    #[must_use]
    pub fn faded(self, opacity: f32) -> Self {
        Self {
            alpha: (self.alpha * opacity).clamp(0.0, 1.0),
            ..self
        }
    }

    fn validate(self) -> ChartResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        if channels
            .iter()
            .all(|channel| (0.0..=1.0).contains(channel))
        {
            Ok(())
        } else {
            Err(ChartError::InvalidData(format!(
                "color {self:?} has a channel outside [0, 1]"
            )))
        }
    }
}

fn finite_point(point: Point, what: &str) -> ChartResult<()> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} at ({}, {}) is not finite",
            point.x, point.y
        )))
    }
}

/// One separator, tick or crosshair segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub start: Point,
    pub end: Point,
    pub stroke_width: f32,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(start: Point, end: Point, stroke_width: f32, color: Color) -> Self {
        Self {
            start,
            end,
            stroke_width,
            color,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        finite_point(self.start, "line start")?;
        finite_point(self.end, "line end")?;
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(ChartError::InvalidData(format!(
                "stroke width {} must be finite and > 0",
                self.stroke_width
            )));
        }
        self.color.validate()
    }
}

/// Filled rectangle; the zoom box is the only one drawn today.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub fill: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(rect: Rect, fill: Color) -> Self {
        Self { rect, fill }
    }

    pub fn validate(&self) -> ChartResult<()> {
        finite_point(self.rect.origin, "rect origin")?;
        let size = self.rect.size;
        let drawable = |extent: f32| extent.is_finite() && extent >= 0.0;
        if !(drawable(size.width) && drawable(size.height)) {
            return Err(ChartError::InvalidData(format!(
                "rect size {}x{} must be finite and >= 0",
                size.width, size.height
            )));
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to the label anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// One axis, diagonal or title label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub anchor: Point,
    pub font_size_px: f32,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Clockwise, around `anchor`.
    pub rotation_deg: f32,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        anchor: Point,
        font_size_px: f32,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            anchor,
            font_size_px,
            color,
            h_align,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f32) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "empty labels are culled before rendering".to_owned(),
            ));
        }
        finite_point(self.anchor, "label anchor")?;
        if !self.rotation_deg.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "label `{}` has a non-finite rotation",
                self.text
            )));
        }
        if !(self.font_size_px.is_finite() && self.font_size_px > 0.0) {
            return Err(ChartError::InvalidData(format!(
                "label `{}` has font size {}",
                self.text, self.font_size_px
            )));
        }
        self.color.validate()
    }
}

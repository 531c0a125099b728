use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect, Size};
use crate::render::{CanvasLayerKind, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub u64);

/// Either kind of geometry, for operations shared by lines and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryHandle {
    Line(LineHandle),
    Label(LabelHandle),
}

impl From<LineHandle> for GeometryHandle {
    fn from(handle: LineHandle) -> Self {
        Self::Line(handle)
    }
}

impl From<LabelHandle> for GeometryHandle {
    fn from(handle: LabelHandle) -> Self {
        Self::Label(handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    #[default]
    EaseOut,
    EaseInOut,
}

/// How a geometry moves from its current to its target properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: Easing::EaseOut,
        }
    }
}

/// Retained-mode drawing capability the layout core is written against.
///
/// The core creates geometries once, then only sets target properties and
/// transition hints on them. Interpolation and actual drawing belong to the
/// implementation. A setter on a geometry that has been given a transition
/// animates towards the new value; `complete_transition` jumps to it.
pub trait GeometryBackend {
    fn create_line(&mut self, layer: CanvasLayerKind) -> LineHandle;
    fn create_label(&mut self, layer: CanvasLayerKind) -> LabelHandle;

    fn set_line_endpoints(&mut self, line: LineHandle, start: Point, end: Point);
    fn set_label_text(&mut self, label: LabelHandle, text: &str, font_size_px: f32);
    fn set_label_position(&mut self, label: LabelHandle, position: Point, h_align: TextHAlign);
    fn set_label_rotation(&mut self, label: LabelHandle, rotation_deg: f32);

    fn set_opacity(&mut self, geometry: GeometryHandle, opacity: f32);
    fn animate(&mut self, geometry: GeometryHandle, transition: Transition);
    fn complete_transition(&mut self, geometry: GeometryHandle);
    /// Drops the geometry once its running transition finishes.
    fn remove_on_completed(&mut self, geometry: GeometryHandle);
    /// Drops the geometry immediately.
    fn release(&mut self, geometry: GeometryHandle);

    fn set_clip_rectangle(&mut self, layer: CanvasLayerKind, clip: Option<Rect>);
    fn measure_text(&self, text: &str, font_size_px: f32) -> Size;
}

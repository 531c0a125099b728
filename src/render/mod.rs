mod frame;
mod geometry;
mod layer_stack;
mod null_renderer;
mod primitives;
mod recording_backend;

pub use frame::RenderFrame;
pub use geometry::{
    Easing, GeometryBackend, GeometryHandle, LabelHandle, LineHandle, Transition,
};
pub use layer_stack::{CanvasLayerKind, LayerStack};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};
pub use recording_backend::{LayerStyle, RecordedLabel, RecordedLine, RecordingBackend};

use crate::core::Viewport;
use crate::error::ChartResult;

/// Contract implemented by any immediate-mode rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from the layout core.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

/// Retained scenes that can flatten their current state into a frame.
pub trait SceneSnapshot {
    fn snapshot(&self, viewport: Viewport) -> RenderFrame;
}

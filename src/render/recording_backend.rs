use indexmap::IndexMap;
use tracing::trace;

use crate::core::{Point, Rect, Size, Viewport};
use crate::render::{
    CanvasLayerKind, Color, GeometryBackend, GeometryHandle, LabelHandle, LayerStack, LineHandle,
    LinePrimitive, RenderFrame, SceneSnapshot, TextHAlign, TextPrimitive, Transition,
};

/// Line properties as the backend currently holds them.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLine {
    pub layer: CanvasLayerKind,
    pub start: Point,
    pub end: Point,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLabel {
    pub layer: CanvasLayerKind,
    pub text: String,
    pub font_size_px: f32,
    pub position: Point,
    pub h_align: TextHAlign,
    pub rotation_deg: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub color: Color,
    pub stroke_width: f32,
}

#[derive(Debug, Clone)]
struct Node<T> {
    current: T,
    target: T,
    transition: Option<Transition>,
    pending: bool,
    remove_on_completed: bool,
}

impl<T: Clone> Node<T> {
    fn new(value: T) -> Self {
        Self {
            current: value.clone(),
            target: value,
            transition: None,
            pending: false,
            remove_on_completed: false,
        }
    }

    fn update(&mut self, apply: impl Fn(&mut T)) {
        apply(&mut self.target);
        if self.transition.is_some() {
            self.pending = true;
        } else {
            apply(&mut self.current);
        }
    }

    fn complete(&mut self) {
        self.current = self.target.clone();
        self.pending = false;
    }
}

/// Headless retained scene.
///
/// Keeps both the current and the target state of every geometry so tests
/// and hosts can observe what the layout core asked for. Animation time is
/// not simulated: `finish_animations` stands in for the animation clock
/// reaching the end of every running transition.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    next_id: u64,
    lines: IndexMap<u64, Node<RecordedLine>>,
    labels: IndexMap<u64, Node<RecordedLabel>>,
    clips: IndexMap<CanvasLayerKind, Rect>,
    layer_stack: LayerStack,
    char_width_ratio: f32,
    line_height_ratio: f32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            lines: IndexMap::new(),
            labels: IndexMap::new(),
            clips: IndexMap::new(),
            layer_stack: LayerStack::canonical(),
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }

    /// Overrides the fixed-pitch text metrics used by `measure_text`.
    #[must_use]
    pub fn with_text_metrics(mut self, char_width_ratio: f32, line_height_ratio: f32) -> Self {
        self.char_width_ratio = char_width_ratio;
        self.line_height_ratio = line_height_ratio;
        self
    }

    #[must_use]
    pub fn line(&self, handle: LineHandle) -> Option<&RecordedLine> {
        self.lines.get(&handle.0).map(|node| &node.current)
    }

    #[must_use]
    pub fn line_target(&self, handle: LineHandle) -> Option<&RecordedLine> {
        self.lines.get(&handle.0).map(|node| &node.target)
    }

    #[must_use]
    pub fn label(&self, handle: LabelHandle) -> Option<&RecordedLabel> {
        self.labels.get(&handle.0).map(|node| &node.current)
    }

    #[must_use]
    pub fn label_target(&self, handle: LabelHandle) -> Option<&RecordedLabel> {
        self.labels.get(&handle.0).map(|node| &node.target)
    }

    #[must_use]
    pub fn is_alive(&self, geometry: GeometryHandle) -> bool {
        match geometry {
            GeometryHandle::Line(handle) => self.lines.contains_key(&handle.0),
            GeometryHandle::Label(handle) => self.labels.contains_key(&handle.0),
        }
    }

    #[must_use]
    pub fn is_pending_removal(&self, geometry: GeometryHandle) -> bool {
        match geometry {
            GeometryHandle::Line(handle) => self
                .lines
                .get(&handle.0)
                .is_some_and(|node| node.remove_on_completed),
            GeometryHandle::Label(handle) => self
                .labels
                .get(&handle.0)
                .is_some_and(|node| node.remove_on_completed),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn lines_on(&self, layer: CanvasLayerKind) -> Vec<&RecordedLine> {
        self.lines
            .values()
            .map(|node| &node.current)
            .filter(|line| line.layer == layer)
            .collect()
    }

    #[must_use]
    pub fn labels_on(&self, layer: CanvasLayerKind) -> Vec<&RecordedLabel> {
        self.labels
            .values()
            .map(|node| &node.current)
            .filter(|label| label.layer == layer)
            .collect()
    }

    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.lines.values().filter(|node| node.pending).count()
            + self.labels.values().filter(|node| node.pending).count()
    }

    #[must_use]
    pub fn clip_rectangle(&self, layer: CanvasLayerKind) -> Option<Rect> {
        self.clips.get(&layer).copied()
    }

    /// Runs every pending transition to its end and drops geometries marked
    /// `remove_on_completed`. Returns how many geometries were dropped.
    pub fn finish_animations(&mut self) -> usize {
        for node in self.lines.values_mut() {
            node.complete();
        }
        for node in self.labels.values_mut() {
            node.complete();
        }
        let before = self.lines.len() + self.labels.len();
        self.lines.retain(|_, node| !node.remove_on_completed);
        self.labels.retain(|_, node| !node.remove_on_completed);
        let removed = before - (self.lines.len() + self.labels.len());
        trace!(removed, "finished animations");
        removed
    }

    #[must_use]
    pub fn layer_style(layer: CanvasLayerKind) -> LayerStyle {
        let (color, stroke_width) = match layer {
            CanvasLayerKind::Subseparators => (Color::rgba(0.5, 0.5, 0.5, 0.25), 0.5),
            CanvasLayerKind::Separators => (Color::rgba(0.5, 0.5, 0.5, 0.6), 1.0),
            CanvasLayerKind::Diagonals => (Color::rgba(0.35, 0.35, 0.55, 0.6), 1.0),
            CanvasLayerKind::Subticks | CanvasLayerKind::Ticks => (Color::rgb(0.3, 0.3, 0.3), 1.0),
            CanvasLayerKind::Crosshair => (Color::rgb(0.8, 0.2, 0.2), 1.0),
            CanvasLayerKind::DiagonalLabels
            | CanvasLayerKind::AxisLabels
            | CanvasLayerKind::AxisNames
            | CanvasLayerKind::Title
            | CanvasLayerKind::CrosshairLabels => (Color::rgb(0.15, 0.15, 0.15), 1.0),
        };
        LayerStyle {
            color,
            stroke_width,
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn with_line(&mut self, handle: LineHandle, apply: impl Fn(&mut RecordedLine)) {
        match self.lines.get_mut(&handle.0) {
            Some(node) => node.update(apply),
            None => trace!(handle = handle.0, "ignoring update of released line"),
        }
    }

    fn with_label(&mut self, handle: LabelHandle, apply: impl Fn(&mut RecordedLabel)) {
        match self.labels.get_mut(&handle.0) {
            Some(node) => node.update(apply),
            None => trace!(handle = handle.0, "ignoring update of released label"),
        }
    }
}

impl GeometryBackend for RecordingBackend {
    fn create_line(&mut self, layer: CanvasLayerKind) -> LineHandle {
        let id = self.allocate();
        self.lines.insert(
            id,
            Node::new(RecordedLine {
                layer,
                start: Point::default(),
                end: Point::default(),
                opacity: 1.0,
            }),
        );
        LineHandle(id)
    }

    fn create_label(&mut self, layer: CanvasLayerKind) -> LabelHandle {
        let id = self.allocate();
        self.labels.insert(
            id,
            Node::new(RecordedLabel {
                layer,
                text: String::new(),
                font_size_px: 12.0,
                position: Point::default(),
                h_align: TextHAlign::Center,
                rotation_deg: 0.0,
                opacity: 1.0,
            }),
        );
        LabelHandle(id)
    }

    fn set_line_endpoints(&mut self, line: LineHandle, start: Point, end: Point) {
        self.with_line(line, |state| {
            state.start = start;
            state.end = end;
        });
    }

    fn set_label_text(&mut self, label: LabelHandle, text: &str, font_size_px: f32) {
        self.with_label(label, |state| {
            text.clone_into(&mut state.text);
            state.font_size_px = font_size_px;
        });
    }

    fn set_label_position(&mut self, label: LabelHandle, position: Point, h_align: TextHAlign) {
        self.with_label(label, |state| {
            state.position = position;
            state.h_align = h_align;
        });
    }

    fn set_label_rotation(&mut self, label: LabelHandle, rotation_deg: f32) {
        self.with_label(label, |state| state.rotation_deg = rotation_deg);
    }

    fn set_opacity(&mut self, geometry: GeometryHandle, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        match geometry {
            GeometryHandle::Line(handle) => self.with_line(handle, |state| state.opacity = opacity),
            GeometryHandle::Label(handle) => {
                self.with_label(handle, |state| state.opacity = opacity);
            }
        }
    }

    fn animate(&mut self, geometry: GeometryHandle, transition: Transition) {
        match geometry {
            GeometryHandle::Line(handle) => {
                if let Some(node) = self.lines.get_mut(&handle.0) {
                    node.transition = Some(transition);
                }
            }
            GeometryHandle::Label(handle) => {
                if let Some(node) = self.labels.get_mut(&handle.0) {
                    node.transition = Some(transition);
                }
            }
        }
    }

    fn complete_transition(&mut self, geometry: GeometryHandle) {
        match geometry {
            GeometryHandle::Line(handle) => {
                if let Some(node) = self.lines.get_mut(&handle.0) {
                    node.complete();
                }
            }
            GeometryHandle::Label(handle) => {
                if let Some(node) = self.labels.get_mut(&handle.0) {
                    node.complete();
                }
            }
        }
    }

    fn remove_on_completed(&mut self, geometry: GeometryHandle) {
        match geometry {
            GeometryHandle::Line(handle) => {
                if let Some(node) = self.lines.get_mut(&handle.0) {
                    node.remove_on_completed = true;
                }
            }
            GeometryHandle::Label(handle) => {
                if let Some(node) = self.labels.get_mut(&handle.0) {
                    node.remove_on_completed = true;
                }
            }
        }
    }

    fn release(&mut self, geometry: GeometryHandle) {
        match geometry {
            GeometryHandle::Line(handle) => {
                self.lines.shift_remove(&handle.0);
            }
            GeometryHandle::Label(handle) => {
                self.labels.shift_remove(&handle.0);
            }
        }
    }

    fn set_clip_rectangle(&mut self, layer: CanvasLayerKind, clip: Option<Rect>) {
        match clip {
            Some(rect) => {
                self.clips.insert(layer, rect);
            }
            None => {
                self.clips.shift_remove(&layer);
            }
        }
    }

    fn measure_text(&self, text: &str, font_size_px: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let chars = text.chars().count() as f32;
        Size::new(
            chars * font_size_px * self.char_width_ratio,
            font_size_px * self.line_height_ratio,
        )
    }
}

impl SceneSnapshot for RecordingBackend {
    fn snapshot(&self, viewport: Viewport) -> RenderFrame {
        let mut frame = RenderFrame::new(viewport);
        for layer in &self.layer_stack.layers {
            let style = Self::layer_style(*layer);
            for line in self.lines.values().map(|node| &node.current) {
                if line.layer != *layer || line.opacity <= 0.0 {
                    continue;
                }
                frame.lines.push(LinePrimitive::new(
                    line.start,
                    line.end,
                    style.stroke_width,
                    style.color.faded(line.opacity),
                ));
            }
            for label in self.labels.values().map(|node| &node.current) {
                if label.layer != *layer || label.opacity <= 0.0 || label.text.is_empty() {
                    continue;
                }
                frame.texts.push(
                    TextPrimitive::new(
                        label.text.clone(),
                        label.position,
                        label.font_size_px,
                        style.color.faded(label.opacity),
                        label.h_align,
                    )
                    .with_rotation(label.rotation_deg),
                );
            }
        }
        frame
    }
}

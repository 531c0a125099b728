use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Point, Rect};

/// Drags shorter than this are treated as clicks and never change limits.
pub const ZOOM_CLICK_THRESHOLD_PX: f32 = 15.0;

/// Axes a zoom-box drag is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomMode {
    None,
    X,
    Y,
    #[default]
    Both,
}

impl ZoomMode {
    #[must_use]
    pub fn zooms_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    #[must_use]
    pub fn zooms_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ZoomBoxState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        current: Point,
    },
}

/// What a pointer release did to the zoom box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomBoxRelease {
    /// No drag was in progress.
    Ignored,
    /// Released within the click threshold; the box was discarded.
    Click,
    /// A real drag; the host should commit limits for this pixel rectangle.
    Commit(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrosshairPhase {
    #[default]
    Idle,
    Tracking,
}

/// Nearest series point the crosshair locked onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairSnap {
    pub pixel: Point,
    pub data: DataPoint,
}

/// Public crosshair state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrosshairState {
    pub phase: CrosshairPhase,
    pub pointer: Point,
    pub snap: Option<CrosshairSnap>,
}

impl CrosshairState {
    #[must_use]
    pub fn is_tracking(self) -> bool {
        self.phase == CrosshairPhase::Tracking
    }

    /// Pixel the crosshair lines pass through, snapped when a snap exists.
    #[must_use]
    pub fn anchor(self) -> Point {
        self.snap.map_or(self.pointer, |snap| snap.pixel)
    }
}

/// Pointer-driven state: the zoom box and the crosshair move independently.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    zoom_box: ZoomBoxState,
    crosshair: CrosshairState,
}

impl InteractionState {
    #[must_use]
    pub fn zoom_box_state(self) -> ZoomBoxState {
        self.zoom_box
    }

    /// Current drag rectangle in pixels, if a drag is in progress.
    #[must_use]
    pub fn zoom_box(self) -> Option<Rect> {
        match self.zoom_box {
            ZoomBoxState::Idle => None,
            ZoomBoxState::Dragging { start, current } => Some(Rect::from_corners(start, current)),
        }
    }

    #[must_use]
    pub fn crosshair(self) -> CrosshairState {
        self.crosshair
    }

    pub fn begin_zoom_box(&mut self, point: Point) {
        self.zoom_box = ZoomBoxState::Dragging {
            start: point,
            current: point,
        };
    }

    pub fn on_pointer_move(&mut self, point: Point) {
        if let ZoomBoxState::Dragging { start, .. } = self.zoom_box {
            self.zoom_box = ZoomBoxState::Dragging {
                start,
                current: point,
            };
        }
        self.crosshair.phase = CrosshairPhase::Tracking;
        self.crosshair.pointer = point;
    }

    pub fn on_pointer_up(&mut self, point: Point) -> ZoomBoxRelease {
        let ZoomBoxState::Dragging { start, .. } = self.zoom_box else {
            return ZoomBoxRelease::Ignored;
        };
        self.zoom_box = ZoomBoxState::Idle;
        if start.distance_to(point) < ZOOM_CLICK_THRESHOLD_PX {
            return ZoomBoxRelease::Click;
        }
        ZoomBoxRelease::Commit(Rect::from_corners(start, point))
    }

    /// Drops an in-progress drag without committing anything.
    pub fn cancel_zoom_box(&mut self) {
        self.zoom_box = ZoomBoxState::Idle;
    }

    pub fn on_pointer_leave(&mut self) {
        self.crosshair = CrosshairState::default();
    }

    pub fn set_crosshair_snap(&mut self, snap: Option<CrosshairSnap>) {
        self.crosshair.snap = snap;
    }
}

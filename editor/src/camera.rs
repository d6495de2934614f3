//! Pan and zoom state for the editing viewport.

use bastion_core::{ScreenPoint, WorldPoint};

/// Smallest zoom factor the camera may reach.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest zoom factor the camera may reach.
pub const MAX_ZOOM: f32 = 5.0;

/// Zoom change applied per notch of wheel travel.
pub const ZOOM_STEP: f32 = 0.1;

/// Viewport transform mapping world coordinates to screen coordinates.
///
/// The transform is `screen = world * zoom + offset`; zooming re-derives the
/// offset so that the world point under the anchor stays put on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    offset: ScreenPoint,
    zoom: f32,
}

impl Camera {
    /// Creates a camera with no pan offset and a neutral zoom factor.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            offset: ScreenPoint::new(0.0, 0.0),
            zoom: 1.0,
        }
    }

    /// Current pan offset in screen coordinates.
    #[must_use]
    pub const fn offset(&self) -> ScreenPoint {
        self.offset
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Converts a screen position into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, point: ScreenPoint) -> WorldPoint {
        WorldPoint::new(
            (point.x() - self.offset.x()) / self.zoom,
            (point.y() - self.offset.y()) / self.zoom,
        )
    }

    /// Converts a world position into screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, point: WorldPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.x() * self.zoom + self.offset.x(),
            point.y() * self.zoom + self.offset.y(),
        )
    }

    /// Replaces the pan offset with a new absolute value.
    pub(crate) fn set_offset(&mut self, offset: ScreenPoint) {
        self.offset = offset;
    }

    /// Zooms by whole notches while keeping `anchor` over the same world
    /// point, clamping the factor to the permitted range.
    pub(crate) fn zoom_by(&mut self, anchor: ScreenPoint, steps: i32) {
        let pivot = self.screen_to_world(anchor);
        let proposed = self.zoom + steps as f32 * ZOOM_STEP;
        self.zoom = proposed.clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = ScreenPoint::new(
            anchor.x() - pivot.x() * self.zoom,
            anchor.y() - pivot.y() * self.zoom,
        );
    }
}

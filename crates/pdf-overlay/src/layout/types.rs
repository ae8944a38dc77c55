//! Layout data types for overlay placement
//!
//! Two coordinate systems meet here:
//! - percentage space: 0–100 of page width/height, top-left origin, y down
//! - document space: points, bottom-left origin, y up

use crate::types::OverlayId;

/// A point in screen pixels or document points, depending on context
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen size of the container the page is rendered into, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. Stands in for the page aspect ratio, assuming the
    /// page is rendered at its true proportions.
    pub fn ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Finite and non-empty, so pointer deltas can be turned into percents
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One placed image on one page, in percentage space.
///
/// `width` is a percentage of page width and `height` a percentage of page
/// height, so keeping the image undistorted needs the page aspect ratio (see
/// [`aspect_locked_height`](super::aspect_locked_height)).
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    /// Zero-based target page
    pub page: usize,
    /// Left edge, percent of page width
    pub x: f32,
    /// Top edge, percent of page height
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees clockwise from 12 o'clock, pivoting on the box center.
    /// Unbounded; see [`Overlay::display_rotation`].
    pub rotation: f32,
    /// Natural width / height of the source image
    pub image_aspect: f32,
}

impl Overlay {
    /// Right edge in percent
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge in percent
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Rotation folded into `[0, 360)` for display
    pub fn display_rotation(&self) -> f32 {
        self.rotation.rem_euclid(360.0)
    }
}

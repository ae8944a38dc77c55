//! Overlay placement in percentage space
//!
//! This module keeps an overlay's box valid across the three interactions
//! the editor supports:
//! - moving (position clamped so the box stays on the page)
//! - aspect-locked resizing from the corner handle
//! - rotating around the box center
//!
//! Nothing here can fail. Out-of-range requests are clamped, never rejected.

use crate::constants::{
    DEFAULT_OVERLAY_POSITION_PCT, DEFAULT_OVERLAY_WIDTH_PCT, FULL_EXTENT_PCT,
    MIN_OVERLAY_WIDTH_PCT, ROTATION_HANDLE_OFFSET_DEG,
};
use crate::types::OverlayId;

use super::{Overlay, Point};

/// Height (percent of page height) that keeps an image undistorted at the
/// given width (percent of page width).
///
/// # Arguments
/// * `width` - Overlay width in percent of page width
/// * `page_ratio` - Page (or container) width over height
/// * `image_aspect` - Source image width over height
pub fn aspect_locked_height(width: f32, page_ratio: f32, image_aspect: f32) -> f32 {
    width * page_ratio / image_aspect
}

/// Clamp a top-left position so a `width x height` box stays on the page.
pub fn clamp_position(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    let max_x = (FULL_EXTENT_PCT - width).max(0.0);
    let max_y = (FULL_EXTENT_PCT - height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Clamp a requested width to `[MIN_OVERLAY_WIDTH_PCT, 100 - x]`.
///
/// When `x` leaves less than the minimum width, the minimum wins.
pub fn clamp_width(width: f32, x: f32) -> f32 {
    width
        .min(FULL_EXTENT_PCT - x)
        .max(MIN_OVERLAY_WIDTH_PCT)
}

/// Absolute rotation (degrees clockwise from straight up) of a handle
/// pointing from `center` to `pointer`, both in screen pixels (y down).
pub fn rotation_from_pointer(pointer: Point, center: Point) -> f32 {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    dy.atan2(dx).to_degrees() + ROTATION_HANDLE_OFFSET_DEG
}

impl Overlay {
    /// Create an overlay with the default size and position.
    ///
    /// The height follows from the image and page aspect ratios; the
    /// position is pulled back if the derived height would run off the page.
    pub fn new(id: OverlayId, page: usize, image_aspect: f32, page_ratio: f32) -> Self {
        let width = DEFAULT_OVERLAY_WIDTH_PCT;
        let height = aspect_locked_height(width, page_ratio, image_aspect);
        let (x, y) = clamp_position(
            DEFAULT_OVERLAY_POSITION_PCT.0,
            DEFAULT_OVERLAY_POSITION_PCT.1,
            width,
            height,
        );

        Self {
            id,
            page,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            image_aspect,
        }
    }

    /// Move the box to a new top-left position, clamped to the page.
    pub fn move_to(&mut self, x: f32, y: f32) {
        (self.x, self.y) = clamp_position(x, y, self.width, self.height);
    }

    /// Move the box by a percentage delta, clamped to the page.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.move_to(self.x + dx, self.y + dy);
    }

    /// Set the width (clamped) and derive the height from it.
    ///
    /// Position is left alone; only growth past the right edge is prevented.
    pub fn resize_to(&mut self, width: f32, page_ratio: f32) {
        let width = clamp_width(width, self.x);
        self.height = aspect_locked_height(width, page_ratio, self.image_aspect);
        self.width = width;
    }

    /// Grow or shrink the width by a percentage delta.
    pub fn resize_by(&mut self, dw: f32, page_ratio: f32) {
        self.resize_to(self.width + dw, page_ratio);
    }

    /// Point the rotation handle at `pointer`, pivoting on `center`.
    pub fn rotate_towards(&mut self, pointer: Point, center: Point) {
        self.rotation = rotation_from_pointer(pointer, center);
    }

    /// Place the box explicitly, e.g. from a saved plan.
    ///
    /// Width is clamped to `[MIN_OVERLAY_WIDTH_PCT, 100]`, the height follows
    /// from the aspect lock and the position is clamped to the page.
    pub fn place(&mut self, x: f32, y: f32, width: f32, page_ratio: f32) {
        let width = width.clamp(MIN_OVERLAY_WIDTH_PCT, FULL_EXTENT_PCT);
        self.width = width;
        self.height = aspect_locked_height(width, page_ratio, self.image_aspect);
        self.move_to(x, y);
    }
}

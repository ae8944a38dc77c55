//! Percentage space to document space
//!
//! The editor rotates an overlay clockwise around its center in a top-left
//! origin space. PDF draws an image axis-aligned from its lower-left corner
//! and the `cm` rotation pivots on that corner, counter-clockwise, in a
//! bottom-left origin space. The transform here places the corner so that
//! the rotated image ends up centered exactly where the user saw it.

use crate::types::{DrawInstruction, OverlayId, PageGeometry};

use super::{Overlay, Point, Rect};

/// Unrotated bounding box of an overlay in document space (points).
pub fn overlay_rect(overlay: &Overlay, page: &PageGeometry) -> Rect {
    let width = (overlay.width / 100.0) * page.width;
    let height = (overlay.height / 100.0) * page.height;
    let x = page.origin_x + (overlay.x / 100.0) * page.width;
    // Top-down percent to bottom-up points, then down to the lower edge
    let y = page.origin_y + page.height - (overlay.y / 100.0) * page.height - height;

    Rect::new(x, y, width, height)
}

/// Convert an overlay into parameters for a corner-pivoted draw primitive.
///
/// Pure: the same overlay and page always give the same instruction, and
/// rotations outside `[0, 360)` need no normalization.
pub fn to_draw_instruction(overlay: &Overlay, page: &PageGeometry) -> DrawInstruction {
    let rect = overlay_rect(overlay, page);
    let center = rect.center();

    let pdf_angle = -overlay.rotation;
    let theta = pdf_angle.to_radians();
    let (sin, cos) = theta.sin_cos();

    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;

    // Corner-to-center vector after the primitive's rotation
    let vec_x = half_w * cos - half_h * sin;
    let vec_y = half_w * sin + half_h * cos;

    DrawInstruction {
        draw_x: center.x - vec_x,
        draw_y: center.y - vec_y,
        width: rect.width,
        height: rect.height,
        rotation_degrees: pdf_angle,
    }
}

/// Corners of the drawn image after rotation, counter-clockwise from the
/// lower-left anchor.
pub fn rotated_corners(instruction: &DrawInstruction) -> [Point; 4] {
    let (sin, cos) = instruction.rotation_degrees.to_radians().sin_cos();
    let rotate = |dx: f32, dy: f32| {
        Point::new(
            instruction.draw_x + dx * cos - dy * sin,
            instruction.draw_y + dx * sin + dy * cos,
        )
    };

    [
        rotate(0.0, 0.0),
        rotate(instruction.width, 0.0),
        rotate(instruction.width, instruction.height),
        rotate(0.0, instruction.height),
    ]
}

/// Midpoint of the rotated image
pub fn drawn_center(instruction: &DrawInstruction) -> Point {
    let corners = rotated_corners(instruction);
    let sum = corners
        .iter()
        .fold(Point::default(), |acc, p| Point::new(acc.x + p.x, acc.y + p.y));
    Point::new(sum.x / 4.0, sum.y / 4.0)
}

/// An overlay that survived page pruning, with its draw instruction
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDraw {
    pub overlay: OverlayId,
    pub page: usize,
    pub instruction: DrawInstruction,
}

/// Transform every overlay whose page exists in `pages`.
///
/// Overlays pointing past the last page are dropped without error.
/// Output keeps page order, then insertion order within a page.
pub fn transform_all<'a>(
    overlays: impl IntoIterator<Item = &'a Overlay>,
    pages: &[PageGeometry],
) -> Vec<PlannedDraw> {
    let mut planned: Vec<PlannedDraw> = overlays
        .into_iter()
        .filter_map(|overlay| {
            let page = pages.get(overlay.page)?;
            Some(PlannedDraw {
                overlay: overlay.id,
                page: overlay.page,
                instruction: to_draw_instruction(overlay, page),
            })
        })
        .collect();

    // Stable: insertion order survives within each page
    planned.sort_by_key(|draw| draw.page);
    planned
}

//! Geometry for image overlays
//!
//! This module handles all the geometric work behind placing an image:
//! - The overlay box in page-percentage space (move, resize, rotate)
//! - Conversion to a corner-pivoted draw instruction in points

mod placement;
mod transform;
mod types;

pub use placement::*;
pub use transform::*;
pub use types::*;

//! Shared constants for overlay placement and export
//!
//! This module centralizes magic numbers used by the placement model
//! and the PDF writer.

// =============================================================================
// Percentage Space
// =============================================================================

/// Full extent of the page along either axis, in percent
pub const FULL_EXTENT_PCT: f32 = 100.0;

/// Smallest width an overlay can be resized to, in percent of page width
pub const MIN_OVERLAY_WIDTH_PCT: f32 = 5.0;

/// Width of a freshly created overlay, in percent of page width
pub const DEFAULT_OVERLAY_WIDTH_PCT: f32 = 20.0;

/// Initial top-left position of a freshly created overlay, in percent
pub const DEFAULT_OVERLAY_POSITION_PCT: (f32, f32) = (10.0, 10.0);

/// Offset aligning zero rotation with a handle pointing straight up
pub const ROTATION_HANDLE_OFFSET_DEG: f32 = 90.0;

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// PDF Output
// =============================================================================

/// Prefix for image XObject resource names added to a page
pub const IMAGE_RESOURCE_PREFIX: &str = "OvImg";

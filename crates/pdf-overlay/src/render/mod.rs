//! PDF writing for overlays
//!
//! This module handles all PDF-specific operations:
//! - Creating Image XObjects from decoded pixels
//! - Reading page geometry (CropBox / MediaBox, inherited values)
//! - Appending corner-pivoted image draws to page content

mod page;
mod xobject;

pub use page::*;
pub use xobject::{create_image_xobject, document_page_geometries, page_geometry};

//! Image XObjects and page geometry
//!
//! This module turns decoded pixels into Image XObjects in the output
//! document and reads the boxes that define a page's visible area.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::decode::DecodedImage;
use crate::types::{PageGeometry, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::io::Write;

// =============================================================================
// XObject Creation
// =============================================================================

/// Add an Image XObject for `image` to `output`.
///
/// Samples are stored as 8-bit DeviceRGB behind FlateDecode. A translucent
/// image gets a DeviceGray soft mask carrying its alpha plane.
pub fn create_image_xobject(output: &mut Document, image: &DecodedImage) -> Result<ObjectId> {
    let mut dict = image_dictionary(image.width, image.height, b"DeviceRGB");

    if let Some(alpha) = &image.alpha {
        let mask_dict = image_dictionary(image.width, image.height, b"DeviceGray");
        let mask_id = output.add_object(Stream::new(mask_dict, deflate(alpha)?));
        dict.set("SMask", Object::Reference(mask_id));
    }

    Ok(output.add_object(Stream::new(dict, deflate(&image.rgb)?)))
}

fn image_dictionary(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

// =============================================================================
// Page Geometry
// =============================================================================

/// Geometry of every page, in page order.
pub fn document_page_geometries(doc: &Document) -> Result<Vec<PageGeometry>> {
    doc.get_pages()
        .values()
        .map(|&page_id| page_geometry(doc, page_id))
        .collect()
}

/// Visible size and origin of a page in points.
///
/// Uses the CropBox when present, otherwise the MediaBox, walking up the
/// page tree for inherited values. Falls back to US Letter at the origin
/// when neither is found or the box has no area.
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let rect = match inherited_box(doc, page_id, b"CropBox")? {
        Some(rect) => Some(rect),
        None => inherited_box(doc, page_id, b"MediaBox")?,
    };

    let letter = PageGeometry::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1);
    let Some([x0, y0, x1, y1]) = rect else {
        return Ok(letter);
    };

    // Boxes may list any two opposite corners
    let geometry =
        PageGeometry::new((x1 - x0).abs(), (y1 - y0).abs()).with_origin(x0.min(x1), y0.min(y1));
    let usable = [geometry.width, geometry.height, geometry.origin_x, geometry.origin_y]
        .iter()
        .all(|v| v.is_finite())
        && geometry.width > 0.0
        && geometry.height > 0.0;

    if usable {
        Ok(geometry)
    } else {
        log::warn!(
            "Page {:?} has a degenerate box {:?}, using US Letter",
            page_id,
            [x0, y0, x1, y1]
        );
        Ok(letter)
    }
}

/// Look up a rectangle attribute on a page or its ancestors.
fn inherited_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<[f32; 4]>> {
    Ok(inherited_attribute(doc, page_id, key)?.and_then(|obj| parse_rect(doc, obj)))
}

/// Look up an inheritable page attribute (Resources, MediaBox, CropBox)
/// on a page or the nearest ancestor that defines it.
///
/// A `Parent` chain that loops back on itself ends the search.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;
    let mut visited = HashSet::from([page_id]);

    loop {
        if let Ok(obj) = node.get(key) {
            return Ok(Some(obj));
        }
        let Ok(parent_id) = node.get(b"Parent").and_then(Object::as_reference) else {
            return Ok(None);
        };
        if !visited.insert(parent_id) {
            log::warn!("Page tree cycle at {:?} while looking up a page attribute", parent_id);
            return Ok(None);
        }
        node = doc.get_dictionary(parent_id)?;
    }
}

fn parse_rect(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let values = obj.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, value) in rect.iter_mut().zip(values) {
        *slot = extract_number(value)?;
    }
    Some(rect)
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

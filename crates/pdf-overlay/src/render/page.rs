//! Drawing overlays onto existing pages
//!
//! The page's original content is wrapped in `q ... Q` so whatever graphics
//! state it leaves behind cannot leak into the overlays, then a new content
//! stream with one corner-pivoted image draw per overlay is appended.

use crate::constants::IMAGE_RESOURCE_PREFIX;
use crate::types::{DrawInstruction, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::inherited_attribute;

/// Draw already-embedded images onto a page.
///
/// Returns the resource names the images were registered under, in the
/// order given.
///
/// # Arguments
/// * `doc` - The document being edited
/// * `page_id` - Object ID of the target page
/// * `draws` - Image XObject IDs with their draw instructions
pub fn draw_images_on_page(
    doc: &mut Document,
    page_id: ObjectId,
    draws: &[(ObjectId, DrawInstruction)],
) -> Result<Vec<String>> {
    if draws.is_empty() {
        return Ok(Vec::new());
    }

    let mut resources = inherited_attribute(doc, page_id, b"Resources")?
        .and_then(|obj| resolve_dictionary(doc, obj))
        .unwrap_or_else(Dictionary::new);
    let mut xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| resolve_dictionary(doc, obj))
        .unwrap_or_else(Dictionary::new);
    let existing_contents = content_references(doc, page_id)?;

    let mut names = Vec::with_capacity(draws.len());
    let mut ops = String::new();
    for (image_id, instruction) in draws {
        let name = unused_name(&xobjects);
        xobjects.set(name.as_bytes(), Object::Reference(*image_id));
        ops.push_str(&draw_image_command(&name, instruction));
        names.push(name);
    }
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut contents = Vec::with_capacity(existing_contents.len() + 3);
    if !existing_contents.is_empty() {
        contents.push(Object::Reference(add_content(doc, "q\n")));
        contents.extend(existing_contents);
        contents.push(Object::Reference(add_content(doc, "\nQ\n")));
    }
    contents.push(Object::Reference(add_content(doc, &ops)));

    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));

    Ok(names)
}

/// Content stream fragment drawing a unit-square image XObject as a
/// `width x height` rectangle anchored at `(draw_x, draw_y)` and rotated
/// counter-clockwise around that anchor.
pub fn draw_image_command(xobject_name: &str, instruction: &DrawInstruction) -> String {
    let (sin, cos) = instruction.rotation_degrees.to_radians().sin_cos();
    format!(
        "q {} {} {} {} {} {} cm {} 0 0 {} 0 0 cm /{} Do Q\n",
        cos,
        sin,
        -sin,
        cos,
        instruction.draw_x,
        instruction.draw_y,
        instruction.width,
        instruction.height,
        xobject_name
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

fn add_content(doc: &mut Document, ops: &str) -> ObjectId {
    doc.add_object(Stream::new(Dictionary::new(), ops.as_bytes().to_vec()))
}

fn resolve_dictionary(doc: &Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

/// Existing content streams of a page, flattened to a list of references.
fn content_references(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let contents = match page.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    Ok(match contents {
        Object::Array(arr) => arr.clone(),
        Object::Reference(id) => match doc.get_object(*id)? {
            // An indirect array of streams
            Object::Array(arr) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    })
}

fn unused_name(xobjects: &Dictionary) -> String {
    (0..)
        .map(|i| format!("{}{}", IMAGE_RESOURCE_PREFIX, i))
        .find(|name| !xobjects.has(name.as_bytes()))
        .unwrap_or_else(|| IMAGE_RESOURCE_PREFIX.to_string())
}

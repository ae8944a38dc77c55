//! Export - burning overlays into a PDF
//!
//! This module orchestrates the final pass:
//! 1. Group overlays by target page
//! 2. Drop overlays whose page does not exist
//! 3. Decode each image, skipping the ones that cannot be decoded
//! 4. Embed the images and draw them with their transformed placement
//!
//! One bad overlay never stops the rest of the document from being written.

mod io;

pub use io::{load_image, load_pdf, load_pdf_bytes, save_pdf, save_pdf_bytes};

use crate::decode::{self, Decoded};
use crate::layout::to_draw_instruction;
use crate::render::{create_image_xobject, draw_images_on_page, page_geometry};
use crate::session::ExportItem;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::BTreeMap;

/// Burn overlays into `document`, returning it with a per-overlay report.
pub async fn export(document: Document, items: Vec<ExportItem>) -> Result<(Document, ExportReport)> {
    tokio::task::spawn_blocking(move || {
        let mut document = document;
        let report = apply_overlays(&mut document, &items)?;
        Ok((document, report))
    })
    .await?
}

/// Synchronous core of [`export`].
pub fn apply_overlays(doc: &mut Document, items: &[ExportItem]) -> Result<ExportReport> {
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    if page_ids.is_empty() {
        return Err(OverlayError::NoPages);
    }

    // Grouping is only for iteration; each overlay is transformed on its own
    let mut by_page: BTreeMap<usize, Vec<&ExportItem>> = BTreeMap::new();
    for item in items {
        by_page.entry(item.overlay.page).or_default().push(item);
    }

    let mut report = ExportReport::default();

    for (page_index, page_items) in by_page {
        let Some(&page_id) = page_ids.get(page_index) else {
            for item in page_items {
                log::debug!(
                    "Dropping overlay {:?}: page {} not in document ({} pages)",
                    item.overlay.id,
                    page_index,
                    page_ids.len()
                );
                report.outcomes.push((
                    item.overlay.id,
                    OverlayOutcome::Skipped(SkipReason::PageOutOfRange {
                        page: page_index,
                        page_count: page_ids.len(),
                    }),
                ));
            }
            continue;
        };

        let geometry = page_geometry(doc, page_id)?;
        let mut draws = Vec::with_capacity(page_items.len());

        for item in page_items {
            let image = match decode::decode(&item.image.bytes, Some(item.image.info.kind)) {
                Decoded::Supported(image) => image,
                Decoded::Unsupported(reason) => {
                    log::warn!(
                        "Skipping overlay {:?} on page {}: {}",
                        item.overlay.id,
                        page_index,
                        reason
                    );
                    report.outcomes.push((
                        item.overlay.id,
                        OverlayOutcome::Skipped(SkipReason::UnsupportedImage(reason)),
                    ));
                    continue;
                }
            };

            let instruction = to_draw_instruction(&item.overlay, &geometry);
            let image_id = create_image_xobject(doc, &image)?;
            log::debug!(
                "Placing overlay {:?} on page {} at ({:.2}, {:.2}) {:.2}x{:.2} rotated {:.2}°",
                item.overlay.id,
                page_index,
                instruction.draw_x,
                instruction.draw_y,
                instruction.width,
                instruction.height,
                instruction.rotation_degrees
            );

            draws.push((image_id, instruction));
            report
                .outcomes
                .push((item.overlay.id, OverlayOutcome::Placed(instruction)));
        }

        draw_images_on_page(doc, page_id, &draws)?;
    }

    Ok(report)
}

//! Editing session: the overlays placed so far and the images they own
//!
//! Every overlay owns exactly one [`ImageResource`], keyed by its id.
//! Removing an overlay or resetting the session hands the resources back
//! to the caller, so nothing outlives the overlay that referenced it.

use crate::decode::{self, Decoded, ImageInfo, ImageKind};
use crate::gesture::Gesture;
use crate::layout::{ContainerSize, Overlay, Point};
use crate::types::{OverlayError, OverlayId, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Raw image bytes plus the facts read from their header
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    pub bytes: Arc<[u8]>,
    pub info: ImageInfo,
}

/// An overlay paired with its image, ready for export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub overlay: Overlay,
    pub image: ImageResource,
}

#[derive(Debug, Default)]
pub struct OverlaySession {
    overlays: Vec<Overlay>,
    resources: HashMap<OverlayId, ImageResource>,
    selected: Option<OverlayId>,
    gesture: Gesture,
    next_id: u64,
}

impl OverlaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new image on `page` with the default size and position.
    ///
    /// The image header is read once to learn its aspect ratio. The new
    /// overlay becomes the selected one.
    ///
    /// # Arguments
    /// * `page` - Zero-based target page
    /// * `bytes` - Raw PNG or JPEG data
    /// * `declared` - Format claimed by the caller (media type or extension), if any
    /// * `page_ratio` - Target page width over height
    pub fn add_image(
        &mut self,
        page: usize,
        bytes: impl Into<Arc<[u8]>>,
        declared: Option<ImageKind>,
        page_ratio: f32,
    ) -> Result<OverlayId> {
        let bytes = bytes.into();
        let info = match decode::probe(&bytes, declared) {
            Decoded::Supported(info) => info,
            Decoded::Unsupported(reason) => return Err(OverlayError::UnsupportedImage(reason)),
        };

        let id = OverlayId(self.next_id);
        self.next_id += 1;

        self.overlays
            .push(Overlay::new(id, page, info.aspect(), page_ratio));
        self.resources.insert(id, ImageResource { bytes, info });
        self.selected = Some(id);

        log::debug!(
            "Added {:?} overlay {:?} ({}x{}) on page {}",
            info.kind,
            id,
            info.width,
            info.height,
            page
        );
        Ok(id)
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlays_on_page(&self, page: usize) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter().filter(move |o| o.page == page)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id == id)
    }

    pub fn resource(&self, id: OverlayId) -> Option<&ImageResource> {
        self.resources.get(&id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn selected(&self) -> Option<OverlayId> {
        self.selected
    }

    pub fn select(&mut self, id: OverlayId) -> Result<()> {
        if self.overlay(id).is_none() {
            return Err(OverlayError::UnknownOverlay(id));
        }
        if self.selected != Some(id) {
            self.gesture = Gesture::Idle;
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.gesture = Gesture::Idle;
    }

    /// Delete an overlay and release its image.
    pub fn remove(&mut self, id: OverlayId) -> Result<ImageResource> {
        let index = self
            .overlays
            .iter()
            .position(|o| o.id == id)
            .ok_or(OverlayError::UnknownOverlay(id))?;
        self.overlays.remove(index);

        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.gesture.overlay() == Some(id) {
            self.gesture = Gesture::Idle;
        }

        self.resources
            .remove(&id)
            .ok_or(OverlayError::UnknownOverlay(id))
    }

    /// Discard every overlay, returning the released images.
    pub fn reset(&mut self) -> Vec<ImageResource> {
        self.overlays.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.resources.drain().map(|(_, resource)| resource).collect()
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Pointer-down on an overlay's body. Selects it and starts a drag.
    ///
    /// Refused when the container has no usable size.
    pub fn begin_move(&mut self, id: OverlayId, pointer: Point, container: ContainerSize) -> bool {
        if !container.is_usable() || self.select(id).is_err() {
            return false;
        }
        self.start(id, |overlay| Gesture::begin_move(overlay, pointer, container))
    }

    /// Pointer-down on the resize handle. Only the selected overlay has one.
    pub fn begin_resize(
        &mut self,
        id: OverlayId,
        pointer: Point,
        container: ContainerSize,
    ) -> bool {
        container.is_usable()
            && self.selected == Some(id)
            && self.start(id, |overlay| Gesture::begin_resize(overlay, pointer, container))
    }

    /// Pointer-down on the rotation handle. Only the selected overlay has one.
    pub fn begin_rotate(&mut self, id: OverlayId, center: Point) -> bool {
        self.selected == Some(id) && self.start(id, |overlay| Gesture::begin_rotate(overlay, center))
    }

    /// Pointer-move while a gesture is active.
    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        let gesture = self.gesture;
        match gesture.overlay().and_then(|id| self.overlay_mut(id)) {
            Some(overlay) => gesture.apply(overlay, pointer),
            None => false,
        }
    }

    /// Pointer-up: back to idle.
    pub fn end_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    fn start(&mut self, id: OverlayId, begin: impl FnOnce(&Overlay) -> Gesture) -> bool {
        match self.overlay(id) {
            Some(overlay) => {
                self.gesture = begin(overlay);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Snapshot every overlay with its image, in insertion order.
    ///
    /// Image bytes are shared, not copied.
    pub fn export_items(&self) -> Vec<ExportItem> {
        self.overlays
            .iter()
            .filter_map(|overlay| {
                self.resources.get(&overlay.id).map(|image| ExportItem {
                    overlay: overlay.clone(),
                    image: image.clone(),
                })
            })
            .collect()
    }
}

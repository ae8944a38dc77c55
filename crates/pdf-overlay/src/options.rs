use crate::constants::{DEFAULT_OVERLAY_WIDTH_PCT, DEFAULT_PAGE_DIMENSIONS};
use crate::export::load_image;
use crate::session::OverlaySession;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One image to place, as written in a plan file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanEntry {
    /// PNG or JPEG file
    pub image: PathBuf,
    /// Zero-based target page
    pub page: usize,
    /// Left edge, percent of page width
    pub x: f32,
    /// Top edge, percent of page height
    pub y: f32,
    /// Percent of page width; height follows from the image aspect
    pub width: f32,
    /// Degrees clockwise
    pub rotation: f32,
}

impl Default for PlanEntry {
    fn default() -> Self {
        Self {
            image: PathBuf::new(),
            page: 0,
            x: 10.0,
            y: 10.0,
            width: DEFAULT_OVERLAY_WIDTH_PCT,
            rotation: 0.0,
        }
    }
}

/// A batch of overlays to apply in one export
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlayPlan {
    pub overlays: Vec<PlanEntry>,
}

/// A plan entry that could not become an overlay
#[derive(Debug)]
pub struct PlanSkip {
    pub entry: usize,
    pub error: OverlayError,
}

impl OverlayPlan {
    /// Load plan from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let plan = serde_json::from_slice(&bytes)
            .map_err(|e| OverlayError::Config(format!("Failed to parse plan: {}", e)))?;
        Ok(plan)
    }

    /// Save plan to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| OverlayError::Config(format!("Failed to serialize plan: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<()> {
        if self.overlays.is_empty() {
            return Err(OverlayError::Config("Plan has no overlays".to_string()));
        }

        for (index, entry) in self.overlays.iter().enumerate() {
            let numbers = [entry.x, entry.y, entry.width, entry.rotation];
            if numbers.iter().any(|n| !n.is_finite()) {
                return Err(OverlayError::Config(format!(
                    "Overlay {} has a non-finite position, size or rotation",
                    index
                )));
            }
            if entry.width <= 0.0 {
                return Err(OverlayError::Config(format!(
                    "Overlay {} must have a positive width",
                    index
                )));
            }
            if entry.image.as_os_str().is_empty() {
                return Err(OverlayError::Config(format!(
                    "Overlay {} has no image path",
                    index
                )));
            }
        }

        Ok(())
    }

    /// Read every image and place it in a fresh session.
    ///
    /// Entries whose image cannot be read or probed are reported back and
    /// left out; the rest still make it into the session. Entries pointing
    /// past the last page are kept (export drops them) and sized against a
    /// US Letter page.
    ///
    /// # Arguments
    /// * `pages` - Geometry of the target document's pages
    pub async fn build_session(
        &self,
        pages: &[PageGeometry],
    ) -> Result<(OverlaySession, Vec<PlanSkip>)> {
        self.validate()?;

        let fallback = PageGeometry::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1);
        let mut session = OverlaySession::new();
        let mut skipped = Vec::new();

        for (index, entry) in self.overlays.iter().enumerate() {
            let page_ratio = pages.get(entry.page).unwrap_or(&fallback).aspect();

            let added = match load_image(&entry.image).await {
                Ok((bytes, declared)) => session.add_image(entry.page, bytes, declared, page_ratio),
                Err(e) => Err(e),
            };

            match added {
                Ok(id) => {
                    if let Some(overlay) = session.overlay_mut(id) {
                        overlay.place(entry.x, entry.y, entry.width, page_ratio);
                        overlay.rotation = entry.rotation;
                    }
                }
                Err(error) => {
                    log::warn!(
                        "Skipping plan entry {} ({}): {}",
                        index,
                        entry.image.display(),
                        error
                    );
                    skipped.push(PlanSkip {
                        entry: index,
                        error,
                    });
                }
            }
        }

        session.deselect();
        Ok((session, skipped))
    }
}

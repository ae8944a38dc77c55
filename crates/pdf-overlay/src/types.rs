use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Unsupported image data: {0}")]
    UnsupportedImage(String),
    #[error("Unknown overlay: {0:?}")]
    UnknownOverlay(OverlayId),
    #[error("Document has no pages")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, OverlayError>;

/// Handle to a placed overlay, stable for the overlay's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayId(pub u64);

/// Absolute geometry of a target page, in points.
///
/// The origin is the lower-left corner of the visible area (CropBox when
/// present, MediaBox otherwise), which is not always (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    pub fn with_origin(mut self, origin_x: f32, origin_y: f32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Parameters for a draw primitive that paints an axis-aligned
/// `width x height` image with its lower-left corner at `(draw_x, draw_y)`,
/// then rotates it counter-clockwise around that same corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawInstruction {
    pub draw_x: f32,
    pub draw_y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation_degrees: f32,
}

/// Why an overlay did not make it into the exported document
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The overlay's page index is past the end of the document
    PageOutOfRange { page: usize, page_count: usize },
    /// The image bytes could not be decoded as any supported format
    UnsupportedImage(String),
}

/// Result of exporting a single overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayOutcome {
    Placed(DrawInstruction),
    Skipped(SkipReason),
}

/// Per-overlay outcomes of one export pass, in processing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub outcomes: Vec<(OverlayId, OverlayOutcome)>,
}

impl ExportReport {
    pub fn placed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, OverlayOutcome::Placed(_)))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (OverlayId, &SkipReason)> {
        self.outcomes.iter().filter_map(|(id, outcome)| match outcome {
            OverlayOutcome::Skipped(reason) => Some((*id, reason)),
            OverlayOutcome::Placed(_) => None,
        })
    }

    pub fn outcome(&self, id: OverlayId) -> Option<&OverlayOutcome> {
        self.outcomes
            .iter()
            .find(|(overlay, _)| *overlay == id)
            .map(|(_, outcome)| outcome)
    }
}

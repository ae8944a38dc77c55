pub mod constants;
pub mod decode;
pub mod export;
pub mod gesture;
pub mod layout;
mod options;
pub mod render;
pub mod session;
mod types;

pub use decode::{Decoded, ImageKind};
pub use export::{export, load_image, load_pdf, load_pdf_bytes, save_pdf, save_pdf_bytes};
pub use gesture::Gesture;
pub use layout::{ContainerSize, Overlay, Point, to_draw_instruction, transform_all};
pub use options::*;
pub use render::document_page_geometries;
pub use session::{ExportItem, ImageResource, OverlaySession};
pub use types::*;

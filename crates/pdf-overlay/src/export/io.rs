//! Document and image I/O

use crate::decode::ImageKind;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    load_pdf_bytes(bytes).await
}

/// Parse a PDF document already in memory
pub async fn load_pdf_bytes(bytes: Vec<u8>) -> Result<Document> {
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Serialize a document to bytes
pub async fn save_pdf_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, OverlayError>(writer)
    })
    .await??;
    Ok(bytes)
}

/// Save the edited document
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = save_pdf_bytes(doc).await?;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Read an image file, guessing its kind from the extension
pub async fn load_image(path: impl AsRef<Path>) -> Result<(Vec<u8>, Option<ImageKind>)> {
    let path = path.as_ref();
    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension);
    let bytes = tokio::fs::read(path).await?;
    Ok((bytes, declared))
}

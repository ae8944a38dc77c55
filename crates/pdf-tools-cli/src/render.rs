use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use pdfium_render::prelude::*;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    // Vendored copy lives under the workspace root when run through cargo
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Rasterize one page of a PDF held in memory.
///
/// `scale` multiplies the page's size in points to get pixels.
pub fn render_page(bytes: &[u8], page_index: usize, scale: f32) -> Result<RgbaImage> {
    let pdfium = init_pdfium().context("Failed to bind Pdfium")?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .context("Failed to load PDF")?;
    let page = document
        .pages()
        .get(pdfium_page_index(page_index)?)
        .with_context(|| format!("Page {} not found", page_index))?;

    let config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let bitmap = page
        .render_with_config(&config)
        .context("Failed to render page")?;

    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;
    RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
        .ok_or_else(|| anyhow!("Rendered bitmap has unexpected size"))
}

/// Pdfium addresses pages with a `u16`; larger indices are an error, not a wrap.
fn pdfium_page_index(page_index: usize) -> Result<u16> {
    u16::try_from(page_index).with_context(|| format!("Page {} out of range", page_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_index_does_not_wrap() {
        assert_eq!(pdfium_page_index(0).unwrap(), 0);
        assert_eq!(pdfium_page_index(65_535).unwrap(), u16::MAX);
        assert!(pdfium_page_index(65_536).is_err());
        assert!(pdfium_page_index(65_537).is_err());
    }
}

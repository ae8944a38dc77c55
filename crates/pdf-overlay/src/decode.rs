//! Raster image decoding for overlays
//!
//! Only PNG and JPEG are supported. Decoders are tried in a fixed order
//! (the declared kind first, if any, then PNG, then JPEG) and running out
//! of decoders is a definite [`Decoded::Unsupported`], not an error.

use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Supported raster formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Probe order when nothing is declared
    pub const PRIORITY: [ImageKind; 2] = [ImageKind::Png, ImageKind::Jpeg];

    /// Map a declared media type such as `image/png`
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageKind::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    /// Map a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" | "jpe" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }

    /// Decoders to try, declared kind first, no repeats
    fn candidates(declared: Option<ImageKind>) -> impl Iterator<Item = ImageKind> {
        declared
            .into_iter()
            .chain(Self::PRIORITY.into_iter().filter(move |kind| Some(*kind) != declared))
    }
}

/// Outcome of running the decoder chain
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Supported(T),
    /// Every decoder rejected the data; carries the last decoder's complaint
    Unsupported(String),
}

impl<T> Decoded<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Decoded::Supported(value) => Some(value),
            Decoded::Unsupported(_) => None,
        }
    }
}

/// Header-level facts about an image, enough to size an overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Natural width over height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Fully decoded pixels, split into 8-bit RGB and an optional alpha plane
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    /// `None` when the image has no alpha channel or is fully opaque
    pub alpha: Option<Vec<u8>>,
}

/// Read only the image header to learn its format and dimensions.
pub fn probe(bytes: &[u8], declared: Option<ImageKind>) -> Decoded<ImageInfo> {
    run_decoders(bytes, declared, |bytes, kind| {
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), kind.format())
            .into_dimensions()
            .map_err(|e| e.to_string())?;
        if width == 0 || height == 0 {
            return Err("image has zero size".to_string());
        }
        Ok(ImageInfo {
            kind,
            width,
            height,
        })
    })
}

/// Decode the full image.
pub fn decode(bytes: &[u8], declared: Option<ImageKind>) -> Decoded<DecodedImage> {
    run_decoders(bytes, declared, |bytes, kind| {
        let image =
            image::load_from_memory_with_format(bytes, kind.format()).map_err(|e| e.to_string())?;
        Ok(split_channels(kind, image))
    })
}

fn run_decoders<T>(
    bytes: &[u8],
    declared: Option<ImageKind>,
    decoder: impl Fn(&[u8], ImageKind) -> Result<T, String>,
) -> Decoded<T> {
    let mut last_error = String::from("no decoders available");

    for kind in ImageKind::candidates(declared) {
        match decoder(bytes, kind) {
            Ok(value) => return Decoded::Supported(value),
            Err(e) => {
                log::trace!("{:?} decoder rejected image: {}", kind, e);
                last_error = e;
            }
        }
    }

    Decoded::Unsupported(last_error)
}

fn split_channels(kind: ImageKind, image: DynamicImage) -> DecodedImage {
    let width = image.width();
    let height = image.height();

    if !image.color().has_alpha() {
        return DecodedImage {
            kind,
            width,
            height,
            rgb: image.to_rgb8().into_raw(),
            alpha: None,
        };
    }

    let rgba = image.to_rgba8().into_raw();
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(rgba.len() / 4);
    for pixel in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
        alpha.push(pixel[3]);
    }

    let opaque = alpha.iter().all(|&a| a == u8::MAX);
    DecodedImage {
        kind,
        width,
        height,
        rgb,
        alpha: (!opaque).then_some(alpha),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 20, 30, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 100, 50]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_candidates_declared_first_without_repeats() {
        let order: Vec<_> = ImageKind::candidates(Some(ImageKind::Jpeg)).collect();
        assert_eq!(order, vec![ImageKind::Jpeg, ImageKind::Png]);

        let order: Vec<_> = ImageKind::candidates(None).collect();
        assert_eq!(order, vec![ImageKind::Png, ImageKind::Jpeg]);
    }

    #[test]
    fn test_probe_png() {
        let info = probe(&png_bytes(40, 20), None).ok().unwrap();
        assert_eq!(info.kind, ImageKind::Png);
        assert_eq!((info.width, info.height), (40, 20));
        assert!((info.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_declared_kind_falls_back() {
        let info = probe(&jpeg_bytes(8, 8), Some(ImageKind::Png)).ok().unwrap();
        assert_eq!(info.kind, ImageKind::Jpeg);
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let outcome = decode(b"definitely not an image", None);
        assert!(matches!(outcome, Decoded::Unsupported(_)));
    }

    #[test]
    fn test_decode_splits_alpha() {
        let decoded = decode(&png_bytes(3, 2), Some(ImageKind::Png)).ok().unwrap();
        assert_eq!(decoded.rgb.len(), 3 * 2 * 3);
        assert_eq!(decoded.alpha.as_deref(), Some(&[128u8; 6][..]));
    }

    #[test]
    fn test_decode_jpeg_has_no_alpha() {
        let decoded = decode(&jpeg_bytes(4, 4), None).ok().unwrap();
        assert_eq!(decoded.kind, ImageKind::Jpeg);
        assert_eq!(decoded.rgb.len(), 4 * 4 * 3);
        assert!(decoded.alpha.is_none());
    }

    #[test]
    fn test_mime_and_extension_mapping() {
        assert_eq!(ImageKind::from_mime("image/PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/gif"), None);
        assert_eq!(ImageKind::from_extension("JPEG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("webp"), None);
    }
}

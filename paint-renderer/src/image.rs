//! Image decoding and encoding.
//!
//! Imports arrive as raw file bytes or base64 data URIs and are decoded into
//! [`RasterImage`]s. Rasters are re-encoded as PNG to embed them in frames.

use base64::Engine;
use image::ImageEncoder;
use paint_core::RasterImage;

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        Self::Unknown
    }
}

/// Decode an image from raw file bytes.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the format is not PNG/JPEG or the
/// bytes cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<RasterImage> {
    if ImageFormat::from_magic_bytes(data) == ImageFormat::Unknown {
        return Err(RenderError::Resource(
            "Unsupported image format".to_string(),
        ));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!("Decoded {width}x{height} image");

    RasterImage::new(width, height, rgba.into_raw())
        .map_err(|e| RenderError::Resource(e.to_string()))
}

/// Decode an image from a base64 data URI such as `data:image/png;base64,iVBOR...`.
///
/// # Errors
///
/// Returns an error if the URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<RasterImage> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if !metadata.ends_with(";base64") {
        return Err(RenderError::Resource(
            "Only base64 data URIs are supported".to_string(),
        ));
    }

    let mime = metadata.trim_end_matches(";base64");
    if !mime.is_empty() && ImageFormat::from_mime(mime) == ImageFormat::Unknown {
        return Err(RenderError::Resource(format!("Unsupported image type: {mime}")));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?;

    load_image_from_bytes(&bytes)
}

/// Encode a raster as PNG bytes.
///
/// # Errors
///
/// Returns [`RenderError::Export`] if encoding fails.
pub fn encode_png(raster: &RasterImage) -> RenderResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            raster.pixels(),
            raster.width(),
            raster.height(),
            image::ColorType::Rgba8.into(),
        )
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode a raster as a `data:image/png;base64,` URI.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn to_data_uri(raster: &RasterImage) -> RenderResult<String> {
    let png = encode_png(raster)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{encoded}"))
}

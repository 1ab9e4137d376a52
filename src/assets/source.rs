use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Size;
use crate::foundation::error::{MaskError, MaskResult};

/// Upload types the edit backend accepts.
pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Largest upload the edit backend accepts by default.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Webp,
}

impl SourceFormat {
    /// Parse an accepted MIME type; `image/jpg` normalizes to JPEG.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

/// An accepted, decodable upload. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct SourceImage {
    bytes: Arc<Vec<u8>>,
    size: Size,
    format: SourceFormat,
}

impl SourceImage {
    /// Validate type and size, then decode to learn the pixel dimensions.
    pub fn from_upload(bytes: Vec<u8>, mime: &str, max_upload_bytes: u64) -> MaskResult<Self> {
        let format = SourceFormat::from_mime(mime).ok_or_else(|| {
            MaskError::validation(format!(
                "unsupported image type '{mime}'; expected one of {}",
                ACCEPTED_MIME_TYPES.join(", ")
            ))
        })?;
        if bytes.len() as u64 > max_upload_bytes {
            return Err(MaskError::validation(format!(
                "image is {} bytes; the maximum is {max_upload_bytes}",
                bytes.len()
            )));
        }

        // Header only; pixels are decoded on demand by the downscale path.
        let reader = image::ImageReader::with_format(
            std::io::Cursor::new(bytes.as_slice()),
            format.image_format(),
        );
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| MaskError::decode(format!("read {} header: {e}", format.extension())))?;
        let size = Size::new(width, height)?;

        tracing::debug!(%size, format = format.extension(), bytes = bytes.len(), "source image loaded");
        Ok(Self {
            bytes: Arc::new(bytes),
            size,
            format,
        })
    }

    /// Load from disk, inferring the type from the file extension.
    pub fn from_path(path: &Path, max_upload_bytes: u64) -> MaskResult<Self> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| {
                MaskError::validation(format!(
                    "cannot infer image type from '{}'",
                    path.display()
                ))
            })?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::from_upload(bytes, format.mime(), max_upload_bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Decode the full image. Used only when the upload has to be re-encoded.
    pub(crate) fn decode(&self) -> MaskResult<image::DynamicImage> {
        image::load_from_memory_with_format(&self.bytes, self.format.image_format())
            .map_err(|e| MaskError::decode(format!("decode source image: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

use std::io::Cursor;

use crate::foundation::core::Size;
use crate::foundation::error::{MaskError, MaskResult};
use crate::geometry::mapper::{PRESERVE_PIXEL, resample_mask};
use crate::raster::bitmap::DisplayBitmap;

/// Full source-resolution inpainting mask.
///
/// Straight RGBA8. Every pixel is either [`PRESERVE_PIXEL`] (opaque black) or has alpha 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingMask {
    size: Size,
    rgba8: Vec<u8>,
}

/// Counts of edit versus preserve pixels in a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskStats {
    pub transparent_pixels: usize,
    pub total_pixels: usize,
}

impl MaskStats {
    /// True when nothing is marked for editing.
    pub fn is_degenerate(&self) -> bool {
        self.transparent_pixels == 0
    }

    /// Fraction of the image marked for editing, in `[0, 1]`.
    pub fn edit_fraction(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.transparent_pixels as f64 / self.total_pixels as f64
    }
}

impl WorkingMask {
    /// Mask that preserves every pixel.
    pub fn opaque(size: Size) -> Self {
        let mut rgba8 = Vec::with_capacity(size.rgba_len());
        for _ in 0..size.area() {
            rgba8.extend_from_slice(&PRESERVE_PIXEL);
        }
        Self { size, rgba8 }
    }

    pub fn from_rgba8(size: Size, rgba8: Vec<u8>) -> MaskResult<Self> {
        if rgba8.len() != size.rgba_len() {
            return Err(MaskError::validation(format!(
                "mask buffer is {} bytes, expected {} for {size}",
                rgba8.len(),
                size.rgba_len()
            )));
        }
        let mask = Self { size, rgba8 };
        mask.validate_binary()?;
        Ok(mask)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// True when `(x, y)` is marked for editing. Out-of-bounds reads as preserved.
    pub fn is_edit(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|px| px[3] == 0)
    }

    pub fn stats(&self) -> MaskStats {
        let transparent_pixels = self
            .rgba8
            .chunks_exact(4)
            .filter(|px| px[3] == 0)
            .count();
        MaskStats {
            transparent_pixels,
            total_pixels: self.size.area(),
        }
    }

    /// Check the binary invariant: opaque black or fully transparent, nothing in between.
    pub fn validate_binary(&self) -> MaskResult<()> {
        for (i, px) in self.rgba8.chunks_exact(4).enumerate() {
            let ok = px[3] == 0 || px == PRESERVE_PIXEL;
            if !ok {
                let w = self.size.width as usize;
                return Err(MaskError::validation(format!(
                    "mask pixel ({}, {}) is {:?}; expected opaque black or alpha 0",
                    i % w,
                    i / w,
                    px
                )));
            }
        }
        Ok(())
    }

    /// Nearest-neighbour resize; stays binary.
    pub fn resized(&self, size: Size) -> MaskResult<WorkingMask> {
        if size == self.size {
            return Ok(self.clone());
        }
        let rgba8 = resample_mask(&self.edit_alpha(), self.size, size)?;
        Ok(WorkingMask { size, rgba8 })
    }

    /// RGBA buffer whose alpha is non-zero exactly where this mask edits.
    fn edit_alpha(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.rgba8.len()];
        for (dst, src) in out.chunks_exact_mut(4).zip(self.rgba8.chunks_exact(4)) {
            if src[3] == 0 {
                dst[3] = 255;
            }
        }
        out
    }

    /// Lossless RGBA PNG, as the edit backend expects.
    pub fn encode_png(&self) -> MaskResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.size.width, self.size.height, self.rgba8.clone())
            .ok_or_else(|| MaskError::encode("mask buffer does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| MaskError::encode(format!("encode mask png: {e}")))?;
        Ok(buf)
    }
}

/// Derive the full-resolution mask for a display bitmap.
///
/// Every target pixel starts opaque black and becomes transparent when its nearest display
/// pixel has alpha > 0. Pure: identical input yields byte-identical output.
#[tracing::instrument(skip(bitmap), fields(display_size = %bitmap.size()))]
pub fn synthesize(bitmap: &DisplayBitmap, target: Size) -> MaskResult<WorkingMask> {
    let rgba8 = resample_mask(bitmap.data(), bitmap.size(), target)?;
    Ok(WorkingMask {
        size: target,
        rgba8,
    })
}

/// Log and report a mask with no edit region.
pub(crate) fn warn_if_degenerate(stats: &MaskStats) -> bool {
    if stats.is_degenerate() {
        tracing::warn!(
            total_pixels = stats.total_pixels,
            "synthesized mask has no transparent pixels; the edit would change nothing"
        );
        return true;
    }
    false
}

#[cfg(test)]
#[path = "../../tests/unit/mask/synth.rs"]
mod tests;

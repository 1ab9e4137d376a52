use crate::foundation::core::Size;
use crate::foundation::error::{MaskError, MaskResult};

/// Display-resolution drawing surface.
///
/// Premultiplied RGBA8, row-major, tightly packed. Any pixel with alpha > 0 counts as drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayBitmap {
    size: Size,
    rgba8_premul: Vec<u8>,
}

impl DisplayBitmap {
    /// Fully transparent bitmap.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            rgba8_premul: vec![0; size.rgba_len()],
        }
    }

    pub fn from_rgba8_premul(size: Size, rgba8_premul: Vec<u8>) -> MaskResult<Self> {
        if rgba8_premul.len() != size.rgba_len() {
            return Err(MaskError::validation(format!(
                "display bitmap buffer is {} bytes, expected {} for {size}",
                rgba8_premul.len(),
                size.rgba_len()
            )));
        }
        Ok(Self { size, rgba8_premul })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8_premul
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Alpha at `(x, y)`; out-of-bounds reads as transparent.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).map_or(0, |px| px[3])
    }

    pub fn clear(&mut self) {
        self.rgba8_premul.fill(0);
    }

    pub fn drawn_pixels(&self) -> usize {
        self.rgba8_premul
            .chunks_exact(4)
            .filter(|px| px[3] > 0)
            .count()
    }

    pub fn is_blank(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).all(|px| px[3] == 0)
    }
}

use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{MaskError, MaskResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Opaque white marker painted by the brush.
pub const MARKER_RGBA: PremulRgba8 = [255, 255, 255, 255];

/// How stroke coverage combines with the pixels already on the bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompositeMode {
    /// Source-over with the marker colour.
    PaintOver,
    /// Destination-out: coverage removes alpha regardless of prior content.
    PunchThrough,
}

/// Source-over of `src` scaled by `coverage` onto `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 0 || src[3] == 0 {
        return dst;
    }

    let cov = u16::from(coverage);
    let sa = mul_div255_u8(u16::from(src[3]), cov);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), cov);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Destination-out: keep `1 - coverage` of `dst`.
pub fn punch(dst: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 0 {
        return dst;
    }
    let keep = 255u16 - u16::from(coverage);
    [
        mul_div255_u8(u16::from(dst[0]), keep),
        mul_div255_u8(u16::from(dst[1]), keep),
        mul_div255_u8(u16::from(dst[2]), keep),
        mul_div255_u8(u16::from(dst[3]), keep),
    ]
}

/// Apply a premultiplied coverage layer onto `dst` within `region`.
///
/// Only the coverage alpha is read; its colour is ignored.
pub fn composite_coverage_in_place(
    dst: &mut [u8],
    coverage: &[u8],
    size: Size,
    region: PixelRect,
    mode: CompositeMode,
) -> MaskResult<()> {
    if dst.len() != coverage.len() || dst.len() != size.rgba_len() {
        return Err(MaskError::raster(
            "composite_coverage_in_place expects equal-length rgba8 buffers matching size",
        ));
    }
    let width = size.width as usize;
    let x0 = region.x0.min(size.width) as usize;
    let x1 = region.x1.min(size.width) as usize;
    for y in region.y0..region.y1.min(size.height) {
        let row = (y as usize) * width;
        for x in x0..x1 {
            let i = (row + x) * 4;
            let cov = coverage[i + 3];
            if cov == 0 {
                continue;
            }
            let d = [dst[i], dst[i + 1], dst[i + 2], dst[i + 3]];
            let out = match mode {
                CompositeMode::PaintOver => over(d, MARKER_RGBA, cov),
                CompositeMode::PunchThrough => punch(d, cov),
            };
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;

//! Display-to-source coordinate mapping and nearest-neighbour mask resampling.
//!
//! All mappings are direct proportional scales (`floor(v * to / from)`); aspect ratio is the
//! caller's concern. The resamplers are pure functions over RGBA8 buffers and produce strictly
//! binary output: [`EDIT_PIXEL`] where the source alpha is non-zero, [`PRESERVE_PIXEL`]
//! everywhere else.

use crate::foundation::core::{PixelPoint, PixelRect, Size};
use crate::foundation::error::{MaskError, MaskResult};

/// Mask pixel marking a region the backend should regenerate.
pub const EDIT_PIXEL: [u8; 4] = [255, 255, 255, 0];
/// Mask pixel marking a region the backend must keep.
pub const PRESERVE_PIXEL: [u8; 4] = [0, 0, 0, 255];

/// Scale a pointer position from `from` space into `to` space, truncating toward -inf.
///
/// No clamping: positions outside `from` map outside `to`.
pub fn map_point(x: f64, y: f64, from: Size, to: Size) -> PixelPoint {
    if from.is_empty() {
        return PixelPoint { x: 0, y: 0 };
    }
    let sx = (x * f64::from(to.width) / f64::from(from.width)).floor();
    let sy = (y * f64::from(to.height) / f64::from(from.height)).floor();
    PixelPoint {
        x: sx as i64,
        y: sy as i64,
    }
}

/// [`map_point`] clamped into `[0, to.width-1] x [0, to.height-1]`.
pub fn map_point_clamped(x: f64, y: f64, from: Size, to: Size) -> (u32, u32) {
    let p = map_point(x, y, from, to);
    let clamp = |v: i64, len: u32| -> u32 { v.clamp(0, i64::from(len.saturating_sub(1))) as u32 };
    (clamp(p.x, to.width), clamp(p.y, to.height))
}

/// Inverse nearest-neighbour lookup: which source index feeds target index `t`.
fn source_index(t: u32, source_len: u32, target_len: u32) -> u32 {
    let s = (u64::from(t) * u64::from(source_len)) / u64::from(target_len);
    (s as u32).min(source_len.saturating_sub(1))
}

fn check_buffer(what: &str, buf_len: usize, size: Size) -> MaskResult<()> {
    if size.is_empty() {
        return Err(MaskError::validation(format!("{what} size must be non-zero")));
    }
    if buf_len != size.rgba_len() {
        return Err(MaskError::validation(format!(
            "{what} buffer is {buf_len} bytes, expected {} for {size}",
            size.rgba_len()
        )));
    }
    Ok(())
}

/// Resample a stroke bitmap into a full target-size binary mask.
pub fn resample_mask(source_rgba: &[u8], source: Size, target: Size) -> MaskResult<Vec<u8>> {
    check_buffer("source", source_rgba.len(), source)?;
    if target.is_empty() {
        return Err(MaskError::validation("target size must be non-zero"));
    }

    let mut out = vec![0u8; target.rgba_len()];
    resample_rows(source_rgba, source, &mut out, target, target.full_rect());
    Ok(out)
}

/// Recompute only `region` (target space) of an existing target mask.
pub fn resample_mask_region(
    source_rgba: &[u8],
    source: Size,
    target_rgba: &mut [u8],
    target: Size,
    region: PixelRect,
) -> MaskResult<()> {
    check_buffer("source", source_rgba.len(), source)?;
    check_buffer("target", target_rgba.len(), target)?;
    let region = PixelRect {
        x0: region.x0.min(target.width),
        y0: region.y0.min(target.height),
        x1: region.x1.min(target.width),
        y1: region.y1.min(target.height),
    };
    if region.is_empty() {
        return Ok(());
    }
    resample_rows(source_rgba, source, target_rgba, target, region);
    Ok(())
}

fn resample_rows(
    source_rgba: &[u8],
    source: Size,
    target_rgba: &mut [u8],
    target: Size,
    region: PixelRect,
) {
    let sw = source.width as usize;
    let tw = target.width as usize;
    let sx_table: Vec<usize> = (region.x0..region.x1)
        .map(|x| source_index(x, source.width, target.width) as usize)
        .collect();

    for y in region.y0..region.y1 {
        let sy = source_index(y, source.height, target.height) as usize;
        let src_row = sy * sw;
        let dst_row = (y as usize) * tw;
        for (i, &sx) in sx_table.iter().enumerate() {
            let alpha = source_rgba[(src_row + sx) * 4 + 3];
            let d = (dst_row + region.x0 as usize + i) * 4;
            let px = if alpha > 0 { EDIT_PIXEL } else { PRESERVE_PIXEL };
            target_rgba[d..d + 4].copy_from_slice(&px);
        }
    }
}

/// Target-space rectangle whose inverse-mapped pixels fall inside `source_rect`.
pub fn target_region_for(source_rect: PixelRect, source: Size, target: Size) -> PixelRect {
    if source_rect.is_empty() || source.is_empty() || target.is_empty() {
        return PixelRect::default();
    }
    // ceil(v * to / from); exact inverse of the floor in `source_index`.
    let ceil_scale = |v: u32, from: u32, to: u32| -> u32 {
        let n = u64::from(v) * u64::from(to);
        let d = u64::from(from);
        (n.div_ceil(d)).min(u64::from(to)) as u32
    };
    let rect = PixelRect {
        x0: ceil_scale(source_rect.x0, source.width, target.width),
        y0: ceil_scale(source_rect.y0, source.height, target.height),
        x1: ceil_scale(source_rect.x1, source.width, target.width),
        y1: ceil_scale(source_rect.y1, source.height, target.height),
    };
    if rect.is_empty() {
        PixelRect::default()
    } else {
        rect
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mapper.rs"]
mod tests;

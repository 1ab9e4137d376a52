use super::*;
use crate::geometry::mapper::EDIT_PIXEL;

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

fn display_with_block(s: Size, x0: u32, y0: u32, x1: u32, y1: u32) -> DisplayBitmap {
    let mut data = vec![0u8; s.rgba_len()];
    for y in y0..y1 {
        for x in x0..x1 {
            let i = ((y * s.width + x) * 4) as usize;
            data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
        }
    }
    DisplayBitmap::from_rgba8_premul(s, data).unwrap()
}

#[test]
fn blank_display_synthesizes_fully_opaque_mask() {
    let display = DisplayBitmap::new(size(50, 40));
    let mask = synthesize(&display, size(100, 80)).unwrap();
    assert_eq!(mask, WorkingMask::opaque(size(100, 80)));
    let stats = mask.stats();
    assert!(stats.is_degenerate());
    assert_eq!(stats.total_pixels, 8000);
    assert!(warn_if_degenerate(&stats));
}

#[test]
fn synthesize_is_idempotent() {
    let display = display_with_block(size(50, 40), 10, 10, 20, 25);
    let a = synthesize(&display, size(123, 77)).unwrap();
    let b = synthesize(&display, size(123, 77)).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn drawn_block_maps_to_scaled_transparent_block() {
    let display = display_with_block(size(50, 40), 10, 10, 20, 20);
    let mask = synthesize(&display, size(100, 80)).unwrap();

    assert!(mask.is_edit(20, 20));
    assert!(mask.is_edit(39, 39));
    assert!(!mask.is_edit(19, 20));
    assert!(!mask.is_edit(40, 40));
    assert_eq!(mask.pixel(30, 30), Some(EDIT_PIXEL));
    assert_eq!(mask.pixel(0, 0), Some(PRESERVE_PIXEL));

    let stats = mask.stats();
    assert_eq!(stats.transparent_pixels, 20 * 20);
    assert!(!warn_if_degenerate(&stats));
    mask.validate_binary().unwrap();
}

#[test]
fn validate_binary_rejects_intermediate_alpha() {
    let s = size(2, 1);
    let bad = vec![0, 0, 0, 255, 0, 0, 0, 128];
    assert!(WorkingMask::from_rgba8(s, bad).is_err());

    let good = vec![0, 0, 0, 255, 255, 255, 255, 0];
    WorkingMask::from_rgba8(s, good).unwrap();
}

#[test]
fn resized_mask_stays_binary_and_keeps_region() {
    let display = display_with_block(size(40, 40), 0, 0, 20, 40);
    let mask = synthesize(&display, size(400, 400)).unwrap();
    let small = mask.resized(size(100, 100)).unwrap();
    small.validate_binary().unwrap();
    assert!(small.is_edit(10, 50));
    assert!(!small.is_edit(90, 50));
    assert_eq!(small.stats().transparent_pixels, 50 * 100);
}

#[test]
fn encode_png_roundtrips_exact_pixels() {
    let display = display_with_block(size(8, 8), 2, 2, 5, 5);
    let mask = synthesize(&display, size(16, 16)).unwrap();
    let png = mask.encode_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (16, 16));
    assert_eq!(decoded.as_raw().as_slice(), mask.data());
}

use super::*;

#[test]
fn over_zero_coverage_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, MARKER_RGBA, 0), dst);
}

#[test]
fn over_full_coverage_replaces_dst() {
    assert_eq!(over([0, 0, 0, 0], MARKER_RGBA, 255), MARKER_RGBA);
    assert_eq!(over([10, 20, 30, 128], MARKER_RGBA, 255), MARKER_RGBA);
}

#[test]
fn over_partial_coverage_accumulates_alpha() {
    let once = over([0, 0, 0, 0], MARKER_RGBA, 128);
    assert_eq!(once[3], 128);
    let twice = over(once, MARKER_RGBA, 128);
    assert!(twice[3] > once[3]);
}

#[test]
fn punch_full_coverage_clears_regardless_of_content() {
    assert_eq!(punch(MARKER_RGBA, 255), [0, 0, 0, 0]);
    assert_eq!(punch([9, 9, 9, 9], 255), [0, 0, 0, 0]);
    assert_eq!(punch(MARKER_RGBA, 0), MARKER_RGBA);
}

#[test]
fn composite_respects_region_and_mode() {
    let size = Size::new(2, 2).unwrap();
    let mut dst = vec![0u8; size.rgba_len()];
    let mut cov = vec![0u8; size.rgba_len()];
    for px in cov.chunks_exact_mut(4) {
        px[3] = 255;
    }

    let left_col = PixelRect {
        x0: 0,
        y0: 0,
        x1: 1,
        y1: 2,
    };
    composite_coverage_in_place(&mut dst, &cov, size, left_col, CompositeMode::PaintOver).unwrap();
    assert_eq!(&dst[0..4], &MARKER_RGBA);
    assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
    assert_eq!(&dst[8..12], &MARKER_RGBA);

    composite_coverage_in_place(
        &mut dst,
        &cov,
        size,
        size.full_rect(),
        CompositeMode::PunchThrough,
    )
    .unwrap();
    assert!(dst.iter().all(|&b| b == 0));
}

#[test]
fn composite_rejects_mismatched_buffers() {
    let size = Size::new(2, 2).unwrap();
    let mut dst = vec![0u8; 16];
    let cov = vec![0u8; 12];
    assert!(
        composite_coverage_in_place(&mut dst, &cov, size, size.full_rect(), CompositeMode::PaintOver)
            .is_err()
    );
}

use super::*;

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

fn filled(s: Size, alpha: u8) -> Vec<u8> {
    let mut v = vec![0u8; s.rgba_len()];
    for px in v.chunks_exact_mut(4) {
        px[3] = alpha;
    }
    v
}

#[test]
fn map_point_origin_and_far_corner_stay_in_bounds() {
    for (from, to) in [
        (size(500, 400), size(1000, 800)),
        (size(1000, 800), size(500, 400)),
        (size(7, 3), size(1920, 1081)),
        (size(1, 1), size(1, 1)),
    ] {
        assert_eq!(map_point(0.0, 0.0, from, to), PixelPoint { x: 0, y: 0 });
        let p = map_point(
            f64::from(from.width - 1),
            f64::from(from.height - 1),
            from,
            to,
        );
        assert!(p.x >= 0 && p.x < i64::from(to.width), "{p:?} for {from} -> {to}");
        assert!(p.y >= 0 && p.y < i64::from(to.height), "{p:?} for {from} -> {to}");
    }
}

#[test]
fn map_point_scales_proportionally_and_floors() {
    let p = map_point(100.0, 150.0, size(500, 400), size(1000, 800));
    assert_eq!(p, PixelPoint { x: 200, y: 300 });

    let p = map_point(99.9, 0.4, size(500, 400), size(250, 200));
    assert_eq!(p, PixelPoint { x: 49, y: 0 });

    let p = map_point(-3.0, 2.0, size(10, 10), size(20, 20));
    assert_eq!(p, PixelPoint { x: -6, y: 4 });
}

#[test]
fn map_point_clamped_clips_to_target() {
    assert_eq!(
        map_point_clamped(-10.0, 9999.0, size(10, 10), size(4, 6)),
        (0, 5)
    );
}

#[test]
fn fully_drawn_source_resamples_fully_transparent() {
    for (src, dst) in [
        (size(500, 400), size(1000, 800)),
        (size(64, 64), size(3, 7)),
        (size(3, 5), size(301, 211)),
    ] {
        let out = resample_mask(&filled(src, 255), src, dst).unwrap();
        assert_eq!(out.len(), dst.rgba_len());
        assert!(out.chunks_exact(4).all(|px| px[3] == 0));
    }
}

#[test]
fn empty_source_resamples_fully_opaque_black() {
    let src = size(40, 30);
    let out = resample_mask(&filled(src, 0), src, size(80, 60)).unwrap();
    assert!(out.chunks_exact(4).all(|px| px == PRESERVE_PIXEL));
}

#[test]
fn partial_alpha_counts_as_drawn() {
    let src = size(2, 1);
    let mut buf = filled(src, 0);
    buf[3] = 1;
    let out = resample_mask(&buf, src, size(4, 2)).unwrap();
    // Left half edits, right half preserves.
    for y in 0..2usize {
        for x in 0..4usize {
            let i = (y * 4 + x) * 4;
            let expect = if x < 2 { EDIT_PIXEL } else { PRESERVE_PIXEL };
            assert_eq!(&out[i..i + 4], &expect);
        }
    }
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(resample_mask(&[0u8; 12], size(2, 2), size(4, 4)).is_err());
}

#[test]
fn target_region_matches_brute_force_inverse() {
    for (src, dst) in [
        (size(500, 400), size(1000, 800)),
        (size(10, 10), size(3, 3)),
        (size(7, 9), size(13, 4)),
    ] {
        let rect = PixelRect {
            x0: 2,
            y0: 1,
            x1: 5.min(src.width),
            y1: 4.min(src.height),
        };
        let got = target_region_for(rect, src, dst);
        for ty in 0..dst.height {
            for tx in 0..dst.width {
                let sx = source_index(tx, src.width, dst.width);
                let sy = source_index(ty, src.height, dst.height);
                let inside_src = sx >= rect.x0 && sx < rect.x1 && sy >= rect.y0 && sy < rect.y1;
                let inside_dst = tx >= got.x0 && tx < got.x1 && ty >= got.y0 && ty < got.y1;
                assert_eq!(inside_src, inside_dst, "({tx},{ty}) {src} -> {dst}");
            }
        }
    }
}

#[test]
fn region_resample_agrees_with_full_resample() {
    let src = size(50, 40);
    let dst = size(120, 90);
    let mut buf = filled(src, 0);
    for y in 10..20usize {
        for x in 5..30usize {
            buf[(y * 50 + x) * 4 + 3] = 255;
        }
    }

    let full = resample_mask(&buf, src, dst).unwrap();

    let mut partial = resample_mask(&filled(src, 0), src, dst).unwrap();
    let dirty = PixelRect {
        x0: 5,
        y0: 10,
        x1: 30,
        y1: 20,
    };
    let region = target_region_for(dirty, src, dst);
    resample_mask_region(&buf, src, &mut partial, dst, region).unwrap();
    assert_eq!(full, partial);
}

use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn accepts_png_and_reads_dimensions() {
    let src = SourceImage::from_upload(png_bytes(12, 7), "image/png", DEFAULT_MAX_UPLOAD_BYTES)
        .unwrap();
    assert_eq!(src.size(), Size::new(12, 7).unwrap());
    assert_eq!(src.format(), SourceFormat::Png);
    assert!(src.byte_len() > 0);
}

#[test]
fn jpg_mime_normalizes_to_jpeg() {
    assert_eq!(SourceFormat::from_mime("image/jpg"), Some(SourceFormat::Jpeg));
    assert_eq!(SourceFormat::from_mime(" IMAGE/JPEG "), Some(SourceFormat::Jpeg));
    assert_eq!(SourceFormat::from_extension("JPG"), Some(SourceFormat::Jpeg));
    assert_eq!(SourceFormat::Jpeg.mime(), "image/jpeg");
}

#[test]
fn rejects_unsupported_type_before_decoding() {
    let err = SourceImage::from_upload(png_bytes(2, 2), "image/gif", DEFAULT_MAX_UPLOAD_BYTES)
        .unwrap_err();
    assert!(matches!(err, MaskError::Validation(_)));
}

#[test]
fn rejects_oversized_upload() {
    let bytes = png_bytes(4, 4);
    let limit = (bytes.len() as u64) - 1;
    let err = SourceImage::from_upload(bytes, "image/png", limit).unwrap_err();
    assert!(matches!(err, MaskError::Validation(_)));
}

#[test]
fn undecodable_bytes_are_a_decode_error() {
    let err = SourceImage::from_upload(b"not an image".to_vec(), "image/png", 1024).unwrap_err();
    assert!(matches!(err, MaskError::Decode(_)));
}

#[test]
fn jpeg_dimensions_come_from_the_header() {
    let img = image::RgbImage::from_pixel(33, 17, image::Rgb([200, 100, 50]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    let src = SourceImage::from_upload(buf, "image/jpeg", DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    assert_eq!(src.size(), Size::new(33, 17).unwrap());
    assert_eq!(src.decode().unwrap().width(), 33);
}

#[test]
fn truncated_pixel_data_is_only_caught_when_decoding() {
    let img = image::RgbaImage::from_fn(64, 64, |x, y| {
        let v = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503)) as u8;
        image::Rgba([v, v.rotate_left(3), v ^ 0x5a, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf.truncate(buf.len() / 2);

    let src = SourceImage::from_upload(buf, "image/png", DEFAULT_MAX_UPLOAD_BYTES).unwrap();
    assert_eq!(src.size(), Size::new(64, 64).unwrap());
    assert!(matches!(src.decode().unwrap_err(), MaskError::Decode(_)));
}

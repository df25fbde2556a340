use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_logo_at_native_size_premultiplies() {
    let buf = png_bytes(1, 1, [100, 50, 200, 128]);

    let prepared = decode_logo(&buf, 1).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_logo_resamples_raster_to_square() {
    let buf = png_bytes(96, 32, [255, 0, 0, 255]);
    let logo = decode_logo(&buf, 48).unwrap();
    assert_eq!((logo.width, logo.height), (48, 48));
    assert_eq!(logo.rgba8_premul.len(), 48 * 48 * 4);
    assert_eq!(&logo.rgba8_premul[0..4], &[255, 0, 0, 255]);
}

#[test]
fn decode_logo_rasterizes_svg() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
    let logo = decode_logo(svg, 48).unwrap();
    assert_eq!((logo.width, logo.height), (48, 48));
    let mid = ((24 * 48 + 24) * 4) as usize;
    assert_eq!(&logo.rgba8_premul[mid..mid + 4], &[0, 255, 0, 255]);
}

#[test]
fn decode_logo_rejects_garbage() {
    assert!(decode_logo(b"definitely not an image", 48).is_err());
    assert!(decode_logo(b"<svg", 48).is_err());
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg(b"  <svg xmlns='x'/>"));
    assert!(looks_like_svg(b"<?xml version='1.0'?><svg/>"));
    assert!(!looks_like_svg(b"\x89PNG\r\n"));
}

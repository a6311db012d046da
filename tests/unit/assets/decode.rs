use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let bmp = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(bmp.width, 1);
    assert_eq!(bmp.height, 1);
    assert_eq!(
        bmp.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_svg_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"><rect width="4" height="2" fill="#000"/></svg>"##;
    let bmp = decode_image(svg).unwrap();
    assert_eq!((bmp.width, bmp.height), (4, 2));
    assert_eq!(bmp.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn garbage_is_a_decode_failure() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, IngotError::DecodeFailure(_)), "{err}");

    let err = decode_image(br#"<svg"#).unwrap_err();
    assert!(matches!(err, IngotError::DecodeFailure(_)), "{err}");
}

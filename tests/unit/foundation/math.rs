use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);

    let back = unpremultiply_rgba8(&px);
    for (a, b) in back[..3].iter().zip([200u8, 100, 50]) {
        assert!((i32::from(*a) - i32::from(b)).abs() <= 2);
    }
}

#[test]
fn luma_extremes() {
    assert_eq!(luma601(0, 0, 0), 0.0);
    assert!((luma601(255, 255, 255) - 255.0).abs() < 1e-3);
    assert!(luma601(0, 255, 0) > luma601(255, 0, 0));
}

#[test]
fn fingerprint_depends_on_dims_and_bytes() {
    let a = fingerprint_rgba8(2, 1, &[0; 8]);
    let b = fingerprint_rgba8(1, 2, &[0; 8]);
    let c = fingerprint_rgba8(2, 1, &[0, 0, 0, 1, 0, 0, 0, 0]);
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, fingerprint_rgba8(2, 1, &[0; 8]));
}

#[test]
fn px_index_does_not_wrap_on_large_surfaces() {
    assert_eq!(px_index(1, 0, 4), 4);
    assert_eq!(px_index(0, 1, 4), 16);
    assert_eq!(px_index(65_534, 65_534, 65_535), 17_179_344_896);
}

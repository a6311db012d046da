use super::*;

#[test]
fn from_premul_checks_length() {
    assert!(Bitmap::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_premul(0, 2, Vec::new()).is_err());
    let b = Bitmap::from_premul(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(b.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(b.pixel(2, 0), None);
}

#[test]
fn downscale_keeps_fitting_bitmaps_as_is() {
    let b = Bitmap::solid(30, 10, [10, 20, 30, 255]).unwrap();
    let same = b.downscaled_to_fit(30, 10).unwrap();
    assert!(Arc::ptr_eq(&b.rgba8_premul, &same.rgba8_premul));
}

#[test]
fn downscale_preserves_aspect_and_color() {
    let b = Bitmap::solid(400, 100, [200, 100, 50, 255]).unwrap();
    let small = b.downscaled_to_fit(100, 100).unwrap();
    assert_eq!((small.width, small.height), (100, 25));
    let p = small.pixel(50, 12).unwrap();
    for (got, want) in p.iter().zip([200u8, 100, 50, 255]) {
        assert!(got.abs_diff(want) <= 1, "{p:?}");
    }

    let sliver = Bitmap::solid(1_000, 1, [0, 0, 0, 255]).unwrap();
    let s = sliver.downscaled_to_fit(10, 10).unwrap();
    assert_eq!((s.width, s.height), (10, 1));
    assert!(b.downscaled_to_fit(0, 10).is_err());
}

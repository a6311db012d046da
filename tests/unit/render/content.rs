use super::*;
use crate::foundation::core::{ENGRAVING_COLOR, PlacementBounds, Rect, Rgb8};
use crate::render::blend::BlendMode;
use crate::render::layers::{ContentKind, depth_layers};
use crate::surface::mapper::{MappingMode, SurfaceMapper};

const FONT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSerif-Bold.ttf"
);

fn rect_area(w: f64, h: f64) -> SurfaceArea {
    SurfaceMapper::default()
        .compute_area(Rect::new(0.0, 0.0, w, h), MappingMode::Rect)
        .unwrap()
}

#[test]
fn font_size_follows_heuristic_and_clamps() {
    let s = FontSizing::default();
    assert!((s.size_px(400.0, 90.0, 5, 1.0) - 63.0).abs() < 1e-9);
    assert!((s.size_px(400.0, 90.0, 40, 1.0) - 12.0).abs() < 1e-9);
    assert_eq!(s.size_px(400.0, 90.0, 50, 0.5), 8.0);
    assert_eq!(s.size_px(4000.0, 900.0, 1, 2.5), 160.0);
    assert!(s.size_px(400.0, 90.0, 0, 1.0).is_finite());

    let bad = FontSizing {
        min_px: 200.0,
        ..FontSizing::default()
    };
    assert!(bad.validate().is_err());
    assert!(FontSizing::default().validate().is_ok());
}

#[test]
fn truncation_counts_chars_not_bytes() {
    assert_eq!(truncate_chars("HELLO", 3), "HEL");
    assert_eq!(truncate_chars("HELLO", 50), "HELLO");
    assert_eq!(truncate_chars("ÅÄÖÜ", 2), "ÅÄ");
    assert_eq!(truncate_chars("abc", 0), "");
}

#[test]
fn recolor_maps_dark_to_strong_engraving_color() {
    let black = Bitmap::solid(1, 1, [0, 0, 0, 255]).unwrap();
    let out = recolor_logo(&black, ENGRAVING_COLOR).unwrap();
    assert_eq!(out.pixel(0, 0), Some([90, 68, 16, 255]));

    let white = Bitmap::solid(1, 1, [255, 255, 255, 255]).unwrap();
    let out = recolor_logo(&white, ENGRAVING_COLOR).unwrap();
    let p = out.pixel(0, 0).unwrap();
    assert_eq!(&p[..3], &[0, 0, 0]);
    assert_eq!(p[3], 102);

    let clear = Bitmap::solid(1, 1, [0, 0, 0, 0]).unwrap();
    let out = recolor_logo(&clear, ENGRAVING_COLOR).unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn logo_fit_preserves_aspect_within_seventy_percent() {
    let (w, h) = fit_logo(100, 100, 400.0, 90.0);
    assert!((w - 63.0).abs() < 1e-9 && (h - 63.0).abs() < 1e-9);
    let (w, h) = fit_logo(400, 100, 100.0, 400.0);
    assert!((w - 70.0).abs() < 1e-9 && (h - 17.5).abs() < 1e-9);
}

#[test]
fn logo_mask_is_centered_in_the_area() {
    let area = rect_area(200.0, 200.0);
    let logo = Bitmap::solid(10, 10, [0, 0, 0, 255]).unwrap();
    let mask = ContentMask::logo(200, 200, &logo, &area, &PlacementSettings::default()).unwrap();
    let (x0, y0, x1, y1) = mask.bounds().unwrap();
    // area is x 50..150, y 140..170; fitted logo is 21x21 around (100, 155)
    assert!((88..=91).contains(&x0) && (109..=112).contains(&x1), "{x0}..{x1}");
    assert!((143..=146).contains(&y0) && (164..=167).contains(&y1), "{y0}..{y1}");
}

#[test]
fn offscreen_content_yields_empty_mask_and_no_op_composite() {
    let area = rect_area(200.0, 200.0);
    let logo = Bitmap::solid(10, 10, [0, 0, 0, 255]).unwrap();
    let bounds = PlacementBounds {
        offset_x: crate::foundation::core::Bound::new(-1000.0, 1000.0).unwrap(),
        ..PlacementBounds::default()
    };
    let placement = PlacementSettings::new(0.0, 1.0, 900.0, 0.0, 1.0, &bounds);
    let mask = ContentMask::logo(200, 200, &logo, &area, &placement).unwrap();
    assert!(mask.is_empty());

    let mut dst = CpuSurface::new(200, 200).unwrap();
    mask.composite_layers(&mut dst, &depth_layers(ContentKind::Logo, 1.0), 1.0)
        .unwrap();
    assert!(dst.pixels().iter().all(|&b| b == 0));
}

#[test]
fn offset_layer_lands_down_right_of_main() {
    let area = rect_area(200.0, 200.0);
    let logo = Bitmap::solid(10, 10, [0, 0, 0, 255]).unwrap();
    let recolored = recolor_logo(&logo, ENGRAVING_COLOR).unwrap();
    let mask =
        ContentMask::logo(200, 200, &recolored, &area, &PlacementSettings::default()).unwrap();
    let (_, _, x1, y1) = mask.bounds().unwrap();

    let shadow = [DepthLayer {
        name: "probe",
        tint: Some(Rgb8::new(255, 0, 0)),
        alpha: 1.0,
        offset: crate::foundation::core::Vec2::new(3.0, 3.0),
        blend: BlendMode::Normal,
    }];
    let mut dst = CpuSurface::new(200, 200).unwrap();
    mask.composite_layers(&mut dst, &shadow, 1.0).unwrap();

    let at = |x: u32, y: u32| {
        let i = ((y * 200 + x) * 4) as usize;
        [dst.pixels()[i], dst.pixels()[i + 1], dst.pixels()[i + 3]]
    };
    let beyond = at(x1 + 2, y1 + 2);
    assert!(beyond[0] > 200 && beyond[2] > 200, "{beyond:?}");
    assert_eq!(at(x1 + 5, y1 + 5)[2], 0);
}

#[test]
fn composite_rejects_mismatched_sizes() {
    let area = rect_area(100.0, 100.0);
    let logo = Bitmap::solid(4, 4, [0, 0, 0, 255]).unwrap();
    let mask = ContentMask::logo(100, 100, &logo, &area, &PlacementSettings::default()).unwrap();
    let mut dst = CpuSurface::new(50, 50).unwrap();
    assert!(mask.composite_layers(&mut dst, &[], 1.0).is_err());
}

#[test]
fn text_mask_covers_area_center() {
    let font = EngravingFont::from_path(FONT).unwrap();
    let mut engine = TextLayoutEngine::new();
    let area = rect_area(800.0, 600.0);
    let mask = ContentMask::text(
        800,
        600,
        &mut engine,
        &font,
        "HELLO",
        60.0,
        &area,
        &PlacementSettings::default(),
    )
    .unwrap();
    let (x0, y0, x1, y1) = mask.bounds().unwrap();
    let (cx, cy) = ((x0 + x1) / 2, (y0 + y1) / 2);
    assert!((380..=420).contains(&cx), "cx = {cx}");
    assert!((440..=490).contains(&cy), "cy = {cy}");
    assert!(x0 >= 200 && x1 <= 600);
}

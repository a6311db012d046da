use super::*;

const FONT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/data/fonts/DejaVuSerif-Bold.ttf"
);

#[test]
fn font_exposes_family_from_bytes() {
    let font = EngravingFont::from_path(FONT).unwrap();
    assert!(font.family().contains("DejaVu"));
    assert!(!font.bytes().is_empty());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(EngravingFont::from_bytes(b"not a font".to_vec()).is_err());
    assert!(EngravingFont::from_path("/no/such/font.ttf").is_err());
}

#[test]
fn longer_text_lays_out_wider() {
    let font = EngravingFont::from_path(FONT).unwrap();
    let mut engine = TextLayoutEngine::new();
    let short = engine
        .layout_line("AB", &font, 24.0, TextBrushRgba8::WHITE)
        .unwrap();
    let long = engine
        .layout_line("ABABAB", &font, 24.0, TextBrushRgba8::WHITE)
        .unwrap();
    assert!(long.width() > short.width() * 2.0);
    assert!(short.height() > 0.0);
}

#[test]
fn invalid_size_is_rejected() {
    let font = EngravingFont::from_path(FONT).unwrap();
    let mut engine = TextLayoutEngine::new();
    assert!(
        engine
            .layout_line("A", &font, 0.0, TextBrushRgba8::WHITE)
            .is_err()
    );
    assert!(
        engine
            .layout_line("A", &font, f32::NAN, TextBrushRgba8::WHITE)
            .is_err()
    );
}

use super::*;

#[test]
fn defaults_validate() {
    let cfg = CompositorConfig::default();
    cfg.validate().unwrap();
    assert_eq!((cfg.width, cfg.height), (800, 600));
    assert_eq!(cfg.text_max_length, 50);
    assert_eq!(cfg.loader.timeout_ms, 15_000);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = CompositorConfig::from_json_str(
        r#"{ "width": 400, "mode": "perspective", "loader": { "timeout_ms": 500 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.width, 400);
    assert_eq!(cfg.height, 600);
    assert_eq!(cfg.mode, MappingMode::Perspective);
    assert_eq!(cfg.loader.timeout_ms, 500);
    assert!(cfg.loader.cache);
    assert_eq!(cfg.area, AreaRatios::default());
}

#[test]
fn nested_bounds_are_deserialized() {
    let cfg = CompositorConfig::from_json_str(
        r#"{ "placement_bounds": { "scale": { "min": 0.5, "max": 3.0 } } }"#,
    )
    .unwrap();
    assert_eq!(cfg.placement_bounds.scale.max, 3.0);
    assert_eq!(cfg.placement_bounds.offset_x.max, 40.0);
}

#[test]
fn rejects_bad_values_and_unknown_fields() {
    for bad in [
        r#"{ "width": 0 }"#,
        r#"{ "height": 70000 }"#,
        r#"{ "depth": -1.0 }"#,
        r#"{ "text_max_length": 0 }"#,
        r#"{ "area": { "rect": { "x": 0.9, "y": 0.7, "width": 0.5, "height": 0.15 } } }"#,
        r#"{ "font_sizing": { "min_px": 300.0 } }"#,
        r#"{ "loader": { "cache_capacity": 0 } }"#,
        r#"{ "colour": "red" }"#,
        "not json",
    ] {
        let err = CompositorConfig::from_json_str(bad).unwrap_err();
        assert!(matches!(err, IngotError::Validation(_)), "{bad}: {err}");
    }
}

#[test]
fn missing_file_is_reported() {
    let err = CompositorConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("read config"), "{err}");
}

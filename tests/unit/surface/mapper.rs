use super::*;

fn inside(p: Point, r: Rect) -> bool {
    let eps = 1e-9;
    p.x >= r.x0 - eps && p.x <= r.x1 + eps && p.y >= r.y0 - eps && p.y <= r.y1 + eps
}

#[test]
fn rect_mode_uses_documented_ratios() {
    let mapper = SurfaceMapper::default();
    let bounds = Rect::new(40.0, 30.0, 840.0, 630.0);
    let SurfaceArea::Rect(r) = mapper.compute_area(bounds, MappingMode::Rect).unwrap() else {
        panic!("expected rect");
    };
    assert!((r.x0 - 240.0).abs() < 1e-9);
    assert!((r.x1 - 640.0).abs() < 1e-9);
    assert!((r.y0 - 450.0).abs() < 1e-9);
    assert!((r.height() - 90.0).abs() < 1e-9);
}

#[test]
fn perspective_mode_is_a_trapezoid_wider_at_the_bottom() {
    let mapper = SurfaceMapper::default();
    let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let SurfaceArea::Quad(q) = mapper.compute_area(bounds, MappingMode::Perspective).unwrap()
    else {
        panic!("expected quad");
    };
    assert_eq!(q.top_left, Point::new(270.0, 700.0));
    assert_eq!(q.bottom_right, Point::new(750.0, 850.0));
    let top = q.top_right.x - q.top_left.x;
    let bottom = q.bottom_right.x - q.bottom_left.x;
    assert!(bottom > top);
}

#[test]
fn areas_are_contained_in_base_bounds() {
    let mapper = SurfaceMapper::default();
    let cases = [
        Rect::new(0.0, 0.0, 1.0, 1.0),
        Rect::new(-50.0, -20.0, 10.0, 300.0),
        Rect::new(12.5, 7.25, 812.5, 607.25),
        Rect::new(0.0, 0.0, 10_000.0, 3.0),
    ];
    for bounds in cases {
        for mode in [MappingMode::Rect, MappingMode::Perspective] {
            let area = mapper.compute_area(bounds, mode).unwrap();
            for c in area.corners() {
                assert!(inside(c, bounds), "{c:?} outside {bounds:?} ({mode:?})");
            }
            let bb = area.bounding_rect();
            assert!(inside(Point::new(bb.x0, bb.y0), bounds));
            assert!(inside(Point::new(bb.x1, bb.y1), bounds));
        }
    }
}

#[test]
fn empty_or_non_finite_bounds_are_invalid() {
    let mapper = SurfaceMapper::default();
    for bounds in [
        Rect::new(0.0, 0.0, 0.0, 100.0),
        Rect::new(0.0, 0.0, 100.0, 0.0),
        Rect::new(10.0, 10.0, 5.0, 20.0),
        Rect::new(0.0, 0.0, f64::NAN, 10.0),
    ] {
        let err = mapper.compute_area(bounds, MappingMode::Rect).unwrap_err();
        assert!(matches!(err, IngotError::InvalidBounds(_)), "{err}");
    }
}

#[test]
fn local_to_canvas_maps_local_frame_onto_corners() {
    let mapper = SurfaceMapper::default();
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);

    let rect = mapper.compute_area(bounds, MappingMode::Rect).unwrap();
    let (w, h) = rect.local_size();
    let t = rect.local_to_canvas();
    assert_eq!(t * Point::ORIGIN, Point::new(200.0, 420.0));
    let far = t * Point::new(w, h);
    assert!((far.x - 600.0).abs() < 1e-9 && (far.y - 510.0).abs() < 1e-9);

    let quad = mapper.compute_area(bounds, MappingMode::Perspective).unwrap();
    let SurfaceArea::Quad(q) = quad else {
        panic!("expected quad");
    };
    let (w, h) = quad.local_size();
    let t = quad.local_to_canvas();
    let tr = t * Point::new(w, 0.0);
    let bl = t * Point::new(0.0, h);
    assert!((tr - q.top_right).hypot() < 1e-9);
    assert!((bl - q.bottom_left).hypot() < 1e-9);
}

#[test]
fn ratio_validation_rejects_escaping_areas() {
    let mut r = AreaRatios::default();
    assert!(r.validate().is_ok());

    r.rect.x = 0.6;
    assert!(SurfaceMapper::new(r).is_err());

    let mut r = AreaRatios::default();
    r.quad.bottom_left = [0.25, 0.5];
    assert!(r.validate().is_err());

    let mut r = AreaRatios::default();
    r.rect.height = 1.5;
    assert!(r.validate().is_err());
}

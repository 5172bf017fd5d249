use super::*;

#[test]
fn landscape_viewport_uses_width() {
    assert_eq!(
        transition_extent(Viewport::new(1600, 900)),
        Extent::new(1600, 800)
    );
}

#[test]
fn portrait_viewport_uses_height() {
    assert_eq!(
        transition_extent(Viewport::new(800, 1600)),
        Extent::new(3200, 1600)
    );
    assert_eq!(
        transition_extent(Viewport::new(500, 500)),
        Extent::new(1000, 500)
    );
}

#[test]
fn narrower_than_canvas_fits_height() {
    // 16:9 is narrower than 2:1, so the canvas fills the height and overflows horizontally.
    let l = SurfaceLayout::for_viewport(Viewport::new(1600, 900));
    assert_eq!(l.fit, DisplayFit::FullHeight);
    assert_eq!(l.fit.css(), ("auto", "100vh"));
    assert_eq!(l.backing, Extent::new(1800, 900));
    assert_eq!(l.logical, Extent::new(1600, 800));
}

#[test]
fn wider_than_canvas_fits_width() {
    let l = SurfaceLayout::for_viewport(Viewport::new(3000, 1000).with_device_pixel_ratio(2.0));
    assert_eq!(l.fit, DisplayFit::FullWidth);
    assert_eq!(l.fit.css(), ("100vw", "auto"));
    assert_eq!(l.backing, Extent::new(6000, 3000));
    assert_eq!(l.logical, Extent::new(3000, 1500));
}

#[test]
fn fractional_ratio_floors_backing() {
    let l = SurfaceLayout::for_viewport(Viewport::new(801, 1600).with_device_pixel_ratio(1.5));
    assert_eq!(l.backing, Extent::new(4800, 2400));

    let l = SurfaceLayout::for_viewport(Viewport::new(3001, 1000).with_device_pixel_ratio(1.0));
    assert_eq!(l.backing, Extent::new(3001, 1500));
}

#[test]
fn invalid_ratio_falls_back_to_one() {
    for r in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let l = SurfaceLayout::for_viewport(Viewport::new(800, 1600).with_device_pixel_ratio(r));
        assert_eq!(l.backing, Extent::new(3200, 1600));
    }
}

#[test]
fn empty_viewport_yields_empty_sizes() {
    let l = SurfaceLayout::for_viewport(Viewport::new(0, 0));
    assert!(l.logical.is_empty());
    assert!(l.backing.is_empty());
}

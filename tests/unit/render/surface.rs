use super::*;

#[test]
fn present_replaces_pixels_and_counts() {
    let mut s = PixelSurface::new(Extent::new(2, 1)).unwrap();
    let mut f = FrameRGBA::new(Extent::new(2, 1)).unwrap();
    f.data.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

    s.present(&f).unwrap();
    assert_eq!(s.frame().data, f.data);
    assert_eq!(s.present_count(), 1);
}

#[test]
fn present_rejects_wrong_size_and_lost_context() {
    let mut s = PixelSurface::filled(Extent::new(2, 2), Rgba8Premul::from_straight_rgba(9, 9, 9, 255))
        .unwrap();
    let before = s.frame().clone();

    let wrong = FrameRGBA::new(Extent::new(1, 1)).unwrap();
    assert!(s.present(&wrong).is_err());

    s.lose_context();
    assert!(!s.has_context());
    let right = FrameRGBA::new(Extent::new(2, 2)).unwrap();
    assert!(matches!(
        s.present(&right),
        Err(DissolveError::InvalidSurfaceState(_))
    ));
    assert_eq!(s.frame(), &before);
    assert_eq!(s.present_count(), 0);

    s.restore_context();
    s.present(&right).unwrap();
    assert_eq!(s.present_count(), 1);
}

#[test]
fn resize_reallocates_backing() {
    let mut s = PixelSurface::new(Extent::new(2, 2)).unwrap();
    s.set_backing_size(Extent::new(4, 2)).unwrap();
    assert_eq!(s.backing_size(), Extent::new(4, 2));
    assert_eq!(s.frame().data.len(), 32);
}

#[test]
fn shared_handle_coerces_to_trait_object() {
    let px = PixelSurface::new(Extent::new(1, 1)).unwrap().into_shared();
    let shared: SharedSurface = px.clone();
    assert_eq!(shared.borrow().backing_size(), Extent::new(1, 1));
    assert_eq!(Rc::strong_count(&px), 2);
}

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::effects::preset::DissolveConfig;
use crate::foundation::core::{Extent, Rgba8Premul};
use crate::render::cpu::{CpuBackend, ResampleFilter};
use crate::render::surface::{PixelSurface, Surface};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn solid(name: &str, px: [u8; 4]) -> ImageResource {
    ImageResource::solid(name, 8, 4, Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]))
        .unwrap()
}

fn stage(viewport: Viewport) -> (Rc<RefCell<PixelSurface>>, BackgroundStage) {
    let px = PixelSurface::new(Extent::new(1, 1)).unwrap().into_shared();
    let shared: SharedSurface = px.clone();
    let engine = DissolveEngine::with_backend(
        DissolveConfig::default(),
        Box::new(CpuBackend::new().with_filter(ResampleFilter::Nearest)),
    )
    .unwrap();
    (px, BackgroundStage::new(engine, shared, viewport).unwrap())
}

fn all_px(s: &PixelSurface, px: [u8; 4]) -> bool {
    s.frame().data.chunks_exact(4).all(|p| p == px)
}

#[test]
fn new_sizes_surface_for_viewport() {
    let (px, st) = stage(Viewport::new(1600, 900).with_device_pixel_ratio(0.01));
    assert_eq!(st.layout().logical, Extent::new(1600, 800));
    assert_eq!(px.borrow().backing_size(), st.layout().backing);
    assert!(st.current().is_none());
}

#[test]
fn first_navigation_shows_without_transition() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.navigate(solid("red", RED)).unwrap();

    assert!(!st.is_transitioning());
    assert_eq!(st.current().map(|i| i.locator()), Some("red"));
    assert!(all_px(&px.borrow(), RED));
}

#[test]
fn navigation_dissolves_to_new_image() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.show(solid("red", RED)).unwrap();
    st.navigate(solid("blue", BLUE)).unwrap();

    assert!(st.is_transitioning());
    assert_eq!(st.current().map(|i| i.locator()), Some("blue"));

    let mut ts = 0.0;
    while st.is_transitioning() {
        st.tick(ts);
        ts += 16.0;
        assert!(ts < 5000.0);
    }
    assert!(all_px(&px.borrow(), BLUE));
}

#[test]
fn resize_reallocates_and_repaints_current() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.show(solid("red", RED)).unwrap();

    assert!(st.resize(Viewport::new(10, 20)).unwrap());
    assert_eq!(st.layout().backing, Extent::new(40, 20));
    let s = px.borrow();
    assert_eq!(s.backing_size(), Extent::new(40, 20));
    assert!(all_px(&s, RED));
}

#[test]
fn resize_mid_transition_ends_on_target_image() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.show(solid("red", RED)).unwrap();
    st.navigate(solid("blue", BLUE)).unwrap();
    st.tick(0.0);

    st.resize(Viewport::new(24, 12)).unwrap();
    st.tick(16.0);

    assert!(!st.is_transitioning());
    assert!(all_px(&px.borrow(), BLUE));
}

#[test]
fn resize_ignored_while_fullscreen() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.show(solid("red", RED)).unwrap();
    let before = st.layout();

    st.set_fullscreen(true);
    assert!(!st.resize(Viewport::new(100, 50)).unwrap());
    assert_eq!(st.layout(), before);
    assert_eq!(px.borrow().backing_size(), Extent::new(16, 8));

    st.set_fullscreen(false);
    assert!(st.resize(Viewport::new(100, 50)).unwrap());
    assert_eq!(px.borrow().backing_size(), Extent::new(100, 50));
}

#[test]
fn redraw_before_first_image_is_a_no_op() {
    let (px, mut st) = stage(Viewport::new(16, 8));
    st.redraw().unwrap();
    assert_eq!(px.borrow().present_count(), 0);
}

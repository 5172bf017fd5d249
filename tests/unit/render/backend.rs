use super::*;

#[test]
fn backend_names_parse_with_aliases() {
    assert_eq!(BackendKind::parse("cpu").unwrap(), BackendKind::Cpu);
    assert_eq!(BackendKind::parse(" Software ").unwrap(), BackendKind::Cpu);
    assert!(matches!(
        BackendKind::parse("gpu"),
        Err(DissolveError::Validation(_))
    ));
}

#[test]
fn created_backend_renders_whole_mask() {
    let be = create_backend(BackendKind::parse("cpu").unwrap());
    let params = NoiseParams {
        cell_factor: 10.0,
        octaves: 3,
        fractal: true,
        seed: 0,
    };
    let extent = Extent::new(20, 10);
    let mask = be.render_mask(&params, extent).unwrap();
    assert_eq!(mask, NoiseMask::render(&params, extent).unwrap());
}

#[test]
fn straight_alpha_export_follows_the_flag() {
    let mut f = FrameRGBA::new(Extent::new(2, 1)).unwrap();
    f.data.copy_from_slice(&[64, 32, 0, 128, 10, 20, 30, 255]);

    assert_eq!(f.to_straight_rgba8(), vec![128, 64, 0, 128, 10, 20, 30, 255]);

    f.premultiplied = false;
    assert_eq!(f.to_straight_rgba8(), f.data);
}

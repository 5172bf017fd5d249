use super::*;

const RED: PremulRgba8 = [255, 0, 0, 255];
const BLUE: PremulRgba8 = [0, 0, 255, 255];

fn repeat_px(px: [u8; 4], n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n.saturating_mul(4)];
    for c in out.chunks_exact_mut(4) {
        c.copy_from_slice(&px);
    }
    out
}

#[test]
fn factor_endpoints_are_exact_for_any_mask() {
    for m in [0.0, 0.01, 0.5, 0.99, 1.0] {
        assert_eq!(dissolve_factor(m, 0.0, 0.05), 0.0);
        assert_eq!(dissolve_factor(m, 1.0, 0.05), 1.0);
        assert_eq!(dissolve_factor(m, 0.0, 0.0), 0.0);
        assert_eq!(dissolve_factor(m, 1.0, 0.0), 1.0);
    }
}

#[test]
fn low_mask_values_reveal_first() {
    let early = dissolve_factor(0.1, 0.4, 0.05);
    let late = dissolve_factor(0.9, 0.4, 0.05);
    assert_eq!(early, 1.0);
    assert_eq!(late, 0.0);
}

#[test]
fn factor_is_monotonic_in_progress() {
    let mut prev = 0.0;
    for i in 0..=100 {
        let f = dissolve_factor(0.5, i as f32 / 100.0, 0.05);
        assert!(f >= prev);
        prev = f;
    }
}

#[test]
fn edge_band_is_soft() {
    // Threshold at progress 0.5 is 0.525; a mask sample inside the band is partially revealed.
    let f = dissolve_factor(0.5, 0.5, 0.05);
    assert!(f > 0.0 && f < 1.0, "got {f}");
}

#[test]
fn crossfade_endpoints() {
    assert_eq!(crossfade(RED, BLUE, 0.0), RED);
    assert_eq!(crossfade(RED, BLUE, 1.0), BLUE);
    let mid = crossfade(RED, BLUE, 0.5);
    assert_eq!(mid[3], 255);
    assert!(mid[0] > 100 && mid[2] > 100);
}

#[test]
fn dissolve_in_place_splits_by_mask() {
    let a = repeat_px(RED, 2);
    let b = repeat_px(BLUE, 2);
    let mask = [0u8, 255u8];
    let mut dst = vec![0u8; 8];
    dissolve_in_place(
        &mut dst,
        &a,
        &b,
        &mask,
        DissolveParams {
            progress: 0.5,
            high: 0.05,
        },
    )
    .unwrap();
    assert_eq!(&dst[..4], &BLUE);
    assert_eq!(&dst[4..], &RED);
}

#[test]
fn dissolve_in_place_validates_lengths() {
    let a = repeat_px(RED, 2);
    let b = repeat_px(BLUE, 2);
    let p = DissolveParams {
        progress: 0.5,
        high: 0.05,
    };
    let mut dst = vec![0u8; 8];
    assert!(dissolve_in_place(&mut dst, &a, &b, &[0u8], p).is_err());
    let mut short = vec![0u8; 4];
    assert!(dissolve_in_place(&mut short, &a, &b, &[0u8], p).is_err());
}

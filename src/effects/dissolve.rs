use crate::foundation::error::{DissolveError, DissolveResult};
use crate::foundation::math::{mul_div255_u8, smoothstep};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Per-frame dissolve inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DissolveParams {
    /// Transition progress in `[0, 1]`.
    pub progress: f32,
    /// Width of the soft edge band between revealed and hidden regions.
    pub high: f32,
}

/// Blend weight of the destination image for a mask sample.
///
/// The reveal threshold sweeps from `0` to `1 + high` so that progress `0` shows only the source
/// and progress `1` shows only the destination, whatever the mask holds.
pub fn dissolve_factor(mask: f32, progress: f32, high: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    let high = high.max(0.0);
    let t = progress * (1.0 + high);
    if high <= 0.0 {
        return if mask < t || progress >= 1.0 { 1.0 } else { 0.0 };
    }
    1.0 - smoothstep(t - high, t, mask)
}

/// Linear blend of two premultiplied pixels; `t = 0` is `a`, `t = 1` is `b`.
pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

/// Write the dissolve of `a` into `b` through `mask` into `dst`.
///
/// `a`, `b` and `dst` are premultiplied RGBA8 of equal length; `mask` holds one byte per pixel.
pub fn dissolve_in_place(
    dst: &mut [u8],
    a: &[u8],
    b: &[u8],
    mask: &[u8],
    params: DissolveParams,
) -> DissolveResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(DissolveError::validation(
            "dissolve_in_place expects equal-length rgba8 buffers",
        ));
    }
    if mask.len() * 4 != dst.len() {
        return Err(DissolveError::validation(
            "dissolve_in_place expects one mask byte per pixel",
        ));
    }

    // Only 256 distinct mask values exist; resolve their weights once per call.
    let mut lut = [0f32; 256];
    for (i, w) in lut.iter_mut().enumerate() {
        *w = dissolve_factor(i as f32 / 255.0, params.progress, params.high);
    }

    for (((d, a), b), &m) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
        .zip(mask)
    {
        let out = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], lut[m as usize]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dissolve.rs"]
mod tests;

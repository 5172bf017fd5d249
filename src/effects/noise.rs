//! Fractal turbulence noise and the dissolve mask it is rendered into.
//!
//! The field is classic gradient noise summed over octaves. Lattice gradients come from a seeded
//! FNV hash of the integer lattice point, so a mask depends only on its parameters and extent.

use rayon::prelude::*;

use crate::foundation::core::Extent;
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::foundation::math::hash_lattice;

/// Upper bound on octaves; beyond this every extra layer is far below one 8-bit step.
pub const MAX_OCTAVES: u32 = 32;

/// Parameters of the turbulence field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    /// Noise cells across the mask width; frequency is `cell_factor / width`.
    pub cell_factor: f64,
    /// Number of summed layers, each at double frequency and half amplitude.
    pub octaves: u32,
    /// Signed fractal sum when true, absolute-value turbulence when false.
    pub fractal: bool,
    /// Lattice hash seed.
    pub seed: u64,
}

impl NoiseParams {
    /// Base frequency (cycles per pixel) for a mask of the given width.
    pub fn frequency(&self, width: u32) -> f64 {
        self.cell_factor / f64::from(width.max(1))
    }

    pub(crate) fn validate(&self) -> DissolveResult<()> {
        if !self.cell_factor.is_finite() || self.cell_factor <= 0.0 {
            return Err(DissolveError::validation(
                "noise cell_factor must be finite and > 0",
            ));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(DissolveError::validation(format!(
                "noise octaves must be in 1..={MAX_OCTAVES}"
            )));
        }
        Ok(())
    }
}

/// A rendered single-channel noise field, one byte per pixel.
///
/// Lower values reveal the destination image earlier in a dissolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl NoiseMask {
    /// Render the turbulence field described by `params` into a `extent`-sized mask.
    #[tracing::instrument(skip(params), fields(octaves = params.octaves))]
    pub fn render(params: &NoiseParams, extent: Extent) -> DissolveResult<Self> {
        let mut raster = MaskRaster::new(params, extent)?;
        raster.render_rows(extent.height);
        raster.finish()
    }

    /// Wrap existing mask bytes (for example a hand-authored rule image).
    pub fn from_gray8(width: u32, height: u32, data: Vec<u8>) -> DissolveResult<Self> {
        if data.len() != Extent::new(width, height).pixel_count() {
            return Err(DissolveError::validation(
                "mask buffer must hold exactly width*height bytes",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mask dimensions.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Row-major intensity bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Intensity at `(x, y)` in `[0, 1]`. Panics outside the mask.
    pub fn value(&self, x: u32, y: u32) -> f32 {
        let i = (y as usize) * (self.width as usize) + (x as usize);
        f32::from(self.data[i]) / 255.0
    }

    /// Expand to opaque grayscale RGBA8, e.g. for writing a PNG.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for &v in &self.data {
            out.extend_from_slice(&[v, v, v, 255]);
        }
        out
    }
}

/// A [`NoiseMask`] rendered a band of rows at a time.
///
/// Rows come out identical to [`NoiseMask::render`] however the work is split, so a mask can be
/// spread over several animation frames.
#[derive(Clone, Debug)]
pub struct MaskRaster {
    params: NoiseParams,
    width: u32,
    height: u32,
    data: Vec<u8>,
    next_row: u32,
}

impl MaskRaster {
    /// Validate `params` and allocate an unrendered mask of `extent`.
    pub fn new(params: &NoiseParams, extent: Extent) -> DissolveResult<Self> {
        params.validate()?;
        if extent.is_empty() {
            return Err(DissolveError::invalid_surface(format!(
                "noise mask needs a non-empty extent, got {}x{}",
                extent.width, extent.height
            )));
        }
        extent.rgba8_len()?;
        Ok(Self {
            params: *params,
            width: extent.width,
            height: extent.height,
            data: vec![0u8; extent.pixel_count()],
            next_row: 0,
        })
    }

    /// Mask dimensions.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Rows rendered so far.
    pub fn rows_done(&self) -> u32 {
        self.next_row
    }

    /// Whether every row has been rendered.
    pub fn is_complete(&self) -> bool {
        self.next_row >= self.height
    }

    /// Render up to `max_rows` further rows. Returns how many were rendered.
    pub fn render_rows(&mut self, max_rows: u32) -> u32 {
        let first = self.next_row;
        let n = max_rows.min(self.height - first);
        if n == 0 {
            return 0;
        }

        let params = self.params;
        let freq = params.frequency(self.width);
        let w = self.width as usize;
        let band = &mut self.data[first as usize * w..(first + n) as usize * w];
        band.par_chunks_mut(w).enumerate().for_each(|(i, row)| {
            let fy = (f64::from(first) + i as f64 + 0.5) * freq;
            for (x, out) in row.iter_mut().enumerate() {
                let fx = (x as f64 + 0.5) * freq;
                let v = turbulence(fx, fy, params.octaves, params.fractal, params.seed);
                *out = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        });

        self.next_row += n;
        tracing::trace!(rows = n, done = self.next_row, total = self.height, "mask band");
        n
    }

    /// The finished mask; fails while rows are still missing.
    pub fn finish(self) -> DissolveResult<NoiseMask> {
        if !self.is_complete() {
            return Err(DissolveError::invalid_surface(format!(
                "mask has {} of {} rows rendered",
                self.next_row, self.height
            )));
        }
        Ok(NoiseMask {
            width: self.width,
            height: self.height,
            data: self.data,
        })
    }
}

/// Octave-summed gradient noise at `(x, y)`, normalized to `[0, 1]`.
pub fn turbulence(x: f64, y: f64, octaves: u32, fractal: bool, seed: u64) -> f32 {
    let mut sum = 0.0f64;
    let mut norm = 0.0f64;
    let mut amp = 1.0f64;
    let mut freq = 1.0f64;
    for octave in 0..octaves {
        let n = gradient_noise(x * freq, y * freq, seed.wrapping_add(u64::from(octave)));
        sum += if fractal { n } else { n.abs() } * amp;
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    if norm <= 0.0 {
        return 0.5;
    }

    let v = sum / norm;
    let v = if fractal { (v + 1.0) * 0.5 } else { v };
    v.clamp(0.0, 1.0) as f32
}

// Unit vectors at 22.5 degree steps.
const GRADIENTS: [(f64, f64); 16] = [
    (1.0, 0.0),
    (0.923_879_532_5, 0.382_683_432_4),
    (0.707_106_781_2, 0.707_106_781_2),
    (0.382_683_432_4, 0.923_879_532_5),
    (0.0, 1.0),
    (-0.382_683_432_4, 0.923_879_532_5),
    (-0.707_106_781_2, 0.707_106_781_2),
    (-0.923_879_532_5, 0.382_683_432_4),
    (-1.0, 0.0),
    (-0.923_879_532_5, -0.382_683_432_4),
    (-0.707_106_781_2, -0.707_106_781_2),
    (-0.382_683_432_4, -0.923_879_532_5),
    (0.0, -1.0),
    (0.382_683_432_4, -0.923_879_532_5),
    (0.707_106_781_2, -0.707_106_781_2),
    (0.923_879_532_5, -0.382_683_432_4),
];

/// Single-octave gradient noise in roughly `[-1, 1]`.
fn gradient_noise(x: f64, y: f64, seed: u64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let (tx, ty) = (x - x0, y - y0);
    let (ix, iy) = (x0 as i64, y0 as i64);

    let dot = |cx: i64, cy: i64, dx: f64, dy: f64| {
        let (gx, gy) = GRADIENTS[(hash_lattice(seed, cx, cy) & 15) as usize];
        gx * dx + gy * dy
    };

    let n00 = dot(ix, iy, tx, ty);
    let n10 = dot(ix + 1, iy, tx - 1.0, ty);
    let n01 = dot(ix, iy + 1, tx, ty - 1.0);
    let n11 = dot(ix + 1, iy + 1, tx - 1.0, ty - 1.0);

    let (u, v) = (fade(tx), fade(ty));
    let nx0 = lerp(n00, n10, u);
    let nx1 = lerp(n01, n11, u);
    // Unit gradients bound 2D gradient noise by sqrt(2)/2.
    lerp(nx0, nx1, v) * std::f64::consts::SQRT_2
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/effects/noise.rs"]
mod tests;

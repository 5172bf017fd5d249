use crate::assets::image::ImageResource;
use crate::effects::dissolve::DissolveParams;
use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::effects::noise::{MaskRaster, NoiseMask, NoiseParams};
use crate::foundation::core::Extent;
use crate::foundation::error::{DissolveError, DissolveResult};

/// One composited dissolve frame as RGBA8 pixels.
///
/// Backends composite in premultiplied alpha. Anything leaving the crate for an encoder goes
/// through [`FrameRGBA::to_straight_rgba8`], which honours the `premultiplied` flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Allocate a transparent premultiplied frame.
    pub fn new(extent: Extent) -> DissolveResult<Self> {
        let len = extent.rgba8_len()?;
        Ok(Self {
            width: extent.width,
            height: extent.height,
            data: vec![0u8; len],
            premultiplied: true,
        })
    }

    /// Frame dimensions.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Pixels in straight (non-premultiplied) alpha, as PNG encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

/// Rasterization stage of the dissolve engine.
///
/// A backend renders the procedural noise field into an offscreen mask, a band of rows at a time,
/// then composites two source images against that mask with a sweeping threshold. Source layers
/// are stretched to the output size once per session, mirroring a texture upload.
pub trait DissolveBackend {
    /// Render up to `max_rows` further rows of `raster`.
    fn render_mask_rows(&self, raster: &mut MaskRaster, max_rows: u32) -> DissolveResult<()>;

    /// Render the noise field into a mask of exactly `extent` in one call.
    fn render_mask(&self, params: &NoiseParams, extent: Extent) -> DissolveResult<NoiseMask> {
        let mut raster = MaskRaster::new(params, extent)?;
        self.render_mask_rows(&mut raster, extent.height)?;
        raster.finish()
    }

    /// Resample `img` to cover `target`, returning premultiplied RGBA8.
    fn stretch_image(&self, img: &ImageResource, target: Extent) -> DissolveResult<Vec<u8>>;

    /// Resample `mask` to cover `target`, one byte per pixel.
    fn stretch_mask(&self, mask: &NoiseMask, target: Extent) -> DissolveResult<Vec<u8>>;

    /// Composite one dissolve frame into `out` from layers prepared at `out`'s size.
    fn composite(
        &self,
        out: &mut FrameRGBA,
        from: &[u8],
        to: &[u8],
        mask: &[u8],
        params: DissolveParams,
    ) -> DissolveResult<()>;
}

/// Available backend kinds.
///
/// - `Cpu` is always available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Row-parallel software rasterizer.
    #[default]
    Cpu,
}

impl BackendKind {
    /// Parse a backend name (`cpu` or `software`).
    pub fn parse(name: &str) -> DissolveResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cpu" | "software" => Ok(Self::Cpu),
            other => Err(DissolveError::validation(format!(
                "unknown backend '{other}'"
            ))),
        }
    }
}

/// Create a rasterization backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn DissolveBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;

use image::imageops::{self, FilterType};
use rayon::prelude::*;

use crate::assets::image::ImageResource;
use crate::effects::dissolve::{DissolveParams, dissolve_in_place};
use crate::effects::noise::{MaskRaster, NoiseMask};
use crate::foundation::core::Extent;
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::render::backend::{DissolveBackend, FrameRGBA};

// Rows per rayon task when compositing.
const ROWS_PER_TASK: usize = 16;

/// Software dissolve backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuBackend {
    filter: ResampleFilter,
}

/// Resampling filter for stretching layers to the output size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleFilter {
    /// Nearest neighbor.
    Nearest,
    /// Bilinear.
    #[default]
    Linear,
}

impl ResampleFilter {
    fn image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Linear => FilterType::Triangle,
        }
    }
}

impl CpuBackend {
    /// Construct a backend with bilinear layer resampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a backend that resamples layers with `filter`.
    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl DissolveBackend for CpuBackend {
    fn render_mask_rows(&self, raster: &mut MaskRaster, max_rows: u32) -> DissolveResult<()> {
        raster.render_rows(max_rows);
        Ok(())
    }

    fn stretch_image(&self, img: &ImageResource, target: Extent) -> DissolveResult<Vec<u8>> {
        if target.is_empty() || img.extent().is_empty() {
            return Err(DissolveError::invalid_surface(
                "cannot stretch to or from an empty image",
            ));
        }
        if img.extent() == target {
            return Ok(img.pixels().to_vec());
        }
        let src = image::RgbaImage::from_raw(img.width(), img.height(), img.pixels().to_vec())
            .ok_or_else(|| DissolveError::validation("image buffer does not match its size"))?;
        // Filtering premultiplied pixels keeps edges free of dark fringes.
        let out = imageops::resize(
            &src,
            target.width,
            target.height,
            self.filter.image_filter(),
        );
        Ok(out.into_raw())
    }

    fn stretch_mask(&self, mask: &NoiseMask, target: Extent) -> DissolveResult<Vec<u8>> {
        if target.is_empty() {
            return Err(DissolveError::invalid_surface(
                "cannot stretch a mask to an empty target",
            ));
        }
        if mask.extent() == target {
            return Ok(mask.as_bytes().to_vec());
        }
        let src =
            image::GrayImage::from_raw(mask.width(), mask.height(), mask.as_bytes().to_vec())
                .ok_or_else(|| DissolveError::validation("mask buffer does not match its size"))?;
        let out = imageops::resize(
            &src,
            target.width,
            target.height,
            self.filter.image_filter(),
        );
        Ok(out.into_raw())
    }

    fn composite(
        &self,
        out: &mut FrameRGBA,
        from: &[u8],
        to: &[u8],
        mask: &[u8],
        params: DissolveParams,
    ) -> DissolveResult<()> {
        let row_px = out.width as usize;
        let expected = out.extent().rgba8_len()?;
        if row_px == 0
            || from.len() != expected
            || to.len() != expected
            || mask.len() * 4 != expected
        {
            return Err(DissolveError::validation(
                "composite layers must match the output frame size",
            ));
        }

        let chunk_px = row_px * ROWS_PER_TASK;
        out.data
            .par_chunks_mut(chunk_px * 4)
            .zip(from.par_chunks(chunk_px * 4))
            .zip(to.par_chunks(chunk_px * 4))
            .zip(mask.par_chunks(chunk_px))
            .try_for_each(|(((d, a), b), m)| dissolve_in_place(d, a, b, m, params))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

use std::sync::Arc;

use crate::foundation::core::{Extent, Rgba8Premul};
use crate::foundation::error::{DissolveError, DissolveResult};

/// A decoded, immutable image in premultiplied RGBA8 form.
///
/// Cloning is cheap: pixel data is shared behind an `Arc`. Transitions hold a clone for the
/// lifetime of one session while the preloader's result map stays the owner of record.
#[derive(Clone, Debug)]
pub struct ImageResource {
    locator: Arc<str>,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl ImageResource {
    /// Wrap already-premultiplied RGBA8 pixels.
    pub fn from_rgba8_premul(
        locator: impl Into<Arc<str>>,
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
    ) -> DissolveResult<Self> {
        let expected = Extent::new(width, height).rgba8_len()?;
        if rgba8_premul.len() != expected {
            return Err(DissolveError::validation(format!(
                "image pixel buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            locator: locator.into(),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build a single-color image.
    pub fn solid(
        locator: impl Into<Arc<str>>,
        width: u32,
        height: u32,
        color: Rgba8Premul,
    ) -> DissolveResult<Self> {
        let len = Extent::new(width, height).rgba8_len()?;
        let px = color.to_array();
        let mut data = vec![0u8; len];
        for c in data.chunks_exact_mut(4) {
            c.copy_from_slice(&px);
        }
        Self::from_rgba8_premul(locator, width, height, data)
    }

    /// Source identifier this image was loaded from.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel dimensions.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = self.rgba8_premul.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Whether two handles share the same decoded pixel buffer.
    pub fn shares_pixels_with(&self, other: &ImageResource) -> bool {
        Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
    }
}

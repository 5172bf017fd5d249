use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::{Extent, Rgba8Premul};
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::render::backend::FrameRGBA;

/// Host-owned draw target shared with running transitions.
///
/// Sessions keep only a weak handle; dropping the last `Rc` detaches every session from it.
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// A drawable target the host has attached to its display and sized in device pixels.
pub trait Surface {
    /// Physical backing size in device pixels.
    fn backing_size(&self) -> Extent;

    /// Whether a rendering context is currently available.
    fn has_context(&self) -> bool {
        true
    }

    /// Reallocate the backing store at `extent` device pixels.
    fn set_backing_size(&mut self, extent: Extent) -> DissolveResult<()>;

    /// Replace the visible contents with `frame`, which matches [`Surface::backing_size`].
    fn present(&mut self, frame: &FrameRGBA) -> DissolveResult<()>;
}

/// In-memory RGBA8 surface.
///
/// Counts presented frames and can simulate losing its rendering context.
#[derive(Debug)]
pub struct PixelSurface {
    frame: FrameRGBA,
    context_lost: bool,
    presents: u64,
}

impl PixelSurface {
    /// Create a transparent surface of `extent` device pixels.
    pub fn new(extent: Extent) -> DissolveResult<Self> {
        Ok(Self {
            frame: FrameRGBA::new(extent)?,
            context_lost: false,
            presents: 0,
        })
    }

    /// Create a surface filled with `color`.
    pub fn filled(extent: Extent, color: Rgba8Premul) -> DissolveResult<Self> {
        let mut s = Self::new(extent)?;
        let px = color.to_array();
        for c in s.frame.data.chunks_exact_mut(4) {
            c.copy_from_slice(&px);
        }
        Ok(s)
    }

    /// Wrap in the shared handle transitions expect.
    pub fn into_shared(self) -> Rc<RefCell<PixelSurface>> {
        Rc::new(RefCell::new(self))
    }

    /// Currently visible pixels.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Number of frames presented so far.
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    /// Drop the rendering context; later presents fail until restored.
    pub fn lose_context(&mut self) {
        self.context_lost = true;
    }

    /// Make the rendering context available again.
    pub fn restore_context(&mut self) {
        self.context_lost = false;
    }
}

impl Surface for PixelSurface {
    fn backing_size(&self) -> Extent {
        self.frame.extent()
    }

    fn has_context(&self) -> bool {
        !self.context_lost
    }

    fn set_backing_size(&mut self, extent: Extent) -> DissolveResult<()> {
        if extent != self.frame.extent() {
            self.frame = FrameRGBA::new(extent)?;
        }
        Ok(())
    }

    fn present(&mut self, frame: &FrameRGBA) -> DissolveResult<()> {
        if self.context_lost {
            return Err(DissolveError::invalid_surface("rendering context lost"));
        }
        if frame.extent() != self.frame.extent() {
            return Err(DissolveError::invalid_surface(format!(
                "frame is {}x{} but surface backing is {}x{}",
                frame.width, frame.height, self.frame.width, self.frame.height
            )));
        }
        self.frame.data.copy_from_slice(&frame.data);
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

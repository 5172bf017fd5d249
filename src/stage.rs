//! Host-side background state.
//!
//! [`BackgroundStage`] owns the image currently on screen, the surface it is drawn to and the frame
//! queue transitions run on. Navigation dissolves from the current image to the next one; a
//! viewport resize reallocates the surface and repaints whatever is current.

use crate::assets::image::ImageResource;
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::layout::sizing::{SurfaceLayout, Viewport};
use crate::render::still::draw_still;
use crate::render::surface::SharedSurface;
use crate::session::scheduler::FrameScheduler;
use crate::session::transition::DissolveEngine;

/// The page background: one surface, one current image, transitions between them.
pub struct BackgroundStage {
    engine: DissolveEngine,
    surface: SharedSurface,
    frames: FrameScheduler,
    current: Option<ImageResource>,
    layout: SurfaceLayout,
    fullscreen: bool,
}

impl BackgroundStage {
    /// Size `surface` for `viewport` and start with nothing shown.
    pub fn new(
        engine: DissolveEngine,
        surface: SharedSurface,
        viewport: Viewport,
    ) -> DissolveResult<Self> {
        let layout = SurfaceLayout::for_viewport(viewport);
        surface
            .try_borrow_mut()
            .map_err(|_| DissolveError::invalid_surface("surface is busy"))?
            .set_backing_size(layout.backing)?;
        Ok(Self {
            engine,
            surface,
            frames: FrameScheduler::new(),
            current: None,
            layout,
            fullscreen: false,
        })
    }

    /// Sizes last applied to the surface.
    pub fn layout(&self) -> SurfaceLayout {
        self.layout
    }

    /// Image the background shows, or is dissolving towards.
    pub fn current(&self) -> Option<&ImageResource> {
        self.current.as_ref()
    }

    /// The engine transitions are started on.
    pub fn engine(&self) -> &DissolveEngine {
        &self.engine
    }

    /// Frame queue driving in-flight transitions.
    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    /// Record whether the host is in fullscreen mode. Resizes are ignored while it is.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Apply a viewport change.
    ///
    /// Returns `false` when the event was ignored because the host is fullscreen. A transition
    /// in flight stops at its next frame since its buffers no longer match the surface; the
    /// repaint shows the image it was heading to.
    pub fn resize(&mut self, viewport: Viewport) -> DissolveResult<bool> {
        if self.fullscreen {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "resize ignored while fullscreen"
            );
            return Ok(false);
        }
        self.layout = SurfaceLayout::for_viewport(viewport);
        self.surface
            .try_borrow_mut()
            .map_err(|_| DissolveError::invalid_surface("surface is busy"))?
            .set_backing_size(self.layout.backing)?;
        self.redraw()?;
        Ok(true)
    }

    /// Paint the current image over the whole surface. Does nothing before the first image.
    pub fn redraw(&mut self) -> DissolveResult<()> {
        let Some(img) = self.current.as_ref() else {
            return Ok(());
        };
        let mut surface = self
            .surface
            .try_borrow_mut()
            .map_err(|_| DissolveError::invalid_surface("surface is busy"))?;
        draw_still(self.engine.backend(), &mut *surface, img)
    }

    /// Show `img` immediately, without a transition.
    pub fn show(&mut self, img: ImageResource) -> DissolveResult<()> {
        self.current = Some(img);
        self.redraw()
    }

    /// Dissolve from the current image to `to`.
    ///
    /// The first navigation has nothing to dissolve from and shows `to` directly. The transition
    /// covers the logical area of the last applied layout.
    pub fn navigate(&mut self, to: ImageResource) -> DissolveResult<()> {
        let Some(from) = self.current.take() else {
            return self.show(to);
        };
        let logical = self.layout.logical;
        self.engine.start_transition(
            &mut self.frames,
            &self.surface,
            &from,
            &to,
            logical.width,
            logical.height,
        );
        self.current = Some(to);
        Ok(())
    }

    /// Run one animation frame at `timestamp_ms`.
    pub fn tick(&mut self, timestamp_ms: f64) -> usize {
        self.frames.tick(timestamp_ms)
    }

    /// Whether a transition is still drawing.
    pub fn is_transitioning(&self) -> bool {
        !self.frames.is_idle()
    }
}

impl std::fmt::Debug for BackgroundStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundStage")
            .field("current", &self.current.as_ref().map(|i| i.locator()))
            .field("layout", &self.layout)
            .field("fullscreen", &self.fullscreen)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;

use crate::assets::image::ImageResource;
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::render::backend::{DissolveBackend, FrameRGBA};
use crate::render::surface::Surface;

/// Draw `img` stretched over the whole surface in a single frame.
///
/// Used to repaint the current background after a resize without replaying a transition.
pub fn draw_still(
    backend: &dyn DissolveBackend,
    surface: &mut dyn Surface,
    img: &ImageResource,
) -> DissolveResult<()> {
    if !surface.has_context() {
        return Err(DissolveError::invalid_surface("no rendering context"));
    }
    let backing = surface.backing_size();
    let mut frame = FrameRGBA::new(backing)?;
    frame.data = backend.stretch_image(img, backing)?;
    surface.present(&frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/still.rs"]
mod tests;

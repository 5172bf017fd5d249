use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::assets::image::ImageResource;
use crate::effects::dissolve::DissolveParams;
use crate::effects::noise::{MaskRaster, NoiseMask};
use crate::effects::preset::DissolveConfig;
use crate::foundation::core::Extent;
use crate::foundation::error::{DissolveError, DissolveResult};
use crate::render::backend::{BackendKind, DissolveBackend, FrameRGBA, create_backend};
use crate::render::surface::{SharedSurface, Surface};
use crate::session::scheduler::{FrameCallback, FrameScheduler, FrameStatus};

/// Noise-masked dissolve between two background images.
///
/// One engine serves any number of sessions; each session owns its mask and compositing buffers.
pub struct DissolveEngine {
    config: DissolveConfig,
    backend: Rc<dyn DissolveBackend>,
}

impl DissolveEngine {
    /// Engine with the CPU backend.
    pub fn new(config: DissolveConfig) -> DissolveResult<Self> {
        Self::with_backend(config, create_backend(BackendKind::Cpu))
    }

    /// Engine with an explicit rasterization backend.
    pub fn with_backend(
        config: DissolveConfig,
        backend: Box<dyn DissolveBackend>,
    ) -> DissolveResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend: Rc::from(backend),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &DissolveConfig {
        &self.config
    }

    /// Rasterization backend shared with sessions.
    pub fn backend(&self) -> &dyn DissolveBackend {
        &*self.backend
    }

    /// Start dissolving `surface` from `from` to `to`, covering a `width`×`height` logical area.
    ///
    /// Fire-and-forget: the session is queued on `frames` and advances once per tick. The noise
    /// mask is rendered over the first ticks, [`DissolveConfig::mask_rows_per_frame`] rows at a
    /// time, and the dissolve clock starts on the frame after it completes. When the session
    /// cannot start (zero area, no context, surface busy) nothing is drawn and the surface keeps
    /// its previous image.
    ///
    /// Starting another transition on the same surface before this one finishes is allowed but
    /// not guarded: both sessions draw, the later one last. Hosts that care disable navigation
    /// while [`FrameScheduler::pending`] is non-zero.
    pub fn start_transition(
        &self,
        frames: &mut FrameScheduler,
        surface: &SharedSurface,
        from: &ImageResource,
        to: &ImageResource,
        width: u32,
        height: u32,
    ) {
        match self.begin(surface, from, to, Extent::new(width, height)) {
            Ok(session) => frames.request(session),
            Err(e) => tracing::debug!(
                error = %e,
                from = from.locator(),
                to = to.locator(),
                "dissolve skipped"
            ),
        }
    }

    /// Prepare a session without scheduling it.
    ///
    /// Only checks the inputs and allocates the mask; no noise is rendered until the first step.
    #[tracing::instrument(skip_all, fields(width = extent.width, height = extent.height))]
    pub fn begin(
        &self,
        surface: &SharedSurface,
        from: &ImageResource,
        to: &ImageResource,
        extent: Extent,
    ) -> DissolveResult<TransitionSession> {
        if extent.is_empty() {
            return Err(DissolveError::invalid_surface(format!(
                "transition area is {}x{}",
                extent.width, extent.height
            )));
        }
        usable_backing(surface)?;
        let raster = MaskRaster::new(&self.config.noise_params(), extent)?;
        tracing::debug!(from = from.locator(), to = to.locator(), "dissolve started");

        Ok(TransitionSession {
            surface: Rc::downgrade(surface),
            backend: Rc::clone(&self.backend),
            config: self.config.clone(),
            from: from.clone(),
            to: to.clone(),
            extent,
            start_ms: None,
            progress: 0.0,
            frames_drawn: 0,
            state: Some(SessionState::Preparing(raster)),
        })
    }
}

impl std::fmt::Debug for DissolveEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DissolveEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn usable_backing(surface: &RefCell<dyn Surface>) -> DissolveResult<Extent> {
    let s = surface
        .try_borrow()
        .map_err(|_| DissolveError::invalid_surface("surface is busy"))?;
    if !s.has_context() {
        return Err(DissolveError::invalid_surface("no rendering context"));
    }
    let backing = s.backing_size();
    if backing.is_empty() {
        return Err(DissolveError::invalid_surface(format!(
            "surface backing is {}x{}",
            backing.width, backing.height
        )));
    }
    Ok(backing)
}

enum SessionState {
    Preparing(MaskRaster),
    Running(SessionResources),
}

// Mask and compositing buffers owned by one session.
struct SessionResources {
    mask: NoiseMask,
    mask_layer: Vec<u8>,
    from_layer: Vec<u8>,
    to_layer: Vec<u8>,
    frame: FrameRGBA,
}

/// One in-flight dissolve.
///
/// A session first renders its mask in row bands, one band per frame, then stretches the mask and
/// both images to the surface's backing size. From the next frame on, progress is
/// `min(elapsed / duration, 1)` with elapsed measured from that frame. The final frame is drawn at
/// progress 1, after which the session releases its buffers and never draws again.
pub struct TransitionSession {
    surface: Weak<RefCell<dyn Surface>>,
    backend: Rc<dyn DissolveBackend>,
    config: DissolveConfig,
    from: ImageResource,
    to: ImageResource,
    extent: Extent,
    start_ms: Option<f64>,
    progress: f32,
    frames_drawn: u64,
    state: Option<SessionState>,
}

impl TransitionSession {
    /// Advance to `timestamp_ms`: render the next mask band, or draw one frame.
    pub fn step(&mut self, timestamp_ms: f64) -> FrameStatus {
        let preparing = match &self.state {
            None => return FrameStatus::Finished,
            Some(state) => matches!(state, SessionState::Preparing(_)),
        };
        if preparing {
            if let Err(e) = self.prepare() {
                tracing::debug!(error = %e, "dissolve aborted while preparing");
                self.release();
                return FrameStatus::Finished;
            }
            return FrameStatus::Continue;
        }

        let start = *self.start_ms.get_or_insert(timestamp_ms);
        self.progress = self.config.progress_at(timestamp_ms - start);

        if let Err(e) = self.draw() {
            tracing::debug!(error = %e, progress = self.progress, "dissolve aborted");
            self.release();
            return FrameStatus::Finished;
        }
        self.frames_drawn += 1;

        if self.progress >= 1.0 {
            tracing::debug!(frames = self.frames_drawn, to = self.to.locator(), "dissolve finished");
            self.release();
            return FrameStatus::Finished;
        }
        FrameStatus::Continue
    }

    fn prepare(&mut self) -> DissolveResult<()> {
        let complete = match self.state.as_mut() {
            Some(SessionState::Preparing(raster)) => {
                self.backend
                    .render_mask_rows(raster, self.config.mask_rows_per_frame)?;
                raster.is_complete()
            }
            _ => return Ok(()),
        };
        if !complete {
            return Ok(());
        }

        let surface = self
            .surface
            .upgrade()
            .ok_or_else(|| DissolveError::invalid_surface("surface was dropped"))?;
        let backing = usable_backing(&surface)?;
        let Some(SessionState::Preparing(raster)) = self.state.take() else {
            return Ok(());
        };
        let mask = raster.finish()?;
        let resources = SessionResources {
            mask_layer: self.backend.stretch_mask(&mask, backing)?,
            from_layer: self.backend.stretch_image(&self.from, backing)?,
            to_layer: self.backend.stretch_image(&self.to, backing)?,
            frame: FrameRGBA::new(backing)?,
            mask,
        };
        tracing::debug!(
            backing_w = backing.width,
            backing_h = backing.height,
            "dissolve layers ready"
        );
        self.state = Some(SessionState::Running(resources));
        Ok(())
    }

    fn draw(&mut self) -> DissolveResult<()> {
        let surface = self
            .surface
            .upgrade()
            .ok_or_else(|| DissolveError::invalid_surface("surface was dropped"))?;
        let Some(SessionState::Running(res)) = self.state.as_mut() else {
            return Err(DissolveError::invalid_surface("session resources released"));
        };

        res.composite_with(&*self.backend, self.progress, self.config.high)?;

        let mut target = surface
            .try_borrow_mut()
            .map_err(|_| DissolveError::invalid_surface("surface is busy"))?;
        if !target.has_context() {
            return Err(DissolveError::invalid_surface("rendering context lost"));
        }
        target.present(&res.frame)
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            tracing::trace!(to = self.to.locator(), "dissolve resources released");
        }
    }

    /// Current progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the session has stopped drawing.
    pub fn is_finished(&self) -> bool {
        self.state.is_none()
    }

    /// Whether the mask is still being rendered.
    pub fn is_preparing(&self) -> bool {
        matches!(self.state, Some(SessionState::Preparing(_)))
    }

    /// Mask rows rendered so far; `0` once the session has released its buffers.
    pub fn mask_rows_rendered(&self) -> u32 {
        match &self.state {
            Some(SessionState::Preparing(raster)) => raster.rows_done(),
            Some(SessionState::Running(res)) => res.mask.height(),
            None => 0,
        }
    }

    /// Whether the mask and compositing buffers are still allocated.
    pub fn holds_resources(&self) -> bool {
        self.state.is_some()
    }

    /// Frames presented so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Image being dissolved away.
    pub fn from_image(&self) -> &ImageResource {
        &self.from
    }

    /// Image being revealed.
    pub fn to_image(&self) -> &ImageResource {
        &self.to
    }

    /// Logical area the mask covers.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The session's finished noise mask, while it is still held.
    pub fn mask(&self) -> Option<&NoiseMask> {
        match &self.state {
            Some(SessionState::Running(res)) => Some(&res.mask),
            _ => None,
        }
    }
}

impl SessionResources {
    fn composite_with(
        &mut self,
        backend: &dyn DissolveBackend,
        progress: f32,
        high: f32,
    ) -> DissolveResult<()> {
        backend.composite(
            &mut self.frame,
            &self.from_layer,
            &self.to_layer,
            &self.mask_layer,
            DissolveParams { progress, high },
        )
    }
}

impl FrameCallback for TransitionSession {
    fn on_frame(&mut self, timestamp_ms: f64) -> FrameStatus {
        self.step(timestamp_ms)
    }
}

impl std::fmt::Debug for TransitionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionSession")
            .field("from", &self.from.locator())
            .field("to", &self.to.locator())
            .field("extent", &self.extent)
            .field("preparing", &self.is_preparing())
            .field("progress", &self.progress)
            .field("frames_drawn", &self.frames_drawn)
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/transition.rs"]
mod tests;

//! Noise-masked dissolve transitions for full-page background images.
//!
//! The crate has three parts:
//!
//! - A batch [`Preloader`] that fetches and decodes images, failing the whole batch on the first
//!   error
//! - A [`DissolveEngine`] that sweeps a threshold across a fractal turbulence mask, revealing one
//!   image through another over a fixed duration
//! - A [`SurfaceLayout`] policy sizing the 2:1 background surface for a viewport
//!
//! Transitions run cooperatively: the host ticks a [`FrameScheduler`] once per animation frame.
//! [`BackgroundStage`] ties the pieces together for hosts that keep a single background.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image loading.
pub mod assets;
/// Noise, threshold compositing and tuning.
pub mod effects;
/// Shared value types, errors and math helpers.
pub mod foundation;
/// Surface sizing policy.
pub mod layout;
/// Rasterization backends and draw targets.
pub mod render;
/// Transition sessions and the frame queue.
pub mod session;
/// Host-side background state.
pub mod stage;

pub use crate::foundation::core::{Extent, Rgba8Premul};
pub use crate::foundation::error::{DissolveError, DissolveResult};

pub use crate::assets::decode::{decode_image, unpremultiply_rgba8_in_place};
pub use crate::assets::image::ImageResource;
pub use crate::assets::preload::{LoadProgress, Preloader};
pub use crate::assets::source::{FsImageSource, ImageSource, MemoryImageSource};
pub use crate::effects::noise::{MaskRaster, NoiseMask, NoiseParams};
pub use crate::effects::preset::{DissolveConfig, DissolvePreset};
pub use crate::layout::sizing::{DisplayFit, SurfaceLayout, Viewport, transition_extent};
pub use crate::render::backend::{BackendKind, DissolveBackend, FrameRGBA, create_backend};
pub use crate::render::cpu::{CpuBackend, ResampleFilter};
pub use crate::render::surface::{PixelSurface, SharedSurface, Surface};
pub use crate::session::scheduler::{FrameCallback, FrameScheduler, FrameStatus};
pub use crate::session::transition::{DissolveEngine, TransitionSession};
pub use crate::stage::BackgroundStage;

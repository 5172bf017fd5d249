//! Rasterization: the backend trait, the software backend and draw targets.

/// Backend trait, frame buffer and backend selection.
pub mod backend;
/// Row-parallel software backend.
pub mod cpu;
/// Single-image draws outside of a transition.
pub mod still;
/// Draw targets.
pub mod surface;

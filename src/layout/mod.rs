/// Viewport to surface sizing.
pub mod sizing;

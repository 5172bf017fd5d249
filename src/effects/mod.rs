/// Threshold dissolve compositing.
pub mod dissolve;
/// Fractal turbulence mask.
pub mod noise;
/// Tuning presets and JSON configuration.
pub mod preset;

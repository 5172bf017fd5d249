use std::path::Path;

use anyhow::Context;

use crate::effects::noise::NoiseParams;
use crate::foundation::error::{DissolveError, DissolveResult};

/// Noise cells across the mask width, shared by every preset.
pub const DEFAULT_CELL_FACTOR: f64 = 10.0;
/// Soft edge band width.
pub const DEFAULT_HIGH: f32 = 0.05;
/// Octaves of the first engine revision.
pub const CLASSIC_OCTAVES: u32 = 8;
/// Duration of the first engine revision.
pub const CLASSIC_DURATION_MS: f64 = 900.0;
/// Octaves of the current engine revision.
pub const LAYERED_OCTAVES: u32 = 18;
/// Duration of the current engine revision.
pub const LAYERED_DURATION_MS: f64 = 1100.0;
/// Mask rows rendered per animation frame while a transition prepares.
pub const DEFAULT_MASK_ROWS_PER_FRAME: u32 = 32;

/// Named tunings of the dissolve engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DissolvePreset {
    /// 8 octaves over 900 ms: coarser noise, quicker reveal.
    Classic,
    /// 18 octaves over 1100 ms.
    #[default]
    Layered,
}

impl DissolvePreset {
    /// Parse a preset name, accepting a few aliases.
    pub fn parse(name: &str) -> DissolveResult<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(DissolveError::validation("preset name must be non-empty"));
        }
        match name.as_str() {
            "classic" | "v1" | "coarse" => Ok(Self::Classic),
            "layered" | "v2" | "fine" | "default" => Ok(Self::Layered),
            other => Err(DissolveError::validation(format!(
                "unknown dissolve preset '{other}'"
            ))),
        }
    }

    /// Full configuration for this preset.
    pub fn config(self) -> DissolveConfig {
        let (octaves, duration_ms) = match self {
            Self::Classic => (CLASSIC_OCTAVES, CLASSIC_DURATION_MS),
            Self::Layered => (LAYERED_OCTAVES, LAYERED_DURATION_MS),
        };
        DissolveConfig {
            cell_factor: DEFAULT_CELL_FACTOR,
            octaves,
            duration_ms,
            high: DEFAULT_HIGH,
            fractal: true,
            seed: 0,
            mask_rows_per_frame: DEFAULT_MASK_ROWS_PER_FRAME,
        }
    }
}

/// Tuning record for the dissolve engine.
///
/// Missing JSON fields fall back to the [`DissolvePreset::Layered`] values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DissolveConfig {
    /// Noise cells across the mask width.
    pub cell_factor: f64,
    /// Noise detail layers.
    pub octaves: u32,
    /// Wall-clock length of a transition.
    pub duration_ms: f64,
    /// Soft edge band width in mask units.
    pub high: f32,
    /// Signed fractal noise (true) or absolute turbulence (false).
    pub fractal: bool,
    /// Noise seed.
    pub seed: u64,
    /// Mask rows rendered per frame before the dissolve starts drawing.
    pub mask_rows_per_frame: u32,
}

impl Default for DissolveConfig {
    fn default() -> Self {
        DissolvePreset::default().config()
    }
}

impl DissolveConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> DissolveResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| DissolveError::serde(format!("parse dissolve config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> DissolveResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read dissolve config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check every field is usable.
    pub fn validate(&self) -> DissolveResult<()> {
        self.noise_params().validate()?;
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(DissolveError::validation(
                "duration_ms must be finite and > 0",
            ));
        }
        if !self.high.is_finite() || !(0.0..=1.0).contains(&self.high) {
            return Err(DissolveError::validation("high must be within [0, 1]"));
        }
        if self.mask_rows_per_frame == 0 {
            return Err(DissolveError::validation("mask_rows_per_frame must be > 0"));
        }
        Ok(())
    }

    /// Noise parameters derived from this configuration.
    pub fn noise_params(&self) -> NoiseParams {
        NoiseParams {
            cell_factor: self.cell_factor,
            octaves: self.octaves,
            fractal: self.fractal,
            seed: self.seed,
        }
    }

    /// Progress after `elapsed_ms`, clamped to `[0, 1]`.
    pub fn progress_at(&self, elapsed_ms: f64) -> f32 {
        if elapsed_ms <= 0.0 {
            return 0.0;
        }
        (elapsed_ms / self.duration_ms).min(1.0) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/preset.rs"]
mod tests;

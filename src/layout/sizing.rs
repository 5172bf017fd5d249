//! Viewport-driven sizing of the background surface.
//!
//! The background is a fixed 2:1 canvas. Its logical size follows the viewport's longer side; its
//! display fit follows how the viewport aspect compares to 2:1.

use crate::foundation::core::Extent;

/// Width-to-height ratio of the background canvas.
pub const CANVAS_ASPECT: f64 = 2.0;

/// Browser-style viewport description.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Inner width in CSS pixels.
    pub width: u32,
    /// Inner height in CSS pixels.
    pub height: u32,
    /// Device pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Viewport at a device pixel ratio of 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Return the viewport with a different device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Width over height; infinite for a zero-height viewport.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    fn effective_ratio(self) -> f64 {
        let r = self.device_pixel_ratio;
        if r.is_finite() && r > 0.0 { r } else { 1.0 }
    }
}

/// How the surface is stretched over the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFit {
    /// `width: 100vw; height: auto`.
    FullWidth,
    /// `width: auto; height: 100vh`.
    FullHeight,
}

impl DisplayFit {
    /// CSS `(width, height)` declarations for this fit.
    pub fn css(self) -> (&'static str, &'static str) {
        match self {
            Self::FullWidth => ("100vw", "auto"),
            Self::FullHeight => ("auto", "100vh"),
        }
    }
}

/// Sizes derived from a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceLayout {
    /// Size the noise mask and source images are treated as covering.
    pub logical: Extent,
    /// Physical backing store size in device pixels.
    pub backing: Extent,
    /// Display stretch.
    pub fit: DisplayFit,
}

impl SurfaceLayout {
    /// Apply the sizing policy to `viewport`.
    pub fn for_viewport(viewport: Viewport) -> Self {
        let ratio = viewport.effective_ratio();
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);

        let (fit, backing) = if viewport.aspect() > CANVAS_ASPECT {
            (
                DisplayFit::FullWidth,
                Extent::new(device_px(w * ratio), device_px(w / CANVAS_ASPECT * ratio)),
            )
        } else {
            (
                DisplayFit::FullHeight,
                Extent::new(device_px(h * CANVAS_ASPECT * ratio), device_px(h * ratio)),
            )
        };

        Self {
            logical: transition_extent(viewport),
            backing,
            fit,
        }
    }
}

/// Logical transition size for `viewport`.
///
/// Landscape viewports use their width (`height = width / 2`); portrait and square viewports use
/// their height (`width = height * 2`).
pub fn transition_extent(viewport: Viewport) -> Extent {
    if viewport.width > viewport.height {
        Extent::new(viewport.width, viewport.width / 2)
    } else {
        Extent::new(viewport.height.saturating_mul(2), viewport.height)
    }
}

fn device_px(v: f64) -> u32 {
    v.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/sizing.rs"]
mod tests;

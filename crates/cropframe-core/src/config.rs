//! Tunable constants for the crop surface.
//!
//! All fields have defaults, so a partial JSON/JS object deserializes into a
//! complete configuration:
//!
//! ```ignore
//! let config: CropConfig = serde_json::from_str(r#"{ "viewportRatio": 1.0 }"#)?;
//! assert_eq!(config.max_scale, 10.0);
//! ```

use crate::error::CropError;
use serde::{Deserialize, Serialize};

/// Selectable viewport ratios. `0.0` means "use the bitmap's own ratio".
pub const ASPECT_RATIO_PRESETS: [f64; 4] = [0.0, 1.0, 6.0 / 4.0, 16.0 / 9.0];

/// Display labels matching [`ASPECT_RATIO_PRESETS`].
pub const ASPECT_RATIO_LABELS: [&str; 4] = ["\u{00D8}", "1:1", "6:4", "16:9"];

/// Index of the preset that follows `index`, wrapping around.
pub fn next_aspect_ratio_preset(index: usize) -> usize {
    (index + 1) % ASPECT_RATIO_PRESETS.len()
}

/// Configuration for a [`CropSurface`](crate::CropSurface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Target viewport width / height. `0.0` = native bitmap ratio.
    pub viewport_ratio: f64,
    /// Upper bound for the zoom factor.
    pub max_scale: f64,
    /// Gap kept between the viewport and the display edge on the fitted axis.
    pub viewport_padding: f64,
    /// Smallest width the crop frame can be resized to.
    pub min_frame_width: f64,
    /// Smallest height the crop frame can be resized to.
    pub min_frame_height: f64,
    /// Visual radius of a frame handle.
    pub handle_radius: f64,
    /// Extra touch slop around a handle.
    pub handle_padding: f64,
    /// Fling velocities below this magnitude (units/s) are ignored per axis.
    pub min_fling_velocity: f64,
    /// Multiplier applied to accepted fling velocities before simulation.
    pub fling_velocity_scale: f64,
    /// Display density (1.0 = 160 dpi); scales fling deceleration.
    pub screen_density: f64,
    /// Duration of pan/fling animations in milliseconds.
    pub translation_duration_ms: f64,
    /// Duration of double-tap zoom animations in milliseconds.
    pub zoom_duration_ms: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            viewport_ratio: 0.0,
            max_scale: 10.0,
            viewport_padding: 0.0,
            min_frame_width: 100.0,
            min_frame_height: 100.0,
            handle_radius: 16.0,
            handle_padding: 24.0,
            min_fling_velocity: 2500.0,
            fling_velocity_scale: 0.5,
            screen_density: 1.0,
            translation_duration_ms: 250.0,
            zoom_duration_ms: 500.0,
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radius of the circular hit area around each handle.
    pub fn touch_radius(&self) -> f64 {
        self.handle_radius + self.handle_padding
    }

    /// Check that every value is within its legal range.
    pub fn validate(&self) -> Result<(), CropError> {
        fn ensure(ok: bool, msg: &str) -> Result<(), CropError> {
            if ok {
                Ok(())
            } else {
                Err(CropError::InvalidConfig(msg.to_string()))
            }
        }

        ensure(
            self.viewport_ratio.is_finite() && self.viewport_ratio >= 0.0,
            "viewport ratio must be >= 0",
        )?;
        ensure(
            self.max_scale.is_finite() && self.max_scale > 0.0,
            "max scale must be > 0",
        )?;
        ensure(self.viewport_padding >= 0.0, "viewport padding must be >= 0")?;
        ensure(
            self.min_frame_width > 0.0 && self.min_frame_height > 0.0,
            "minimum frame size must be > 0",
        )?;
        ensure(
            self.handle_radius >= 0.0 && self.handle_padding >= 0.0,
            "handle radius and padding must be >= 0",
        )?;
        ensure(
            self.min_fling_velocity >= 0.0,
            "minimum fling velocity must be >= 0",
        )?;
        ensure(
            self.fling_velocity_scale > 0.0,
            "fling velocity scale must be > 0",
        )?;
        ensure(self.screen_density > 0.0, "screen density must be > 0")?;
        ensure(
            self.translation_duration_ms > 0.0 && self.zoom_duration_ms > 0.0,
            "animation durations must be > 0",
        )?;
        Ok(())
    }
}

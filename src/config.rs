//! Persistent user settings and shared constants.
//!
//! Settings are stored as pretty-printed JSON. The file location comes from
//! `SIMPLE_COLOR_PICKER_CONFIG`, falling back to `color_picker.json` in the
//! working directory.

use crate::camera::SourceSpec;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Constants ──────────────────────────────────────────────────────────────────

/// Gray level (0..=255) at or above which a color counts as light.
pub const LIGHT_THRESHOLD: u8 = 192;

/// Stroke width of the selector ring, in points.
pub const RING_STROKE_WIDTH: f32 = 2.0;

/// Radius of the fixed viewfinder ring on the camera screen, in points.
pub const VIEWFINDER_RING_RADIUS: f32 = 12.0;

/// The image view never zooms out below the fitted size.
pub const MIN_ZOOM: f32 = 1.0;

/// Zoom factor applied per scroll point.
pub const ZOOM_PER_SCROLL_POINT: f32 = 0.002;

/// Number of picked colors kept in the history window.
pub const HISTORY_LEN: usize = 32;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "SIMPLE_COLOR_PICKER_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "color_picker.json";

// ── Settings ───────────────────────────────────────────────────────────────────

/// User-tunable settings, edited in the settings window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum time between two analyzed camera frames.
    pub analyze_interval_ms: u64,
    /// Debounce applied to user-driven picker notifications. `0` disables it.
    pub debounce_ms: u64,
    /// Radius of the selector ring drawn over the image.
    pub wheel_radius: f32,
    /// Capture loop ticks per second.
    pub frame_rate: u32,
    /// Upper bound of the image zoom.
    pub max_zoom: f32,
    pub camera: SourceSpec,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analyze_interval_ms: 3000,
            debounce_ms: 0,
            wheel_radius: 30.0,
            frame_rate: 15,
            max_zoom: 8.0,
            camera: SourceSpec::default(),
        }
    }
}

impl Settings {
    pub fn analyze_interval(&self) -> Duration {
        Duration::from_millis(self.analyze_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolve the settings file path from the environment.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("settings: ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }
}

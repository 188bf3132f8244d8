//! Viewer configuration.

use serde::{Deserialize, Serialize};

use climate_common::{DateWindow, PaletteName};

use crate::range::DisplayRange;

/// Settings shared by every view context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Percentiles used for range detection, `[lo, hi]` in percent.
    pub percentiles: [f64; 2],

    /// Let the provider thin oversized regions instead of failing.
    pub best_effort: bool,

    /// Palette a fresh context starts with.
    pub default_palette: PaletteName,

    /// Range shown before any detection.
    pub initial_range: DisplayRange,

    /// Months the band axis of the catalog rasters covers.
    pub date_window: DateWindow,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            percentiles: [10.0, 90.0],
            best_effort: true,
            default_palette: PaletteName::default(),
            initial_range: DisplayRange::default(),
            date_window: DateWindow::default(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VIEWER_DEFAULT_PALETTE") {
            if let Ok(palette) = val.parse() {
                config.default_palette = palette;
            }
        }

        if let Ok(val) = std::env::var("VIEWER_P_LO") {
            if let Ok(p) = val.parse() {
                config.percentiles[0] = p;
            }
        }

        if let Ok(val) = std::env::var("VIEWER_P_HI") {
            if let Ok(p) = val.parse() {
                config.percentiles[1] = p;
            }
        }

        if let Ok(val) = std::env::var("VIEWER_BEST_EFFORT") {
            config.best_effort = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let [lo, hi] = self.percentiles;
        if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) {
            return Err(format!("percentiles must be within 0-100, got [{}, {}]", lo, hi));
        }
        if lo > hi {
            return Err(format!("lower percentile {} exceeds upper {}", lo, hi));
        }
        if !self.initial_range.is_ordered() {
            return Err("initial_range min must not exceed max".to_string());
        }
        Ok(())
    }
}

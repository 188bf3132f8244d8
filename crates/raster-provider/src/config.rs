//! Configuration for the in-memory raster provider.

use serde::{Deserialize, Serialize};

/// Configuration for the raster provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Pixel budget of a single reduction. Best-effort requests are thinned
    /// to fit; exact requests over budget fail.
    pub max_pixels: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            max_pixels: 10_000_000,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PROVIDER_MAX_PIXELS") {
            if let Ok(max) = val.parse() {
                config.max_pixels = max;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_pixels == 0 {
            return Err("max_pixels must be > 0".to_string());
        }
        Ok(())
    }
}

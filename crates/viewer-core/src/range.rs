//! Display range used to stretch band values over the palette.

use serde::{Deserialize, Serialize};

use raster_provider::PercentilePair;

use crate::context::ViewContext;

/// Value range mapped onto the first and last palette stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`. Manual overrides may leave a range inverted.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

impl From<PercentilePair> for DisplayRange {
    fn from(pair: PercentilePair) -> Self {
        Self::new(pair.lo, pair.hi)
    }
}

/// Copy the display range of `source` into `target`.
///
/// Only min and max move; band, palette and raster stay as they are.
pub fn sync_range(source: &ViewContext, target: &mut ViewContext) {
    target.set_range(source.range());
}

//! Common types and utilities shared across the climate viewer crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod raster;
pub mod style;
pub mod time;

pub use bbox::{BoundingBox, GeoPoint};
pub use error::{ClimateError, ClimateResult};
pub use grid::GridSpec;
pub use raster::{Band, BandName, Raster, RasterId};
pub use style::{Color, LegendEntry, Palette, PaletteName, LEGEND_LABELS, PALETTE_LEN};
pub use time::{DateWindow, MonthKey};

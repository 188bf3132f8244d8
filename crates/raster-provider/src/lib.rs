//! Raster provider abstraction.
//!
//! The viewer never touches raster storage directly. Every load, band
//! count, percentile reduction and point sample goes through the
//! [`RasterProvider`] trait as an async request/response round trip.
//!
//! # Architecture
//!
//! ```text
//! ViewContext
//!      │
//!      ▼
//! RasterProvider::load_raster(uri) ──► RasterHandle
//!      │
//!      ├─► reduce_percentiles(handle, band, region, [10, 90], best_effort)
//!      │         │
//!      │         └─► collect valid pixels in region ─► stride if over budget
//!      │                                              ─► interpolate order stats
//!      │
//!      └─► sample_at_point(handle, point) ──► [] means no data
//! ```
//!
//! [`MemoryRasterProvider`] is the in-process implementation used by tests
//! and by hosts that already hold rasters in memory.

pub mod catalog;
pub mod config;
pub mod memory;
pub mod provider;
pub mod reduce;

pub use catalog::{DatasetCatalog, DatasetSource, CLEAR_KEY};
pub use config::ProviderConfig;
pub use memory::MemoryRasterProvider;
pub use provider::{BandSample, PercentilePair, RasterHandle, RasterProvider};
pub use reduce::{percentile, percentiles_of};

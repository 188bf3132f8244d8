//! Raster provider trait and request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use climate_common::{BandName, BoundingBox, ClimateResult, GeoPoint, RasterId};

/// A loaded raster as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterHandle {
    pub id: RasterId,
    /// Identifier the raster was loaded from
    pub uri: String,
}

/// Result of a two-percentile reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentilePair {
    pub lo: f64,
    pub hi: f64,
}

impl PercentilePair {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

/// One band's value at a sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSample {
    pub band: BandName,
    pub value: f32,
}

/// Trait for the service that owns rasters and evaluates reductions.
///
/// Calls may stay pending for an unbounded time; implementations own
/// their timeouts and retries.
#[async_trait]
pub trait RasterProvider: Send + Sync {
    /// Resolve a dataset identifier to a raster.
    ///
    /// # Errors
    /// * `NotFound` - nothing is registered under `uri`
    /// * `FormatError` - the dataset is not a well-formed raster
    async fn load_raster(&self, uri: &str) -> ClimateResult<RasterHandle>;

    /// Number of bands of a loaded raster.
    async fn band_count(&self, handle: &RasterHandle) -> ClimateResult<usize>;

    /// Two percentiles of one band over a region.
    ///
    /// # Arguments
    /// * `band` - Band to reduce
    /// * `region` - Query region, usually the visible map bounds
    /// * `percentiles` - `[p_lo, p_hi]` in percent
    /// * `best_effort` - Allow a coarser sample instead of failing on
    ///   oversized regions
    async fn reduce_percentiles(
        &self,
        handle: &RasterHandle,
        band: BandName,
        region: &BoundingBox,
        percentiles: [f64; 2],
        best_effort: bool,
    ) -> ClimateResult<PercentilePair>;

    /// Values of every band with data at a point. Empty means no data.
    async fn sample_at_point(
        &self,
        handle: &RasterHandle,
        point: GeoPoint,
    ) -> ClimateResult<Vec<BandSample>>;

    /// Give a handle back once no view uses it.
    ///
    /// Releasing an unknown or already released handle is not an error.
    async fn release_raster(&self, _handle: &RasterHandle) -> ClimateResult<()> {
        Ok(())
    }
}

//! In-memory raster provider.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use climate_common::{
    BandName, BoundingBox, ClimateError, ClimateResult, GeoPoint, GridSpec, Raster, RasterId,
};

use crate::config::ProviderConfig;
use crate::provider::{BandSample, PercentilePair, RasterHandle, RasterProvider};
use crate::reduce::{check_percentiles, percentiles_of, stride_subsample};

/// A dataset as registered, validated only when loaded.
#[derive(Debug, Clone)]
enum Dataset {
    Ready(Arc<Raster>),
    Raw { grid: GridSpec, bands: Vec<Vec<f32>> },
}

/// Provider serving rasters held in process memory.
///
/// Datasets are registered under a URI, then loaded into handles the same
/// way a remote catalog would resolve them.
pub struct MemoryRasterProvider {
    config: ProviderConfig,
    datasets: RwLock<HashMap<String, Dataset>>,
    loaded: RwLock<HashMap<RasterId, Arc<Raster>>>,
}

fn poisoned<T>(_: T) -> ClimateError {
    ClimateError::Internal("raster provider lock poisoned".to_string())
}

impl MemoryRasterProvider {
    pub fn new() -> Self {
        Self::with_config(ProviderConfig::default())
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            config,
            datasets: RwLock::new(HashMap::new()),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Register a raster under `uri`, replacing any previous entry.
    pub fn register(&self, uri: impl Into<String>, raster: Raster) -> ClimateResult<()> {
        let uri = uri.into();
        debug!(uri = %uri, bands = raster.band_count(), "Registering raster");
        self.datasets
            .write()
            .map_err(poisoned)?
            .insert(uri, Dataset::Ready(Arc::new(raster)));
        Ok(())
    }

    /// Register unvalidated band data; shape errors surface on load.
    pub fn register_raw(
        &self,
        uri: impl Into<String>,
        grid: GridSpec,
        bands: Vec<Vec<f32>>,
    ) -> ClimateResult<()> {
        self.datasets
            .write()
            .map_err(poisoned)?
            .insert(uri.into(), Dataset::Raw { grid, bands });
        Ok(())
    }

    /// Number of rasters currently loaded.
    pub fn loaded_count(&self) -> usize {
        self.loaded.read().map(|l| l.len()).unwrap_or(0)
    }

    fn raster(&self, handle: &RasterHandle) -> ClimateResult<Arc<Raster>> {
        self.loaded
            .read()
            .map_err(poisoned)?
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| ClimateError::not_found(format!("raster handle {}", handle.id)))
    }
}

impl Default for MemoryRasterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RasterProvider for MemoryRasterProvider {
    async fn load_raster(&self, uri: &str) -> ClimateResult<RasterHandle> {
        let dataset = self
            .datasets
            .read()
            .map_err(poisoned)?
            .get(uri)
            .cloned()
            .ok_or_else(|| ClimateError::not_found(uri))?;

        let raster = match dataset {
            Dataset::Ready(raster) => raster,
            Dataset::Raw { grid, bands } => Arc::new(Raster::new(grid, bands).map_err(|e| {
                warn!(uri = %uri, error = %e, "Dataset is not a valid raster");
                e
            })?),
        };

        let handle = RasterHandle {
            id: RasterId::new(),
            uri: uri.to_string(),
        };
        info!(uri = %uri, id = %handle.id, bands = raster.band_count(), "Loaded raster");
        self.loaded
            .write()
            .map_err(poisoned)?
            .insert(handle.id, raster);

        Ok(handle)
    }

    async fn band_count(&self, handle: &RasterHandle) -> ClimateResult<usize> {
        Ok(self.raster(handle)?.band_count())
    }

    async fn reduce_percentiles(
        &self,
        handle: &RasterHandle,
        band: BandName,
        region: &BoundingBox,
        percentiles: [f64; 2],
        best_effort: bool,
    ) -> ClimateResult<PercentilePair> {
        check_percentiles(percentiles)?;
        let raster = self.raster(handle)?;
        let data = &raster.band(band.index())?.data;

        // Only the part of the region the grid covers is scanned.
        let clipped = raster.grid().bbox().intersection(region).ok_or_else(|| {
            ClimateError::EmptyRegion(format!("{} does not cover {:?}", handle.uri, region))
        })?;

        let indices: Vec<usize> = raster
            .grid()
            .indices_within(&clipped)
            .into_iter()
            .filter(|&i| !data[i].is_nan())
            .collect();

        let valid = indices.len();
        let indices = if valid > self.config.max_pixels {
            if !best_effort {
                return Err(ClimateError::TooManyPixels {
                    count: valid,
                    max: self.config.max_pixels,
                });
            }
            stride_subsample(indices, self.config.max_pixels)
        } else {
            indices
        };

        if indices.is_empty() {
            return Err(ClimateError::EmptyRegion(format!(
                "{} band {} over {:?}",
                handle.uri, band, region
            )));
        }

        let values: Vec<f64> = indices.iter().map(|&i| data[i] as f64).collect();
        let pair = percentiles_of(values, percentiles)?;
        debug!(
            uri = %handle.uri,
            band = %band,
            pixels = valid,
            used = indices.len(),
            lo = pair.lo,
            hi = pair.hi,
            "Reduced percentiles"
        );
        Ok(pair)
    }

    async fn sample_at_point(
        &self,
        handle: &RasterHandle,
        point: GeoPoint,
    ) -> ClimateResult<Vec<BandSample>> {
        let raster = self.raster(handle)?;
        let samples = match raster.values_at(point) {
            Some(values) => values
                .into_iter()
                .enumerate()
                .filter(|(_, v)| !v.is_nan())
                .map(|(i, value)| BandSample {
                    band: BandName(i),
                    value,
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(samples)
    }

    async fn release_raster(&self, handle: &RasterHandle) -> ClimateResult<()> {
        let released = self
            .loaded
            .write()
            .map_err(poisoned)?
            .remove(&handle.id)
            .is_some();
        debug!(uri = %handle.uri, id = %handle.id, released, "Released raster");
        Ok(())
    }
}

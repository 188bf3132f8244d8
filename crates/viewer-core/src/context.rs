//! Per-pane view state.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use climate_common::{
    BandName, BoundingBox, ClimateError, ClimateResult, GeoPoint, LegendEntry, MonthKey, Palette,
    PaletteName, PALETTE_LEN,
};
use raster_provider::{
    DatasetCatalog, DatasetSource, PercentilePair, RasterHandle, RasterProvider,
};

use crate::config::ViewerConfig;
use crate::range::DisplayRange;
use crate::request::{RequestKind, RequestSequencer, RequestTicket, Update};

/// Band 0 value at a clicked point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PointSample {
    Value(f32),
    /// The point is off coverage or band 0 has no data there.
    NoData,
}

impl PointSample {
    pub fn value(&self) -> Option<f32> {
        match self {
            PointSample::Value(v) => Some(*v),
            PointSample::NoData => None,
        }
    }
}

impl fmt::Display for PointSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSample::Value(v) => write!(f, "{}", v),
            PointSample::NoData => write!(f, "nodata"),
        }
    }
}

/// Marker left at the last point that returned a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMarker {
    pub point: GeoPoint,
    pub value: f32,
}

/// Parameters the renderer needs to draw the active band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisParams {
    pub band: BandName,
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

/// Result of a successful load round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRaster {
    pub handle: RasterHandle,
    pub band_count: usize,
    /// Range detected on band 0 over the viewport at request time.
    pub range: DisplayRange,
}

/// A dataset load: open the raster, count bands, detect band 0's range.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: RequestTicket,
    pub uri: String,
    pub region: BoundingBox,
    pub percentiles: [f64; 2],
    pub best_effort: bool,
}

impl LoadRequest {
    pub async fn run<P>(&self, provider: &P) -> ClimateResult<LoadedRaster>
    where
        P: RasterProvider + ?Sized,
    {
        let handle = provider.load_raster(&self.uri).await?;
        let (band_count, pair) = futures::try_join!(
            provider.band_count(&handle),
            provider.reduce_percentiles(
                &handle,
                BandName(0),
                &self.region,
                self.percentiles,
                self.best_effort,
            ),
        )?;
        if band_count == 0 {
            return Err(ClimateError::format(format!("{} has no bands", self.uri)));
        }
        Ok(LoadedRaster {
            handle,
            band_count,
            range: pair.into(),
        })
    }
}

/// A percentile range detection on one band.
#[derive(Debug, Clone)]
pub struct RangeRequest {
    pub ticket: RequestTicket,
    pub handle: RasterHandle,
    pub band: BandName,
    pub region: BoundingBox,
    pub percentiles: [f64; 2],
    pub best_effort: bool,
}

impl RangeRequest {
    pub async fn run<P>(&self, provider: &P) -> ClimateResult<PercentilePair>
    where
        P: RasterProvider + ?Sized,
    {
        provider
            .reduce_percentiles(
                &self.handle,
                self.band,
                &self.region,
                self.percentiles,
                self.best_effort,
            )
            .await
    }
}

/// A band 0 sample at a clicked point.
#[derive(Debug, Clone)]
pub struct SampleRequest {
    pub ticket: RequestTicket,
    pub handle: RasterHandle,
    pub point: GeoPoint,
}

impl SampleRequest {
    pub async fn run<P>(&self, provider: &P) -> ClimateResult<PointSample>
    where
        P: RasterProvider + ?Sized,
    {
        let samples = provider.sample_at_point(&self.handle, self.point).await?;
        Ok(samples
            .iter()
            .find(|s| s.band == BandName(0))
            .map(|s| PointSample::Value(s.value))
            .unwrap_or(PointSample::NoData))
    }
}

#[derive(Debug, Clone)]
struct ActiveRaster {
    handle: RasterHandle,
    band_count: usize,
}

/// State of one map pane.
///
/// Contexts never share data. Every provider round trip is split into a
/// `begin_*` call that issues a ticket and a `finish_*` call that applies
/// the result only if the ticket is still current. A failed request leaves
/// the context exactly as it was.
///
/// Handles the context stops using are queued as retired until the host
/// hands them back with [`ViewContext::release_retired`].
#[derive(Debug, Clone)]
pub struct ViewContext {
    label: String,
    config: ViewerConfig,
    raster: Option<ActiveRaster>,
    band_index: usize,
    range: DisplayRange,
    palette: Palette,
    viewport: BoundingBox,
    point_value: Option<PointSample>,
    sampling: bool,
    marker: Option<PointMarker>,
    sequencer: RequestSequencer,
    retired: Vec<RasterHandle>,
}

impl ViewContext {
    pub fn new(label: impl Into<String>, config: &ViewerConfig) -> Self {
        Self {
            label: label.into(),
            config: config.clone(),
            raster: None,
            band_index: 0,
            range: config.initial_range,
            palette: Palette::from_name(config.default_palette),
            viewport: BoundingBox::global(),
            point_value: None,
            sampling: false,
            marker: None,
            sequencer: RequestSequencer::new(),
            retired: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn handle(&self) -> Option<&RasterHandle> {
        self.raster.as_ref().map(|r| &r.handle)
    }

    pub fn has_raster(&self) -> bool {
        self.raster.is_some()
    }

    /// Bands of the active raster, 0 with none loaded.
    pub fn band_count(&self) -> usize {
        self.raster.as_ref().map_or(0, |r| r.band_count)
    }

    pub fn band_index(&self) -> usize {
        self.band_index
    }

    pub fn band_name(&self) -> BandName {
        BandName(self.band_index)
    }

    /// Month the selected band represents in the configured date window.
    pub fn band_month(&self) -> ClimateResult<MonthKey> {
        self.config.date_window.band_month(self.band_index)
    }

    pub fn range(&self) -> DisplayRange {
        self.range
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn legend(&self) -> [LegendEntry; PALETTE_LEN] {
        self.palette.legend()
    }

    /// Visible region of the pane; the region range detection runs over.
    pub fn bounds(&self) -> BoundingBox {
        self.viewport
    }

    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        self.viewport = bounds;
    }

    pub fn point_value(&self) -> Option<PointSample> {
        self.point_value
    }

    pub fn point_marker(&self) -> Option<PointMarker> {
        self.marker
    }

    /// Text for the picked-point box.
    pub fn point_text(&self) -> String {
        if self.sampling {
            return "sampling...".to_string();
        }
        match self.point_value {
            Some(sample) => sample.to_string(),
            None => "nothing clicked".to_string(),
        }
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    fn active(&self) -> ClimateResult<&ActiveRaster> {
        self.raster.as_ref().ok_or(ClimateError::NoActiveRaster)
    }

    fn check_band(&self, index: usize) -> ClimateResult<BandName> {
        let band_count = self.active()?.band_count;
        if index >= band_count {
            return Err(ClimateError::InvalidBandIndex { index, band_count });
        }
        Ok(BandName(index))
    }

    /// Make `index` the displayed band. The display range is left alone.
    pub fn select_band(&mut self, index: usize) -> ClimateResult<BandName> {
        let band = self.check_band(index)?;
        self.band_index = index;
        debug!(view = %self.label, band = %band, "Selected band");
        Ok(band)
    }

    /// Replace the display range as given; inverted ranges are kept.
    pub fn set_range(&mut self, range: DisplayRange) {
        if !range.is_ordered() {
            warn!(
                view = %self.label,
                min = range.min,
                max = range.max,
                "Display range min exceeds max"
            );
        }
        self.range = range;
    }

    pub fn set_range_min(&mut self, min: f64) {
        self.set_range(DisplayRange::new(min, self.range.max));
    }

    pub fn set_range_max(&mut self, max: f64) {
        self.set_range(DisplayRange::new(self.range.min, max));
    }

    pub fn change_palette(&mut self, name: PaletteName) {
        self.palette = Palette::from_name(name);
        debug!(view = %self.label, palette = %name, "Changed palette");
    }

    /// Render parameters for the active band, `None` without a raster.
    pub fn vis_params(&self) -> Option<VisParams> {
        self.raster.as_ref()?;
        Some(VisParams {
            band: self.band_name(),
            min: self.range.min,
            max: self.range.max,
            palette: self.palette.hex_colors(),
        })
    }

    /// Drop the active raster and cancel everything in flight.
    pub fn clear(&mut self) {
        self.sequencer.invalidate(RequestKind::Load);
        self.sequencer.invalidate(RequestKind::Range);
        self.sequencer.invalidate(RequestKind::Sample);
        if let Some(old) = self.raster.take() {
            self.retired.push(old.handle);
        }
        self.band_index = 0;
        self.point_value = None;
        self.sampling = false;
        self.marker = None;
        info!(view = %self.label, "Cleared raster");
    }

    // ------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------

    /// Start a load. Pending range and sample requests are superseded.
    pub fn begin_load(&mut self, uri: impl Into<String>) -> LoadRequest {
        self.sampling = false;
        LoadRequest {
            ticket: self.sequencer.issue(RequestKind::Load),
            uri: uri.into(),
            region: self.viewport,
            percentiles: self.config.percentiles,
            best_effort: self.config.best_effort,
        }
    }

    /// Apply a load result. The band resets to 0 and the detected range
    /// replaces the current one. Range and sample requests issued against
    /// the previous raster are superseded.
    pub fn finish_load(
        &mut self,
        request: &LoadRequest,
        result: ClimateResult<LoadedRaster>,
    ) -> ClimateResult<Update> {
        if self.sequencer.accept(request.ticket) == Update::Stale {
            if let Ok(loaded) = result {
                self.retired.push(loaded.handle);
            }
            return Ok(Update::Stale);
        }
        let loaded = result.map_err(|e| {
            warn!(view = %self.label, uri = %request.uri, error = %e, "Load failed");
            e
        })?;

        info!(
            view = %self.label,
            uri = %request.uri,
            bands = loaded.band_count,
            min = loaded.range.min,
            max = loaded.range.max,
            "Raster loaded"
        );
        self.sequencer.invalidate(RequestKind::Range);
        self.sequencer.invalidate(RequestKind::Sample);
        let previous = self.raster.replace(ActiveRaster {
            handle: loaded.handle,
            band_count: loaded.band_count,
        });
        if let Some(old) = previous {
            self.retired.push(old.handle);
        }
        self.band_index = 0;
        self.range = loaded.range;
        self.point_value = None;
        self.sampling = false;
        self.marker = None;
        Ok(Update::Applied)
    }

    // ------------------------------------------------------------------
    // Range detection
    // ------------------------------------------------------------------

    pub fn begin_detect_range(&mut self, band_index: usize) -> ClimateResult<RangeRequest> {
        let band = self.check_band(band_index)?;
        let handle = self.active()?.handle.clone();
        Ok(RangeRequest {
            ticket: self.sequencer.issue(RequestKind::Range),
            handle,
            band,
            region: self.viewport,
            percentiles: self.config.percentiles,
            best_effort: self.config.best_effort,
        })
    }

    pub fn finish_detect_range(
        &mut self,
        request: &RangeRequest,
        result: ClimateResult<PercentilePair>,
    ) -> ClimateResult<Update> {
        if self.sequencer.accept(request.ticket) == Update::Stale {
            return Ok(Update::Stale);
        }
        let pair = result?;
        debug!(view = %self.label, band = %request.band, lo = pair.lo, hi = pair.hi, "Detected range");
        self.range = pair.into();
        Ok(Update::Applied)
    }

    // ------------------------------------------------------------------
    // Point sampling
    // ------------------------------------------------------------------

    pub fn begin_sample(&mut self, point: GeoPoint) -> ClimateResult<SampleRequest> {
        let handle = self.active()?.handle.clone();
        self.sampling = true;
        Ok(SampleRequest {
            ticket: self.sequencer.issue(RequestKind::Sample),
            handle,
            point,
        })
    }

    /// Apply a sample. A value moves the point marker; no-data leaves the
    /// previous marker in place.
    pub fn finish_sample(
        &mut self,
        request: &SampleRequest,
        result: ClimateResult<PointSample>,
    ) -> ClimateResult<Update> {
        if self.sequencer.accept(request.ticket) == Update::Stale {
            return Ok(Update::Stale);
        }
        self.sampling = false;
        let sample = result?;
        if let PointSample::Value(value) = sample {
            self.marker = Some(PointMarker {
                point: request.point,
                value,
            });
        }
        self.point_value = Some(sample);
        Ok(Update::Applied)
    }

    /// Finish a sample and return what the view now shows for it.
    /// A superseded sample reads as [`PointSample::NoData`].
    pub fn resolve_sample(
        &mut self,
        request: &SampleRequest,
        result: ClimateResult<PointSample>,
    ) -> ClimateResult<PointSample> {
        let sample = result.as_ref().ok().copied();
        match self.finish_sample(request, result)? {
            Update::Applied => Ok(sample.unwrap_or(PointSample::NoData)),
            Update::Stale => Ok(PointSample::NoData),
        }
    }

    // ------------------------------------------------------------------
    // Handle lifecycle
    // ------------------------------------------------------------------

    /// Handles replaced, cleared or loaded too late, oldest first.
    pub fn retired_handles(&self) -> &[RasterHandle] {
        &self.retired
    }

    pub fn take_retired_handles(&mut self) -> Vec<RasterHandle> {
        std::mem::take(&mut self.retired)
    }

    /// Release every retired handle with the provider.
    ///
    /// Handles the provider fails to release are logged and dropped.
    pub async fn release_retired<P>(&mut self, provider: &P)
    where
        P: RasterProvider + ?Sized,
    {
        for handle in self.take_retired_handles() {
            if let Err(e) = provider.release_raster(&handle).await {
                warn!(view = %self.label, uri = %handle.uri, error = %e, "Failed to release raster");
            }
        }
    }

    // ------------------------------------------------------------------
    // One-shot helpers
    // ------------------------------------------------------------------

    /// Load the raster at `uri` and detect its band 0 range.
    pub async fn load_uri<P>(&mut self, provider: &P, uri: &str) -> ClimateResult<Update>
    where
        P: RasterProvider + ?Sized,
    {
        let request = self.begin_load(uri);
        let result = request.run(provider).await;
        let update = self.finish_load(&request, result);
        self.release_retired(provider).await;
        update
    }

    /// Switch to the catalog entry `key`; the clear entry drops the raster.
    pub async fn load_dataset<P>(
        &mut self,
        provider: &P,
        catalog: &DatasetCatalog,
        key: &str,
    ) -> ClimateResult<Update>
    where
        P: RasterProvider + ?Sized,
    {
        match catalog.resolve(key)? {
            DatasetSource::Clear => {
                self.clear();
                self.release_retired(provider).await;
                Ok(Update::Applied)
            }
            DatasetSource::Uri(uri) => self.load_uri(provider, &uri).await,
        }
    }

    /// Detect the band 0 range over the current viewport.
    pub async fn detect_range<P>(&mut self, provider: &P) -> ClimateResult<DisplayRange>
    where
        P: RasterProvider + ?Sized,
    {
        self.detect_range_for_band(provider, 0).await
    }

    pub async fn detect_range_for_band<P>(
        &mut self,
        provider: &P,
        band_index: usize,
    ) -> ClimateResult<DisplayRange>
    where
        P: RasterProvider + ?Sized,
    {
        let request = self.begin_detect_range(band_index)?;
        let result = request.run(provider).await;
        self.finish_detect_range(&request, result)?;
        Ok(self.range)
    }

    /// Sample band 0 at `point`. A superseded sample reads as no-data.
    pub async fn sample_at_point<P>(
        &mut self,
        provider: &P,
        point: GeoPoint,
    ) -> ClimateResult<PointSample>
    where
        P: RasterProvider + ?Sized,
    {
        let request = self.begin_sample(point)?;
        let result = request.run(provider).await;
        self.resolve_sample(&request, result)
    }
}

//! Integration tests for a single view context against the in-memory
//! provider.

use climate_common::{BandName, BoundingBox, ClimateError, GeoPoint, GridSpec, Raster};
use raster_provider::{DatasetCatalog, MemoryRasterProvider};
use test_utils::{
    assert_approx_eq, constant_series, grids, multi_band_raster, regions, uniform_raster,
    SAMPLE_CATALOG_YAML,
};
use viewer_core::{DisplayRange, PointSample, Update, ViewContext, ViewerConfig};

fn provider() -> MemoryRasterProvider {
    let provider = MemoryRasterProvider::new();
    provider
        .register("mem://uniform", uniform_raster(10, 10, 0.0, 100.0))
        .unwrap();
    provider
        .register("mem://three_band", multi_band_raster(4, 4, 3))
        .unwrap();
    provider
        .register(
            "mem://regional",
            Raster::single(GridSpec::new(2, 2, 0.0, 10.0, 5.0, 5.0), vec![1.0, 2.0, f32::NAN, 4.0])
                .unwrap(),
        )
        .unwrap();
    provider
        .register("mem://thousands", constant_series(grids::simple_10x10(), 1, 1000.0))
        .unwrap();
    provider
}

fn catalog() -> DatasetCatalog {
    DatasetCatalog::from_yaml(SAMPLE_CATALOG_YAML).unwrap()
}

fn context() -> ViewContext {
    ViewContext::new("left", &ViewerConfig::default())
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_load_detects_band_zero_range() {
    test_utils::init_test_tracing();
    let provider = provider();
    let mut ctx = context();

    let update = ctx.load_dataset(&provider, &catalog(), "uniform").await.unwrap();

    assert_eq!(update, Update::Applied);
    assert!(ctx.has_raster());
    assert_eq!(ctx.band_count(), 1);
    assert_eq!(ctx.band_index(), 0);
    assert_approx_eq!(ctx.range().min, 10.0, 1e-3);
    assert_approx_eq!(ctx.range().max, 90.0, 1e-3);
}

#[tokio::test]
async fn test_load_resets_band_index() {
    let provider = provider();
    let mut ctx = context();

    ctx.load_dataset(&provider, &catalog(), "three_band").await.unwrap();
    ctx.select_band(2).unwrap();
    assert_eq!(ctx.band_index(), 2);

    ctx.load_dataset(&provider, &catalog(), "uniform").await.unwrap();
    assert_eq!(ctx.band_index(), 0);
    assert_eq!(ctx.band_count(), 1);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_state() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();
    ctx.set_range_max(75.0);
    let handle = ctx.handle().cloned();
    let range = ctx.range();

    let err = ctx.load_uri(&provider, "mem://missing").await.unwrap_err();
    assert!(matches!(err, ClimateError::NotFound(_)));
    assert_eq!(ctx.handle().cloned(), handle);
    assert_eq!(ctx.range(), range);

    let err = ctx
        .load_dataset(&provider, &catalog(), "not_in_catalog")
        .await
        .unwrap_err();
    assert!(matches!(err, ClimateError::NotFound(_)));
    assert_eq!(ctx.handle().cloned(), handle);
}

#[tokio::test]
async fn test_clear_entry_drops_raster() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_dataset(&provider, &catalog(), "uniform").await.unwrap();

    ctx.load_dataset(&provider, &catalog(), "(*clear*)").await.unwrap();

    assert!(!ctx.has_raster());
    assert!(ctx.vis_params().is_none());
    assert!(matches!(ctx.select_band(0), Err(ClimateError::NoActiveRaster)));
}

// ============================================================================
// Band selection and range
// ============================================================================

#[tokio::test]
async fn test_select_band_out_of_range() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://three_band").await.unwrap();

    match ctx.select_band(5) {
        Err(ClimateError::InvalidBandIndex { index, band_count }) => {
            assert_eq!(index, 5);
            assert_eq!(band_count, 3);
        }
        other => panic!("expected InvalidBandIndex, got {:?}", other),
    }
    assert_eq!(ctx.band_index(), 0);
}

#[tokio::test]
async fn test_select_band_keeps_range() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://three_band").await.unwrap();
    ctx.set_range(DisplayRange::new(-1.0, 1.0));

    assert_eq!(ctx.select_band(1).unwrap(), BandName(1));
    assert_eq!(ctx.range(), DisplayRange::new(-1.0, 1.0));

    let params = ctx.vis_params().unwrap();
    assert_eq!(params.band, BandName(1));
    assert_eq!((params.min, params.max), (-1.0, 1.0));
    assert_eq!(params.palette.len(), 5);
}

#[tokio::test]
async fn test_detect_range_uses_viewport() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();

    ctx.set_bounds(regions::northern());
    let range = ctx.detect_range(&provider).await.unwrap();

    assert!(range.is_ordered());
    assert!(range.max < 50.0);
}

#[tokio::test]
async fn test_detect_range_empty_viewport_keeps_range() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();
    let before = ctx.range();

    ctx.set_bounds(regions::empty_sliver());
    let err = ctx.detect_range(&provider).await.unwrap_err();

    assert!(matches!(err, ClimateError::EmptyRegion(_)));
    assert_eq!(ctx.range(), before);
}

// ============================================================================
// Stale responses
// ============================================================================

#[tokio::test]
async fn test_older_range_result_is_discarded() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();

    let first = ctx.begin_detect_range(0).unwrap();
    ctx.set_bounds(regions::northern());
    let second = ctx.begin_detect_range(0).unwrap();

    let first_result = first.run(&provider).await;
    let second_result = second.run(&provider).await;
    let expected = DisplayRange::from(*second_result.as_ref().unwrap());

    // The newer request resolves first, then the older one straggles in
    assert_eq!(ctx.finish_detect_range(&second, second_result).unwrap(), Update::Applied);
    assert_eq!(ctx.finish_detect_range(&first, first_result).unwrap(), Update::Stale);
    assert_eq!(ctx.range(), expected);
}

#[tokio::test]
async fn test_load_supersedes_pending_requests() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://three_band").await.unwrap();

    let range = ctx.begin_detect_range(2).unwrap();
    let sample = ctx.begin_sample(GeoPoint::new(-170.0, 80.0)).unwrap();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();
    let range_after_load = ctx.range();

    let range_result = range.run(&provider).await;
    let sample_result = sample.run(&provider).await;
    assert_eq!(ctx.finish_detect_range(&range, range_result).unwrap(), Update::Stale);
    assert_eq!(ctx.finish_sample(&sample, sample_result).unwrap(), Update::Stale);

    assert_eq!(ctx.range(), range_after_load);
    assert!(ctx.point_value().is_none());
}

#[tokio::test]
async fn test_stale_failure_is_ignored() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();

    let stale = ctx.begin_load("mem://missing");
    let current = ctx.begin_load("mem://three_band");
    let stale_result = stale.run(&provider).await;
    let current_result = current.run(&provider).await;

    assert_eq!(ctx.finish_load(&current, current_result).unwrap(), Update::Applied);
    assert_eq!(ctx.finish_load(&stale, stale_result).unwrap(), Update::Stale);
    assert_eq!(ctx.band_count(), 3);
}

#[tokio::test]
async fn test_requests_issued_during_pending_load_are_discarded() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://thousands").await.unwrap();

    // Range and sample go out against the old raster while the load is in flight
    let load = ctx.begin_load("mem://uniform");
    let range = ctx.begin_detect_range(0).unwrap();
    let sample = ctx.begin_sample(GeoPoint::new(-170.0, 80.0)).unwrap();

    let load_result = load.run(&provider).await;
    let range_result = range.run(&provider).await;
    let sample_result = sample.run(&provider).await;
    assert_eq!(range_result.as_ref().unwrap().lo, 1000.0);

    assert_eq!(ctx.finish_load(&load, load_result).unwrap(), Update::Applied);
    assert_eq!(ctx.finish_detect_range(&range, range_result).unwrap(), Update::Stale);
    assert_eq!(ctx.finish_sample(&sample, sample_result).unwrap(), Update::Stale);

    assert_approx_eq!(ctx.range().min, 10.0, 1e-3);
    assert_approx_eq!(ctx.range().max, 90.0, 1e-3);
    assert!(ctx.point_value().is_none());
    assert!(ctx.point_marker().is_none());
    assert_eq!(ctx.point_text(), "nothing clicked");
}

#[tokio::test]
async fn test_failed_load_ends_pending_sample() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();

    let sample = ctx.begin_sample(GeoPoint::new(2.5, 7.5)).unwrap();
    assert_eq!(ctx.point_text(), "sampling...");

    assert!(ctx.load_uri(&provider, "mem://missing").await.is_err());
    assert_eq!(ctx.point_text(), "nothing clicked");

    let result = sample.run(&provider).await;
    assert_eq!(ctx.finish_sample(&sample, result).unwrap(), Update::Stale);
    assert_eq!(ctx.point_text(), "nothing clicked");

    // The raster survived the failed load and can still be sampled
    let value = ctx
        .sample_at_point(&provider, GeoPoint::new(2.5, 7.5))
        .await
        .unwrap();
    assert_eq!(value, PointSample::Value(1.0));
}

// ============================================================================
// Handle lifecycle
// ============================================================================

#[tokio::test]
async fn test_replaced_and_cleared_handles_are_released() {
    let provider = provider();
    let mut ctx = context();

    ctx.load_dataset(&provider, &catalog(), "uniform").await.unwrap();
    assert_eq!(provider.loaded_count(), 1);

    ctx.load_dataset(&provider, &catalog(), "three_band").await.unwrap();
    assert_eq!(provider.loaded_count(), 1);

    ctx.load_dataset(&provider, &catalog(), "(*clear*)").await.unwrap();
    assert_eq!(provider.loaded_count(), 0);
    assert!(ctx.retired_handles().is_empty());
}

#[tokio::test]
async fn test_late_load_handle_is_retired() {
    let provider = provider();
    let mut ctx = context();

    let stale = ctx.begin_load("mem://uniform");
    let current = ctx.begin_load("mem://three_band");
    let stale_result = stale.run(&provider).await;
    let current_result = current.run(&provider).await;
    let late_handle = stale_result.as_ref().unwrap().handle.clone();

    ctx.finish_load(&current, current_result).unwrap();
    assert_eq!(ctx.finish_load(&stale, stale_result).unwrap(), Update::Stale);
    assert_eq!(ctx.retired_handles(), &[late_handle][..]);
    assert_eq!(provider.loaded_count(), 2);

    ctx.release_retired(&provider).await;
    assert_eq!(provider.loaded_count(), 1);
    assert!(ctx.retired_handles().is_empty());
    assert_eq!(ctx.band_count(), 3);
}

// ============================================================================
// Point sampling
// ============================================================================

#[tokio::test]
async fn test_sample_value_moves_marker() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();

    let point = GeoPoint::new(2.5, 7.5);
    let sample = ctx.sample_at_point(&provider, point).await.unwrap();

    assert_eq!(sample, PointSample::Value(1.0));
    assert_eq!(ctx.point_text(), "1");
    let marker = ctx.point_marker().unwrap();
    assert_eq!(marker.point, point);
    assert_eq!(marker.value, 1.0);
}

#[tokio::test]
async fn test_sample_off_coverage_is_nodata() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();
    ctx.sample_at_point(&provider, GeoPoint::new(7.5, 7.5)).await.unwrap();

    let sample = ctx
        .sample_at_point(&provider, GeoPoint::new(-100.0, 40.0))
        .await
        .unwrap();

    assert_eq!(sample, PointSample::NoData);
    assert_eq!(ctx.point_text(), "nodata");
    // The marker stays on the last point with data
    assert_eq!(ctx.point_marker().unwrap().value, 2.0);
}

#[tokio::test]
async fn test_sample_on_nodata_pixel() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();

    let sample = ctx
        .sample_at_point(&provider, GeoPoint::new(2.5, 2.5))
        .await
        .unwrap();
    assert_eq!(sample, PointSample::NoData);
    assert!(ctx.point_marker().is_none());
}

#[tokio::test]
async fn test_sample_without_raster() {
    let provider = provider();
    let mut ctx = context();
    let err = ctx
        .sample_at_point(&provider, GeoPoint::new(0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ClimateError::NoActiveRaster));
}

#[tokio::test]
async fn test_pending_sample_text() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();
    ctx.set_bounds(BoundingBox::new(0.0, 0.0, 10.0, 10.0));

    let request = ctx.begin_sample(GeoPoint::new(2.5, 7.5)).unwrap();
    assert_eq!(ctx.point_text(), "sampling...");

    let result = request.run(&provider).await;
    ctx.finish_sample(&request, result).unwrap();
    assert_eq!(ctx.point_text(), "1");
}

#[tokio::test]
async fn test_superseded_sample_reads_as_nodata() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();

    let point = GeoPoint::new(2.5, 7.5);
    let older = ctx.begin_sample(point).unwrap();
    let newer = ctx.begin_sample(point).unwrap();
    let older_result = older.run(&provider).await;
    let newer_result = newer.run(&provider).await;
    assert_eq!(*older_result.as_ref().unwrap(), PointSample::Value(1.0));

    assert_eq!(ctx.resolve_sample(&newer, newer_result).unwrap(), PointSample::Value(1.0));
    assert_eq!(ctx.resolve_sample(&older, older_result).unwrap(), PointSample::NoData);
    assert_eq!(ctx.point_text(), "1");
}

#[tokio::test]
async fn test_sample_at_point_superseded_by_clear() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://regional").await.unwrap();

    let request = ctx.begin_sample(GeoPoint::new(2.5, 7.5)).unwrap();
    let result = request.run(&provider).await;
    ctx.clear();

    assert_eq!(ctx.resolve_sample(&request, result).unwrap(), PointSample::NoData);
    assert!(ctx.point_value().is_none());
}

#[test]
fn test_palette_change_without_runtime() {
    let provider = provider();
    let mut ctx = context();
    tokio_test::block_on(ctx.load_uri(&provider, "mem://three_band")).unwrap();

    ctx.change_palette(climate_common::PaletteName::Viridis);
    let params = tokio_test::assert_ok!(ctx.vis_params().ok_or("no raster"));
    assert_eq!(params.palette[0], "440154");
    assert_eq!(params.palette[4], "fde725");
}

#[tokio::test]
async fn test_vis_params_json() {
    let provider = provider();
    let mut ctx = context();
    ctx.load_uri(&provider, "mem://uniform").await.unwrap();
    ctx.set_range(DisplayRange::new(0.0, 50.0));

    let json = serde_json::to_value(ctx.vis_params().unwrap()).unwrap();
    assert_eq!(json["band"], 0);
    assert_eq!(json["min"], 0.0);
    assert_eq!(json["max"], 50.0);
    assert_eq!(json["palette"][0], "440154");
}

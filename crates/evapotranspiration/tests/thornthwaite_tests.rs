//! Tests for the Thornthwaite heat index, exponent and monthly PET.

use climate_common::time::days_in_months;
use climate_common::{GridSpec, Raster};
use evapotranspiration::{
    heat_index, heat_index_value, thornthwaite, thornthwaite_exponent, thornthwaite_pet,
    DayLengths,
};
use test_utils::{assert_approx_eq, constant_series, grids, seasonal_series};

// ============================================================================
// Heat index
// ============================================================================

#[test]
fn test_heat_index_monotonic_when_month_warms() {
    let mut months = [-5.0_f64; 12];
    months[6] = 18.0;

    let mut previous = heat_index_value(months);
    for step in 0..=40 {
        months[0] = -10.0 + step as f64 * 0.5;
        let current = heat_index_value(months);
        assert!(
            current >= previous,
            "heat index fell from {} to {} at T={}",
            previous,
            current,
            months[0]
        );
        previous = current;
    }
}

#[test]
fn test_heat_index_raster_matches_scalar() {
    let grid = grids::simple_10x10();
    let series = seasonal_series(grid, 12, 10.0, 15.0);
    let index = heat_index(&series).unwrap();

    let months: Vec<f64> = series.bands().iter().map(|b| b.data[0] as f64).collect();
    assert_approx_eq!(index.band(0).unwrap().data[0], heat_index_value(months), 1e-3);
}

// ============================================================================
// Exponent
// ============================================================================

#[test]
fn test_thornthwaite_returns_single_exponent_band() {
    let grid = grids::simple_10x10();
    let series = constant_series(grid, 12, 10.0);
    let exponent = thornthwaite(&series).unwrap();

    assert_eq!(exponent.band_count(), 1);
    let heat = 12.0 * 2.0_f64.powf(1.514);
    let expected = thornthwaite_exponent(heat);
    for value in &exponent.band(0).unwrap().data {
        assert_approx_eq!(*value, expected, 1e-5);
    }
}

#[test]
fn test_frozen_year_exponent_is_constant_term() {
    let series = constant_series(grids::equator_strip(), 12, -20.0);
    let exponent = thornthwaite(&series).unwrap();
    assert_approx_eq!(exponent.band(0).unwrap().data[0], 0.49239, 1e-6);
}

// ============================================================================
// Monthly PET
// ============================================================================

#[test]
fn test_pet_reference_value() {
    let grid = GridSpec::global(1, 1);
    let series = constant_series(grid, 12, 10.0);
    let lengths = DayLengths::Uniform(vec![12.0; 12]);

    let pet = thornthwaite_pet(&series, &lengths, &[30; 12]).unwrap();
    assert_eq!(pet.band_count(), 12);

    let heat = 12.0 * 2.0_f64.powf(1.514);
    let a = thornthwaite_exponent(heat);
    let expected = 16.0 * (100.0 / heat).powf(a);
    for band in pet.bands() {
        assert_approx_eq!(band.data[0], expected, 1e-3);
    }
}

#[test]
fn test_pet_zero_when_every_month_freezes() {
    let grid = GridSpec::global(2, 1);
    let series = constant_series(grid, 12, -3.0);
    let lengths = DayLengths::Uniform(vec![10.0; 12]);

    let pet = thornthwaite_pet(&series, &lengths, &days_in_months(None)).unwrap();
    for band in pet.bands() {
        assert!(band.data.iter().all(|v| *v == 0.0));
    }
}

#[test]
fn test_pet_with_latitude_day_lengths() {
    let grid = grids::meridian_column();
    let series = seasonal_series(grid, 12, 5.0, 10.0);
    let lengths = DayLengths::from_latitude(grid, Some(2018)).unwrap();

    let pet = thornthwaite_pet(&series, &lengths, &days_in_months(Some(2018))).unwrap();
    for band in pet.bands() {
        for value in &band.data {
            assert!(value.is_finite());
            assert!(*value >= 0.0);
        }
    }

    // Freezing months produce no PET.
    let january = pet.band(0).unwrap();
    assert_eq!(january.data[0], 0.0);
}

#[test]
fn test_pet_requires_month_lengths_per_band() {
    let series = constant_series(GridSpec::global(1, 1), 3, 10.0);
    let lengths = DayLengths::Uniform(vec![12.0; 3]);
    assert!(thornthwaite_pet(&series, &lengths, &[31, 28]).is_err());
}

#[test]
fn test_pet_missing_month_is_no_data() {
    let grid = GridSpec::global(2, 1);
    let mut bands = vec![vec![10.0_f32; 2]; 12];
    bands[4][1] = f32::NAN;
    let series = Raster::new(grid, bands).unwrap();

    let pet = thornthwaite_pet(&series, &DayLengths::Uniform(vec![12.0; 12]), &[30; 12]).unwrap();
    assert!(pet.band(0).unwrap().get(0).is_some());
    assert!(pet.band(0).unwrap().get(1).is_none());
}

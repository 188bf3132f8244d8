//! Hargreaves reference evapotranspiration (ETo) over grass.
//!
//! Based on equation 52 in Allen et al. (1998):
//!
//! ```text
//! ETo = 0.0023 * (Tmean + 17.8) * sqrt(Tmax - Tmin) * 0.408 * Ra
//! ```
//!
//! where `Ra` is the extraterrestrial radiation in MJ m-2 day-1 and the
//! factor 0.408 converts it to equivalent evaporation in mm/day.
//!
//! A single configurable day of year drives `Ra` for every month band of
//! the series. This mirrors how the monthly climatology is evaluated and is
//! a known simplification rather than a per-month solar calendar.

use rayon::prelude::*;
use tracing::{debug, warn};

use climate_common::{ClimateError, ClimateResult, GridSpec, Raster};

use crate::solar::{check_day_of_year, extraterrestrial_radiation};

/// Monthly mean, maximum and minimum temperature in Celsius.
///
/// All three rasters share one grid and one band per month.
#[derive(Debug, Clone)]
pub struct TemperatureSeries {
    mean: Raster,
    max: Raster,
    min: Raster,
}

impl TemperatureSeries {
    pub fn new(mean: Raster, max: Raster, min: Raster) -> ClimateResult<Self> {
        mean.ensure_same_grid(&max, "maximum temperature")?;
        mean.ensure_same_grid(&min, "minimum temperature")?;

        let months = mean.band_count();
        if max.band_count() != months || min.band_count() != months {
            return Err(ClimateError::grid_mismatch(format!(
                "temperature series band counts differ (mean {}, max {}, min {})",
                months,
                max.band_count(),
                min.band_count()
            )));
        }

        Ok(Self { mean, max, min })
    }

    pub fn grid(&self) -> &GridSpec {
        self.mean.grid()
    }

    pub fn months(&self) -> usize {
        self.mean.band_count()
    }
}

/// Pixels whose land-cover class equals `excluded_class` become no-data.
#[derive(Debug, Clone, Copy)]
pub struct LandCoverMask<'a> {
    pub classes: &'a Raster,
    pub excluded_class: f32,
}

impl<'a> LandCoverMask<'a> {
    pub fn new(classes: &'a Raster, excluded_class: f32) -> Self {
        Self {
            classes,
            excluded_class,
        }
    }

    /// Per-pixel keep flags taken from the first band.
    fn keep_flags(&self) -> Vec<bool> {
        self.classes.bands()[0]
            .data
            .iter()
            .map(|&class| class != self.excluded_class)
            .collect()
    }
}

/// Hargreaves ETo for one pixel, `None` when `tmax < tmin` or an input is
/// missing.
pub fn hargreaves_eto(tmin: f64, tmax: f64, tmean: f64, et_rad: f64) -> Option<f64> {
    let range = tmax - tmin;
    if range.is_nan() || range < 0.0 || tmean.is_nan() {
        return None;
    }
    Some(0.0023 * (tmean + 17.8) * range.sqrt() * 0.408 * et_rad)
}

/// Evaluate Hargreaves ETo for every month band of `series`.
///
/// # Arguments
/// * `latitude` - Latitude in degrees for every pixel, row-major
/// * `day_of_year` - Day used for the radiation term of every band
/// * `series` - Monthly temperatures in Celsius
/// * `land_cover` - Optional mask removing one land-cover class
///
/// # Returns
/// A raster with one ETo band per month (`B0..B{n-1}`), mm/day.
pub fn hargreaves(
    latitude: &[f64],
    day_of_year: u32,
    series: &TemperatureSeries,
    land_cover: Option<LandCoverMask<'_>>,
) -> ClimateResult<Raster> {
    check_day_of_year(day_of_year)?;

    let grid = *series.grid();
    if latitude.len() != grid.len() {
        return Err(ClimateError::grid_mismatch(format!(
            "latitude grid has {} pixels, temperature grid has {}",
            latitude.len(),
            grid.len()
        )));
    }

    let keep = match land_cover {
        Some(mask) => {
            series.mean.ensure_same_grid(mask.classes, "land cover")?;
            Some(mask.keep_flags())
        }
        None => None,
    };

    // Radiation depends only on latitude and the fixed day.
    let et_rad: Vec<f64> = latitude
        .par_iter()
        .map(|lat| extraterrestrial_radiation(lat.to_radians(), day_of_year))
        .collect();

    let mut bands = Vec::with_capacity(series.months());
    let mut inverted_pixels = 0usize;

    for month in 0..series.months() {
        let mean = &series.mean.bands()[month].data;
        let max = &series.max.bands()[month].data;
        let min = &series.min.bands()[month].data;

        let band: Vec<f32> = (0..grid.len())
            .into_par_iter()
            .map(|i| {
                if keep.as_ref().is_some_and(|k| !k[i]) {
                    return f32::NAN;
                }
                hargreaves_eto(min[i] as f64, max[i] as f64, mean[i] as f64, et_rad[i])
                    .map(|v| v as f32)
                    .unwrap_or(f32::NAN)
            })
            .collect();

        inverted_pixels += (0..grid.len())
            .filter(|&i| (max[i] as f64) < (min[i] as f64))
            .count();
        bands.push(band);
    }

    if inverted_pixels > 0 {
        warn!(
            pixels = inverted_pixels,
            "Maximum temperature below minimum; pixels set to no-data"
        );
    }

    let pixels = grid.len() * series.months();
    metrics::histogram!("et_pixels_evaluated").record(pixels as f64);
    debug!(
        months = series.months(),
        nx = grid.nx,
        ny = grid.ny,
        day_of_year,
        masked = keep.is_some(),
        "Computed Hargreaves ETo"
    );

    Raster::new(grid, bands)
}

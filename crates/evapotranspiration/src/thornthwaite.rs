//! Thornthwaite (1948) potential evapotranspiration.
//!
//! ```text
//! PET = 1.6 * (L / 12) * (N / 30) * (10 * Ta / I) ^ a        [cm/month]
//! I   = Σ (Ta_i / 5) ^ 1.514
//! a   = 6.75e-7 I³ - 7.71e-5 I² + 1.792e-2 I + 0.49239
//! ```
//!
//! `Ta` is the monthly mean air temperature with negatives set to zero,
//! `L` the mean day length in hours and `N` the number of days in the month.
//!
//! [`thornthwaite`] returns the exponent `a`. Monthly PET needs day lengths
//! and month lengths, which callers pass explicitly to [`thornthwaite_pet`].

use rayon::prelude::*;
use tracing::debug;

use climate_common::{ClimateError, ClimateResult, GridSpec, Raster};

use crate::solar::monthly_mean_daylight_hours;

/// Upper clamp applied to monthly temperatures, Celsius.
const MAX_TEMPERATURE: f64 = 100.0;

fn adjusted_temperature(t: f64) -> f64 {
    t.clamp(0.0, MAX_TEMPERATURE)
}

/// Heat index `I` for one pixel's monthly means.
///
/// Months at or below 0 °C contribute nothing. Any missing month makes
/// the whole index missing.
pub fn heat_index_value<I>(monthly_t: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut total = 0.0;
    for t in monthly_t {
        if t.is_nan() {
            return f64::NAN;
        }
        let ratio = adjusted_temperature(t) / 5.0;
        if ratio > 0.0 {
            total += ratio.powf(1.514);
        }
    }
    total
}

/// Exponent `a` for a heat index.
pub fn thornthwaite_exponent(heat_index: f64) -> f64 {
    6.75e-07 * heat_index.powi(3) - 7.71e-05 * heat_index.powi(2) + 1.792e-02 * heat_index
        + 0.49239
}

fn pixel_months(series: &Raster, idx: usize) -> impl Iterator<Item = f64> + '_ {
    series.bands().iter().map(move |b| b.data[idx] as f64)
}

fn per_pixel<F>(series: &Raster, f: F) -> ClimateResult<Raster>
where
    F: Fn(usize) -> f64 + Sync,
{
    let grid = *series.grid();
    let data: Vec<f32> = (0..grid.len())
        .into_par_iter()
        .map(|i| f(i) as f32)
        .collect();
    Raster::single(grid, data)
}

/// Heat index raster (`B0`) of a monthly mean temperature series.
pub fn heat_index(series: &Raster) -> ClimateResult<Raster> {
    per_pixel(series, |i| heat_index_value(pixel_months(series, i)))
}

/// Thornthwaite exponent raster (`B0`) of a monthly mean temperature series.
pub fn thornthwaite(series: &Raster) -> ClimateResult<Raster> {
    if series.band_count() != 12 {
        debug!(
            months = series.band_count(),
            "Thornthwaite series is not a single calendar year"
        );
    }
    let exponent = per_pixel(series, |i| {
        thornthwaite_exponent(heat_index_value(pixel_months(series, i)))
    })?;
    metrics::histogram!("et_pixels_evaluated").record(series.grid().len() as f64);
    Ok(exponent)
}

/// Mean day length in hours for each month of the series.
#[derive(Debug, Clone)]
pub enum DayLengths {
    /// One value per month shared by every pixel.
    Uniform(Vec<f64>),
    /// One band per month on the series grid.
    PerPixel(Raster),
}

impl DayLengths {
    /// Day lengths of a calendar year derived from each row's latitude.
    pub fn from_latitude(grid: GridSpec, year: Option<i32>) -> ClimateResult<Self> {
        let mut bands = vec![Vec::with_capacity(grid.len()); 12];
        for row in 0..grid.ny {
            let hours = monthly_mean_daylight_hours(grid.row_latitude(row), year);
            for (band, h) in bands.iter_mut().zip(hours) {
                band.extend(std::iter::repeat(h as f32).take(grid.nx));
            }
        }
        Ok(Self::PerPixel(Raster::new(grid, bands)?))
    }

    fn validate(&self, series: &Raster) -> ClimateResult<()> {
        let months = series.band_count();
        let check = |h: f64| {
            if !h.is_finite() || !(0.0..=24.0).contains(&h) {
                return Err(ClimateError::numeric_domain(format!(
                    "day length must be within 0..=24 hours, got {}",
                    h
                )));
            }
            Ok(())
        };

        match self {
            DayLengths::Uniform(hours) => {
                if hours.len() != months {
                    return Err(ClimateError::grid_mismatch(format!(
                        "{} day lengths for {} months",
                        hours.len(),
                        months
                    )));
                }
                hours.iter().try_for_each(|&h| check(h))
            }
            DayLengths::PerPixel(raster) => {
                series.ensure_same_grid(raster, "day length raster")?;
                if raster.band_count() != months {
                    return Err(ClimateError::grid_mismatch(format!(
                        "{} day length bands for {} months",
                        raster.band_count(),
                        months
                    )));
                }
                raster
                    .bands()
                    .iter()
                    .flat_map(|b| b.data.iter())
                    .filter(|v| !v.is_nan())
                    .try_for_each(|&h| check(h as f64))
            }
        }
    }

    fn hours(&self, month: usize, idx: usize) -> f64 {
        match self {
            DayLengths::Uniform(hours) => hours[month],
            DayLengths::PerPixel(raster) => raster.bands()[month].data[idx] as f64,
        }
    }
}

/// Monthly Thornthwaite PET in mm/month, one band per month.
///
/// # Arguments
/// * `series` - Monthly mean temperature, Celsius
/// * `day_lengths` - Mean daylight hours per month
/// * `days_in_month` - Number of days of each month band
///
/// Where the heat index is zero (every month at or below freezing) PET is 0.
pub fn thornthwaite_pet(
    series: &Raster,
    day_lengths: &DayLengths,
    days_in_month: &[u32],
) -> ClimateResult<Raster> {
    let months = series.band_count();
    if days_in_month.len() != months {
        return Err(ClimateError::grid_mismatch(format!(
            "{} month lengths for {} months",
            days_in_month.len(),
            months
        )));
    }
    day_lengths.validate(series)?;

    let grid = *series.grid();
    let per_pixel: Vec<Vec<f32>> = (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let heat = heat_index_value(pixel_months(series, i));
            if heat.is_nan() {
                return vec![f32::NAN; months];
            }
            let a = thornthwaite_exponent(heat);
            pixel_months(series, i)
                .enumerate()
                .map(|(m, t)| {
                    if heat == 0.0 {
                        return 0.0;
                    }
                    let l = day_lengths.hours(m, i);
                    let n = days_in_month[m] as f64;
                    let ta = adjusted_temperature(t);
                    // x10 converts cm/month to mm/month
                    (1.6 * (l / 12.0) * (n / 30.0) * (10.0 * ta / heat).powf(a) * 10.0) as f32
                })
                .collect()
        })
        .collect();

    let mut bands = vec![Vec::with_capacity(grid.len()); months];
    for pixel in per_pixel {
        for (band, value) in bands.iter_mut().zip(pixel) {
            band.push(value);
        }
    }

    debug!(months, nx = grid.nx, ny = grid.ny, "Computed Thornthwaite PET");
    Raster::new(grid, bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_index_skips_freezing_months() {
        let warm = heat_index_value([10.0, -5.0, 0.0]);
        assert!((warm - 2.0_f64.powf(1.514)).abs() < 1e-12);
        assert_eq!(heat_index_value([-10.0, -1.0]), 0.0);
        assert!(heat_index_value([10.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_heat_index_clamps_hot_months() {
        assert_eq!(heat_index_value([150.0]), heat_index_value([100.0]));
    }

    #[test]
    fn test_exponent_at_zero_heat() {
        assert!((thornthwaite_exponent(0.0) - 0.49239).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_day_lengths_length_checked() {
        let series = Raster::new(GridSpec::global(1, 1), vec![vec![10.0]; 12]).unwrap();
        let lengths = DayLengths::Uniform(vec![12.0; 11]);
        let err = thornthwaite_pet(&series, &lengths, &[30; 12]).unwrap_err();
        assert!(matches!(err, ClimateError::GridMismatch(_)));
    }

    #[test]
    fn test_negative_day_length_rejected() {
        let series = Raster::new(GridSpec::global(1, 1), vec![vec![10.0]; 2]).unwrap();
        let lengths = DayLengths::Uniform(vec![12.0, -1.0]);
        let err = thornthwaite_pet(&series, &lengths, &[31, 28]).unwrap_err();
        assert!(matches!(err, ClimateError::NumericDomain(_)));
    }
}

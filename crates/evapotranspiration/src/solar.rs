//! Solar geometry used by both estimators.
//!
//! All angles are radians unless a parameter says otherwise. Day of year
//! runs from 1 (1 January) to 365 or 366.

use std::f64::consts::PI;

use climate_common::time::days_in_months;
use climate_common::{ClimateError, ClimateResult};

/// Solar constant [MJ m-2 min-1].
pub const SOLAR_CONSTANT: f64 = 0.0820;

const DAYS_PER_YEAR: f64 = 365.0;

/// Reject day-of-year values outside 1..=366.
pub fn check_day_of_year(day_of_year: u32) -> ClimateResult<()> {
    if !(1..=366).contains(&day_of_year) {
        return Err(ClimateError::numeric_domain(format!(
            "day of year must be in 1..=366, got {}",
            day_of_year
        )));
    }
    Ok(())
}

/// Solar declination for a day of the year.
pub fn solar_declination(day_of_year: u32) -> f64 {
    0.409 * ((2.0 * PI / DAYS_PER_YEAR) * day_of_year as f64 - 1.39).sin()
}

/// Sunset hour angle.
///
/// `-tan(lat) * tan(dec)` leaves [-1, 1] inside the polar circles; it is
/// clamped there, giving π under midnight sun and 0 during polar night.
pub fn sunset_hour_angle(latitude: f64, declination: f64) -> f64 {
    let cos_sha = -latitude.tan() * declination.tan();
    cos_sha.clamp(-1.0, 1.0).acos()
}

/// Inverse relative Earth-Sun distance.
pub fn inverse_relative_distance(day_of_year: u32) -> f64 {
    1.0 + 0.033 * ((2.0 * PI / DAYS_PER_YEAR) * day_of_year as f64).cos()
}

/// Daily extraterrestrial radiation [MJ m-2 day-1] at a latitude.
pub fn extraterrestrial_radiation(latitude: f64, day_of_year: u32) -> f64 {
    let declination = solar_declination(day_of_year);
    let sha = sunset_hour_angle(latitude, declination);
    let ird = inverse_relative_distance(day_of_year);

    let tmp1 = (24.0 * 60.0) / PI;
    let tmp2 = sha * latitude.sin() * declination.sin();
    let tmp3 = latitude.cos() * declination.cos() * sha.sin();

    tmp1 * SOLAR_CONSTANT * ird * (tmp2 + tmp3)
}

/// Daylight hours for a sunset hour angle.
pub fn daylight_hours(sunset_hour_angle: f64) -> f64 {
    (24.0 / PI) * sunset_hour_angle
}

/// Mean daylight hours of each calendar month at a latitude in degrees.
///
/// `year` only matters for February; `None` assumes a non-leap year.
pub fn monthly_mean_daylight_hours(latitude_deg: f64, year: Option<i32>) -> [f64; 12] {
    let latitude = latitude_deg.to_radians();
    let mut means = [0.0; 12];
    let mut day_of_year = 1u32;

    for (slot, days) in means.iter_mut().zip(days_in_months(year)) {
        let mut total = 0.0;
        for _ in 0..days {
            let sha = sunset_hour_angle(latitude, solar_declination(day_of_year));
            total += daylight_hours(sha);
            day_of_year += 1;
        }
        *slot = total / days as f64;
    }

    means
}

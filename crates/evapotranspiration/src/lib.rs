//! Evapotranspiration over gridded temperature series.
//!
//! Two independent estimators, each a pure per-pixel transform producing a
//! new [`Raster`](climate_common::Raster):
//!
//! - **Hargreaves** reference evapotranspiration (ETo, mm/day) from monthly
//!   mean/max/min temperature and extraterrestrial radiation.
//! - **Thornthwaite** heat index and exponent from twelve monthly means,
//!   with the full monthly PET available when day lengths are supplied.
//!
//! # Example
//!
//! ```ignore
//! use evapotranspiration::{hargreaves, EtConfig, TemperatureSeries};
//!
//! let series = TemperatureSeries::new(tmean, tmax, tmin)?;
//! let latitude = series.grid().latitude_grid();
//! let eto = hargreaves(&latitude, config.day_of_year, &series, None)?;
//! ```

pub mod config;
pub mod hargreaves;
pub mod solar;
pub mod thornthwaite;
pub mod units;

pub use config::EtConfig;
pub use hargreaves::{hargreaves, hargreaves_eto, LandCoverMask, TemperatureSeries};
pub use solar::{
    daylight_hours, extraterrestrial_radiation, inverse_relative_distance,
    monthly_mean_daylight_hours, solar_declination, sunset_hour_angle, SOLAR_CONSTANT,
};
pub use thornthwaite::{
    heat_index, heat_index_value, thornthwaite, thornthwaite_exponent, thornthwaite_pet,
    DayLengths,
};
pub use units::{kelvin_to_celsius, KELVIN_OFFSET};

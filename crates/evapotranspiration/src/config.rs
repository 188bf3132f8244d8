//! Configuration for the evapotranspiration engine.

use climate_common::Raster;
use serde::{Deserialize, Serialize};

use crate::hargreaves::LandCoverMask;

/// Land-cover class for permanent water and ice in the global land-cover
/// product the ETo layer is masked with.
pub const WATER_ICE_CLASS: f32 = 210.0;

/// Parameters that are fixed for a whole ET computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtConfig {
    /// Day of year used for the Hargreaves radiation term.
    pub day_of_year: u32,

    /// Land-cover class removed from the Hargreaves output.
    pub excluded_land_cover_class: f32,

    /// Year used for month lengths and daylight hours (`None` = non-leap).
    pub year: Option<i32>,
}

impl Default for EtConfig {
    fn default() -> Self {
        Self {
            day_of_year: 1,
            excluded_land_cover_class: WATER_ICE_CLASS,
            year: None,
        }
    }
}

impl EtConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ET_DAY_OF_YEAR") {
            if let Ok(day) = val.parse() {
                config.day_of_year = day;
            }
        }

        if let Ok(val) = std::env::var("ET_WATER_ICE_CLASS") {
            if let Ok(class) = val.parse() {
                config.excluded_land_cover_class = class;
            }
        }

        if let Ok(val) = std::env::var("ET_YEAR") {
            if let Ok(year) = val.parse() {
                config.year = Some(year);
            }
        }

        config
    }

    /// Mask removing the configured land-cover class from `classes`.
    pub fn land_cover_mask<'a>(&self, classes: &'a Raster) -> LandCoverMask<'a> {
        LandCoverMask::new(classes, self.excluded_land_cover_class)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_of_year == 0 || self.day_of_year > 366 {
            return Err(format!(
                "day_of_year must be 1-366, got {}",
                self.day_of_year
            ));
        }

        if !self.excluded_land_cover_class.is_finite() {
            return Err("excluded_land_cover_class must be finite".to_string());
        }

        Ok(())
    }
}

//! Unit conversion for reanalysis temperature inputs.

use climate_common::Raster;

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f32 = 273.15;

/// Convert every band of a Kelvin raster to Celsius. No-data stays NaN.
pub fn kelvin_to_celsius(raster: &Raster) -> Raster {
    raster.map_values(|k| k - KELVIN_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::GridSpec;

    #[test]
    fn test_kelvin_to_celsius() {
        let raster = Raster::single(GridSpec::global(3, 1), vec![273.15, 300.0, f32::NAN]).unwrap();
        let celsius = kelvin_to_celsius(&raster);
        let data = &celsius.band(0).unwrap().data;
        assert!(data[0].abs() < 1e-4);
        assert!((data[1] - 26.85).abs() < 1e-3);
        assert!(data[2].is_nan());
    }
}

//! Multi-band raster model.
//!
//! A [`Raster`] is an immutable stack of equally sized bands over a
//! [`GridSpec`]. Bands are addressed by index through [`Raster::band`],
//! which validates the index at the boundary, and carry a [`BandName`]
//! (`B0`, `B1`, ...). No-data pixels are stored as NaN.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bbox::GeoPoint;
use crate::error::{ClimateError, ClimateResult};
use crate::grid::GridSpec;

/// Opaque identifier of a loaded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterId(pub Uuid);

impl RasterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RasterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a band, always of the form `B{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BandName(pub usize);

impl BandName {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

impl FromStr for BandName {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('B')
            .and_then(|digits| digits.parse::<usize>().ok())
            .map(BandName)
            .ok_or_else(|| ClimateError::InvalidBandName(s.to_string()))
    }
}

/// One 2-D slice of a raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub name: BandName,
    /// Row-major samples, NaN marks no-data
    pub data: Vec<f32>,
}

impl Band {
    pub fn new(name: BandName, data: Vec<f32>) -> Self {
        Self { name, data }
    }

    /// Sample at a flat index, `None` for no-data or out of range.
    pub fn get(&self, idx: usize) -> Option<f32> {
        self.data.get(idx).copied().filter(|v| !v.is_nan())
    }

    /// Number of pixels holding data.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }
}

/// An immutable multi-band raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    grid: GridSpec,
    bands: Vec<Band>,
}

impl Raster {
    /// Build a raster from per-band sample vectors. Bands are named in order.
    pub fn new(grid: GridSpec, bands: Vec<Vec<f32>>) -> ClimateResult<Self> {
        grid.validate()?;
        if bands.is_empty() {
            return Err(ClimateError::format("raster has no bands"));
        }

        let expected = grid.len();
        let bands = bands
            .into_iter()
            .enumerate()
            .map(|(i, data)| {
                if data.len() != expected {
                    return Err(ClimateError::format(format!(
                        "band B{} has {} samples, grid {}x{} needs {}",
                        i,
                        data.len(),
                        grid.nx,
                        grid.ny,
                        expected
                    )));
                }
                Ok(Band::new(BandName(i), data))
            })
            .collect::<ClimateResult<Vec<_>>>()?;

        Ok(Self { grid, bands })
    }

    /// Single-band raster, band named `B0`.
    pub fn single(grid: GridSpec, data: Vec<f32>) -> ClimateResult<Self> {
        Self::new(grid, vec![data])
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Check an index against the band count.
    pub fn check_band_index(&self, index: usize) -> ClimateResult<BandName> {
        if index >= self.bands.len() {
            return Err(ClimateError::InvalidBandIndex {
                index,
                band_count: self.bands.len(),
            });
        }
        Ok(BandName(index))
    }

    /// Typed band accessor.
    pub fn band(&self, index: usize) -> ClimateResult<&Band> {
        self.check_band_index(index)?;
        Ok(&self.bands[index])
    }

    /// Look a band up by its `B{n}` name.
    pub fn band_by_name(&self, name: &str) -> ClimateResult<&Band> {
        let name: BandName = name.parse()?;
        self.band(name.index())
    }

    /// Raw values of every band at a point, `None` outside the grid.
    pub fn values_at(&self, point: GeoPoint) -> Option<Vec<f32>> {
        let (col, row) = self.grid.coords_to_cell(point)?;
        let idx = self.grid.flat_index(col, row);
        Some(self.bands.iter().map(|b| b.data[idx]).collect())
    }

    /// Derive a new raster by applying `f` to every sample of every band.
    pub fn map_values<F>(&self, f: F) -> Raster
    where
        F: Fn(f32) -> f32,
    {
        let bands = self
            .bands
            .iter()
            .map(|b| Band::new(b.name, b.data.iter().map(|&v| f(v)).collect()))
            .collect();
        Raster {
            grid: self.grid,
            bands,
        }
    }

    /// Fail unless `other` has the same grid dimensions.
    pub fn ensure_same_grid(&self, other: &Raster, what: &str) -> ClimateResult<()> {
        if !self.grid.same_shape(&other.grid) {
            return Err(ClimateError::grid_mismatch(format!(
                "{} is {}x{}, expected {}x{}",
                what, other.grid.nx, other.grid.ny, self.grid.nx, self.grid.ny
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_band() -> Raster {
        let grid = GridSpec::global(2, 2);
        Raster::new(
            grid,
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0; 4], vec![f32::NAN; 4]],
        )
        .unwrap()
    }

    #[test]
    fn test_band_name_roundtrip() {
        assert_eq!(BandName(7).to_string(), "B7");
        assert_eq!("B12".parse::<BandName>().unwrap(), BandName(12));
        assert!("b1".parse::<BandName>().is_err());
        assert!("B".parse::<BandName>().is_err());
    }

    #[test]
    fn test_band_access_validates_index() {
        let raster = three_band();
        assert_eq!(raster.band_count(), 3);
        assert_eq!(raster.band(1).unwrap().name, BandName(1));
        match raster.band(5) {
            Err(ClimateError::InvalidBandIndex { index, band_count }) => {
                assert_eq!(index, 5);
                assert_eq!(band_count, 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(raster.band_by_name("B2").unwrap().valid_count(), 0);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let grid = GridSpec::global(2, 2);
        let err = Raster::new(grid, vec![vec![0.0; 3]]).unwrap_err();
        assert!(matches!(err, ClimateError::FormatError(_)));
    }

    #[test]
    fn test_values_at() {
        let raster = three_band();
        let values = raster.values_at(GeoPoint::new(90.0, -45.0)).unwrap();
        assert_eq!(values[0], 4.0);
        assert_eq!(values[1], 5.0);
        assert!(values[2].is_nan());
        assert!(raster.values_at(GeoPoint::new(0.0, 95.0)).is_none());
    }

    #[test]
    fn test_map_values_keeps_names() {
        let raster = three_band().map_values(|v| v * 2.0);
        assert_eq!(raster.band(0).unwrap().data, vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(raster.bands()[2].name, BandName(2));
    }
}

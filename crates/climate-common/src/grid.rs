//! Regular lat/lon grid specifications.

use serde::{Deserialize, Serialize};

use crate::bbox::{BoundingBox, GeoPoint};
use crate::error::{ClimateError, ClimateResult};

/// Specification of a regular lat/lon grid.
///
/// Data is row-major, row 0 is the northernmost row and columns run west
/// to east. Pixel centers sit half a step inside the outer edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns (longitude)
    pub nx: usize,
    /// Number of rows (latitude)
    pub ny: usize,
    /// Western edge of the first column, degrees
    pub west: f64,
    /// Northern edge of the first row, degrees
    pub north: f64,
    /// Column width in degrees
    pub dx: f64,
    /// Row height in degrees
    pub dy: f64,
}

impl GridSpec {
    /// Create a new grid specification.
    pub fn new(nx: usize, ny: usize, west: f64, north: f64, dx: f64, dy: f64) -> Self {
        Self {
            nx,
            ny,
            west,
            north,
            dx,
            dy,
        }
    }

    /// A grid covering the whole globe at the given dimensions.
    pub fn global(nx: usize, ny: usize) -> Self {
        Self::new(nx, ny, -180.0, 90.0, 360.0 / nx as f64, 180.0 / ny as f64)
    }

    /// Reject degenerate grids.
    pub fn validate(&self) -> ClimateResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ClimateError::format(format!(
                "grid has zero extent ({}x{})",
                self.nx, self.ny
            )));
        }
        if !(self.dx > 0.0 && self.dy > 0.0) {
            return Err(ClimateError::format(format!(
                "grid steps must be positive (dx={}, dy={})",
                self.dx, self.dy
            )));
        }
        Ok(())
    }

    /// Outer edges of the grid.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            min_lon: self.west,
            min_lat: self.north - self.ny as f64 * self.dy,
            max_lon: self.west + self.nx as f64 * self.dx,
            max_lat: self.north,
        }
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Flat index of a (col, row) position.
    pub fn flat_index(&self, col: usize, row: usize) -> usize {
        row * self.nx + col
    }

    /// Latitude of the pixel centers in a row.
    pub fn row_latitude(&self, row: usize) -> f64 {
        self.north - (row as f64 + 0.5) * self.dy
    }

    /// Longitude of the pixel centers in a column.
    pub fn col_longitude(&self, col: usize) -> f64 {
        self.west + (col as f64 + 0.5) * self.dx
    }

    /// Center coordinates of a cell.
    pub fn cell_center(&self, col: usize, row: usize) -> Option<GeoPoint> {
        if col >= self.nx || row >= self.ny {
            return None;
        }
        Some(GeoPoint::new(self.col_longitude(col), self.row_latitude(row)))
    }

    /// Cell containing a geographic point, if any.
    ///
    /// Points on the far east or south edge belong to the last column/row.
    pub fn coords_to_cell(&self, point: GeoPoint) -> Option<(usize, usize)> {
        if !self.bbox().contains(point) {
            return None;
        }

        let col = ((point.lon - self.west) / self.dx).floor() as usize;
        let row = ((self.north - point.lat) / self.dy).floor() as usize;

        Some((col.min(self.nx - 1), row.min(self.ny - 1)))
    }

    /// Latitude in degrees of every pixel, row-major.
    pub fn latitude_grid(&self) -> Vec<f64> {
        let mut lats = Vec::with_capacity(self.len());
        for row in 0..self.ny {
            let lat = self.row_latitude(row);
            lats.extend(std::iter::repeat(lat).take(self.nx));
        }
        lats
    }

    /// Flat indices of the pixels whose centers fall inside `region`.
    pub fn indices_within(&self, region: &BoundingBox) -> Vec<usize> {
        let mut indices = Vec::new();
        for row in 0..self.ny {
            let lat = self.row_latitude(row);
            if lat < region.min_lat || lat > region.max_lat {
                continue;
            }
            for col in 0..self.nx {
                let lon = self.col_longitude(col);
                if lon >= region.min_lon && lon <= region.max_lon {
                    indices.push(self.flat_index(col, row));
                }
            }
        }
        indices
    }

    /// Whether two grids address the same pixels.
    pub fn same_shape(&self, other: &GridSpec) -> bool {
        self.nx == other.nx && self.ny == other.ny
    }
}

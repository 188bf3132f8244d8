//! Test data generators for creating synthetic climate rasters.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use climate_common::{GridSpec, Raster};

/// Creates a grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Values evenly spaced from `lo` to `hi` in row-major order.
///
/// A stand-in for a uniform distribution with exactly known percentiles.
pub fn create_uniform_grid(width: usize, height: usize, lo: f32, hi: f32) -> Vec<f32> {
    let n = width * height;
    if n <= 1 {
        return vec![lo; n];
    }
    let step = (hi - lo) / (n - 1) as f32;
    (0..n).map(|i| lo + step * i as f32).collect()
}

/// Single-band global raster of evenly spaced values.
pub fn uniform_raster(width: usize, height: usize, lo: f32, hi: f32) -> Raster {
    Raster::single(
        GridSpec::global(width, height),
        create_uniform_grid(width, height, lo, hi),
    )
    .expect("uniform raster dimensions are consistent")
}

/// Global raster with `bands` bands; band `b` holds `create_test_grid + b`.
pub fn multi_band_raster(width: usize, height: usize, bands: usize) -> Raster {
    let base = create_test_grid(width, height);
    let data = (0..bands)
        .map(|b| base.iter().map(|v| v + b as f32).collect())
        .collect();
    Raster::new(GridSpec::global(width, height), data).expect("band lengths match the grid")
}

/// Monthly mean temperature series in Celsius.
///
/// Month `m` at every pixel is `base + amplitude * sin(2π (m - 3) / 12)`,
/// a rough northern-hemisphere seasonal cycle peaking in June/July.
pub fn seasonal_series(grid: GridSpec, months: usize, base: f32, amplitude: f32) -> Raster {
    let data = (0..months)
        .map(|m| {
            let phase = 2.0 * std::f32::consts::PI * (m as f32 - 3.0) / 12.0;
            vec![base + amplitude * phase.sin(); grid.len()]
        })
        .collect();
    Raster::new(grid, data).expect("series lengths match the grid")
}

/// A series where every pixel of every month is `value`.
pub fn constant_series(grid: GridSpec, months: usize, value: f32) -> Raster {
    Raster::new(grid, vec![vec![value; grid.len()]; months]).expect("series lengths match the grid")
}

/// Land-cover raster with every pixel set to `class`, except the listed
/// flat indices which get `other`.
pub fn land_cover_raster(grid: GridSpec, class: f32, other: f32, at: &[usize]) -> Raster {
    let mut data = vec![class; grid.len()];
    for &idx in at {
        if let Some(slot) = data.get_mut(idx) {
            *slot = other;
        }
    }
    Raster::single(grid, data).expect("land cover length matches the grid")
}

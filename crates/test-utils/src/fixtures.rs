//! Common test fixtures for climate viewer tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios: viewport regions, small grids and dataset catalog files.

use std::io::Write;

use tempfile::NamedTempFile;

/// Common viewport regions for testing.
pub mod regions {
    use climate_common::BoundingBox;

    /// Whole globe.
    pub fn global() -> BoundingBox {
        BoundingBox::global()
    }

    /// Northern hemisphere.
    pub fn northern() -> BoundingBox {
        BoundingBox::new(-180.0, 0.0, 180.0, 90.0)
    }

    /// A window over the open ocean with no pixels of a small grid inside.
    pub fn empty_sliver() -> BoundingBox {
        BoundingBox::new(-179.9, -0.01, -179.8, 0.01)
    }
}

/// Common grid specifications for testing.
pub mod grids {
    use climate_common::GridSpec;

    /// Simple 10x10 global grid.
    pub fn simple_10x10() -> GridSpec {
        GridSpec::global(10, 10)
    }

    /// One row along the equator, 4 columns.
    pub fn equator_strip() -> GridSpec {
        GridSpec::new(4, 1, -180.0, 0.5, 90.0, 1.0)
    }

    /// One column at 0°E spanning the poles in 10° rows.
    pub fn meridian_column() -> GridSpec {
        GridSpec::new(1, 18, -0.5, 90.0, 1.0, 10.0)
    }
}

/// A dataset catalog in YAML form.
pub const SAMPLE_CATALOG_YAML: &str = r#"
datasets:
  "(*clear*)": ""
  uniform: "mem://uniform"
  three_band: "mem://three_band"
"#;

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn write_temp_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_file_contents() {
        let file = write_temp_file(SAMPLE_CATALOG_YAML, ".yaml");
        let read = std::fs::read_to_string(file.path()).unwrap();
        assert!(read.contains("three_band"));
    }

    #[test]
    fn test_grid_fixtures_valid() {
        assert!(grids::simple_10x10().validate().is_ok());
        assert!(grids::equator_strip().validate().is_ok());
        assert_eq!(grids::meridian_column().latitude_grid()[0], 85.0);
    }
}

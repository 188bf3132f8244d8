//! Error types for climate viewer operations.

use thiserror::Error;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Primary error type for raster derivation and viewer operations.
#[derive(Debug, Error)]
pub enum ClimateError {
    // === Data Errors ===
    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Malformed raster: {0}")]
    FormatError(String),

    #[error("Band index {index} out of range (raster has {band_count} bands)")]
    InvalidBandIndex { index: usize, band_count: usize },

    #[error("Invalid band name: {0}")]
    InvalidBandName(String),

    #[error("Grid mismatch: {0}")]
    GridMismatch(String),

    #[error("No valid pixels in region: {0}")]
    EmptyRegion(String),

    #[error("Region holds {count} pixels, more than the limit of {max}")]
    TooManyPixels { count: usize, max: usize },

    // === Numeric Errors ===
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),

    // === Viewer Errors ===
    #[error("No raster is active in this view")]
    NoActiveRaster,

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClimateError {
    /// Create a NotFound error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a FormatError.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::FormatError(msg.into())
    }

    /// Create a GridMismatch error.
    pub fn grid_mismatch(msg: impl Into<String>) -> Self {
        Self::GridMismatch(msg.into())
    }

    /// Create a NumericDomain error.
    pub fn numeric_domain(msg: impl Into<String>) -> Self {
        Self::NumericDomain(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the
    /// data source. Input errors are rejected before any request is sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClimateError::InvalidBandIndex { .. }
                | ClimateError::InvalidBandName(_)
                | ClimateError::NumericDomain(_)
                | ClimateError::Config(_)
        )
    }
}

impl From<std::io::Error> for ClimateError {
    fn from(err: std::io::Error) -> Self {
        ClimateError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ClimateError {
    fn from(err: serde_json::Error) -> Self {
        ClimateError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ClimateError {
    fn from(err: serde_yaml::Error) -> Self {
        ClimateError::Config(format!("YAML error: {}", err))
    }
}

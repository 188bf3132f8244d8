//! Named dataset catalog.
//!
//! Maps the keys shown in a dataset selector to raster URIs. The special
//! [`CLEAR_KEY`] entry maps to an empty URI and means "no raster".

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use climate_common::{ClimateError, ClimateResult};

/// Catalog key that clears the active raster.
pub const CLEAR_KEY: &str = "(*clear*)";

const BUILTIN_ROOT: &str = "gs://ecoshard-root/wwf_meeting_viewer";

const BUILTIN_DATASETS: &[(&str, &str)] = &[
    (
        "global_n_export_esamod2",
        "cog_global_n_export_esamod2_compressed_md5_96c12f4f833498771d18b131b8cbb49b.tif",
    ),
    (
        "global_sed_deposition_esamod2",
        "cog_global_sed_deposition_esamod2_compressed_md5_ff134776cd7d9d69dc5e2fe14b53474c.tif",
    ),
    (
        "global_sed_export_esamod2",
        "cog_global_sed_export_esamod2_compressed_md5_fa10fd3d1942d0c3ce78b5aa544b150f.tif",
    ),
    (
        "global_usle_marine_mod_ESA_2020",
        "cog_global_usle_marine_mod_ESA_2020_compressed_md5_99e715.tif",
    ),
    (
        "n_retention_potential_change_to_PNV",
        "cog_n_retention_potential_change_to_PNV_md5_7d7b9e.tif",
    ),
    (
        "sed_deposition_potential_change_to_PNV",
        "cog_sed_deposition_potential_change_to_PNV_md5_a87b02.tif",
    ),
    (
        "sed_retention_potential_change_to_PNV",
        "cog_sed_retention_potential_change_to_PNV_md5_6a550e.tif",
    ),
    (
        "usle_potential_change_to_PNV",
        "cog_usle_potential_change_to_PNV_md5_0c4e97.tif",
    ),
];

/// What a catalog key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Drop the active raster.
    Clear,
    /// Load the raster at this URI.
    Uri(String),
}

/// Key to URI mapping for the dataset selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCatalog {
    pub datasets: BTreeMap<String, String>,
}

impl DatasetCatalog {
    /// The stock catalog of cloud-optimized GeoTIFFs plus the clear entry.
    pub fn builtin() -> Self {
        let mut datasets: BTreeMap<String, String> = BUILTIN_DATASETS
            .iter()
            .map(|(key, file)| (key.to_string(), format!("{}/{}", BUILTIN_ROOT, file)))
            .collect();
        datasets.insert(CLEAR_KEY.to_string(), String::new());
        Self { datasets }
    }

    pub fn from_yaml(s: &str) -> ClimateResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json(s: &str) -> ClimateResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a catalog file, JSON for `.json` and YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> ClimateResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_yaml(&contents)?,
        };
        debug!(path = %path.display(), datasets = catalog.len(), "Loaded dataset catalog");
        Ok(catalog)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, uri: impl Into<String>) {
        self.datasets.insert(key.into(), uri.into());
    }

    /// Selector keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Resolve a selector key. An empty URI clears the view.
    pub fn resolve(&self, key: &str) -> ClimateResult<DatasetSource> {
        match self.datasets.get(key) {
            Some(uri) if uri.is_empty() => Ok(DatasetSource::Clear),
            Some(uri) => Ok(DatasetSource::Uri(uri.clone())),
            None => Err(ClimateError::not_found(format!("catalog key '{}'", key))),
        }
    }
}

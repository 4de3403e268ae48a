// crates/langmap-core/src/config.rs

//! Runtime configuration.
//!
//! Everything has a default, so an empty TOML file (or no file at all) gives
//! the same behaviour as the public datasets out of the box:
//!
//! ```toml
//! [sources]
//! boundaries = "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson"
//! timeout_secs = 30
//! cache_ttl_secs = 3600
//!
//! [resolver]
//! code_keys = ["ISO_A3", "ADM0_A3"]
//! name_keys = ["ADMIN", "NAME"]
//! no_data = "-99"
//!
//! [projection]
//! preference = ["EPSG:6933", "ESRI:54009", "EPSG:3857"]
//! ```

use crate::error::{LangmapError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

pub const METADATA_URL: &str = "https://restcountries.com/v3.1/all?fields=name,cca3,languages,latlng,flags,capital,region,subregion,population,currencies,timezones";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    pub sources: SourceConfig,
    pub resolver: KeyAliases,
    pub projection: ProjectionConfig,
}

impl AtlasConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LangmapError::Config(format!("Parse TOML failed: {e}")))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LangmapError::Config(format!("Read {} failed: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Where the two datasets come from. Values starting with `http://` or
/// `https://` are fetched; anything else is read as a local path.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub boundaries: String,
    pub metadata: String,
    pub timeout_secs: u64,
    /// How long fetched datasets are reused before the next fetch.
    pub cache_ttl_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            boundaries: BOUNDARIES_URL.to_string(),
            metadata: METADATA_URL.to_string(),
            timeout_secs: 30,
            cache_ttl_secs: 3600,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Property-key spellings the boundary datasets use across vintages.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyAliases {
    pub code_keys: Vec<String>,
    pub name_keys: Vec<String>,
    /// Value the datasets use for "no code assigned".
    pub no_data: String,
}

impl Default for KeyAliases {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            code_keys: owned(&[
                "ISO_A3", "ISO3", "iso_a3", "ADM0_A3", "adm0_a3", "CCA3", "cca3", "ISO_A3_EH",
            ]),
            name_keys: owned(&["ADMIN", "NAME", "name"]),
            no_data: "-99".to_string(),
        }
    }
}

/// Ordered CRS preference for area computation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    pub preference: Vec<String>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            preference: crate::projection::DEFAULT_PREFERENCE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

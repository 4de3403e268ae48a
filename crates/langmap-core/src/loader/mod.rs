// crates/langmap-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (HTTP, files, decompression) and delegates to
//! the two payload parsers:
//!
//! - [`parse_boundaries`]: GeoJSON `FeatureCollection` -> [`GeoFeature`]s
//! - [`parse_metadata`]: REST Countries JSON array -> [`MetadataRecord`]s
//!
//! Neither parser retries anything; callers that want retry or timeouts
//! around a fetch wrap the [`DataSource`] themselves.

use crate::config::SourceConfig;
use crate::error::{LangmapError, Result};
use crate::model::{GeoFeature, MetadataRecord};
use crate::raw::CountryRaw;
use log::{info, warn};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

mod cache;
pub mod common_io;

pub use cache::SourceCache;

/// Where the boundary features and metadata records come from.
pub trait DataSource {
    fn fetch_boundaries(&self) -> Result<Vec<GeoFeature>>;
    fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>>;
}

// -----------------------------------------------------------------------
// PAYLOAD PARSERS
// -----------------------------------------------------------------------

/// Parses a GeoJSON document into features.
///
/// A feature whose `geometry` member is not valid GeoJSON is kept, with the
/// parse error recorded on it, so one broken polygon does not discard the
/// whole dataset.
pub fn parse_boundaries<R: Read>(reader: R) -> Result<Vec<GeoFeature>> {
    let doc: Value = serde_json::from_reader(reader)?;
    let features = match doc {
        Value::Object(mut obj) => {
            let kind = obj.get("type").and_then(Value::as_str).map(str::to_owned);
            match kind.as_deref() {
                Some("FeatureCollection") => match obj.remove("features") {
                    Some(Value::Array(items)) => items,
                    _ => {
                        return Err(LangmapError::InvalidData(
                            "FeatureCollection without a features array".into(),
                        ))
                    }
                },
                Some("Feature") => vec![Value::Object(obj)],
                other => {
                    return Err(LangmapError::InvalidData(format!(
                        "expected a GeoJSON FeatureCollection, got type {other:?}"
                    )))
                }
            }
        }
        _ => {
            return Err(LangmapError::InvalidData(
                "GeoJSON document is not an object".into(),
            ))
        }
    };

    Ok(features.into_iter().map(feature_from_value).collect())
}

fn feature_from_value(value: Value) -> GeoFeature {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return GeoFeature::with_invalid_geometry(
                Default::default(),
                format!("feature is not an object: {other}"),
            )
        }
    };

    let properties = match obj.remove("properties") {
        Some(Value::Object(props)) => props,
        _ => Default::default(),
    };

    match obj.remove("geometry") {
        None | Some(Value::Null) => GeoFeature::new(properties, None),
        Some(geometry) => match geojson::Geometry::from_json_value(geometry) {
            Ok(g) => GeoFeature::new(properties, Some(g)),
            Err(e) => GeoFeature::with_invalid_geometry(properties, e),
        },
    }
}

/// Parses the metadata API response.
///
/// The response must be a JSON array; anything else (the API answers errors
/// with an object) is [`LangmapError::PartialMetadata`]. Individual entries
/// that do not deserialize are skipped with a warning.
pub fn parse_metadata<R: Read>(reader: R) -> Result<Vec<MetadataRecord>> {
    let doc: Value = serde_json::from_reader(reader)?;
    let items = match doc {
        Value::Array(items) => items,
        other => {
            let kind = match other {
                Value::Object(_) => "object",
                Value::String(_) => "string",
                Value::Number(_) => "number",
                Value::Bool(_) => "bool",
                _ => "null",
            };
            return Err(LangmapError::PartialMetadata(format!(
                "expected an array of countries, got {kind}"
            )));
        }
    };

    let total = items.len();
    let records: Vec<MetadataRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<CountryRaw>(item) {
            Ok(raw) => Some(MetadataRecord::from(raw)),
            Err(e) => {
                warn!("skipping metadata entry #{i}: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("kept {} of {} metadata entries", records.len(), total);
    }
    Ok(records)
}

// -----------------------------------------------------------------------
// CONFIGURED SOURCE (URL or path per dataset)
// -----------------------------------------------------------------------

/// Reads each dataset from a URL or a local path, as configured.
#[derive(Debug, Clone)]
pub struct ConfiguredSource {
    boundaries: String,
    metadata: String,
    timeout: Duration,
}

impl ConfiguredSource {
    pub fn new(
        boundaries: impl Into<String>,
        metadata: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            boundaries: boundaries.into(),
            metadata: metadata.into(),
            timeout,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.boundaries, &config.metadata, config.timeout())
    }

    fn open(&self, source_name: &str, location: &str) -> Result<Box<dyn Read>> {
        if common_io::is_remote(location) {
            info!("fetching {source_name} from {location}");
            fetch_remote(source_name, location, self.timeout)
        } else {
            info!("reading {source_name} from {location}");
            common_io::open_stream(Path::new(location))
        }
    }
}

impl DataSource for ConfiguredSource {
    fn fetch_boundaries(&self) -> Result<Vec<GeoFeature>> {
        let reader = self.open("boundaries", &self.boundaries)?;
        let features = parse_boundaries(reader)?;
        info!("loaded {} boundary features", features.len());
        Ok(features)
    }

    fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>> {
        let reader = self.open("metadata", &self.metadata)?;
        let records = parse_metadata(reader)?;
        info!("loaded {} metadata records", records.len());
        Ok(records)
    }
}

#[cfg(feature = "fetch")]
fn fetch_remote(source_name: &str, url: &str, timeout: Duration) -> Result<Box<dyn Read>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("langmap/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LangmapError::unavailable(source_name, e))?;

    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| LangmapError::unavailable(source_name, e))?;

    Ok(Box::new(response))
}

#[cfg(not(feature = "fetch"))]
fn fetch_remote(source_name: &str, url: &str, _timeout: Duration) -> Result<Box<dyn Read>> {
    Err(LangmapError::unavailable(
        source_name,
        format!("{url}: built without the 'fetch' feature"),
    ))
}

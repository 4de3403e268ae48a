// crates/langmap-core/src/error.rs

//! Error types.
//!
//! [`LangmapError`] covers everything that can surface to a caller: source
//! fetches, parsing, configuration. Per-feature failures never use it; they
//! are recorded as [`GeometryError`] / [`ProjectionError`] values inside the
//! display record so one odd country cannot block the others.

use thiserror::Error;

/// Errors surfaced by loaders, sources and configuration.
#[derive(Debug, Error)]
pub enum LangmapError {
    /// A data source could not be reached or answered with a failure status.
    #[error("source unavailable ({source_name}): {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// The metadata source answered with something other than a record list.
    #[error("metadata degraded: {0}")]
    PartialMetadata(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geojson error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LangmapError {
    pub(crate) fn unavailable(source_name: &str, message: impl ToString) -> Self {
        LangmapError::SourceUnavailable {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LangmapError>;

/// Failure to construct a transform or to project one coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("unknown coordinate reference system: {0}")]
    UnknownCrs(String),

    #[error("{crs}: coordinate ({lon}, {lat}) outside projection domain")]
    OutOfDomain { crs: String, lon: f64, lat: f64 },

    #[error("{crs}: transform produced a non-finite value")]
    NonFinite { crs: String },
}

/// Why geometry enrichment produced no value for a feature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    Missing,

    #[error("malformed geometry: {0}")]
    Malformed(String),

    #[error("unsupported geometry type: {0}")]
    Unsupported(&'static str),

    #[error("geometry is empty")]
    Empty,

    #[error("geometry contains non-finite coordinates")]
    NonFinite,

    /// Both the selected transform and the Web Mercator fallback failed.
    #[error("area projection failed: {0}")]
    Projection(#[from] ProjectionError),
}

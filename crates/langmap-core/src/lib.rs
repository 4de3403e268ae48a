// crates/langmap-core/src/lib.rs

//! # langmap-core
//!
//! Joins a world-boundaries GeoJSON dataset to per-country metadata and
//! derives geometry facts (centroid, bounding box, projected area) for every
//! feature.
//!
//! The pieces, bottom up:
//!
//! - [`projection`]: ordered CRS preference with a smoke-tested fallback
//! - [`geometry`]: centroid, envelope and planar area per feature
//! - [`resolve`]: code, exact name, then substring lookup into the metadata
//! - [`enrich`]: runs both per feature and merges the result
//! - [`loader`]: file/HTTP sources and a TTL cache in front of them
//! - [`Atlas`]: one complete, enriched run
//!
//! Nothing in here renders HTML or maps; [`api`] produces flat string views
//! and a GeoJSON export for whatever front end sits on top.

pub mod api;
pub mod atlas;
pub mod common;
pub mod config;
pub mod enrich;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod projection;
#[doc(hidden)]
pub mod raw;
pub mod resolve;
pub mod text;

pub use crate::api::{DisplayView, UNKNOWN};
pub use crate::atlas::Atlas;
pub use crate::common::AtlasStats;
pub use crate::config::{AtlasConfig, KeyAliases, ProjectionConfig, SourceConfig};
pub use crate::enrich::Pipeline;
pub use crate::error::{GeometryError, LangmapError, ProjectionError, Result};
pub use crate::loader::{ConfiguredSource, DataSource, SourceCache};
pub use crate::model::{
    BoundingBox, Centroid, Currency, DisplayRecord, GeoFeature, GeometrySummary, Language,
    MatchKind, MetadataRecord,
};
pub use crate::projection::{CrsTransform, ProjectionSelection};
pub use crate::resolve::ResolutionIndex;
pub use crate::text::fold_key;

/// Everything needed to load, enrich and inspect a dataset.
pub mod prelude {
    pub use crate::{
        Atlas, AtlasConfig, AtlasStats, ConfiguredSource, DataSource, DisplayRecord, DisplayView,
        GeoFeature, LangmapError, MatchKind, MetadataRecord, ProjectionSelection, SourceCache,
    };
}

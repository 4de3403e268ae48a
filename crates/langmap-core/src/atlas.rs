// crates/langmap-core/src/atlas.rs

//! # Atlas
//!
//! One complete enrichment run: both datasets loaded (through a
//! [`SourceCache`]), the resolution index built, the projection selected and
//! every feature turned into a [`DisplayRecord`].
//!
//! ```no_run
//! use langmap_core::prelude::*;
//!
//! let config = AtlasConfig::default();
//! let mut cache = SourceCache::new(
//!     ConfiguredSource::from_config(&config.sources),
//!     config.sources.cache_ttl(),
//! );
//! let atlas = Atlas::build(&mut cache, &config)?;
//! println!("{} countries, area via {}", atlas.records().len(), atlas.used_crs());
//! # Ok::<(), langmap_core::LangmapError>(())
//! ```

use crate::api::{feature_collection, DisplayView};
use crate::common::AtlasStats;
use crate::config::{AtlasConfig, KeyAliases};
use crate::enrich::{summarize, Pipeline};
use crate::error::Result;
use crate::loader::{DataSource, SourceCache};
use crate::model::{DisplayRecord, GeoFeature, MetadataRecord};
use crate::projection::{
    build_transform, select_projection, ProjectionSelection, DEFAULT_PREFERENCE,
};
use crate::resolve::ResolutionIndex;
use crate::text::fold_key;
use log::{info, warn};
use std::sync::Arc;

/// Enriched view over the boundary dataset.
#[derive(Debug, Clone)]
pub struct Atlas {
    features: Arc<Vec<GeoFeature>>,
    index: ResolutionIndex,
    projection: ProjectionSelection,
    aliases: KeyAliases,
    records: Vec<DisplayRecord>,
    stats: AtlasStats,
}

impl Atlas {
    /// Loads both datasets and enriches every feature.
    ///
    /// A boundary failure is fatal. A metadata failure is not: the run
    /// continues with no metadata and every record falls back to feature
    /// properties.
    pub fn build<S: DataSource>(cache: &mut SourceCache<S>, config: &AtlasConfig) -> Result<Self> {
        let features = cache.boundaries()?;
        let metadata = match cache.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("continuing without metadata: {e}");
                Arc::new(Vec::new())
            }
        };
        if metadata.is_empty() {
            warn!("metadata is empty; records carry boundary properties only");
        }

        let projection = if config.projection.preference == DEFAULT_PREFERENCE {
            ProjectionSelection::shared().clone()
        } else {
            select_projection(&config.projection.preference, build_transform)
        };

        Ok(Self::from_parts(
            features,
            metadata.as_ref().clone(),
            projection,
            config.resolver.clone(),
        ))
    }

    /// Enriches already-loaded data.
    pub fn from_parts(
        features: Arc<Vec<GeoFeature>>,
        metadata: Vec<MetadataRecord>,
        projection: ProjectionSelection,
        aliases: KeyAliases,
    ) -> Self {
        let index = ResolutionIndex::build(metadata);
        let records = Pipeline::new(&index, projection.transform(), &aliases).enrich_all(&features);
        let stats = summarize(&records, index.len(), projection.used_crs());
        info!(
            "enriched {} features: {} resolved, {} unresolved, area via {}",
            stats.features,
            stats.resolved(),
            stats.unresolved,
            stats.used_crs
        );

        Self {
            features,
            index,
            projection,
            aliases,
            records,
            stats,
        }
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn stats(&self) -> &AtlasStats {
        &self.stats
    }

    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    pub fn index(&self) -> &ResolutionIndex {
        &self.index
    }

    pub fn aliases(&self) -> &KeyAliases {
        &self.aliases
    }

    pub fn projection(&self) -> &ProjectionSelection {
        &self.projection
    }

    pub fn used_crs(&self) -> &str {
        self.projection.used_crs()
    }

    pub fn disclosure(&self) -> String {
        self.projection.disclosure()
    }

    /// Finds a record by ISO3 code (case-insensitive), then by folded
    /// display name.
    pub fn find(&self, code_or_name: &str) -> Option<&DisplayRecord> {
        let query = code_or_name.trim();
        if query.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.iso3.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(query)))
            .or_else(|| {
                let key = fold_key(query);
                self.records.iter().find(|r| fold_key(&r.name) == key)
            })
    }

    /// Flat string views, one per record.
    pub fn views(&self) -> Vec<DisplayView> {
        self.records.iter().map(DisplayView::from).collect()
    }

    /// The boundary features with their display views as properties.
    pub fn feature_collection(&self) -> geojson::FeatureCollection {
        feature_collection(&self.features, &self.records)
    }
}

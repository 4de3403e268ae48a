// crates/langmap-core/src/enrich.rs

//! # Enrichment Pipeline
//!
//! Resolver + Geometry Engine per feature, merged into a [`DisplayRecord`].
//! The pipeline only borrows its inputs, so running it twice over the same
//! features yields identical output.

use crate::common::AtlasStats;
use crate::config::KeyAliases;
use crate::error::GeometryError;
use crate::geometry::enrich_geometry;
use crate::model::{DisplayRecord, GeoFeature, MatchKind};
use crate::projection::CrsTransform;
use crate::resolve::{feature_code, feature_name, ResolutionIndex};
use log::debug;

/// Display name used when neither metadata nor the feature has one.
pub const FALLBACK_NAME: &str = "Country";

/// Read-only view over everything one enrichment run needs.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    index: &'a ResolutionIndex,
    transform: &'a dyn CrsTransform,
    aliases: &'a KeyAliases,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        index: &'a ResolutionIndex,
        transform: &'a dyn CrsTransform,
        aliases: &'a KeyAliases,
    ) -> Self {
        Self {
            index,
            transform,
            aliases,
        }
    }

    /// Enriches a single feature.
    pub fn enrich(&self, feature: &GeoFeature) -> DisplayRecord {
        let resolution = self.index.resolve(feature, self.aliases);
        if resolution.is_none() {
            debug!(
                "no metadata match for feature {:?}",
                feature_name(feature, self.aliases)
                    .or_else(|| feature_code(feature, self.aliases))
            );
        }

        let geometry = match &feature.geometry_error {
            Some(e) => Err(GeometryError::Malformed(e.clone())),
            None => enrich_geometry(feature.geometry.as_ref(), self.transform),
        };
        if let Err(e) = &geometry {
            debug!("geometry skipped for {:?}: {e}", feature_name(feature, self.aliases));
        }

        match resolution {
            Some(res) => {
                let rec = res.record;
                DisplayRecord {
                    name: rec
                        .common_name
                        .clone()
                        .or_else(|| feature_name(feature, self.aliases))
                        .unwrap_or_else(|| FALLBACK_NAME.to_string()),
                    iso3: rec
                        .iso3
                        .clone()
                        .or_else(|| feature_code(feature, self.aliases)),
                    matched_by: Some(res.matched_by),
                    capital: (!rec.capitals.is_empty()).then(|| rec.capitals.join(", ")),
                    region: rec.region.clone(),
                    subregion: rec.subregion.clone(),
                    population: rec.population,
                    currencies: rec.currencies.iter().map(|c| c.label()).collect(),
                    timezones: rec.timezones.clone(),
                    languages: rec.languages.iter().map(|l| l.name.clone()).collect(),
                    flag_url: rec.flag_url.clone(),
                    latlng: rec.latlng,
                    geometry,
                }
            }
            None => DisplayRecord {
                name: feature_name(feature, self.aliases)
                    .unwrap_or_else(|| FALLBACK_NAME.to_string()),
                iso3: feature_code(feature, self.aliases),
                matched_by: None,
                capital: None,
                region: None,
                subregion: None,
                population: None,
                currencies: Vec::new(),
                timezones: Vec::new(),
                languages: Vec::new(),
                flag_url: None,
                latlng: None,
                geometry,
            },
        }
    }

    /// Lazy, order-preserving enrichment; one record per feature.
    pub fn iter(self, features: &'a [GeoFeature]) -> impl Iterator<Item = DisplayRecord> + 'a {
        features.iter().map(move |f| self.enrich(f))
    }

    /// Eager form of [`Pipeline::iter`].
    pub fn enrich_all(&self, features: &[GeoFeature]) -> Vec<DisplayRecord> {
        features.iter().map(|f| self.enrich(f)).collect()
    }
}

/// Tallies match kinds and geometry outcomes over a finished run.
pub fn summarize(records: &[DisplayRecord], metadata_records: usize, used_crs: &str) -> AtlasStats {
    let mut stats = AtlasStats {
        features: records.len(),
        metadata_records,
        used_crs: used_crs.to_string(),
        ..Default::default()
    };
    for r in records {
        match r.matched_by {
            Some(MatchKind::Code) => stats.matched_by_code += 1,
            Some(MatchKind::ExactName) => stats.matched_by_name += 1,
            Some(MatchKind::NameSubstring) => stats.matched_by_substring += 1,
            None => stats.unresolved += 1,
        }
        match &r.geometry {
            Err(_) => stats.geometry_failures += 1,
            Ok(g) if g.area_sqkm.is_err() => stats.area_failures += 1,
            Ok(_) => {}
        }
    }
    stats
}

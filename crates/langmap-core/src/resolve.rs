// crates/langmap-core/src/resolve.rs

//! # Record Resolver
//!
//! Joins a boundary feature to a metadata record. Lookup order, first hit
//! wins:
//!
//! 1. ISO3 code from the first configured code key holding a real value
//!    (the no-data marker `-99` is skipped), looked up upper-cased.
//! 2. Display name from the first configured name key, exact match on the
//!    folded name.
//! 3. First folded metadata name containing the folded display name. Names
//!    are scanned in the order the metadata source returned them.

use crate::config::KeyAliases;
use crate::model::{GeoFeature, MatchKind, MetadataRecord};
use crate::text::fold_key;
use std::collections::HashMap;

/// A successful join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub record: &'a MetadataRecord,
    pub matched_by: MatchKind,
}

/// Lookup tables built once from the full metadata list.
///
/// Duplicate codes or names: the last record wins, but a name keeps the scan
/// position of its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ResolutionIndex {
    records: Vec<MetadataRecord>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    /// Folded names in first-insertion order, for the substring scan.
    name_order: Vec<String>,
}

impl ResolutionIndex {
    pub fn build(records: Vec<MetadataRecord>) -> Self {
        let mut by_code = HashMap::with_capacity(records.len());
        let mut by_name = HashMap::with_capacity(records.len());
        let mut name_order = Vec::with_capacity(records.len());

        for (i, rec) in records.iter().enumerate() {
            if let Some(code) = rec.iso3.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                by_code.insert(code.to_uppercase(), i);
            }
            if let Some(name) = rec.common_name.as_deref() {
                let key = fold_key(name);
                if key.is_empty() {
                    continue;
                }
                if by_name.insert(key.clone(), i).is_none() {
                    name_order.push(key);
                }
            }
        }

        Self {
            records,
            by_code,
            by_name,
            name_order,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn code_count(&self) -> usize {
        self.by_code.len()
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Case-insensitive ISO3 lookup.
    pub fn find_by_code(&self, code: &str) -> Option<&MetadataRecord> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&i| &self.records[i])
    }

    /// Exact lookup on the folded common name.
    pub fn find_by_name(&self, name: &str) -> Option<&MetadataRecord> {
        self.by_name.get(&fold_key(name)).map(|&i| &self.records[i])
    }

    /// First name (in source order) containing `fragment`, folded.
    pub fn find_by_name_fragment(&self, fragment: &str) -> Option<&MetadataRecord> {
        let q = fold_key(fragment);
        if q.is_empty() {
            return None;
        }
        self.name_order
            .iter()
            .find(|name| name.contains(&q))
            .and_then(|name| self.by_name.get(name))
            .map(|&i| &self.records[i])
    }

    /// Runs the full lookup order for one feature.
    pub fn resolve(&self, feature: &GeoFeature, aliases: &KeyAliases) -> Option<Resolution<'_>> {
        if let Some(code) = feature_code(feature, aliases) {
            if let Some(record) = self.find_by_code(&code) {
                return Some(Resolution {
                    record,
                    matched_by: MatchKind::Code,
                });
            }
        }

        let name = feature_name(feature, aliases)?;
        if let Some(record) = self.find_by_name(&name) {
            return Some(Resolution {
                record,
                matched_by: MatchKind::ExactName,
            });
        }
        self.find_by_name_fragment(&name).map(|record| Resolution {
            record,
            matched_by: MatchKind::NameSubstring,
        })
    }
}

/// Candidate ISO3 code: first non-empty value under the code keys that is
/// not the no-data marker.
pub fn feature_code(feature: &GeoFeature, aliases: &KeyAliases) -> Option<String> {
    aliases
        .code_keys
        .iter()
        .filter_map(|k| feature.property_text(k))
        .find(|v| *v != aliases.no_data)
}

/// Candidate display name: first non-empty value under the name keys.
pub fn feature_name(feature: &GeoFeature, aliases: &KeyAliases) -> Option<String> {
    feature.first_property(&aliases.name_keys)
}

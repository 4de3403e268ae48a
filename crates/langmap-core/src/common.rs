// crates/langmap-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for one enrichment run.
///
/// Returned by [`Atlas::stats`](crate::Atlas::stats); the counts describe the
/// display records after every feature has been processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasStats {
    pub features: usize,
    pub metadata_records: usize,
    pub matched_by_code: usize,
    pub matched_by_name: usize,
    pub matched_by_substring: usize,
    pub unresolved: usize,
    /// Features whose geometry could not be read at all.
    pub geometry_failures: usize,
    /// Features with centroid/bbox but no area.
    pub area_failures: usize,
    pub used_crs: String,
}

impl AtlasStats {
    pub fn resolved(&self) -> usize {
        self.matched_by_code + self.matched_by_name + self.matched_by_substring
    }
}

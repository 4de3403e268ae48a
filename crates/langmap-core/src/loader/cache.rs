// crates/langmap-core/src/loader/cache.rs

use super::DataSource;
use crate::error::Result;
use crate::model::{GeoFeature, MetadataRecord};
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<T> {
    fetched_at: Instant,
    value: Arc<T>,
}

impl<T> Entry<T> {
    fn fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Holds the fetched datasets for `ttl`, then fetches again on next access.
///
/// Failed fetches are not cached. A zero `ttl` disables caching.
#[derive(Debug)]
pub struct SourceCache<S> {
    source: S,
    ttl: Duration,
    boundaries: Option<Entry<Vec<GeoFeature>>>,
    metadata: Option<Entry<Vec<MetadataRecord>>>,
}

impl<S: DataSource> SourceCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            boundaries: None,
            metadata: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn boundaries(&mut self) -> Result<Arc<Vec<GeoFeature>>> {
        if let Some(entry) = self.boundaries.as_ref().filter(|e| e.fresh(self.ttl)) {
            return Ok(entry.value.clone());
        }
        debug!("boundary cache miss");
        let value = Arc::new(self.source.fetch_boundaries()?);
        self.boundaries = Some(Entry {
            fetched_at: Instant::now(),
            value: value.clone(),
        });
        Ok(value)
    }

    pub fn metadata(&mut self) -> Result<Arc<Vec<MetadataRecord>>> {
        if let Some(entry) = self.metadata.as_ref().filter(|e| e.fresh(self.ttl)) {
            return Ok(entry.value.clone());
        }
        debug!("metadata cache miss");
        let value = Arc::new(self.source.fetch_metadata()?);
        self.metadata = Some(Entry {
            fetched_at: Instant::now(),
            value: value.clone(),
        });
        Ok(value)
    }

    /// Drops both datasets; the next access fetches again.
    pub fn invalidate(&mut self) {
        self.boundaries = None;
        self.metadata = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LangmapError;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counting {
        boundary_calls: Cell<usize>,
        metadata_calls: Cell<usize>,
        fail_metadata: bool,
    }

    impl DataSource for Counting {
        fn fetch_boundaries(&self) -> Result<Vec<GeoFeature>> {
            self.boundary_calls.set(self.boundary_calls.get() + 1);
            Ok(vec![GeoFeature::default()])
        }

        fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>> {
            self.metadata_calls.set(self.metadata_calls.get() + 1);
            if self.fail_metadata {
                return Err(LangmapError::unavailable("metadata", "connection refused"));
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn fetches_once_within_ttl() {
        let mut cache = SourceCache::new(Counting::default(), Duration::from_secs(3600));
        let a = cache.boundaries().unwrap();
        let b = cache.boundaries().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        cache.metadata().unwrap();
        cache.metadata().unwrap();
        assert_eq!(cache.source().boundary_calls.get(), 1);
        assert_eq!(cache.source().metadata_calls.get(), 1);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let mut cache = SourceCache::new(Counting::default(), Duration::from_secs(3600));
        cache.boundaries().unwrap();
        cache.invalidate();
        cache.boundaries().unwrap();
        assert_eq!(cache.source().boundary_calls.get(), 2);
    }

    #[test]
    fn zero_ttl_never_caches() {
        let mut cache = SourceCache::new(Counting::default(), Duration::ZERO);
        cache.boundaries().unwrap();
        cache.boundaries().unwrap();
        assert_eq!(cache.source().boundary_calls.get(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let src = Counting {
            fail_metadata: true,
            ..Default::default()
        };
        let mut cache = SourceCache::new(src, Duration::from_secs(3600));
        assert!(cache.metadata().is_err());
        assert!(cache.metadata().is_err());
        assert_eq!(cache.source().metadata_calls.get(), 2);
    }
}

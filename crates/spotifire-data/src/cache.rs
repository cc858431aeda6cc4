//! Async dataset cache keyed by file fingerprint.

use crate::fingerprint::DatasetFingerprint;
use moka::future::Cache;
use spotifire_common::{Result, SpotifireError};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default number of datasets kept in memory.
pub const DEFAULT_MAX_CAPACITY: u64 = 32;

/// Default time-to-live of a cached dataset.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Request and load counters of a [`DatasetCache`].
#[derive(Debug, Default)]
pub struct CacheStats {
    requests: AtomicU64,
    loads: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheStats {
    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Calls to [`DatasetCache::get_or_load`] that reached the cache.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Loader invocations, i.e. misses that actually read the source.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Requests served without running the loader.
    pub fn hits(&self) -> u64 {
        self.requests().saturating_sub(self.loads())
    }

    /// Explicit invalidations.
    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Fraction of requests served from memory.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let requests = self.requests();
        if requests == 0 {
            0.0
        } else {
            self.hits() as f64 / requests as f64
        }
    }
}

/// Caller-owned memo of parsed datasets.
///
/// Entries are keyed by [`DatasetFingerprint`], so editing a file on disk
/// makes the next request reload it. Concurrent requests for the same
/// fingerprint share a single load.
pub struct DatasetCache<T> {
    cache: Cache<DatasetFingerprint, Arc<T>>,
    stats: Arc<CacheStats>,
}

impl<T> Clone for DatasetCache<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T> std::fmt::Debug for DatasetCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Default for DatasetCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY, DEFAULT_TTL)
    }
}

impl<T: Send + Sync + 'static> DatasetCache<T> {
    /// Creates a cache holding at most `max_capacity` datasets for `ttl`.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        info!(
            "Dataset cache initialized: capacity={}, ttl={}s",
            max_capacity,
            ttl.as_secs()
        );

        Self {
            cache,
            stats: Arc::new(CacheStats::default()),
        }
    }

    /// Returns the dataset at `path`, running `load` only on a miss.
    ///
    /// `load` receives the canonical path of the file.
    #[instrument(skip(self, load), fields(path = %path.display()))]
    pub async fn get_or_load<F, Fut>(&self, path: &Path, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let fingerprint = DatasetFingerprint::of(path).await?;
        self.stats.record_request();

        let stats = Arc::clone(&self.stats);
        let source = fingerprint.path.clone();
        let dataset = self
            .cache
            .try_get_with(fingerprint, async move {
                stats.record_load();
                debug!("Loading dataset {}", source.display());
                load(source).await.map(Arc::new)
            })
            .await
            .map_err(unshare)?;

        Ok(dataset)
    }

    /// Drops the entry for `fingerprint`, if any.
    pub async fn invalidate(&self, fingerprint: &DatasetFingerprint) {
        self.cache.invalidate(fingerprint).await;
        self.stats.record_invalidation();
        debug!("Invalidated dataset {}", fingerprint);
    }

    /// Drops every entry.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        self.stats.record_invalidation();
    }

    /// Number of cached datasets once pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Shared counters.
    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }
}

/// Recovers an owned error from a load failure shared between waiters.
fn unshare(error: Arc<SpotifireError>) -> SpotifireError {
    let shared = match Arc::try_unwrap(error) {
        Ok(owned) => return owned,
        Err(shared) => shared,
    };

    match &*shared {
        SpotifireError::InvalidRecord {
            message,
            row,
            field,
        } => SpotifireError::InvalidRecord {
            message: message.clone(),
            row: *row,
            field: field.clone(),
        },
        SpotifireError::EmptyResult { message } => SpotifireError::empty_result(message.clone()),
        SpotifireError::InvalidInterval { start, end } => {
            SpotifireError::invalid_interval(*start, *end)
        }
        SpotifireError::Ingest { message, path, .. } => {
            SpotifireError::ingest_with_source(message.clone(), path.clone(), Arc::clone(&shared))
        }
        _ => SpotifireError::with_source("dataset load failed", Arc::clone(&shared)),
    }
}

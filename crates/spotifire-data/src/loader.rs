//! Cached access to the playlists directory and the streaming history.

use crate::cache::{CacheStats, DatasetCache};
use crate::playlist::{discover_playlists, load_playlist, playlist_path, PlaylistOptions};
use crate::streaming::load_streaming_history;
use spotifire_common::{PlayEvent, Result, SpotifireError, TrackRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Loads datasets through per-kind [`DatasetCache`]s.
#[derive(Debug, Clone)]
pub struct DataLoader {
    playlists_dir: PathBuf,
    options: PlaylistOptions,
    playlists: DatasetCache<Vec<TrackRecord>>,
    history: DatasetCache<Vec<PlayEvent>>,
}

impl DataLoader {
    /// Creates a loader over `playlists_dir`.
    pub fn new(
        playlists_dir: impl Into<PathBuf>,
        options: PlaylistOptions,
        max_capacity: u64,
        ttl: Duration,
    ) -> Self {
        Self {
            playlists_dir: playlists_dir.into(),
            options,
            playlists: DatasetCache::new(max_capacity, ttl),
            history: DatasetCache::new(max_capacity, ttl),
        }
    }

    /// Directory the playlists are read from.
    pub fn playlists_dir(&self) -> &Path {
        &self.playlists_dir
    }

    /// Names of the available playlists.
    pub async fn playlist_names(&self) -> Result<Vec<String>> {
        discover_playlists(&self.playlists_dir).await
    }

    /// Tracks of the playlist called `name`.
    #[instrument(skip(self))]
    pub async fn playlist(&self, name: &str) -> Result<Arc<Vec<TrackRecord>>> {
        let path = playlist_path(&self.playlists_dir, name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(SpotifireError::ingest(
                format!("no playlist named '{name}'"),
                path,
            ));
        }

        let options = self.options.clone();
        self.playlists
            .get_or_load(&path, |source| async move {
                load_playlist(&source, &options).await
            })
            .await
    }

    /// Play events of the converted streaming history at `path`.
    pub async fn streaming_history(&self, path: &Path) -> Result<Arc<Vec<PlayEvent>>> {
        self.history
            .get_or_load(path, |source| async move {
                load_streaming_history(&source).await
            })
            .await
    }

    /// Counters of the playlist cache.
    pub fn playlist_stats(&self) -> Arc<CacheStats> {
        self.playlists.stats()
    }

    /// Counters of the streaming-history cache.
    pub fn history_stats(&self) -> Arc<CacheStats> {
        self.history.stats()
    }
}

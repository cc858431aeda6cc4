//! Configuration schema definitions using serde.

use crate::loader::ConfigError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use spotifire_common::{LoggingConfig, TopN};
use std::path::PathBuf;

/// Main configuration structure for Spotifire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset locations.
    pub data: DataConfig,
    /// Genre aggregation settings.
    pub genres: GenreConfig,
    /// Ranking cutoffs.
    pub ranking: RankingConfig,
    /// Calendar bucketing settings.
    pub calendar: CalendarConfig,
    /// Streaming-history filtering.
    pub streaming: StreamingConfig,
    /// Dataset cache sizing.
    pub cache: CacheConfig,
    /// Logging output.
    pub logging: LoggingConfig,
}

/// Dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding one CSV file per playlist.
    pub playlists_dir: PathBuf,
    /// Converted streaming-history CSV.
    pub streaming_history: PathBuf,
}

/// Genre aggregation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreConfig {
    /// Character joining genre tags inside a genre field.
    pub delimiter: char,
    /// Tag given to tracks without a known genre.
    pub unknown_tag: String,
    /// Artists listed in a genre tooltip.
    pub tooltip_artists: usize,
    /// Genres shown by `--largest` when no count is given.
    pub largest: usize,
    /// Genres shown by `--smallest` when no count is given.
    pub smallest: usize,
}

/// Ranking cutoffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Length of the ungrouped "top songs in range" list.
    pub top_songs: TopN,
    /// Entries kept per calendar bucket.
    pub bucket_top_n: TopN,
}

/// A named season and the months (1-12) it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonDefinition {
    /// Display name.
    pub name: String,
    /// Month numbers, January = 1.
    pub months: Vec<u32>,
}

impl SeasonDefinition {
    /// Creates a season definition.
    pub fn new(name: impl Into<String>, months: &[u32]) -> Self {
        Self {
            name: name.into(),
            months: months.to_vec(),
        }
    }
}

/// Calendar bucketing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA timezone in which weekdays, months and years are computed.
    pub timezone: String,
    /// Season table; every month must appear exactly once.
    pub seasons: Vec<SeasonDefinition>,
}

impl CalendarConfig {
    /// Parses the configured timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::validation("calendar.timezone", e.to_string()))
    }
}

/// Streaming-history filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Plays shorter than this are ignored by temporal rankings. Zero keeps skips.
    pub min_ms_played: u64,
}

/// Dataset cache sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached datasets.
    pub max_capacity: u64,
    /// Seconds a cached dataset stays valid.
    pub ttl_seconds: u64,
}

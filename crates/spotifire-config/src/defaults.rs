//! Default values for every configuration section.

use crate::schema::*;
use spotifire_common::{LoggingConfig, TopN, GENRE_DELIMITER, UNKNOWN_GENRE};
use std::path::PathBuf;

/// Default playlists directory.
pub const DEFAULT_PLAYLISTS_DIR: &str = "data/playlists";

/// Default converted streaming-history file.
pub const DEFAULT_STREAMING_HISTORY: &str = "data/total_streaming_data.csv";

/// Default calendar timezone.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Northern-hemisphere meteorological seasons.
pub fn default_seasons() -> Vec<SeasonDefinition> {
    vec![
        SeasonDefinition::new("Winter", &[12, 1, 2]),
        SeasonDefinition::new("Spring", &[3, 4, 5]),
        SeasonDefinition::new("Summer", &[6, 7, 8]),
        SeasonDefinition::new("Autumn", &[9, 10, 11]),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            genres: GenreConfig::default(),
            ranking: RankingConfig::default(),
            calendar: CalendarConfig::default(),
            streaming: StreamingConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            playlists_dir: PathBuf::from(DEFAULT_PLAYLISTS_DIR),
            streaming_history: PathBuf::from(DEFAULT_STREAMING_HISTORY),
        }
    }
}

impl Default for GenreConfig {
    fn default() -> Self {
        Self {
            delimiter: GENRE_DELIMITER,
            unknown_tag: UNKNOWN_GENRE.to_string(),
            tooltip_artists: 5,
            largest: 10,
            smallest: 30,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_songs: TopN::RANGE_DEFAULT,
            bucket_top_n: TopN::BUCKET_DEFAULT,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            seasons: default_seasons(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self { min_ms_played: 0 }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 32,
            ttl_seconds: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let config = Config::default();
        assert_eq!(config.genres.largest, 10);
        assert_eq!(config.genres.smallest, 30);
        assert_eq!(config.genres.tooltip_artists, 5);
        assert_eq!(config.ranking.top_songs.get(), 10);
        assert_eq!(config.ranking.bucket_top_n.get(), 5);
        assert_eq!(config.streaming.min_ms_played, 0);
        assert_eq!(config.calendar.timezone, "UTC");
    }

    #[test]
    fn test_default_seasons_cover_year() {
        let mut months: Vec<u32> = default_seasons()
            .into_iter()
            .flat_map(|season| season.months)
            .collect();
        months.sort_unstable();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
    }
}

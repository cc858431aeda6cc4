//! Application context shared by every command.

use crate::cli::Command;
use crate::commands;
use crate::output::OutputFormat;
use chrono_tz::Tz;
use spotifire_analytics::SeasonCalendar;
use spotifire_common::Result;
use spotifire_config::Config;
use spotifire_data::{DataLoader, PlaylistOptions};
use std::time::Duration;
use tracing::{debug, instrument};

/// Configuration plus the resources derived from it.
#[derive(Debug)]
pub struct App {
    config: Config,
    loader: DataLoader,
    timezone: Tz,
    seasons: SeasonCalendar,
    format: OutputFormat,
}

impl App {
    /// Builds the context. Fails when the timezone or season table is unusable.
    pub fn new(config: Config, format: OutputFormat) -> Result<Self> {
        let timezone = config.calendar.tz()?;
        let seasons = SeasonCalendar::new(
            config
                .calendar
                .seasons
                .iter()
                .map(|season| (season.name.clone(), season.months.clone())),
        )?;

        let loader = DataLoader::new(
            config.data.playlists_dir.clone(),
            PlaylistOptions {
                unknown_tag: config.genres.unknown_tag.clone(),
            },
            config.cache.max_capacity,
            Duration::from_secs(config.cache.ttl_seconds),
        );

        debug!(
            "Application context ready: timezone={}, seasons={}",
            timezone,
            seasons.seasons().len()
        );

        Ok(Self {
            config,
            loader,
            timezone,
            seasons,
            format,
        })
    }

    /// Loaded configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Dataset loader.
    pub const fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Calendar timezone.
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Season table.
    pub const fn seasons(&self) -> &SeasonCalendar {
        &self.seasons
    }

    /// Output format.
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Runs `command` and returns the text to print.
    #[instrument(skip(self))]
    pub async fn execute(&self, command: &Command) -> anyhow::Result<String> {
        match command {
            Command::Playlists => commands::playlists(self).await,
            Command::Genres {
                playlist,
                largest,
                smallest,
                tooltip,
            } => commands::genres(self, playlist, *largest, *smallest, *tooltip).await,
            Command::Wordcloud { playlist } => commands::wordcloud(self, playlist).await,
            Command::Features {
                playlist,
                tracks,
                bins,
            } => commands::features(self, playlist, tracks, *bins).await,
            Command::TopTracks { range, limit } => commands::top_tracks(self, range, *limit).await,
            Command::Temporal {
                bucket,
                top_n,
                range,
            } => commands::temporal(self, *bucket, *top_n, range).await,
            Command::Convert {
                exports_dir,
                output,
            } => commands::convert(self, exports_dir, output).await,
        }
    }
}

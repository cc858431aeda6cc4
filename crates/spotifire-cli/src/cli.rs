//! Command-line arguments.

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use spotifire_analytics::{CalendarBucket, MAX_BINS};
use std::path::PathBuf;

/// Genre and listening-history analytics over Spotify exports.
#[derive(Parser, Debug)]
#[command(name = "spotifire", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SPOTIFIRE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level, overriding the configured one
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the playlists in the playlists directory
    Playlists,

    /// Genre counts with the artists behind each genre
    Genres {
        /// Playlist name (file stem)
        playlist: String,

        /// Only the N most common genres, N defaulting to `genres.largest`
        #[arg(long, value_name = "N", num_args = 0..=1, conflicts_with = "smallest")]
        largest: Option<Option<usize>>,

        /// Only the N least common genres, N defaulting to `genres.smallest`
        #[arg(long, value_name = "N", num_args = 0..=1)]
        smallest: Option<Option<usize>>,

        /// Artists listed per genre
        #[arg(long)]
        tooltip: Option<usize>,
    },

    /// Genre weights for a word cloud
    Wordcloud {
        /// Playlist name (file stem)
        playlist: String,
    },

    /// Audio-feature profile, distribution and means
    Features {
        /// Playlist name (file stem)
        playlist: String,

        /// Profile these tracks instead of summarizing the playlist
        #[arg(long = "track")]
        tracks: Vec<String>,

        /// Histogram bins
        #[arg(
            long,
            default_value_t = 10,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BINS as u64)
        )]
        bins: usize,
    },

    /// Most played tracks in a time window
    TopTracks {
        #[command(flatten)]
        range: HistoryRange,

        /// Number of tracks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Most played tracks per weekday, season, month or year
    Temporal {
        /// Calendar bucket
        #[arg(long, value_parser = parse_bucket)]
        bucket: CalendarBucket,

        /// Tracks per bucket
        #[arg(long)]
        top_n: Option<usize>,

        #[command(flatten)]
        range: HistoryRange,
    },

    /// Convert raw endsong exports into the streaming-history CSV
    Convert {
        /// Directory searched recursively for *endsong*.json
        exports_dir: PathBuf,

        /// Output CSV path
        output: PathBuf,
    },
}

/// Streaming-history source and optional time bounds.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRange {
    /// Streaming-history CSV, defaults to the configured one
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// First day (YYYY-MM-DD) or instant (RFC 3339) to include
    #[arg(long)]
    pub start: Option<String>,

    /// Last day (YYYY-MM-DD) or instant (RFC 3339) to include
    #[arg(long)]
    pub end: Option<String>,
}

fn parse_bucket(value: &str) -> Result<CalendarBucket, String> {
    value
        .parse::<CalendarBucket>()
        .map_err(|_| format!("expected weekday, season, month or year, got '{value}'"))
}

//! Table and JSON rendering.

use serde::Serialize;
use spotifire_analytics::{
    FeatureHistogram, FeatureMean, FeatureValue, GenreSummary, TrackPlayCount, WordFrequency,
};
use spotifire_common::utils::format_duration_ms;
use spotifire_common::{Result, SpotifireError};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Renders rows as a table.
pub fn table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Renders any serializable result as JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(SpotifireError::from)
}

#[derive(Tabled)]
pub(crate) struct PlaylistRow {
    #[tabled(rename = "Playlist")]
    pub name: String,
}

#[derive(Tabled)]
pub(crate) struct GenreRow {
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Tracks")]
    pub count: u32,
    #[tabled(rename = "Top artists")]
    pub artists: String,
}

impl GenreRow {
    pub fn new(summary: &GenreSummary, tooltip: usize) -> Self {
        Self {
            genre: summary.genre.clone(),
            count: summary.count,
            artists: summary.tooltip(tooltip),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct WordRow {
    #[tabled(rename = "Word")]
    pub word: String,
    #[tabled(rename = "Weight")]
    pub weight: u32,
}

impl From<&WordFrequency> for WordRow {
    fn from(frequency: &WordFrequency) -> Self {
        Self {
            word: frequency.word.clone(),
            weight: frequency.weight,
        }
    }
}

#[derive(Tabled)]
pub(crate) struct ProfileRow {
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Feature")]
    pub feature: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl From<&FeatureValue> for ProfileRow {
    fn from(value: &FeatureValue) -> Self {
        Self {
            track: value.track.clone(),
            feature: value.feature.to_string(),
            value: format!("{:.3}", value.value),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct FeatureSummaryRow {
    #[tabled(rename = "Feature")]
    pub feature: String,
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[tabled(rename = "Distribution")]
    pub distribution: String,
}

impl FeatureSummaryRow {
    pub fn new(mean: &FeatureMean, histogram: Option<&FeatureHistogram>) -> Self {
        let distribution = histogram
            .map(|histogram| {
                histogram
                    .bins
                    .iter()
                    .map(|bin| bin.count.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        Self {
            feature: mean.feature.to_string(),
            mean: format!("{:.3}", mean.mean),
            distribution,
        }
    }
}

#[derive(Tabled)]
pub(crate) struct TrackRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Plays")]
    pub plays: u32,
    #[tabled(rename = "Listened")]
    pub listened: String,
}

impl TrackRow {
    pub fn new(rank: usize, entry: &TrackPlayCount) -> Self {
        Self {
            rank,
            track: entry.track.clone(),
            artist: entry.artist.clone(),
            plays: entry.plays,
            listened: format_duration_ms(entry.ms_played),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct BucketRow {
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[tabled(rename = "#")]
    pub rank: String,
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Plays")]
    pub plays: String,
}

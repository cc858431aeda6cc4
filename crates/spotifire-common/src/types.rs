//! Domain records shared by ingestion and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default delimiter joining genre tags inside a genre field.
pub const GENRE_DELIMITER: char = '/';

/// Tag given to tracks whose artist has no known genre.
pub const UNKNOWN_GENRE: &str = "unknown";

/// Audio-feature attributes reported by the streaming API for a track.
///
/// Values lie in `[0, 1]` by the API's contract; nothing here enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// How suitable the track is for dancing.
    pub danceability: f64,
    /// Perceived intensity and activity.
    pub energy: f64,
    /// Presence of spoken words.
    pub speechiness: f64,
    /// Likelihood that the track has no vocals.
    pub instrumentalness: f64,
    /// Presence of a live audience.
    pub liveness: f64,
    /// Musical positiveness.
    pub valence: f64,
}

/// One row per track appearance in a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Track title as published.
    pub track_name: String,
    /// Name of the track's primary artist.
    pub artist: String,
    /// Genre tags joined by [`GENRE_DELIMITER`], or [`UNKNOWN_GENRE`].
    pub genre: String,
    /// Album title.
    #[serde(default)]
    pub album: Option<String>,
    /// Streaming service track id.
    #[serde(default)]
    pub track_id: Option<String>,
    /// Audio-feature attributes.
    #[serde(default)]
    pub features: AudioFeatures,
    /// Track popularity (0-100).
    #[serde(default)]
    pub popularity: Option<f64>,
    /// When the track was added to the playlist.
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl TrackRecord {
    /// Creates a record carrying only the fields the genre aggregation needs.
    pub fn new(
        track_name: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist: artist.into(),
            genre: genre.into(),
            album: None,
            track_id: None,
            features: AudioFeatures::default(),
            popularity: None,
            added_at: None,
        }
    }

    /// Replaces the audio features.
    pub fn with_features(mut self, features: AudioFeatures) -> Self {
        self.features = features;
        self
    }

    /// Splits the genre field into its tags.
    pub fn genre_tags(&self, delimiter: char) -> impl Iterator<Item = &str> {
        self.genre.split(delimiter)
    }
}

/// Why playback of a stream started or ended, as reported by the export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackContext {
    /// Reason playback started (e.g. `clickrow`, `trackdone`).
    #[serde(default)]
    pub reason_start: Option<String>,
    /// Reason playback ended (e.g. `endplay`, `fwdbtn`).
    #[serde(default)]
    pub reason_end: Option<String>,
    /// Whether shuffle was on.
    #[serde(default)]
    pub shuffle: Option<bool>,
    /// Whether the user skipped the track.
    #[serde(default)]
    pub skipped: Option<bool>,
}

/// One row per listening session from the streaming history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Track title as exported, qualifiers included.
    pub track_name: String,
    /// Name of the album artist.
    pub artist_name: String,
    /// Album title, when exported.
    #[serde(default)]
    pub album_name: Option<String>,
    /// When playback ended.
    pub end_time: DateTime<Utc>,
    /// Milliseconds played. Zero marks a skip; skips are kept.
    pub ms_played: u64,
    /// Export metadata about the session.
    #[serde(default)]
    pub context: PlaybackContext,
}

impl PlayEvent {
    /// Creates a play event without export metadata.
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        end_time: DateTime<Utc>,
        ms_played: u64,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            album_name: None,
            end_time,
            ms_played,
            context: PlaybackContext::default(),
        }
    }
}

/// Number of entries kept after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopN(pub usize);

impl TopN {
    /// Top-N used by calendar bucket charts.
    pub const BUCKET_DEFAULT: Self = Self(5);
    /// Top-N used by the ungrouped "top songs in range" chart.
    pub const RANGE_DEFAULT: Self = Self(10);

    /// The cutoff as a plain count.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::RANGE_DEFAULT
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for TopN {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_genre_tags_split() {
        let track = TrackRecord::new("Song", "Artist", "pop/indie pop/rock");
        let tags: Vec<&str> = track.genre_tags(GENRE_DELIMITER).collect();
        assert_eq!(tags, vec!["pop", "indie pop", "rock"]);
    }

    #[test]
    fn test_unknown_genre_is_single_tag() {
        let track = TrackRecord::new("Song", "Artist", UNKNOWN_GENRE);
        assert_eq!(track.genre_tags(GENRE_DELIMITER).count(), 1);
    }

    #[test]
    fn test_play_event_serialization() {
        let when = Utc.with_ymd_and_hms(2022, 3, 14, 9, 30, 0).unwrap();
        let event = PlayEvent::new("Song (Live)", "Artist", when, 0);

        let json = serde_json::to_string(&event).unwrap();
        let back: PlayEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.ms_played, 0);
    }

    #[test]
    fn test_top_n_defaults() {
        assert_eq!(TopN::default().get(), 10);
        assert_eq!(TopN::BUCKET_DEFAULT.get(), 5);
        assert_eq!(format!("{}", TopN(40)), "40");
        assert_eq!(serde_json::to_string(&TopN(3)).unwrap(), "3");
    }
}

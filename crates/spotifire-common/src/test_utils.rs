//! Test utilities and shared fixtures for Spotifire.
//!
//! Available to unit tests of this crate and, through the `testing` feature,
//! to the tests of every other crate in the workspace.

use crate::{AudioFeatures, PlayEvent, TrackRecord};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Playlist fixtures.
pub mod playlist_fixtures {
    use super::*;

    /// A track with only artist and genre filled in.
    pub fn track(artist: &str, genre: &str) -> TrackRecord {
        TrackRecord::new(format!("{artist} track"), artist, genre)
    }

    /// A named track with a uniform feature vector.
    pub fn track_with_features(name: &str, artist: &str, value: f64) -> TrackRecord {
        TrackRecord::new(name, artist, "pop").with_features(AudioFeatures {
            danceability: value,
            energy: value,
            speechiness: value,
            instrumentalness: value,
            liveness: value,
            valence: value,
        })
    }

    /// The three-row playlist used throughout the genre tests:
    /// A `pop/rock`, B `pop`, A `pop`.
    pub fn pop_rock_playlist() -> Vec<TrackRecord> {
        vec![
            track("A", "pop/rock"),
            track("B", "pop"),
            track("A", "pop"),
        ]
    }

    /// Playlist CSV content in the export layout, one row per track.
    pub fn playlist_csv() -> &'static str {
        concat!(
            "artist,genre,album,track_name,track_id,danceability,energy,key,loudness,mode,",
            "speechiness,instrumentalness,liveness,valence,tempo,duration_ms,time_signature,",
            "track_popularity,added_at\n",
            "Kanye West,chicago rap/hip hop/rap,Late Registration,Gold Digger,1,0.629,0.696,1,",
            "-5.572,0,0.348,0,0.0554,0.623,93.034,207627,4,80,2021-04-02T10:00:00Z\n",
            "Ludacris,dirty south rap/hip hop,Release Therapy,Runaway Love,2,0.601,0.707,7,",
            "-5.1,1,0.34,0,0.183,0.61,160.9,280547,4,55,2021-04-02T10:05:00Z\n",
            "Obscure Act,,Demo,Untitled,3,0.1,0.2,0,-10.0,1,0.05,0.9,0.1,0.2,100.0,120000,3,,\n",
        )
    }
}

/// Streaming-history fixtures.
pub mod streaming_fixtures {
    use super::*;

    /// A full-length play ending at the given time.
    pub fn play(track: &str, artist: &str, end_time: DateTime<Utc>) -> PlayEvent {
        PlayEvent::new(track, artist, end_time, 180_000)
    }

    /// A zero-length play (a skip).
    pub fn skip(track: &str, artist: &str, end_time: DateTime<Utc>) -> PlayEvent {
        PlayEvent::new(track, artist, end_time, 0)
    }

    /// Two Monday plays of X by Artist1 and one Monday play of Y by Artist2.
    pub fn monday_plays() -> Vec<PlayEvent> {
        // 2024-01-01 was a Monday.
        vec![
            play("X", "Artist1", mock_timestamp(2024, 1, 1, 8, 0, 0)),
            play("Y", "Artist2", mock_timestamp(2024, 1, 1, 9, 0, 0)),
            play("X", "Artist1", mock_timestamp(2024, 1, 8, 8, 0, 0)),
        ]
    }

    /// Converted streaming CSV with one regular play and one skip.
    pub fn streaming_csv() -> &'static str {
        concat!(
            ",endTime,ms_played,trackName,artistName,reason_start,reason_end,shuffle,skipped\n",
            "0,2021-06-01 18:04:00+00:00,215000,Song (Live),Band,clickrow,trackdone,False,\n",
            "1,2021-06-02 07:15:30+00:00,0,Song (Remix),Band,fwdbtn,fwdbtn,True,1.0\n",
        )
    }

    /// Raw extended-history export with a track, a skip and a podcast row.
    pub fn endsong_json() -> &'static str {
        r#"[
  {
    "ts": "2019-11-23T21:09:51Z",
    "ms_played": 221000,
    "master_metadata_track_name": "Midnight City",
    "master_metadata_album_artist_name": "M83",
    "master_metadata_album_album_name": "Hurry Up, We're Dreaming",
    "reason_start": "trackdone",
    "reason_end": "trackdone",
    "shuffle": false,
    "skipped": null
  },
  {
    "ts": "2019-11-23T21:10:02Z",
    "ms_played": 0,
    "master_metadata_track_name": "Wait",
    "master_metadata_album_artist_name": "M83",
    "master_metadata_album_album_name": "Hurry Up, We're Dreaming",
    "reason_start": "fwdbtn",
    "reason_end": "fwdbtn",
    "shuffle": true,
    "skipped": true
  },
  {
    "ts": "2019-11-24T08:00:00Z",
    "ms_played": 1500000,
    "master_metadata_track_name": null,
    "master_metadata_album_artist_name": null,
    "master_metadata_album_album_name": null,
    "episode_name": "Morning Show",
    "reason_start": "clickrow",
    "reason_end": "endplay",
    "shuffle": false,
    "skipped": null
  }
]"#
    }
}

/// Configuration fixtures.
pub mod config_fixtures {
    /// A minimal valid configuration as YAML.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
data:
  playlists_dir: "data/playlists"
  streaming_history: "data/total_streaming_data.csv"
"#
    }
}

/// Property-based testing strategies.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::TrackRecord;
    use proptest::prelude::*;

    /// Strategy for a single genre tag.
    pub fn genre_tag_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "pop", "rock", "indie pop", "hip hop", "jazz", "unknown", "metal",
        ])
        .prop_map(str::to_string)
    }

    /// Strategy for a non-empty genre field of one to four tags.
    pub fn genre_field_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(genre_tag_strategy(), 1..=4).prop_map(|tags| tags.join("/"))
    }

    /// Strategy for an artist name from a small pool, so artists repeat.
    pub fn artist_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E"]).prop_map(str::to_string)
    }

    /// Strategy for a playlist of valid records.
    pub fn playlist_strategy(max_len: usize) -> impl Strategy<Value = Vec<TrackRecord>> {
        prop::collection::vec(
            (artist_strategy(), genre_field_strategy())
                .prop_map(|(artist, genre)| TrackRecord::new("t", artist, genre)),
            0..max_len,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn test_init_logging_multiple_calls() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_mock_timestamp() {
        let timestamp = mock_timestamp(2024, 1, 1, 12, 0, 0);
        assert_eq!(timestamp.year(), 2024);
        assert_eq!(timestamp.hour(), 12);
    }

    #[test]
    fn test_monday_plays_are_mondays() {
        for event in streaming_fixtures::monday_plays() {
            assert_eq!(event.end_time.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn test_pop_rock_playlist_shape() {
        let playlist = playlist_fixtures::pop_rock_playlist();
        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist[0].genre, "pop/rock");
    }
}

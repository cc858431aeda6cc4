//! Integration tests for spotifire-common crate.

use chrono::{TimeZone, Utc};
use spotifire_common::{
    format_duration_ms, format_timestamp, truncate_string, LoggingConfig, PlayEvent,
    SpotifireError, TopN, TrackRecord, GENRE_DELIMITER, UNKNOWN_GENRE,
};

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_truncate_string() {
    let truncated = truncate_string("This is a very long string that should be truncated", 20);
    assert_eq!(truncated, "This is a very lo...");
    assert_eq!(truncate_string("Short", 20), "Short");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration_ms(215_000), "3m 35s");
}

#[test]
fn test_track_record_json_shape() {
    let track = TrackRecord::new("Gold Digger", "Kanye West", "chicago rap/hip hop");
    let value = serde_json::to_value(&track).unwrap();

    assert_eq!(value["artist"], "Kanye West");
    assert_eq!(value["genre"], "chicago rap/hip hop");
    assert_eq!(value["features"]["energy"], 0.0);
    assert_eq!(track.genre_tags(GENRE_DELIMITER).count(), 2);
}

#[test]
fn test_track_record_missing_optionals_deserialize() {
    let json = r#"{"track_name": "Untitled", "artist": "Obscure Act", "genre": "unknown"}"#;
    let track: TrackRecord = serde_json::from_str(json).unwrap();

    assert_eq!(track.genre, UNKNOWN_GENRE);
    assert!(track.album.is_none());
    assert!(track.added_at.is_none());
}

#[test]
fn test_play_event_keeps_zero_ms() {
    let when = Utc.with_ymd_and_hms(2021, 6, 2, 7, 15, 30).unwrap();
    let event = PlayEvent::new("Song (Remix)", "Band", when, 0);
    assert_eq!(event.ms_played, 0);
    assert!(event.context.skipped.is_none());
}

#[test]
fn test_top_n_deserializes_from_integer() {
    let top: TopN = serde_json::from_str("7").unwrap();
    assert_eq!(top.get(), 7);
}

#[test]
fn test_logging_config_partial_json() {
    let config: LoggingConfig = serde_json::from_str(r#"{"include_spans": true}"#).unwrap();
    assert_eq!(config.level, "warn");
    assert!(config.include_spans);
}

#[test]
fn test_error_classification_across_kinds() {
    let errors = [
        SpotifireError::invalid_record("artist is empty"),
        SpotifireError::empty_result("no plays"),
        SpotifireError::ingest("bad csv", "list.csv"),
    ];

    let invalid: Vec<bool> = errors.iter().map(SpotifireError::is_invalid_input).collect();
    let empty: Vec<bool> = errors.iter().map(SpotifireError::is_empty_result).collect();
    assert_eq!(invalid, vec![true, false, false]);
    assert_eq!(empty, vec![false, true, false]);
}

//! Streaming-history ingestion: converted CSV and raw extended-history exports.

use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use spotifire_common::{PlayEvent, PlaybackContext, Result, SpotifireError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Timestamp layout written to the converted CSV.
pub const END_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Columns of the converted CSV after the leading index column.
pub const STREAMING_COLUMNS: [&str; 8] = [
    "endTime",
    "ms_played",
    "trackName",
    "artistName",
    "reason_start",
    "reason_end",
    "shuffle",
    "skipped",
];

/// Parses an end-of-playback timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS±HH:MM`, and offset-less
/// `YYYY-MM-DD HH:MM[:SS]`, the latter read as UTC.
pub fn parse_end_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, END_TIME_FORMAT) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Reads the loosely typed boolean columns of the converted CSV.
fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim)? {
        "" => None,
        "True" | "true" | "1" | "1.0" => Some(true),
        "False" | "false" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct StreamingRow {
    #[serde(rename = "endTime")]
    end_time: String,
    ms_played: String,
    #[serde(rename = "trackName", default)]
    track_name: Option<String>,
    #[serde(rename = "artistName", default)]
    artist_name: Option<String>,
    #[serde(rename = "albumName", default)]
    album_name: Option<String>,
    #[serde(default)]
    reason_start: Option<String>,
    #[serde(default)]
    reason_end: Option<String>,
    #[serde(default)]
    shuffle: Option<String>,
    #[serde(default)]
    skipped: Option<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_ms(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .map(|ms| ms as u64)
    })
}

/// Parses converted streaming CSV. Rows without a track or artist are dropped.
pub fn parse_streaming_csv<R: Read>(reader: R, source: &Path) -> Result<Vec<PlayEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut events = Vec::new();
    let mut dropped = 0usize;
    for (row, result) in csv_reader.deserialize::<StreamingRow>().enumerate() {
        let parsed = result.map_err(|e| {
            SpotifireError::ingest_with_source(format!("malformed streaming row {row}"), source, e)
        })?;

        let end_time = parse_end_time(&parsed.end_time).ok_or_else(|| {
            SpotifireError::invalid_field(
                format!("unparseable endTime '{}'", parsed.end_time),
                row,
                "endTime",
            )
        })?;
        let ms_played = parse_ms(&parsed.ms_played).ok_or_else(|| {
            SpotifireError::invalid_field(
                format!("unparseable ms_played '{}'", parsed.ms_played),
                row,
                "ms_played",
            )
        })?;

        let (Some(track_name), Some(artist_name)) =
            (present(parsed.track_name), present(parsed.artist_name))
        else {
            dropped += 1;
            continue;
        };

        events.push(PlayEvent {
            track_name,
            artist_name,
            album_name: present(parsed.album_name),
            end_time,
            ms_played,
            context: PlaybackContext {
                reason_start: present(parsed.reason_start),
                reason_end: present(parsed.reason_end),
                shuffle: parse_flag(parsed.shuffle.as_deref()),
                skipped: parse_flag(parsed.skipped.as_deref()),
            },
        });
    }

    if dropped > 0 {
        debug!("Dropped {} rows without track or artist", dropped);
    }
    Ok(events)
}

/// Reads the converted streaming-history CSV.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_streaming_history(path: &Path) -> Result<Vec<PlayEvent>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        SpotifireError::ingest_with_source("cannot read streaming history", path, e)
    })?;
    let events = parse_streaming_csv(bytes.as_slice(), path)?;
    info!("Loaded {} play events from {}", events.len(), path.display());
    Ok(events)
}

#[derive(Debug, Deserialize)]
struct RawStreamRow {
    ts: String,
    #[serde(default)]
    ms_played: u64,
    #[serde(default)]
    master_metadata_track_name: Option<String>,
    #[serde(default)]
    master_metadata_album_artist_name: Option<String>,
    #[serde(default)]
    master_metadata_album_album_name: Option<String>,
    #[serde(default)]
    reason_start: Option<String>,
    #[serde(default)]
    reason_end: Option<String>,
    #[serde(default)]
    shuffle: Option<bool>,
    #[serde(default)]
    skipped: Option<bool>,
}

/// Parses one raw extended-history export (a JSON array).
///
/// Rows without track or artist metadata (podcast episodes) are dropped;
/// zero-length plays are kept.
pub fn parse_export(content: &[u8], source: &Path) -> Result<Vec<PlayEvent>> {
    let rows: Vec<RawStreamRow> = serde_json::from_slice(content).map_err(|e| {
        SpotifireError::ingest_with_source("malformed streaming export", source, e)
    })?;

    let mut events = Vec::with_capacity(rows.len());
    for (row, raw) in rows.into_iter().enumerate() {
        let (Some(track_name), Some(artist_name)) = (
            present(raw.master_metadata_track_name),
            present(raw.master_metadata_album_artist_name),
        ) else {
            continue;
        };

        let end_time = parse_end_time(&raw.ts).ok_or_else(|| {
            SpotifireError::invalid_field(format!("unparseable ts '{}'", raw.ts), row, "ts")
        })?;

        events.push(PlayEvent {
            track_name,
            artist_name,
            album_name: present(raw.master_metadata_album_album_name),
            end_time,
            ms_played: raw.ms_played,
            context: PlaybackContext {
                reason_start: present(raw.reason_start),
                reason_end: present(raw.reason_end),
                shuffle: raw.shuffle,
                skipped: raw.skipped,
            },
        });
    }

    Ok(events)
}

fn is_export_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    lower.contains("endsong") && lower.ends_with(".json")
}

/// Finds raw `*endsong*.json` exports under `dir`, recursively, sorted by path.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn discover_exports(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pending = vec![dir.to_path_buf()];
    let mut found = Vec::new();

    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current).await.map_err(|e| {
            SpotifireError::ingest_with_source("cannot list exports directory", &current, e)
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            SpotifireError::ingest_with_source("cannot list exports directory", &current, e)
        })? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| {
                SpotifireError::ingest_with_source("cannot stat export", &path, e)
            })?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_export_file(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    debug!("Discovered {} streaming exports", found.len());
    Ok(found)
}

/// Loads every raw export under `dir`, ordered by end time.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn load_exports(dir: &Path) -> Result<Vec<PlayEvent>> {
    let paths = discover_exports(dir).await?;
    if paths.is_empty() {
        return Err(SpotifireError::empty_result(format!(
            "no *endsong*.json exports under {}",
            dir.display()
        )));
    }

    let batches = try_join_all(paths.iter().map(|path| async move {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SpotifireError::ingest_with_source("cannot read streaming export", path, e)
        })?;
        parse_export(&bytes, path)
    }))
    .await?;

    let mut events: Vec<PlayEvent> = batches.into_iter().flatten().collect();
    events.sort_by_key(|event| event.end_time);
    info!("Loaded {} play events from {} exports", events.len(), paths.len());
    Ok(events)
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "True",
        Some(false) => "False",
        None => "",
    }
}

/// Writes events in the converted CSV layout, with a leading index column.
pub fn write_streaming_csv_to<W: Write>(events: &[PlayEvent], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let to_error = |e: csv::Error| SpotifireError::with_source("cannot write streaming CSV", e);

    let mut header = vec![""];
    header.extend(STREAMING_COLUMNS);
    csv_writer.write_record(&header).map_err(to_error)?;

    for (index, event) in events.iter().enumerate() {
        csv_writer
            .write_record([
                index.to_string().as_str(),
                event.end_time.format(END_TIME_FORMAT).to_string().as_str(),
                event.ms_played.to_string().as_str(),
                event.track_name.as_str(),
                event.artist_name.as_str(),
                event.context.reason_start.as_deref().unwrap_or(""),
                event.context.reason_end.as_deref().unwrap_or(""),
                flag(event.context.shuffle),
                flag(event.context.skipped),
            ])
            .map_err(to_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Persists events as the converted streaming CSV at `path`.
#[instrument(skip_all, fields(path = %path.display(), events = events.len()))]
pub async fn write_streaming_csv(events: &[PlayEvent], path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    write_streaming_csv_to(events, &mut buffer)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            SpotifireError::ingest_with_source("cannot create output directory", parent, e)
        })?;
    }
    tokio::fs::write(path, buffer).await.map_err(|e| {
        SpotifireError::ingest_with_source("cannot write streaming history", path, e)
    })?;

    info!("Wrote {} play events to {}", events.len(), path.display());
    Ok(())
}

/// Converts every raw export under `exports_dir` into one CSV at `output`.
pub async fn convert_exports(exports_dir: &Path, output: &Path) -> Result<usize> {
    let events = load_exports(exports_dir).await?;
    write_streaming_csv(&events, output).await?;
    Ok(events.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use spotifire_common::test_utils::streaming_fixtures::{endsong_json, streaming_csv};

    #[test]
    fn test_parse_end_time_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 6, 1, 18, 4, 0).unwrap();
        assert_eq!(parse_end_time("2021-06-01 18:04:00+00:00"), Some(expected));
        assert_eq!(parse_end_time("2021-06-01T18:04:00Z"), Some(expected));
        assert_eq!(parse_end_time("2021-06-01 18:04"), Some(expected));
        assert_eq!(parse_end_time("2021-06-01 20:04:00+02:00"), Some(expected));
        assert!(parse_end_time("last tuesday").is_none());
    }

    #[test]
    fn test_parse_converted_csv_keeps_skips() {
        let events = parse_streaming_csv(streaming_csv().as_bytes(), Path::new("s.csv")).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].track_name, "Song (Live)");
        assert_eq!(events[0].ms_played, 215_000);
        assert_eq!(events[0].context.shuffle, Some(false));
        assert_eq!(events[0].context.skipped, None);

        assert_eq!(events[1].ms_played, 0);
        assert_eq!(events[1].context.skipped, Some(true));
        assert_eq!(events[1].end_time.second(), 30);
    }

    #[test]
    fn test_bad_timestamp_is_invalid_record() {
        let csv = "endTime,ms_played,trackName,artistName\nsoon,100,A,B\n";
        let err = parse_streaming_csv(csv.as_bytes(), Path::new("s.csv")).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.row(), Some(0));
    }

    #[test]
    fn test_float_ms_played_accepted() {
        let csv = "endTime,ms_played,trackName,artistName\n2021-01-01 00:00,1234.0,A,B\n";
        let events = parse_streaming_csv(csv.as_bytes(), Path::new("s.csv")).unwrap();
        assert_eq!(events[0].ms_played, 1234);
    }

    #[test]
    fn test_rows_without_artist_dropped() {
        let csv = "endTime,ms_played,trackName,artistName\n2021-01-01 00:00,10,A,\n2021-01-01 00:01,10,B,C\n";
        let events = parse_streaming_csv(csv.as_bytes(), Path::new("s.csv")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].track_name, "B");
    }

    #[test]
    fn test_parse_export_drops_podcasts_keeps_skips() {
        let events = parse_export(endsong_json().as_bytes(), Path::new("endsong_0.json")).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].artist_name, "M83");
        assert_eq!(events[0].album_name.as_deref(), Some("Hurry Up, We're Dreaming"));
        assert_eq!(events[1].ms_played, 0);
        assert_eq!(events[1].context.skipped, Some(true));
    }

    #[test]
    fn test_malformed_export_is_ingest_error() {
        let err = parse_export(b"{not json", Path::new("endsong_1.json")).unwrap_err();
        assert!(matches!(err, SpotifireError::Ingest { .. }));
    }

    #[test]
    fn test_export_file_names() {
        assert!(is_export_file(Path::new("MyData/endsong_0.json")));
        assert!(is_export_file(Path::new("endsong.JSON")));
        assert!(!is_export_file(Path::new("StreamingHistory0.json")));
        assert!(!is_export_file(Path::new("endsong_0.csv")));
    }

    #[test]
    fn test_written_csv_reads_back() {
        let events = parse_export(endsong_json().as_bytes(), Path::new("endsong_0.json")).unwrap();

        let mut buffer = Vec::new();
        write_streaming_csv_to(&events, &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with(",endTime,ms_played,trackName,artistName"));
        assert!(text.contains("2019-11-23 21:09:51+00:00"));

        let back = parse_streaming_csv(buffer.as_slice(), Path::new("out.csv")).unwrap();
        assert_eq!(back.len(), events.len());
        assert_eq!(back[1].ms_played, 0);
        assert_eq!(back[1].context.shuffle, Some(true));
        assert_eq!(back[0].end_time, events[0].end_time);
    }
}

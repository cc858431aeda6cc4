//! Playlist CSV ingestion.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use spotifire_common::{AudioFeatures, Result, SpotifireError, TrackRecord, UNKNOWN_GENRE};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Options applied while reading playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOptions {
    /// Genre given to rows whose genre column is empty.
    pub unknown_tag: String,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            unknown_tag: UNKNOWN_GENRE.to_string(),
        }
    }
}

/// One row of a playlist export. Columns not listed here are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaylistRow {
    artist: Option<String>,
    genre: Option<String>,
    album: Option<String>,
    track_name: Option<String>,
    track_id: Option<String>,
    danceability: Option<f64>,
    energy: Option<f64>,
    speechiness: Option<f64>,
    instrumentalness: Option<f64>,
    liveness: Option<f64>,
    valence: Option<f64>,
    track_popularity: Option<f64>,
    added_at: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PlaylistRow {
    fn into_record(self, row: usize, options: &PlaylistOptions) -> Result<TrackRecord> {
        let artist = non_empty(self.artist)
            .ok_or_else(|| SpotifireError::invalid_field("artist is missing", row, "artist"))?;
        let track_name = non_empty(self.track_name).ok_or_else(|| {
            SpotifireError::invalid_field("track name is missing", row, "track_name")
        })?;
        let genre = non_empty(self.genre).unwrap_or_else(|| options.unknown_tag.clone());

        let added_at = non_empty(self.added_at).and_then(|raw| {
            match DateTime::parse_from_rfc3339(&raw) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(e) => {
                    warn!("Row {}: ignoring unparseable added_at '{}': {}", row, raw, e);
                    None
                }
            }
        });

        Ok(TrackRecord {
            track_name,
            artist,
            genre,
            album: non_empty(self.album),
            track_id: non_empty(self.track_id),
            features: AudioFeatures {
                danceability: self.danceability.unwrap_or_default(),
                energy: self.energy.unwrap_or_default(),
                speechiness: self.speechiness.unwrap_or_default(),
                instrumentalness: self.instrumentalness.unwrap_or_default(),
                liveness: self.liveness.unwrap_or_default(),
                valence: self.valence.unwrap_or_default(),
            },
            popularity: self.track_popularity,
            added_at,
        })
    }
}

/// Parses playlist CSV content. `source` names the input in errors.
pub fn parse_playlist<R: Read>(
    reader: R,
    source: &Path,
    options: &PlaylistOptions,
) -> Result<Vec<TrackRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<PlaylistRow>().enumerate() {
        let parsed = result.map_err(|e| {
            SpotifireError::ingest_with_source(format!("malformed playlist row {row}"), source, e)
        })?;
        records.push(parsed.into_record(row, options)?);
    }

    Ok(records)
}

/// Reads one playlist CSV file.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_playlist(path: &Path, options: &PlaylistOptions) -> Result<Vec<TrackRecord>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        SpotifireError::ingest_with_source("cannot read playlist", path, e)
    })?;
    let records = parse_playlist(bytes.as_slice(), path, options)?;
    debug!("Loaded {} tracks from {}", records.len(), path.display());
    Ok(records)
}

/// Path of a named playlist inside `dir`.
pub fn playlist_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.csv"))
}

/// Names (file stems) of the `*.csv` playlists in `dir`, sorted.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn discover_playlists(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        SpotifireError::ingest_with_source("cannot list playlists directory", dir, e)
    })?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| SpotifireError::ingest_with_source("cannot list playlists directory", dir, e))?
    {
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    debug!("Discovered {} playlists", names.len());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotifire_common::test_utils::playlist_fixtures::playlist_csv;

    fn parse(content: &str) -> Result<Vec<TrackRecord>> {
        parse_playlist(
            content.as_bytes(),
            Path::new("test.csv"),
            &PlaylistOptions::default(),
        )
    }

    #[test]
    fn test_parse_fixture() {
        let records = parse(playlist_csv()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.artist, "Kanye West");
        assert_eq!(first.genre, "chicago rap/hip hop/rap");
        assert_eq!(first.album.as_deref(), Some("Late Registration"));
        assert!((first.features.energy - 0.696).abs() < 1e-9);
        assert_eq!(first.popularity, Some(80.0));
        assert!(first.added_at.is_some());
    }

    #[test]
    fn test_empty_genre_becomes_unknown() {
        let records = parse(playlist_csv()).unwrap();
        assert_eq!(records[2].genre, UNKNOWN_GENRE);
        assert!(records[2].popularity.is_none());
    }

    #[test]
    fn test_custom_unknown_tag() {
        let options = PlaylistOptions {
            unknown_tag: "n/a".to_string(),
        };
        let records =
            parse_playlist("artist,genre,track_name\nX,,Y\n".as_bytes(), Path::new("t.csv"), &options)
                .unwrap();
        assert_eq!(records[0].genre, "n/a");
    }

    #[test]
    fn test_missing_optional_columns_tolerated() {
        let records = parse("track_name,artist,genre,extra\nSong,Band,pop,ignored\n").unwrap();
        assert_eq!(records[0].track_name, "Song");
        assert_eq!(records[0].features.valence, 0.0);
        assert!(records[0].album.is_none());
    }

    #[test]
    fn test_missing_artist_is_invalid_record() {
        let err = parse("artist,genre,track_name\nA,pop,One\n,rock,Two\n").unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.row(), Some(1));
    }

    #[test]
    fn test_malformed_number_is_ingest_error() {
        let err = parse("artist,genre,track_name,energy\nA,pop,One,loud\n").unwrap_err();
        assert!(matches!(err, SpotifireError::Ingest { .. }));
    }

    #[test]
    fn test_bad_added_at_is_dropped() {
        let records = parse("artist,genre,track_name,added_at\nA,pop,One,yesterday\n").unwrap();
        assert!(records[0].added_at.is_none());
    }

    #[test]
    fn test_playlist_path() {
        assert_eq!(
            playlist_path(Path::new("data/playlists"), "Chill"),
            PathBuf::from("data/playlists/Chill.csv")
        );
    }
}

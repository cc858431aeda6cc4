//! Command handlers. Each one loads through the shared [`App`] and returns
//! the rendered output.

use crate::app::App;
use crate::cli::HistoryRange;
use crate::dates::resolve_window;
use crate::output::{
    json, table, BucketRow, FeatureSummaryRow, GenreRow, OutputFormat, PlaylistRow, ProfileRow,
    TrackRow, WordRow,
};
use anyhow::Context;
use serde::Serialize;
use spotifire_analytics::{
    chart_domain, feature_distribution, feature_means, feature_profile, Aggregator,
    CalendarBucket, FeatureHistogram, FeatureMean, GenreAggregator, GenreSummary,
    TemporalAggregate, TemporalAggregator, TrackPlayCount,
};
use spotifire_common::{PlayEvent, SpotifireError};
use spotifire_data::convert_exports;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Lists playlist names.
pub async fn playlists(app: &App) -> anyhow::Result<String> {
    let dir = app.loader().playlists_dir();
    let names = app
        .loader()
        .playlist_names()
        .await
        .with_context(|| format!("listing playlists in {}", dir.display()))?;

    if names.is_empty() {
        return Err(SpotifireError::empty_result(format!(
            "no playlists found in {}",
            dir.display()
        ))
        .into());
    }

    Ok(match app.format() {
        OutputFormat::Json => json(&names)?,
        OutputFormat::Table => table(names.into_iter().map(|name| PlaylistRow { name }).collect()),
    })
}

#[derive(Serialize)]
struct GenreReport<'a> {
    playlist: &'a str,
    total_tags: u64,
    domain: (u32, u32),
    genres: Vec<&'a GenreSummary>,
}

/// Genre counts, optionally only the largest or smallest ones.
///
/// A flag given without a count uses the configured one.
pub async fn genres(
    app: &App,
    playlist: &str,
    largest: Option<Option<usize>>,
    smallest: Option<Option<usize>>,
    tooltip: Option<usize>,
) -> anyhow::Result<String> {
    let tracks = app.loader().playlist(playlist).await?;
    let aggregate = GenreAggregator::with_delimiter(app.config().genres.delimiter)
        .aggregate(tracks.as_slice())
        .with_context(|| format!("aggregating genres of '{playlist}'"))?;

    if aggregate.is_empty() {
        return Err(
            SpotifireError::empty_result(format!("playlist '{playlist}' has no tracks")).into(),
        );
    }

    let defaults = &app.config().genres;
    let selected = match (largest, smallest) {
        (Some(n), _) => aggregate.largest(n.unwrap_or(defaults.largest)),
        (None, Some(n)) => aggregate.smallest(n.unwrap_or(defaults.smallest)),
        (None, None) => aggregate.largest(aggregate.len()),
    };
    let tooltip = tooltip.unwrap_or(app.config().genres.tooltip_artists);

    Ok(match app.format() {
        OutputFormat::Json => json(&GenreReport {
            playlist,
            total_tags: aggregate.total(),
            domain: chart_domain(selected.iter().copied()),
            genres: selected,
        })?,
        OutputFormat::Table => table(
            selected
                .into_iter()
                .map(|summary| GenreRow::new(summary, tooltip))
                .collect(),
        ),
    })
}

/// Word-cloud weights, without the unknown-genre sentinel.
pub async fn wordcloud(app: &App, playlist: &str) -> anyhow::Result<String> {
    let tracks = app.loader().playlist(playlist).await?;
    let aggregate = GenreAggregator::with_delimiter(app.config().genres.delimiter)
        .aggregate(tracks.as_slice())?;
    let words = aggregate.word_frequencies(&app.config().genres.unknown_tag);

    if words.is_empty() {
        return Err(SpotifireError::empty_result(format!(
            "playlist '{playlist}' has no known genres"
        ))
        .into());
    }

    Ok(match app.format() {
        OutputFormat::Json => json(&words)?,
        OutputFormat::Table => table(words.iter().map(WordRow::from).collect()),
    })
}

#[derive(Serialize)]
struct FeatureSummary {
    means: Vec<FeatureMean>,
    histograms: Vec<FeatureHistogram>,
}

/// Per-track feature profile, or playlist-wide means and histograms.
pub async fn features(
    app: &App,
    playlist: &str,
    tracks: &[String],
    bins: usize,
) -> anyhow::Result<String> {
    let records = app.loader().playlist(playlist).await?;

    if !tracks.is_empty() {
        let profile = feature_profile(records.as_slice(), tracks)?;
        return Ok(match app.format() {
            OutputFormat::Json => json(&profile)?,
            OutputFormat::Table => table(profile.iter().map(ProfileRow::from).collect()),
        });
    }

    let summary = FeatureSummary {
        means: feature_means(records.as_slice())?,
        histograms: feature_distribution(records.as_slice(), bins)?,
    };

    Ok(match app.format() {
        OutputFormat::Json => json(&summary)?,
        OutputFormat::Table => table(
            summary
                .means
                .iter()
                .map(|mean| {
                    let histogram = summary
                        .histograms
                        .iter()
                        .find(|histogram| histogram.feature == mean.feature);
                    FeatureSummaryRow::new(mean, histogram)
                })
                .collect(),
        ),
    })
}

async fn history(app: &App, range: &HistoryRange) -> anyhow::Result<Arc<Vec<PlayEvent>>> {
    let path = range
        .history
        .as_deref()
        .unwrap_or(&app.config().data.streaming_history);
    let events = app
        .loader()
        .streaming_history(path)
        .await
        .with_context(|| format!("loading streaming history {}", path.display()))?;
    Ok(events)
}

fn temporal_aggregator(
    app: &App,
    events: &[PlayEvent],
    range: &HistoryRange,
) -> anyhow::Result<TemporalAggregator> {
    let window = resolve_window(
        range.start.as_deref(),
        range.end.as_deref(),
        app.timezone(),
        events,
    )?;

    Ok(TemporalAggregator::new(window)
        .with_timezone(app.timezone())
        .with_min_ms_played(app.config().streaming.min_ms_played))
}

/// Most played tracks over the whole window.
pub async fn top_tracks(
    app: &App,
    range: &HistoryRange,
    limit: Option<usize>,
) -> anyhow::Result<String> {
    let events = history(app, range).await?;
    let limit = limit.unwrap_or_else(|| app.config().ranking.top_songs.get());

    let aggregate = temporal_aggregator(app, &events, range)?
        .with_top_n(limit)
        .aggregate(events.as_slice())?;
    let entries: Vec<TrackPlayCount> = aggregate
        .buckets
        .into_iter()
        .next()
        .map(|ranking| ranking.entries)
        .unwrap_or_default();

    Ok(match app.format() {
        OutputFormat::Json => json(&entries)?,
        OutputFormat::Table => table(
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| TrackRow::new(index + 1, entry))
                .collect(),
        ),
    })
}

fn bucket_rows(aggregate: &TemporalAggregate) -> Vec<BucketRow> {
    let mut rows = Vec::new();
    for ranking in &aggregate.buckets {
        if ranking.entries.is_empty() {
            rows.push(BucketRow {
                bucket: ranking.bucket.to_string(),
                rank: "-".to_string(),
                track: String::new(),
                artist: String::new(),
                plays: "0".to_string(),
            });
            continue;
        }
        for (index, entry) in ranking.entries.iter().enumerate() {
            rows.push(BucketRow {
                bucket: ranking.bucket.to_string(),
                rank: (index + 1).to_string(),
                track: entry.track.clone(),
                artist: entry.artist.clone(),
                plays: entry.plays.to_string(),
            });
        }
    }
    rows
}

/// Most played tracks per calendar bucket.
pub async fn temporal(
    app: &App,
    bucket: CalendarBucket,
    top_n: Option<usize>,
    range: &HistoryRange,
) -> anyhow::Result<String> {
    let events = history(app, range).await?;
    let top_n = top_n.unwrap_or_else(|| app.config().ranking.bucket_top_n.get());

    let aggregate = temporal_aggregator(app, &events, range)?
        .with_bucket(bucket)
        .with_top_n(top_n)
        .with_seasons(app.seasons().clone())
        .aggregate(events.as_slice())
        .with_context(|| format!("ranking tracks by {bucket}"))?;

    Ok(match app.format() {
        OutputFormat::Json => json(&aggregate)?,
        OutputFormat::Table => table(bucket_rows(&aggregate)),
    })
}

#[derive(Serialize)]
struct ConvertReport<'a> {
    events: usize,
    output: &'a Path,
}

/// Converts raw exports into the streaming-history CSV.
pub async fn convert(app: &App, exports_dir: &Path, output: &Path) -> anyhow::Result<String> {
    let events = convert_exports(exports_dir, output)
        .await
        .with_context(|| format!("converting exports under {}", exports_dir.display()))?;
    info!("Converted {} play events", events);

    Ok(match app.format() {
        OutputFormat::Json => json(&ConvertReport { events, output })?,
        OutputFormat::Table => format!(
            "Converted {} play events into {}",
            events,
            output.display()
        ),
    })
}

//! Genre aggregation over playlist track records.

use crate::traits::Aggregator;
use serde::Serialize;
use spotifire_common::{Result, SpotifireError, TrackRecord, GENRE_DELIMITER};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// An artist and how many tracks it contributed to a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedArtist {
    /// Artist name.
    pub artist: String,
    /// Tracks by this artist tagged with the genre.
    pub count: u32,
}

/// Per-genre totals and the ranked artists behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreSummary {
    /// Genre tag.
    pub genre: String,
    /// Tracks carrying the tag.
    pub count: u32,
    /// Contributing artists, descending by count, ties in first-seen order.
    pub artists: Vec<RankedArtist>,
}

impl GenreSummary {
    /// Formats the top `n` artists as `"A(2) - B(1)"`.
    pub fn tooltip(&self, n: usize) -> String {
        self.artists
            .iter()
            .take(n)
            .map(|ranked| format!("{}({})", ranked.artist, ranked.count))
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

/// A genre and its weight in a word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    /// Genre tag.
    pub word: String,
    /// Number of tracks carrying it.
    pub weight: u32,
}

/// Result of a genre aggregation, genres in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreAggregate {
    genres: Vec<GenreSummary>,
}

impl GenreAggregate {
    /// All genres in the order they were first encountered.
    pub fn genres(&self) -> &[GenreSummary] {
        &self.genres
    }

    /// Number of distinct genres.
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    /// Whether no genre was seen.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Looks up one genre.
    pub fn get(&self, genre: &str) -> Option<&GenreSummary> {
        self.genres.iter().find(|summary| summary.genre == genre)
    }

    /// Count for one genre.
    pub fn count(&self, genre: &str) -> Option<u32> {
        self.get(genre).map(|summary| summary.count)
    }

    /// Ranked artists for one genre.
    pub fn artists(&self, genre: &str) -> Option<&[RankedArtist]> {
        self.get(genre).map(|summary| summary.artists.as_slice())
    }

    /// Sum of all genre counts.
    pub fn total(&self) -> u64 {
        self.genres.iter().map(|summary| u64::from(summary.count)).sum()
    }

    /// The `n` most common genres, descending.
    pub fn largest(&self, n: usize) -> Vec<&GenreSummary> {
        let mut ranked: Vec<&GenreSummary> = self.genres.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }

    /// The `n` least common genres, listed descending.
    pub fn smallest(&self, n: usize) -> Vec<&GenreSummary> {
        let mut ranked: Vec<&GenreSummary> = self.genres.iter().collect();
        ranked.sort_by(|a, b| a.count.cmp(&b.count));
        ranked.truncate(n);
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Genre weights for a word cloud, without `stopword`.
    pub fn word_frequencies(&self, stopword: &str) -> Vec<WordFrequency> {
        let mut words: Vec<WordFrequency> = self
            .genres
            .iter()
            .filter(|summary| summary.genre != stopword)
            .map(|summary| WordFrequency {
                word: summary.genre.clone(),
                weight: summary.count,
            })
            .collect();
        words.sort_by(|a, b| b.weight.cmp(&a.weight));
        words
    }

    /// Tooltip text for one genre.
    pub fn tooltip(&self, genre: &str, n: usize) -> Option<String> {
        self.get(genre).map(|summary| summary.tooltip(n))
    }
}

/// Value-axis domain `[0, max count]` for a genre histogram.
pub fn chart_domain<'a, I>(genres: I) -> (u32, u32)
where
    I: IntoIterator<Item = &'a GenreSummary>,
{
    let max = genres
        .into_iter()
        .map(|summary| summary.count)
        .max()
        .unwrap_or(0);
    (0, max)
}

/// Counts genre tags and ranks the artists behind each.
#[derive(Debug, Clone)]
pub struct GenreAggregator {
    delimiter: char,
}

impl Default for GenreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreAggregator {
    /// Creates an aggregator splitting on `/`.
    pub const fn new() -> Self {
        Self {
            delimiter: GENRE_DELIMITER,
        }
    }

    /// Creates an aggregator with a custom tag delimiter.
    pub const fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    fn check_record(row: usize, record: &TrackRecord) -> Result<()> {
        if record.genre.trim().is_empty() {
            return Err(SpotifireError::invalid_field(
                "genre field is empty",
                row,
                "genre",
            ));
        }
        if record.artist.trim().is_empty() {
            return Err(SpotifireError::invalid_field(
                "artist is empty",
                row,
                "artist",
            ));
        }
        Ok(())
    }
}

/// Accumulator for one genre; artists kept in first-seen order.
#[derive(Default)]
struct GenreTally {
    count: u32,
    artists: Vec<(String, u32)>,
    artist_index: HashMap<String, usize>,
}

impl GenreTally {
    fn add(&mut self, artist: &str) {
        self.count += 1;
        match self.artist_index.get(artist) {
            Some(&index) => self.artists[index].1 += 1,
            None => {
                self.artist_index
                    .insert(artist.to_string(), self.artists.len());
                self.artists.push((artist.to_string(), 1));
            }
        }
    }

    fn finish(self, genre: String) -> GenreSummary {
        let mut artists: Vec<RankedArtist> = self
            .artists
            .into_iter()
            .map(|(artist, count)| RankedArtist { artist, count })
            .collect();
        // Stable: equal counts keep first-seen order.
        artists.sort_by(|a, b| b.count.cmp(&a.count));

        GenreSummary {
            genre,
            count: self.count,
            artists,
        }
    }
}

impl Aggregator for GenreAggregator {
    type Input = [TrackRecord];
    type Output = GenreAggregate;

    #[instrument(skip(self, input), fields(records = input.len()))]
    fn aggregate(&self, input: &[TrackRecord]) -> Result<GenreAggregate> {
        let mut order: Vec<String> = Vec::new();
        let mut tallies: HashMap<String, GenreTally> = HashMap::new();

        for (row, record) in input.iter().enumerate() {
            Self::check_record(row, record)?;

            let mut tagged = false;
            for tag in record
                .genre_tags(self.delimiter)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
            {
                tagged = true;
                let tally = tallies.entry(tag.to_string()).or_insert_with(|| {
                    order.push(tag.to_string());
                    GenreTally::default()
                });
                tally.add(&record.artist);
            }

            if !tagged {
                return Err(SpotifireError::invalid_field(
                    format!("genre field '{}' holds no tags", record.genre),
                    row,
                    "genre",
                ));
            }
        }

        let genres: Vec<GenreSummary> = order
            .into_iter()
            .filter_map(|genre| {
                tallies
                    .remove(&genre)
                    .map(|tally| tally.finish(genre))
            })
            .collect();

        debug!("Aggregated {} genres from {} tracks", genres.len(), input.len());
        Ok(GenreAggregate { genres })
    }

    fn name(&self) -> &'static str {
        "genres"
    }

    fn description(&self) -> &'static str {
        "Track counts per genre tag with ranked contributing artists"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotifire_common::test_utils::playlist_fixtures::{pop_rock_playlist, track};
    use spotifire_common::UNKNOWN_GENRE;

    fn ranked(artist: &str, count: u32) -> RankedArtist {
        RankedArtist {
            artist: artist.to_string(),
            count,
        }
    }

    #[test]
    fn test_pop_rock_example() {
        let aggregate = GenreAggregator::new().aggregate(&pop_rock_playlist()).unwrap();

        assert_eq!(aggregate.count("pop"), Some(3));
        assert_eq!(aggregate.count("rock"), Some(1));
        assert_eq!(aggregate.len(), 2);
        assert_eq!(
            aggregate.artists("pop").unwrap(),
            &[ranked("A", 2), ranked("B", 1)]
        );
        assert_eq!(aggregate.artists("rock").unwrap(), &[ranked("A", 1)]);
    }

    #[test]
    fn test_single_unknown_track() {
        let records = vec![track("Solo", UNKNOWN_GENRE)];
        let aggregate = GenreAggregator::new().aggregate(&records).unwrap();

        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.count(UNKNOWN_GENRE), Some(1));
        assert_eq!(aggregate.artists(UNKNOWN_GENRE).unwrap(), &[ranked("Solo", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            track("Zed", "jazz"),
            track("Amy", "jazz"),
            track("Mo", "jazz"),
            track("Amy", "jazz"),
            track("Zed", "jazz"),
        ];
        let aggregate = GenreAggregator::new().aggregate(&records).unwrap();

        assert_eq!(
            aggregate.artists("jazz").unwrap(),
            &[ranked("Zed", 2), ranked("Amy", 2), ranked("Mo", 1)]
        );
    }

    #[test]
    fn test_empty_genre_is_invalid() {
        let records = vec![track("A", "pop"), track("B", "  ")];
        let err = GenreAggregator::new().aggregate(&records).unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(err.row(), Some(1));
    }

    #[test]
    fn test_empty_artist_is_invalid() {
        let records = vec![track("", "pop")];
        let err = GenreAggregator::new().aggregate(&records).unwrap_err();
        assert!(matches!(
            err,
            SpotifireError::InvalidRecord { ref field, .. } if field.as_deref() == Some("artist")
        ));
    }

    #[test]
    fn test_delimiter_only_genre_is_invalid() {
        let records = vec![track("A", "/")];
        assert!(GenreAggregator::new().aggregate(&records).is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        let records = vec![track("A", "pop;rock")];
        let aggregate = GenreAggregator::with_delimiter(';').aggregate(&records).unwrap();
        assert_eq!(aggregate.count("pop"), Some(1));
        assert_eq!(aggregate.count("rock"), Some(1));
    }

    #[test]
    fn test_empty_input_gives_empty_aggregate() {
        let aggregate = GenreAggregator::new().aggregate(&[]).unwrap();
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.total(), 0);
    }

    #[test]
    fn test_largest_and_smallest() {
        let records = vec![
            track("A", "pop/rock/jazz"),
            track("B", "pop/rock"),
            track("C", "pop"),
            track("D", "metal"),
        ];
        let aggregate = GenreAggregator::new().aggregate(&records).unwrap();

        let largest: Vec<&str> = aggregate
            .largest(2)
            .iter()
            .map(|s| s.genre.as_str())
            .collect();
        assert_eq!(largest, vec!["pop", "rock"]);

        let smallest: Vec<(&str, u32)> = aggregate
            .smallest(3)
            .iter()
            .map(|s| (s.genre.as_str(), s.count))
            .collect();
        assert_eq!(smallest, vec![("rock", 2), ("jazz", 1), ("metal", 1)]);
    }

    #[test]
    fn test_word_frequencies_skip_stopword() {
        let records = vec![
            track("A", "unknown"),
            track("B", "unknown"),
            track("C", "pop"),
        ];
        let aggregate = GenreAggregator::new().aggregate(&records).unwrap();
        let words = aggregate.word_frequencies(UNKNOWN_GENRE);

        assert_eq!(
            words,
            vec![WordFrequency {
                word: "pop".to_string(),
                weight: 1
            }]
        );
    }

    #[test]
    fn test_tooltip_format() {
        let aggregate = GenreAggregator::new().aggregate(&pop_rock_playlist()).unwrap();

        assert_eq!(aggregate.tooltip("pop", 5).unwrap(), "A(2) - B(1)");
        assert_eq!(aggregate.tooltip("pop", 1).unwrap(), "A(2)");
        assert_eq!(aggregate.tooltip("rock", 5).unwrap(), "A(1)");
        assert!(aggregate.tooltip("jazz", 5).is_none());
    }

    #[test]
    fn test_chart_domain() {
        let aggregate = GenreAggregator::new().aggregate(&pop_rock_playlist()).unwrap();
        assert_eq!(chart_domain(aggregate.genres()), (0, 3));
        assert_eq!(chart_domain(aggregate.smallest(1)), (0, 1));
        assert_eq!(chart_domain(Vec::<&GenreSummary>::new()), (0, 0));
    }
}

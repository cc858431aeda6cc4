//! Temporal listening aggregation: top tracks per calendar bucket.

use crate::normalize::canonical_track_name;
use crate::traits::Aggregator;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use spotifire_common::{PlayEvent, Result, SpotifireError, TopN};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Half-open time window `(start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window; `start == end` is valid and matches nothing.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(SpotifireError::invalid_interval(start, end));
        }
        Ok(Self { start, end })
    }

    /// The window spanning every event, earliest included.
    pub fn covering(events: &[PlayEvent]) -> Result<Self> {
        let earliest = events.iter().map(|event| event.end_time).min();
        let latest = events.iter().map(|event| event.end_time).max();

        match (earliest, latest) {
            (Some(earliest), Some(latest)) => {
                Self::new(earliest - Duration::nanoseconds(1), latest)
            }
            _ => Err(SpotifireError::empty_result("streaming history is empty")),
        }
    }

    /// Exclusive lower bound.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive upper bound.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` lies in `(start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start < instant && instant <= self.end
    }
}

/// Calendar grouping applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarBucket {
    /// Seven buckets, Monday first.
    Weekday,
    /// One bucket per configured season.
    Season,
    /// Twelve buckets, January first.
    Month,
    /// One bucket per year present in the data.
    Year,
}

impl fmt::Display for CalendarBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weekday => "weekday",
            Self::Season => "season",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for CalendarBucket {
    type Err = SpotifireError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekday" | "day" => Ok(Self::Weekday),
            "season" => Ok(Self::Season),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(SpotifireError::new(format!(
                "unknown calendar bucket '{other}'"
            ))),
        }
    }
}

/// A named season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    /// Display name.
    pub name: String,
    /// Months covered, January = 1.
    pub months: Vec<u32>,
}

/// Mapping of every month to exactly one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonCalendar {
    seasons: Vec<Season>,
    by_month: [usize; 12],
}

impl SeasonCalendar {
    /// Builds a calendar, rejecting tables that miss or repeat a month or
    /// that repeat or leave blank a season name.
    pub fn new<I, S>(seasons: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<u32>)>,
        S: Into<String>,
    {
        let seasons: Vec<Season> = seasons
            .into_iter()
            .map(|(name, months)| Season {
                name: name.into(),
                months,
            })
            .collect();

        let mut names = HashSet::new();
        for season in &seasons {
            let name = season.name.trim();
            if name.is_empty() {
                return Err(SpotifireError::config("season name is empty"));
            }
            if !names.insert(name) {
                return Err(SpotifireError::config(format!(
                    "season '{name}' is defined more than once"
                )));
            }
        }

        let mut by_month = [usize::MAX; 12];
        for (index, season) in seasons.iter().enumerate() {
            for &month in &season.months {
                let slot = month
                    .checked_sub(1)
                    .and_then(|m| by_month.get_mut(m as usize))
                    .ok_or_else(|| {
                        SpotifireError::config(format!(
                            "season '{}' has invalid month {month}",
                            season.name
                        ))
                    })?;
                if *slot != usize::MAX {
                    return Err(SpotifireError::config(format!(
                        "month {month} appears in more than one season"
                    )));
                }
                *slot = index;
            }
        }

        if let Some(missing) = by_month.iter().position(|&slot| slot == usize::MAX) {
            return Err(SpotifireError::config(format!(
                "month {} is not covered by any season",
                missing + 1
            )));
        }

        Ok(Self { seasons, by_month })
    }

    /// Seasons in table order.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Season containing a month (1-12).
    pub fn season_of(&self, month: u32) -> &Season {
        let index = self.by_month[((month.clamp(1, 12)) - 1) as usize];
        &self.seasons[index]
    }
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        let seasons = vec![
            Season {
                name: "Winter".to_string(),
                months: vec![12, 1, 2],
            },
            Season {
                name: "Spring".to_string(),
                months: vec![3, 4, 5],
            },
            Season {
                name: "Summer".to_string(),
                months: vec![6, 7, 8],
            },
            Season {
                name: "Autumn".to_string(),
                months: vec![9, 10, 11],
            },
        ];
        Self {
            seasons,
            by_month: [0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 0],
        }
    }
}

/// Identifies one bucket of a temporal aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    /// The whole window, no calendar grouping.
    All,
    /// Day of the week.
    Weekday(Weekday),
    /// Named season.
    Season(String),
    /// Month, January = 1.
    Month(u32),
    /// Calendar year.
    Year(i32),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Weekday(day) => f.write_str(weekday_name(*day)),
            Self::Season(name) => f.write_str(name),
            Self::Month(month) => {
                let name = month
                    .checked_sub(1)
                    .and_then(|m| MONTH_NAMES.get(m as usize))
                    .copied()
                    .unwrap_or("?");
                f.write_str(name)
            }
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Plays of one canonical track by one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackPlayCount {
    /// Canonical track name.
    pub track: String,
    /// Artist name.
    pub artist: String,
    /// Number of play events.
    pub plays: u32,
    /// Total milliseconds played.
    pub ms_played: u64,
}

/// Ranked tracks of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketRanking {
    /// Which bucket.
    pub bucket: BucketKey,
    /// At most top-N entries, best first.
    pub entries: Vec<TrackPlayCount>,
}

/// Result of a temporal aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalAggregate {
    /// The window that was applied.
    pub window: TimeWindow,
    /// Grouping, if any.
    pub bucket: Option<CalendarBucket>,
    /// Buckets in calendar order.
    pub buckets: Vec<BucketRanking>,
}

impl TemporalAggregate {
    /// Looks up one bucket.
    pub fn get(&self, key: &BucketKey) -> Option<&BucketRanking> {
        self.buckets.iter().find(|ranking| &ranking.bucket == key)
    }

    /// Total entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|ranking| ranking.entries.len()).sum()
    }
}

/// Ranks tracks by play count inside a window, optionally per calendar bucket.
#[derive(Debug, Clone)]
pub struct TemporalAggregator {
    window: TimeWindow,
    bucket: Option<CalendarBucket>,
    top_n: Option<TopN>,
    timezone: Tz,
    seasons: SeasonCalendar,
    min_ms_played: u64,
}

impl TemporalAggregator {
    /// Ungrouped ranking over `window`, top 10, UTC calendar.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            bucket: None,
            top_n: None,
            timezone: Tz::UTC,
            seasons: SeasonCalendar::default(),
            min_ms_played: 0,
        }
    }

    /// Groups by a calendar bucket.
    pub fn with_bucket(mut self, bucket: CalendarBucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    /// Sets the per-bucket cutoff, overriding the grouping's default.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(TopN(top_n));
        self
    }

    /// Explicit cutoff, else 5 per calendar bucket or 10 ungrouped.
    fn effective_top_n(&self) -> TopN {
        self.top_n.unwrap_or(match self.bucket {
            Some(_) => TopN::BUCKET_DEFAULT,
            None => TopN::RANGE_DEFAULT,
        })
    }

    /// Computes calendar fields in this timezone.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Uses a custom season table.
    pub fn with_seasons(mut self, seasons: SeasonCalendar) -> Self {
        self.seasons = seasons;
        self
    }

    /// Ignores plays shorter than `min_ms_played`.
    pub fn with_min_ms_played(mut self, min_ms_played: u64) -> Self {
        self.min_ms_played = min_ms_played;
        self
    }

    fn bucket_of(&self, event: &PlayEvent) -> BucketKey {
        let local = event.end_time.with_timezone(&self.timezone);
        match self.bucket {
            None => BucketKey::All,
            Some(CalendarBucket::Weekday) => BucketKey::Weekday(local.weekday()),
            Some(CalendarBucket::Season) => {
                BucketKey::Season(self.seasons.season_of(local.month()).name.clone())
            }
            Some(CalendarBucket::Month) => BucketKey::Month(local.month()),
            Some(CalendarBucket::Year) => BucketKey::Year(local.year()),
        }
    }

    /// Bucket keys in output order; fixed calendars list every bucket.
    fn bucket_order(&self, present: &HashMap<BucketKey, Counts>) -> Vec<BucketKey> {
        match self.bucket {
            None => vec![BucketKey::All],
            Some(CalendarBucket::Weekday) => WEEK.iter().copied().map(BucketKey::Weekday).collect(),
            Some(CalendarBucket::Season) => self
                .seasons
                .seasons()
                .iter()
                .map(|season| BucketKey::Season(season.name.clone()))
                .collect(),
            Some(CalendarBucket::Month) => (1..=12).map(BucketKey::Month).collect(),
            Some(CalendarBucket::Year) => present
                .keys()
                .filter_map(|key| match key {
                    BucketKey::Year(year) => Some(*year),
                    _ => None,
                })
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(BucketKey::Year)
                .collect(),
        }
    }
}

type Counts = HashMap<(String, String), (u32, u64)>;

/// Sorts by plays descending, then track, then artist, and truncates.
fn rank(counts: Counts, top_n: TopN) -> Vec<TrackPlayCount> {
    let mut entries: Vec<TrackPlayCount> = counts
        .into_iter()
        .map(|((track, artist), (plays, ms_played))| TrackPlayCount {
            track,
            artist,
            plays,
            ms_played,
        })
        .collect();

    entries.sort_by(|a, b| match b.plays.cmp(&a.plays) {
        Ordering::Equal => a.track.cmp(&b.track).then_with(|| a.artist.cmp(&b.artist)),
        other => other,
    });
    entries.truncate(top_n.get());
    entries
}

impl Aggregator for TemporalAggregator {
    type Input = [PlayEvent];
    type Output = TemporalAggregate;

    #[instrument(skip(self, input), fields(events = input.len(), bucket = ?self.bucket))]
    fn aggregate(&self, input: &[PlayEvent]) -> Result<TemporalAggregate> {
        let mut grouped: HashMap<BucketKey, Counts> = HashMap::new();
        let mut matched = 0usize;

        for event in input
            .iter()
            .filter(|event| self.window.contains(event.end_time))
            .filter(|event| event.ms_played >= self.min_ms_played)
        {
            matched += 1;
            let key = (
                canonical_track_name(&event.track_name).to_string(),
                event.artist_name.clone(),
            );
            let slot = grouped
                .entry(self.bucket_of(event))
                .or_default()
                .entry(key)
                .or_insert((0, 0));
            slot.0 += 1;
            slot.1 += event.ms_played;
        }

        if matched == 0 {
            return Err(SpotifireError::empty_result(format!(
                "no plays between {} and {}",
                self.window.start(),
                self.window.end()
            )));
        }

        let order = self.bucket_order(&grouped);
        let buckets: Vec<BucketRanking> = order
            .into_iter()
            .map(|bucket| {
                let counts = grouped.remove(&bucket).unwrap_or_default();
                BucketRanking {
                    entries: rank(counts, self.effective_top_n()),
                    bucket,
                }
            })
            .collect();

        debug!(
            "Aggregated {} plays into {} buckets",
            matched,
            buckets.len()
        );
        Ok(TemporalAggregate {
            window: self.window,
            bucket: self.bucket,
            buckets,
        })
    }

    fn name(&self) -> &'static str {
        "temporal"
    }

    fn description(&self) -> &'static str {
        "Most played tracks per calendar bucket within a time window"
    }
}

/// The `limit` most played tracks in `window`, ungrouped.
pub fn top_songs(
    events: &[PlayEvent],
    window: TimeWindow,
    limit: usize,
) -> Result<Vec<TrackPlayCount>> {
    let aggregate = TemporalAggregator::new(window)
        .with_top_n(limit)
        .aggregate(events)?;
    Ok(aggregate
        .buckets
        .into_iter()
        .next()
        .map(|ranking| ranking.entries)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotifire_common::test_utils::mock_timestamp;
    use spotifire_common::test_utils::streaming_fixtures::{monday_plays, play, skip};

    fn day(d: u32) -> DateTime<Utc> {
        mock_timestamp(2024, 3, d, 0, 0, 0)
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        let err = TimeWindow::new(day(2), day(1)).unwrap_err();
        assert!(matches!(err, SpotifireError::InvalidInterval { .. }));
    }

    #[test]
    fn test_window_bounds_are_exclusive_inclusive() {
        let window = TimeWindow::new(day(1), day(2)).unwrap();
        assert!(!window.contains(day(1)));
        assert!(window.contains(day(2)));
        assert!(window.contains(mock_timestamp(2024, 3, 1, 12, 0, 0)));
        assert!(!window.contains(mock_timestamp(2024, 3, 2, 0, 0, 1)));
    }

    #[test]
    fn test_window_keeps_only_middle_day() {
        let events = vec![
            play("First", "A", day(1)),
            play("Second", "A", day(2)),
            play("Third", "A", day(3)),
        ];
        let window = TimeWindow::new(day(1), day(2)).unwrap();

        let top = top_songs(&events, window, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].track, "Second");
    }

    #[test]
    fn test_equal_bounds_is_empty_result() {
        let events = vec![play("Song", "A", day(1))];
        let window = TimeWindow::new(day(1), day(1)).unwrap();

        let err = top_songs(&events, window, 10).unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn test_covering_includes_earliest() {
        let events = monday_plays();
        let window = TimeWindow::covering(&events).unwrap();
        assert!(events.iter().all(|event| window.contains(event.end_time)));
        assert!(TimeWindow::covering(&[]).unwrap_err().is_empty_result());
    }

    #[test]
    fn test_variants_merge_into_canonical_track() {
        let events = vec![
            play("Song (Live)", "Band", day(1)),
            play("Song (Remix)", "Band", day(2)),
        ];
        let window = TimeWindow::covering(&events).unwrap();

        let top = top_songs(&events, window, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].track, "Song");
        assert_eq!(top[0].plays, 2);
        assert_eq!(top[0].ms_played, 360_000);
    }

    #[test]
    fn test_same_track_different_artists_stay_apart() {
        let events = vec![play("Song", "A", day(1)), play("Song", "B", day(2))];
        let window = TimeWindow::covering(&events).unwrap();
        assert_eq!(top_songs(&events, window, 10).unwrap().len(), 2);
    }

    #[test]
    fn test_weekday_top_one() {
        let events = monday_plays();
        let window = TimeWindow::covering(&events).unwrap();

        let aggregate = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Weekday)
            .with_top_n(1)
            .aggregate(&events)
            .unwrap();

        assert_eq!(aggregate.buckets.len(), 7);
        let monday = aggregate.get(&BucketKey::Weekday(Weekday::Mon)).unwrap();
        assert_eq!(monday.entries.len(), 1);
        assert_eq!(monday.entries[0].track, "X");
        assert_eq!(monday.entries[0].artist, "Artist1");
        assert_eq!(monday.entries[0].plays, 2);

        let tuesday = aggregate.get(&BucketKey::Weekday(Weekday::Tue)).unwrap();
        assert!(tuesday.entries.is_empty());
    }

    #[test]
    fn test_explicit_top_n_survives_bucket_choice() {
        let tracks = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let events: Vec<PlayEvent> = tracks
            .iter()
            .zip(1..)
            .map(|(track, hour)| play(track, "Band", mock_timestamp(2024, 1, 1, hour, 0, 0)))
            .collect();
        let window = TimeWindow::covering(&events).unwrap();
        let monday = BucketKey::Weekday(Weekday::Mon);

        let before = TemporalAggregator::new(window)
            .with_top_n(8)
            .with_bucket(CalendarBucket::Weekday)
            .aggregate(&events)
            .unwrap();
        let after = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Weekday)
            .with_top_n(8)
            .aggregate(&events)
            .unwrap();
        assert_eq!(before.get(&monday).unwrap().entries.len(), 8);
        assert_eq!(before, after);

        let defaulted = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Weekday)
            .aggregate(&events)
            .unwrap();
        assert_eq!(defaulted.get(&monday).unwrap().entries.len(), 5);
        assert_eq!(top_songs(&events, window, 10).unwrap().len(), 8);
    }

    #[test]
    fn test_ties_break_by_track_then_artist() {
        let events = vec![
            play("b", "Z", day(1)),
            play("a", "Y", day(1)),
            play("a", "X", day(1)),
        ];
        let window = TimeWindow::new(day(1) - Duration::hours(1), day(1)).unwrap();

        let top = top_songs(&events, window, 10).unwrap();
        let order: Vec<(&str, &str)> = top
            .iter()
            .map(|e| (e.track.as_str(), e.artist.as_str()))
            .collect();
        assert_eq!(order, vec![("a", "X"), ("a", "Y"), ("b", "Z")]);
    }

    #[test]
    fn test_skips_kept_by_default_and_filtered_on_request() {
        let events = vec![skip("Song", "A", day(1)), play("Other", "B", day(1))];
        let window = TimeWindow::new(day(1) - Duration::hours(1), day(1)).unwrap();

        let all = top_songs(&events, window, 10).unwrap();
        assert_eq!(all.len(), 2);

        let filtered = TemporalAggregator::new(window)
            .with_min_ms_played(1)
            .aggregate(&events)
            .unwrap();
        assert_eq!(filtered.entry_count(), 1);
    }

    #[test]
    fn test_month_and_season_buckets() {
        let events = vec![
            play("Cold", "A", mock_timestamp(2023, 1, 15, 12, 0, 0)),
            play("Cold", "A", mock_timestamp(2023, 12, 15, 12, 0, 0)),
            play("Warm", "B", mock_timestamp(2023, 7, 15, 12, 0, 0)),
        ];
        let window = TimeWindow::covering(&events).unwrap();

        let months = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Month)
            .aggregate(&events)
            .unwrap();
        assert_eq!(months.buckets.len(), 12);
        assert_eq!(months.buckets[0].bucket.to_string(), "January");
        assert_eq!(months.buckets[6].entries[0].track, "Warm");

        let seasons = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Season)
            .aggregate(&events)
            .unwrap();
        let names: Vec<String> = seasons.buckets.iter().map(|b| b.bucket.to_string()).collect();
        assert_eq!(names, vec!["Winter", "Spring", "Summer", "Autumn"]);
        let winter = seasons.get(&BucketKey::Season("Winter".to_string())).unwrap();
        assert_eq!(winter.entries[0].plays, 2);
    }

    #[test]
    fn test_year_buckets_only_present_years() {
        let events = vec![
            play("Old", "A", mock_timestamp(2019, 5, 1, 0, 0, 0)),
            play("New", "B", mock_timestamp(2022, 5, 1, 0, 0, 0)),
        ];
        let window = TimeWindow::covering(&events).unwrap();

        let years = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Year)
            .aggregate(&events)
            .unwrap();
        let keys: Vec<BucketKey> = years.buckets.iter().map(|b| b.bucket.clone()).collect();
        assert_eq!(keys, vec![BucketKey::Year(2019), BucketKey::Year(2022)]);
    }

    #[test]
    fn test_timezone_moves_weekday() {
        // Monday 02:00 UTC is still Sunday evening in New York.
        let events = vec![play("Late", "A", mock_timestamp(2024, 1, 1, 2, 0, 0))];
        let window = TimeWindow::covering(&events).unwrap();

        let aggregate = TemporalAggregator::new(window)
            .with_bucket(CalendarBucket::Weekday)
            .with_timezone(chrono_tz::America::New_York)
            .aggregate(&events)
            .unwrap();
        let sunday = aggregate.get(&BucketKey::Weekday(Weekday::Sun)).unwrap();
        assert_eq!(sunday.entries.len(), 1);
    }

    #[test]
    fn test_season_calendar_validation() {
        let ok = SeasonCalendar::new([
            ("Wet", vec![11, 12, 1, 2, 3, 4]),
            ("Dry", vec![5, 6, 7, 8, 9, 10]),
        ])
        .unwrap();
        assert_eq!(ok.season_of(1).name, "Wet");
        assert_eq!(ok.season_of(7).name, "Dry");

        assert!(SeasonCalendar::new([("All", (1..=11).collect::<Vec<u32>>())]).is_err());
        assert!(SeasonCalendar::new([("A", vec![1, 1]), ("B", (2..=12).collect())]).is_err());
        assert!(SeasonCalendar::new([("A", vec![0])]).is_err());
    }

    #[test]
    fn test_season_names_must_be_distinct_and_present() {
        let first_half: Vec<u32> = (1..=6).collect();
        let second_half: Vec<u32> = (7..=12).collect();

        let duplicate =
            SeasonCalendar::new([("A", first_half.clone()), ("A", second_half.clone())]).unwrap_err();
        assert!(duplicate.to_string().contains("more than once"));

        let padded =
            SeasonCalendar::new([("A", first_half.clone()), (" A ", second_half.clone())]);
        assert!(padded.is_err());

        let blank = SeasonCalendar::new([("A", first_half), ("  ", second_half)]).unwrap_err();
        assert!(blank.to_string().contains("empty"));
    }

    #[test]
    fn test_default_calendar_matches_table() {
        let calendar = SeasonCalendar::default();
        for season in calendar.seasons() {
            for &month in &season.months {
                assert_eq!(calendar.season_of(month).name, season.name);
            }
        }
    }

    #[test]
    fn test_bucket_parsing_and_serialization() {
        assert_eq!("Weekday".parse::<CalendarBucket>().unwrap(), CalendarBucket::Weekday);
        assert_eq!("season".parse::<CalendarBucket>().unwrap(), CalendarBucket::Season);
        let err = "fortnight".parse::<CalendarBucket>().unwrap_err();
        assert!(!err.is_invalid_input());

        assert_eq!(BucketKey::Month(3).to_string(), "March");
        assert_eq!(BucketKey::Weekday(Weekday::Fri).to_string(), "Friday");
        assert_eq!(BucketKey::Year(2021).to_string(), "2021");
    }
}

//! Date arguments and time-window resolution.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use spotifire_analytics::TimeWindow;
use spotifire_common::{PlayEvent, Result, SpotifireError};

/// Which end of a range a date argument names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Start of the named day.
    Start,
    /// End of the named day, i.e. midnight of the next one.
    End,
}

/// Parses an RFC 3339 instant or a `YYYY-MM-DD` day in `timezone`.
pub fn parse_instant(raw: &str, timezone: Tz, bound: Bound) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        SpotifireError::invalid_record(format!(
            "cannot parse '{raw}', expected YYYY-MM-DD or an RFC 3339 timestamp"
        ))
    })?;
    let day = match bound {
        Bound::Start => Some(date),
        Bound::End => date.succ_opt(),
    };

    day.and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| timezone.from_local_datetime(&midnight).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            SpotifireError::invalid_record(format!("no midnight for '{raw}' in {timezone}"))
        })
}

/// Builds the `(start, end]` window for a command.
///
/// A given start is inclusive. Missing bounds fall back to the span of
/// `events`.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    timezone: Tz,
    events: &[PlayEvent],
) -> Result<TimeWindow> {
    let start = start
        .map(|raw| parse_instant(raw, timezone, Bound::Start))
        .transpose()?;
    let end = end
        .map(|raw| parse_instant(raw, timezone, Bound::End))
        .transpose()?;

    let start = match start {
        Some(instant) => instant - Duration::nanoseconds(1),
        None => TimeWindow::covering(events)?.start(),
    };
    let end = match end {
        Some(instant) => instant,
        None => TimeWindow::covering(events)?.end(),
    };

    TimeWindow::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotifire_common::test_utils::mock_timestamp;
    use spotifire_common::test_utils::streaming_fixtures::monday_plays;

    #[test]
    fn test_plain_end_date_covers_whole_day() {
        let end = parse_instant("2024-01-01", Tz::UTC, Bound::End).unwrap();
        assert_eq!(end, mock_timestamp(2024, 1, 2, 0, 0, 0));
    }

    #[test]
    fn test_date_uses_timezone() {
        let start = parse_instant("2024-07-01", chrono_tz::Europe::Copenhagen, Bound::Start).unwrap();
        assert_eq!(start, mock_timestamp(2024, 6, 30, 22, 0, 0));
    }

    #[test]
    fn test_rfc3339_kept_exact() {
        let instant =
            parse_instant("2024-01-01T08:30:00+01:00", Tz::UTC, Bound::End).unwrap();
        assert_eq!(instant, mock_timestamp(2024, 1, 1, 7, 30, 0));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = parse_instant("next week", Tz::UTC, Bound::Start).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_window_defaults_to_history_span() {
        let events = monday_plays();
        let window = resolve_window(None, None, Tz::UTC, &events).unwrap();
        assert!(window.contains(mock_timestamp(2024, 1, 1, 8, 0, 0)));
        assert!(window.contains(mock_timestamp(2024, 1, 8, 8, 0, 0)));
    }

    #[test]
    fn test_window_start_day_is_inclusive() {
        let events = monday_plays();
        let window = resolve_window(Some("2024-01-08"), None, Tz::UTC, &events).unwrap();
        assert!(window.contains(mock_timestamp(2024, 1, 8, 0, 0, 0)));
        assert!(!window.contains(mock_timestamp(2024, 1, 1, 9, 0, 0)));
    }

    #[test]
    fn test_reversed_window_is_invalid_interval() {
        let err = resolve_window(Some("2024-02-01"), Some("2024-01-01"), Tz::UTC, &[]).unwrap_err();
        assert!(matches!(err, SpotifireError::InvalidInterval { .. }));
    }

    #[test]
    fn test_missing_bound_with_no_history_is_empty() {
        let err = resolve_window(Some("2024-01-01"), None, Tz::UTC, &[]).unwrap_err();
        assert!(err.is_empty_result());
    }
}

//! Shared formatting helpers.

use chrono::{DateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncates a string to at most `max_length` graphemes, ending with an ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    let graphemes: Vec<&str> = input.graphemes(true).collect();
    if graphemes.len() <= max_length {
        input.to_string()
    } else {
        let kept = max_length.saturating_sub(3);
        format!("{}...", graphemes[..kept].concat())
    }
}

/// Renders a millisecond total as hours, minutes and seconds.
pub fn format_duration_ms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds:02}s"),
        _ => format!("{hours}h {minutes:02}m"),
    }
}

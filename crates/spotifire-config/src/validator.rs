//! Runtime validation of loaded configuration.

use crate::loader::ConfigError;
use crate::schema::{Config, SeasonDefinition};
use std::collections::HashSet;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        validate_delimiter(config.genres.delimiter)?;

        let unknown = config.genres.unknown_tag.trim();
        if unknown.is_empty() {
            return Err(ConfigError::validation(
                "genres.unknown_tag",
                "must not be empty",
            ));
        }
        if unknown.contains(config.genres.delimiter) {
            return Err(ConfigError::validation(
                "genres.unknown_tag",
                "must not contain the genre delimiter",
            ));
        }

        for (field, value) in [
            ("genres.tooltip_artists", config.genres.tooltip_artists),
            ("genres.largest", config.genres.largest),
            ("genres.smallest", config.genres.smallest),
            ("ranking.top_songs", config.ranking.top_songs.get()),
            ("ranking.bucket_top_n", config.ranking.bucket_top_n.get()),
        ] {
            if value == 0 {
                return Err(ConfigError::validation(field, "must be greater than zero"));
            }
        }

        validate_seasons(&config.calendar.seasons)?;
        config.calendar.tz()?;

        if config.cache.max_capacity == 0 {
            return Err(ConfigError::validation(
                "cache.max_capacity",
                "must be greater than zero",
            ));
        }

        if config.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("logging.level", "must not be empty"));
        }

        Ok(())
    }
}

/// Validates a genre delimiter.
pub fn validate_delimiter(delimiter: char) -> Result<(), ConfigError> {
    if delimiter.is_alphanumeric() || delimiter.is_whitespace() {
        return Err(ConfigError::validation(
            "genres.delimiter",
            format!("'{delimiter}' cannot separate genre tags"),
        ));
    }
    Ok(())
}

/// Validates a season table: unique non-empty names, every month exactly once.
pub fn validate_seasons(seasons: &[SeasonDefinition]) -> Result<(), ConfigError> {
    const FIELD: &str = "calendar.seasons";

    let mut names = HashSet::new();
    let mut seen = [false; 12];

    for season in seasons {
        let name = season.name.trim();
        if name.is_empty() {
            return Err(ConfigError::validation(FIELD, "season name must not be empty"));
        }
        if !names.insert(name) {
            return Err(ConfigError::validation(
                FIELD,
                format!("season '{name}' is defined twice"),
            ));
        }

        for &month in &season.months {
            if !(1..=12).contains(&month) {
                return Err(ConfigError::validation(
                    FIELD,
                    format!("season '{name}' has invalid month {month}"),
                ));
            }
            let slot = &mut seen[(month - 1) as usize];
            if *slot {
                return Err(ConfigError::validation(
                    FIELD,
                    format!("month {month} appears in more than one season"),
                ));
            }
            *slot = true;
        }
    }

    let missing: Vec<String> = seen
        .iter()
        .enumerate()
        .filter(|(_, covered)| !**covered)
        .map(|(index, _)| (index + 1).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::validation(
            FIELD,
            format!("months not covered by any season: {}", missing.join(", ")),
        ));
    }

    Ok(())
}

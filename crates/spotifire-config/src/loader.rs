//! Configuration loading with environment variable overrides.

use crate::schema::Config;
use crate::validator::ConfigValidator;
use spotifire_common::{Result as SpotifireResult, SpotifireError, TopN};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "SPOTIFIRE_CONFIG_PATH";

/// File names probed, in order, when no explicit path is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["spotifire.yaml", "spotifire.yml", "spotifire.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Invalid value for '{field}': {message}")]
    ValidationError {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        #[source]
        /// Parse failure
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    /// Creates a validation error for a field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for SpotifireError {
    fn from(err: ConfigError) -> Self {
        SpotifireError::config(err.to_string())
    }
}

/// File format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`, and anything unrecognized
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Picks the format for a path.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |key| env::var(key).ok())
    }

    /// Load configuration from a file, resolving overrides through `lookup`
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, ConfigFormat::from_path(path))?;
        debug!("Parsed configuration from {}", path.display());

        Self::apply_overrides(&mut config, &lookup)?;
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Parse configuration text in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let config = match format {
            ConfigFormat::Yaml if content.trim().is_empty() => Config::default(),
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        Ok(config)
    }

    /// Load configuration from the environment, a discovered file, or defaults
    pub fn load() -> SpotifireResult<Config> {
        let dir = env::current_dir()?;
        Ok(Self::load_with(&dir, |key| env::var(key).ok())?)
    }

    /// Discovery against an explicit directory and variable lookup
    pub fn load_with<F>(dir: &Path, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = Self::discover(dir, &lookup) {
            info!("Loading configuration from {}", path.display());
            return Self::load_config_with(path, lookup);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_overrides(&mut config, &lookup)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SpotifireResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Finds the configuration file to load, if any
    pub fn discover<F>(dir: &Path, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            return Some(PathBuf::from(path));
        }

        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, &|key| env::var(key).ok())
    }

    fn apply_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SPOTIFIRE_PLAYLISTS_DIR") {
            config.data.playlists_dir = PathBuf::from(dir);
        }

        if let Some(history) = lookup("SPOTIFIRE_STREAMING_HISTORY") {
            config.data.streaming_history = PathBuf::from(history);
        }

        if let Some(timezone) = lookup("SPOTIFIRE_TIMEZONE") {
            config.calendar.timezone = timezone;
        }

        if let Some(top) = lookup("SPOTIFIRE_TOP_SONGS") {
            config.ranking.top_songs = TopN(parse_var("SPOTIFIRE_TOP_SONGS", &top)?);
        }

        if let Some(top) = lookup("SPOTIFIRE_BUCKET_TOP_N") {
            config.ranking.bucket_top_n = TopN(parse_var("SPOTIFIRE_BUCKET_TOP_N", &top)?);
        }

        if let Some(min) = lookup("SPOTIFIRE_MIN_MS_PLAYED") {
            config.streaming.min_ms_played = parse_var("SPOTIFIRE_MIN_MS_PLAYED", &min)?;
        }

        if let Some(level) = lookup("SPOTIFIRE_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::EnvParseError {
            var: var.to_string(),
            source: Box::new(e),
        })
}

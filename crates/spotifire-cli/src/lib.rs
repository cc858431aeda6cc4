//! # Spotifire CLI
//!
//! The `spotifire` binary: loads configuration, installs logging, and runs
//! one analytics command over the configured playlists and streaming history.
//!
//! Commands render either tables or JSON. A request that matches no data is
//! reported as an [`SpotifireError::EmptyResult`] so the binary can print a
//! friendly note and still exit successfully.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod dates;
pub mod output;

pub use app::App;
pub use cli::{Cli, Command, HistoryRange};
pub use output::OutputFormat;

use anyhow::Context;
use spotifire_common::{init_logging, SpotifireError};
use spotifire_config::ConfigLoader;
use tracing::info;

/// Loads configuration, installs logging and runs the parsed command.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("loading configuration")?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    init_logging(&config.logging)?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let app = App::new(config, format)?;

    info!("Running {:?}", cli.command);
    app.execute(&cli.command).await
}

/// Message of the "no matching data" error in `err`'s chain, if it has one.
pub fn empty_result_message(err: &anyhow::Error) -> Option<&str> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<SpotifireError>())
        .find_map(|cause| match cause {
            SpotifireError::EmptyResult { message } => Some(message.as_str()),
            _ => None,
        })
}

//! Spotifire - Main Entry Point

use clap::Parser;
use spotifire_cli::{empty_result_message, run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(message) = empty_result_message(&err) {
                println!("Nothing to show: {message}");
                return ExitCode::SUCCESS;
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

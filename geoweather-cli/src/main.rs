//! Binary crate for the `geoweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive exploration and configuration
//! - Human-friendly output formatting

use std::process::ExitCode;

use clap::Parser;
use geoweather_core::Config;

mod cli;
mod explore;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    logging::init_logging(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    cmd.run(config).await
}

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use geoweather_core::{
    Config, Coordinates, DeviceMode, LookupOutcome, MapSurface, NoopMap, Session,
    resolver_from_config,
};
use inquire::{Confirm, CustomType, Select};

use crate::{
    explore,
    render::{self, LinkMap, TerminalObserver},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Weather for any point on the map")]
pub struct Cli {
    /// Print the resolved location as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Weather at a map position, as if clicked.
    At {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Search a place by name and show its weather.
    Search {
        /// Place name, e.g. "Seoul" or "Paris, France".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Weather at the device's current position.
    Here,

    /// Interactive session with recent-location history.
    Explore,

    /// Configure device location and logging.
    Configure,
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<ExitCode> {
        let json = self.json;

        let outcome = match self.command {
            Command::Configure => {
                configure(config)?;
                return Ok(ExitCode::SUCCESS);
            }
            Command::Explore => {
                explore::run(&open_session(&config, false)?).await?;
                return Ok(ExitCode::SUCCESS);
            }
            Command::At { latitude, longitude } => {
                open_session(&config, json)?.click(latitude, longitude).await
            }
            Command::Search { query } => {
                open_session(&config, json)?.search(&query.join(" ")).await
            }
            Command::Here => open_session(&config, json)?.locate().await,
        };

        report(outcome, json)
    }
}

fn open_session(config: &Config, json: bool) -> anyhow::Result<Session> {
    let resolver = resolver_from_config(config)?;
    let map: Arc<dyn MapSurface> = if json {
        Arc::new(NoopMap)
    } else {
        Arc::new(LinkMap::default())
    };

    Ok(Session::new(resolver, Arc::new(TerminalObserver), map))
}

fn report(outcome: LookupOutcome, json: bool) -> anyhow::Result<ExitCode> {
    match outcome {
        LookupOutcome::Applied(location) => {
            if json {
                let out = serde_json::to_string_pretty(&location)
                    .context("Failed to serialize location")?;
                println!("{out}");
            } else {
                print!("{}", render::location(&location));
            }
            Ok(ExitCode::SUCCESS)
        }
        // The observer has already told the user what went wrong.
        LookupOutcome::Failed(_) => Ok(ExitCode::FAILURE),
        LookupOutcome::Superseded | LookupOutcome::Skipped => Ok(ExitCode::SUCCESS),
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let mode = Select::new("Where should \"here\" come from?", DeviceMode::all().to_vec())
        .prompt()
        .context("Configuration cancelled")?;

    match mode {
        DeviceMode::Fixed => {
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please type a number, e.g. 37.5665")
                .prompt()
                .context("Configuration cancelled")?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please type a number, e.g. 126.978")
                .prompt()
                .context("Configuration cancelled")?;

            let coords = Coordinates::new(latitude, longitude)?;
            config.set_fixed_position(coords);
        }
        other => config.device.mode = other,
    }

    config.device.allow = Confirm::new("Allow location lookups?")
        .with_default(config.device.allow)
        .prompt()
        .context("Configuration cancelled")?;

    let levels = vec!["error", "warn", "info", "debug", "trace"];
    let start = levels.iter().position(|l| *l == config.log_level).unwrap_or(1);
    config.log_level = Select::new("Log level:", levels)
        .with_starting_cursor(start)
        .prompt()
        .context("Configuration cancelled")?
        .to_string();

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

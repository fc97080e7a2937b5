use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{
    Config,
    address::Address,
    config::DeviceMode,
    error::LookupError,
    model::{Coordinates, WeatherReport},
    resolver::Resolver,
};

pub mod device;
pub mod nominatim;
pub mod openmeteo;

pub use device::{DisabledLocator, FixedLocator, IpLocator};
pub use nominatim::NominatimGeocoder;
pub use openmeteo::OpenMeteoSource;

/// Current conditions plus a short daily forecast for a point.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, coords: Coordinates) -> anyhow::Result<WeatherReport>;
}

/// Forward and reverse geocoding.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best match for a free-text place name, `None` when nothing matched.
    async fn search(&self, query: &str) -> anyhow::Result<Option<Coordinates>>;

    async fn reverse(&self, coords: Coordinates) -> anyhow::Result<Address>;
}

/// How a device position should be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached position that may be reused; zero means always fresh.
    pub maximum_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Platform location service.
#[async_trait]
pub trait DeviceLocator: Send + Sync + Debug {
    async fn locate(&self, options: &LocateOptions) -> Result<Coordinates, LookupError>;
}

/// Build a resolver wired to the endpoints and device settings in `config`.
pub fn resolver_from_config(config: &Config) -> anyhow::Result<Resolver> {
    let http = Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;

    let endpoints = &config.endpoints;
    let weather = Arc::new(OpenMeteoSource::new(endpoints.weather.as_str(), http.clone()));
    let geocoder = Arc::new(NominatimGeocoder::new(
        endpoints.search.as_str(),
        endpoints.reverse_geocode.as_str(),
        http.clone(),
    ));

    let locator: Arc<dyn DeviceLocator> = if !config.device.allow {
        Arc::new(DisabledLocator::Denied)
    } else {
        match config.device.mode {
            DeviceMode::Ip => Arc::new(IpLocator::new(endpoints.ip_location.as_str(), http)),
            DeviceMode::Fixed => Arc::new(FixedLocator::new(config.fixed_position()?)),
            DeviceMode::Off => Arc::new(DisabledLocator::Unsupported),
        }
    };

    Ok(Resolver::new(weather, geocoder, locator).with_locate_options(config.locate_options()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

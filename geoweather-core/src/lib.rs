//! Core library for the `geoweather` map tool.
//!
//! This crate defines:
//! - The normalized location/weather model and weather-code labels
//! - Remote sources (Open-Meteo weather, Nominatim geocoding, device location)
//! - The resolver that combines them into a [`ResolvedLocation`]
//! - Session state with recent history and last-request-wins updates
//! - Configuration handling
//!
//! It is used by `geoweather-cli`, but a map UI can drive a [`Session`] directly
//! through the [`MapSurface`] and [`LookupObserver`] traits.

pub mod address;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod session;

pub use address::Address;
pub use config::{Config, DeviceMode};
pub use error::LookupError;
pub use history::RecentHistory;
pub use model::{
    ConditionLabel, Coordinates, CurrentConditions, ForecastDay, ResolvedLocation, WeatherReport,
};
pub use provider::{DeviceLocator, Geocoder, LocateOptions, WeatherSource, resolver_from_config};
pub use resolver::Resolver;
pub use session::{LookupObserver, LookupOutcome, MapSurface, NoopMap, NoopObserver, Session};

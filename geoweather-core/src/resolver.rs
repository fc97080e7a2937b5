//! Turns coordinates, a place name or the device position into a
//! [`ResolvedLocation`].

use std::sync::Arc;

use crate::{
    address::Address,
    error::LookupError,
    model::{Coordinates, ResolvedLocation},
    provider::{DeviceLocator, Geocoder, LocateOptions, WeatherSource},
};

#[derive(Debug, Clone)]
pub struct Resolver {
    weather: Arc<dyn WeatherSource>,
    geocoder: Arc<dyn Geocoder>,
    locator: Arc<dyn DeviceLocator>,
    locate_options: LocateOptions,
}

impl Resolver {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        geocoder: Arc<dyn Geocoder>,
        locator: Arc<dyn DeviceLocator>,
    ) -> Self {
        Self {
            weather,
            geocoder,
            locator,
            locate_options: LocateOptions::default(),
        }
    }

    #[must_use]
    pub fn with_locate_options(mut self, options: LocateOptions) -> Self {
        self.locate_options = options;
        self
    }

    pub fn locate_options(&self) -> &LocateOptions {
        &self.locate_options
    }

    /// Weather and reverse geocode are fetched concurrently. Only the weather
    /// call is required; a failed reverse geocode falls back to an unknown place.
    pub async fn resolve_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<ResolvedLocation, LookupError> {
        let (weather, address) =
            tokio::join!(self.weather.fetch(coords), self.geocoder.reverse(coords));

        let report = weather.map_err(|e| {
            tracing::warn!(%coords, "weather lookup failed: {e:#}");
            LookupError::WeatherUnavailable(format!("{e:#}"))
        })?;

        let address = address.unwrap_or_else(|e| {
            tracing::warn!(%coords, "reverse geocode failed, using placeholder name: {e:#}");
            Address::default()
        });

        let location = ResolvedLocation {
            display_name: address.display_name(),
            country_name: address.country_name(),
            coordinates: coords,
            current: report.current,
            forecast: report.forecast,
        };

        tracing::info!(
            name = %location.display_name,
            %coords,
            temperature_c = location.current.temperature_c,
            "location resolved"
        );
        Ok(location)
    }

    /// Coordinates of the best match for `query`. Blank queries never reach the network.
    pub async fn resolve_by_name(&self, query: &str) -> Result<Coordinates, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        match self.geocoder.search(query).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => Err(LookupError::NotFound(query.to_string())),
            Err(e) => {
                tracing::warn!(query, "place search failed: {e:#}");
                Err(LookupError::GeocodeUnavailable(format!("{e:#}")))
            }
        }
    }

    pub async fn resolve_by_device(&self) -> Result<Coordinates, LookupError> {
        let options = self.locate_options;
        match tokio::time::timeout(options.timeout, self.locator.locate(&options)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?options.timeout, "device location timed out");
                Err(LookupError::Timeout)
            }
        }
    }
}

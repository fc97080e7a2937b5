//! Device position backends.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{error::LookupError, model::Coordinates};

use super::{DeviceLocator, LocateOptions};

pub const DEFAULT_IP_LOCATION_URL: &str = "https://ipapi.co/json/";

/// Approximate position from the public IP address.
///
/// There is no finer fix available this way, so `high_accuracy` is best effort,
/// and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

impl IpLocator {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

#[async_trait]
impl DeviceLocator for IpLocator {
    async fn locate(&self, options: &LocateOptions) -> Result<Coordinates, LookupError> {
        tracing::debug!(url = %self.url, high_accuracy = options.high_accuracy, "locating via IP");

        let res = self
            .http
            .get(&self.url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        match res.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LookupError::PermissionDenied);
            }
            s => {
                tracing::warn!(status = %s, "IP location service refused the request");
                return Err(LookupError::PositionUnavailable);
            }
        }

        let body: IpApiResponse = res.json().await.map_err(|e| transport_error(&e))?;

        let (Some(lat), Some(lon)) = (body.latitude, body.longitude) else {
            tracing::warn!("IP location response had no coordinates");
            return Err(LookupError::PositionUnavailable);
        };

        let coords = Coordinates::new(lat, lon).map_err(|_| LookupError::PositionUnavailable)?;
        tracing::info!(%coords, city = body.city.as_deref().unwrap_or(""), "device located");
        Ok(coords)
    }
}

fn transport_error(err: &reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        tracing::warn!("IP location request failed: {err}");
        LookupError::PositionUnavailable
    }
}

/// A position pinned in configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    coords: Coordinates,
}

impl FixedLocator {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinates, LookupError> {
        Ok(self.coords)
    }
}

/// No location capability, or the user withheld permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledLocator {
    Unsupported,
    Denied,
}

#[async_trait]
impl DeviceLocator for DisabledLocator {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinates, LookupError> {
        match self {
            Self::Unsupported => Err(LookupError::Unsupported),
            Self::Denied => Err(LookupError::PermissionDenied),
        }
    }
}

//! Forward and reverse geocoding through Nominatim (OpenStreetMap).
//! Free, no API key, but every request must carry an identifying User-Agent.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{address::Address, model::Coordinates};

use super::{Geocoder, truncate_body};

pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    search_url: String,
    reverse_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(
        search_url: impl Into<String>,
        reverse_url: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            search_url: search_url.into(),
            reverse_url: reverse_url.into(),
            http,
        }
    }

    async fn get_body(&self, url: &str, query: &[(&str, &str)], what: &str) -> Result<String> {
        tracing::debug!(url, what, "requesting geocode");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request to Nominatim"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Nominatim {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Nominatim {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct NmSearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmReverseResponse {
    address: Option<Address>,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinates>> {
        let body = self
            .get_body(
                &self.search_url,
                &[("q", query), ("format", "json"), ("limit", "1")],
                "search",
            )
            .await?;

        let hits: Vec<NmSearchHit> =
            serde_json::from_str(&body).context("Failed to parse Nominatim search JSON")?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let lat: f64 = hit
            .lat
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude '{}' in search result", hit.lat))?;
        let lon: f64 = hit
            .lon
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude '{}' in search result", hit.lon))?;

        let coords = Coordinates::new(lat, lon).context("Search result outside valid range")?;

        tracing::debug!(
            query,
            %coords,
            name = hit.display_name.as_deref().unwrap_or(""),
            "search matched"
        );
        Ok(Some(coords))
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Address> {
        let lat = coords.latitude().to_string();
        let lon = coords.longitude().to_string();

        let body = self
            .get_body(
                &self.reverse_url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("format", "json"),
                    ("addressdetails", "1"),
                ],
                "reverse",
            )
            .await?;

        let parsed: NmReverseResponse =
            serde_json::from_str(&body).context("Failed to parse Nominatim reverse JSON")?;

        // Unresolvable points come back as `{"error": "Unable to geocode"}` with 200.
        Ok(parsed.address.unwrap_or_default())
    }
}

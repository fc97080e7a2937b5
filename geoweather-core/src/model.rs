use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Visibility is not reported by the weather source; this fixed value is shown instead.
pub const PLACEHOLDER_VISIBILITY_KM: i32 = 10;

/// UV index is not reported by the weather source; this fixed value is shown instead.
pub const PLACEHOLDER_UV_INDEX: u8 = 3;

/// A validated point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = LookupError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Build coordinates, rejecting values outside [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LookupError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LookupError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Sky/precipitation label derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionLabel {
    #[serde(rename = "clear")]
    Clear,
    #[serde(rename = "partly cloudy")]
    PartlyCloudy,
    #[serde(rename = "fog")]
    Fog,
    #[serde(rename = "rain")]
    Rain,
    #[serde(rename = "snow")]
    Snow,
    #[serde(rename = "showers")]
    Showers,
    #[serde(rename = "thunderstorm")]
    Thunderstorm,
}

impl ConditionLabel {
    /// Map a WMO code through the ordered bands; the first band whose upper
    /// bound is >= `code` wins.
    pub fn from_weather_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            c if c <= 3 => Self::PartlyCloudy,
            c if c <= 48 => Self::Fog,
            c if c <= 67 => Self::Rain,
            c if c <= 77 => Self::Snow,
            c if c <= 82 => Self::Showers,
            c if c <= 86 => Self::Snow,
            _ => Self::Thunderstorm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly cloudy",
            Self::Fog => "fog",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Showers => "showers",
            Self::Thunderstorm => "thunderstorm",
        }
    }
}

impl std::fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub condition: ConditionLabel,
    pub humidity_pct: i32,
    pub wind_speed_kmh: i32,
    pub visibility_km: i32,
    pub pressure_hpa: i32,
    pub uv_index: u8,
    /// Local time of day, `HH:MM`.
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_c: i32,
    pub min_temp_c: i32,
    pub condition: ConditionLabel,
}

/// Normalized weather for one point, as produced by a [`crate::WeatherSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    /// Chronological, index 0 is today.
    pub forecast: Vec<ForecastDay>,
}

/// Everything shown for one selected place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub display_name: String,
    pub country_name: String,
    pub coordinates: Coordinates,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

/// Round to the nearest whole unit, halves away from zero.
pub(crate) fn round_whole(value: f64) -> i32 {
    value.round() as i32
}

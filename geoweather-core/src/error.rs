//! Lookup failure taxonomy.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Weather data unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Geocoding service unavailable: {0}")]
    GeocodeUnavailable(String),

    #[error("No place found for '{0}'")]
    NotFound(String),

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Device position unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location service not supported")]
    Unsupported,

    #[error("Empty search query")]
    EmptyQuery,
}

impl LookupError {
    /// User-facing message for the notification surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::WeatherUnavailable(_) => {
                "Could not load weather for this place. Please try again.".to_string()
            }
            Self::GeocodeUnavailable(_) => {
                "Place search is unavailable right now. Please try again.".to_string()
            }
            Self::NotFound(query) => format!("No place found for \"{query}\"."),
            Self::InvalidCoordinates { latitude, longitude } => {
                format!("{latitude}, {longitude} is not a valid map position.")
            }
            Self::PermissionDenied => "Location access was denied.".to_string(),
            Self::PositionUnavailable => "Your position could not be determined.".to_string(),
            Self::Timeout => "Finding your location took too long.".to_string(),
            Self::Unsupported => "Location is not supported on this device.".to_string(),
            Self::EmptyQuery => "Enter a place name to search.".to_string(),
        }
    }

    /// Errors that must not be shown to the user at all.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{
    ConditionLabel, Coordinates, CurrentConditions, ForecastDay, PLACEHOLDER_UV_INDEX,
    PLACEHOLDER_VISIBILITY_KM, WeatherReport, round_whole,
};

use super::{WeatherSource, truncate_body};

pub const DEFAULT_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub const FORECAST_DAYS: usize = 5;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,surface_pressure";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    url: String,
    http: Client,
}

impl OpenMeteoSource {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: i32,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    surface_pressure: f64,
}

/// Open-Meteo reports gaps in its daily series as `null`.
#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
    daily: OmDaily,
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    async fn fetch(&self, coords: Coordinates) -> Result<WeatherReport> {
        let days = FORECAST_DAYS.to_string();
        tracing::debug!(url = %self.url, %coords, "requesting weather");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", coords.latitude().to_string()),
                ("longitude", coords.longitude().to_string()),
            ])
            .query(&[
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", days.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo JSON")?;

        normalize(parsed)
    }
}

fn normalize(parsed: OmResponse) -> Result<WeatherReport> {
    let OmResponse { current, daily } = parsed;

    let current = CurrentConditions {
        temperature_c: round_whole(current.temperature_2m),
        feels_like_c: round_whole(current.apparent_temperature),
        condition: ConditionLabel::from_weather_code(current.weather_code),
        humidity_pct: current.relative_humidity_2m,
        wind_speed_kmh: round_whole(current.wind_speed_10m),
        visibility_km: PLACEHOLDER_VISIBILITY_KM,
        pressure_hpa: round_whole(current.surface_pressure),
        uv_index: PLACEHOLDER_UV_INDEX,
        sunrise: daily.sunrise.first().and_then(|s| time_of_day(s.as_deref()?)),
        sunset: daily.sunset.first().and_then(|s| time_of_day(s.as_deref()?)),
    };

    // The forecast ends at the first day missing any value.
    let mut forecast = Vec::with_capacity(FORECAST_DAYS);
    for i in 0..daily.time.len().min(FORECAST_DAYS) {
        let (Some(Some(code)), Some(Some(max)), Some(Some(min))) = (
            daily.weather_code.get(i),
            daily.temperature_2m_max.get(i),
            daily.temperature_2m_min.get(i),
        ) else {
            tracing::debug!(day = i, "daily series incomplete, forecast cut short");
            break;
        };

        let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d")
            .with_context(|| format!("Invalid forecast date '{}'", daily.time[i]))?;

        forecast.push(ForecastDay {
            date,
            max_temp_c: round_whole(*max),
            min_temp_c: round_whole(*min),
            condition: ConditionLabel::from_weather_code(*code),
        });
    }

    Ok(WeatherReport { current, forecast })
}

/// `2024-05-01T05:31` → `05:31`.
fn time_of_day(timestamp: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|dt| dt.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(days: usize) -> OmResponse {
        let dates: Vec<String> = (1..=days).map(|d| format!("2024-05-{d:02}")).collect();
        OmResponse {
            current: OmCurrent {
                temperature_2m: 18.4,
                relative_humidity_2m: 62,
                apparent_temperature: 17.6,
                weather_code: 1,
                wind_speed_10m: 7.5,
                surface_pressure: 1008.7,
            },
            daily: OmDaily {
                sunrise: dates.iter().map(|d| Some(format!("{d}T05:31"))).collect(),
                sunset: dates.iter().map(|d| Some(format!("{d}T19:22"))).collect(),
                weather_code: vec![Some(61); days],
                temperature_2m_max: vec![Some(21.5); days],
                temperature_2m_min: vec![Some(12.4); days],
                time: dates,
            },
        }
    }

    #[test]
    fn normalizes_current_conditions() {
        let report = normalize(sample(5)).unwrap();
        let current = report.current;

        assert_eq!(current.temperature_c, 18);
        assert_eq!(current.feels_like_c, 18);
        assert_eq!(current.condition, ConditionLabel::PartlyCloudy);
        assert_eq!(current.humidity_pct, 62);
        assert_eq!(current.wind_speed_kmh, 8);
        assert_eq!(current.pressure_hpa, 1009);
        assert_eq!(current.visibility_km, PLACEHOLDER_VISIBILITY_KM);
        assert_eq!(current.uv_index, PLACEHOLDER_UV_INDEX);
        assert_eq!(current.sunrise.as_deref(), Some("05:31"));
        assert_eq!(current.sunset.as_deref(), Some("19:22"));
    }

    #[test]
    fn forecast_is_capped_and_chronological() {
        let report = normalize(sample(7)).unwrap();

        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert!(report.forecast.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(report.forecast[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(report.forecast[0].max_temp_c, 22);
        assert_eq!(report.forecast[0].min_temp_c, 12);
        assert_eq!(report.forecast[0].condition, ConditionLabel::Rain);
    }

    #[test]
    fn forecast_uses_shortest_daily_array() {
        let mut parsed = sample(5);
        parsed.daily.temperature_2m_min.truncate(3);

        let report = normalize(parsed).unwrap();
        assert_eq!(report.forecast.len(), 3);
    }

    #[test]
    fn missing_sun_times_are_none() {
        let mut parsed = sample(2);
        parsed.daily.sunrise.clear();
        parsed.daily.sunset = vec![Some("garbage".into())];

        let report = normalize(parsed).unwrap();
        assert_eq!(report.current.sunrise, None);
        assert_eq!(report.current.sunset, None);
    }

    #[test]
    fn null_daily_value_ends_the_forecast() {
        let body = r#"{
            "current": {
                "temperature_2m": 18.4,
                "relative_humidity_2m": 62,
                "apparent_temperature": 17.6,
                "weather_code": 1,
                "wind_speed_10m": 7.5,
                "surface_pressure": 1008.7
            },
            "daily": {
                "time": ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04"],
                "weather_code": [61, 3, null, 0],
                "temperature_2m_max": [21.5, 20.1, 19.0, 23.2],
                "temperature_2m_min": [12.4, 11.0, 10.2, 13.9],
                "sunrise": [null, "2024-05-02T05:30", null, null],
                "sunset": ["2024-05-01T19:22", null, null, null]
            }
        }"#;
        let parsed: OmResponse = serde_json::from_str(body).unwrap();

        let report = normalize(parsed).unwrap();

        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[1].condition, ConditionLabel::PartlyCloudy);
        assert_eq!(report.current.sunrise, None);
        assert_eq!(report.current.sunset.as_deref(), Some("19:22"));
    }

    #[test]
    fn bad_forecast_date_is_an_error() {
        let mut parsed = sample(2);
        parsed.daily.time[1] = "tomorrow".into();

        let err = normalize(parsed).unwrap_err();
        assert!(err.to_string().contains("Invalid forecast date"));
    }
}

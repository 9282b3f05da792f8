//! Open-Meteo 天气源：先地理编码城市名，再查当前天气（无需 API key）

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{WeatherReport, WeatherSource};
use crate::config::SourcesSection;
use crate::core::SourceError;

pub struct OpenMeteoSource {
    client: Client,
    geocoding_api: String,
    forecast_api: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: u32,
    wind_speed_10m: f64,
}

/// WMO 天气代码转文字描述
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        56 | 57 => "freezing drizzle",
        61 | 63 | 65 => "rain",
        66 | 67 => "freezing rain",
        71 | 73 | 75 | 77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95 => "thunderstorm",
        96 | 99 => "thunderstorm with hail",
        _ => "unknown conditions",
    }
}

impl OpenMeteoSource {
    pub fn new(cfg: &SourcesSection) -> Self {
        Self {
            client: super::http_client(cfg),
            geocoding_api: cfg.geocoding_api.clone(),
            forecast_api: cfg.forecast_api.clone(),
        }
    }

    async fn geocode(&self, city: &str) -> Result<Option<Place>, SourceError> {
        let resp: GeocodingResponse = self
            .client
            .get(&self.geocoding_api)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.results.into_iter().next())
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    async fn lookup(&self, city: &str) -> Result<Option<WeatherReport>, SourceError> {
        let Some(place) = self.geocode(city).await? else {
            debug!(city = %city, "city not found");
            return Ok(None);
        };

        let lat = place.latitude.to_string();
        let lon = place.longitude.to_string();
        let resp: ForecastResponse = self
            .client
            .get(&self.forecast_api)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m",
                ),
                ("wind_speed_unit", "kmh"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let place_name = match place.country {
            Some(country) => format!("{}, {}", place.name, country),
            None => place.name,
        };
        Ok(Some(WeatherReport {
            place: place_name,
            condition: describe_weather_code(resp.current.weather_code).to_string(),
            temp_c: resp.current.temperature_2m,
            humidity: resp.current.relative_humidity_2m,
            wind_kph: resp.current.wind_speed_10m,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_weather_code() {
        assert_eq!(describe_weather_code(0), "clear sky");
        assert_eq!(describe_weather_code(81), "rain showers");
        assert_eq!(describe_weather_code(1234), "unknown conditions");
    }

    #[test]
    fn test_forecast_payload_parses() {
        let json = r#"{"current":{"time":"2024-01-01T00:00","temperature_2m":12.5,
            "relative_humidity_2m":80,"weather_code":3,"wind_speed_10m":9.4}}"#;
        let resp: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.current.weather_code, 3);
        assert!((resp.current.temperature_2m - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_geocoding_without_results() {
        let resp: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(resp.results.is_empty());
    }
}

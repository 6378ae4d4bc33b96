use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    conditions::{UNKNOWN, normalize},
    model::{Coordinates, ForecastSlot, WeatherReading},
    provider::{ProviderId, filter_by_date, truncate_body},
};

use super::WeatherProvider;

const BASE_URL: &str = "https://api.open-meteo.com";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m,wind_direction_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";
const FORECAST_DAYS: &str = "7";

/// Open-Meteo, keyless. Weather codes go through [`normalize`].
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::new_with_base_url(BASE_URL)
    }

    pub fn new_with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        coords: Coordinates,
        extra: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}/v1/forecast", self.base_url);
        let lat = coords.lat.to_string();
        let lon = coords.lng.to_string();

        debug!(%url, lat = %lat, lon = %lon, what, "requesting Open-Meteo");

        let res = self
            .http
            .get(&url)
            .query(&[("latitude", lat.as_str()), ("longitude", lon.as_str()), ("timezone", "auto")])
            .query(extra)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            warn!(%status, what, "Open-Meteo request failed");
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    precipitation: Option<f64>,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

fn at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

fn round_c(value: f64) -> i32 {
    value.round() as i32
}

impl OmCurrent {
    fn into_reading(self) -> WeatherReading {
        let conditions = normalize(self.weather_code);

        WeatherReading {
            temperature: round_c(self.temperature_2m),
            description: conditions.description.to_string(),
            icon: conditions.icon.to_string(),
            humidity: self.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            wind_speed: self.wind_speed_10m.max(0.0),
            feels_like: round_c(self.apparent_temperature),
            precipitation: Some(self.precipitation.unwrap_or(0.0)),
            visibility: None,
            uv_index: None,
            wind_direction: self.wind_direction_10m,
        }
    }
}

impl OmDaily {
    fn into_slots(self) -> Vec<ForecastSlot> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let max = at(&self.temperature_2m_max, i);
                let min = at(&self.temperature_2m_min, i);
                let mean = match (max, min) {
                    (Some(max), Some(min)) => (max + min) / 2.0,
                    (Some(t), None) | (None, Some(t)) => t,
                    (None, None) => 0.0,
                };
                let conditions = at(&self.weather_code, i).map_or(UNKNOWN, normalize);

                ForecastSlot {
                    datetime: date.clone(),
                    temperature: round_c(mean),
                    temp_min: min.map(round_c),
                    temp_max: max.map(round_c),
                    description: conditions.description.to_string(),
                    icon: conditions.icon.to_string(),
                    humidity: None,
                    wind_speed: at(&self.wind_speed_10m_max, i).unwrap_or(0.0),
                    precipitation: at(&self.precipitation_sum, i).unwrap_or(0.0),
                }
            })
            .collect()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn current(&self, coords: Coordinates) -> Result<WeatherReading> {
        let parsed: OmCurrentResponse =
            self.get(coords, &[("current", CURRENT_FIELDS)], "current").await?;

        Ok(parsed.current.into_reading())
    }

    async fn forecast(
        &self,
        coords: Coordinates,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ForecastSlot>> {
        let parsed: OmForecastResponse = self
            .get(
                coords,
                &[("daily", DAILY_FIELDS), ("forecast_days", FORECAST_DAYS)],
                "forecast",
            )
            .await?;

        Ok(filter_by_date(parsed.daily.into_slots(), date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn berlin() -> Coordinates {
        Coordinates::new(52.52, 13.41).unwrap()
    }

    fn daily_body() -> serde_json::Value {
        json!({
            "daily": {
                "time": ["2026-10-19", "2026-10-20", "2026-10-21"],
                "weather_code": [0, 63, 1234],
                "temperature_2m_max": [24.6, 12.0, 9.0],
                "temperature_2m_min": [17.0, 7.4, null],
                "precipitation_sum": [0.0, 3.7, null],
                "wind_speed_10m_max": [10.1, 22.3, 5.0]
            }
        })
    }

    #[tokio::test]
    async fn current_normalizes_code_and_rounds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "52.52"))
            .and(query_param("current", CURRENT_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {
                    "temperature_2m": 21.6,
                    "relative_humidity_2m": 64,
                    "apparent_temperature": 20.4,
                    "precipitation": null,
                    "weather_code": 61,
                    "wind_speed_10m": 11.2,
                    "wind_direction_10m": 250
                }
            })))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::new_with_base_url(&server.uri());
        let reading = provider.current(berlin()).await.unwrap();

        assert_eq!(reading.temperature, 22);
        assert_eq!(reading.feels_like, 20);
        assert_eq!(reading.description, "Slight rain");
        assert_eq!(reading.icon, "10d");
        assert_eq!(reading.humidity, 64);
        assert_eq!(reading.precipitation, Some(0.0));
        assert_eq!(reading.wind_direction, Some(250.0));
    }

    #[tokio::test]
    async fn forecast_builds_daily_slots() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("forecast_days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::new_with_base_url(&server.uri());
        let slots = provider.forecast(berlin(), None).await.unwrap();

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].datetime, "2026-10-19");
        assert_eq!(slots[0].temperature, 21);
        assert_eq!(slots[0].temp_max, Some(25));
        assert_eq!(slots[1].description, "Moderate rain");
        assert_eq!(slots[1].precipitation, 3.7);
        assert_eq!(slots[2].description, "Unknown");
        assert_eq!(slots[2].temperature, 9);
        assert_eq!(slots[2].precipitation, 0.0);
    }

    #[tokio::test]
    async fn forecast_applies_date_filter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::new_with_base_url(&server.uri());
        let slots = provider
            .forecast(berlin(), NaiveDate::from_ymd_opt(2026, 10, 20))
            .await
            .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].datetime, "2026-10-20");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": true, "reason": "bad"})),
            )
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::new_with_base_url(&server.uri());
        let err = provider.current(berlin()).await.unwrap_err().to_string();

        assert!(err.contains("400"), "unexpected error: {err}");
        assert!(err.contains("Open-Meteo current"));
    }
}

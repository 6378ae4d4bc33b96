use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    conditions::UNKNOWN,
    model::{Coordinates, ForecastSlot, WeatherReading},
    provider::{ProviderId, filter_by_date, truncate_body},
};

use super::WeatherProvider;

const BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, coords: Coordinates, what: &str) -> Result<T> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);
        let lat = coords.lat.to_string();
        let lon = coords.lng.to_string();

        debug!(%url, lat = %lat, lon = %lon, what, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            warn!(%status, what, "OpenWeather request failed");
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn description_and_icon(weather: &[OwWeather]) -> (String, String) {
    weather.first().map_or_else(
        || (UNKNOWN.description.to_string(), UNKNOWN.icon.to_string()),
        |w| (w.description.clone(), w.icon.clone()),
    )
}

impl OwCurrentResponse {
    fn into_reading(self) -> WeatherReading {
        let (description, icon) = description_and_icon(&self.weather);

        WeatherReading {
            temperature: self.main.temp.round() as i32,
            description,
            icon,
            humidity: self.main.humidity.min(100),
            wind_speed: self.wind.speed.max(0.0),
            feels_like: self.main.feels_like.round() as i32,
            precipitation: self.rain.and_then(|r| r.one_hour),
            visibility: self.visibility,
            uv_index: None,
            wind_direction: self.wind.deg,
        }
    }
}

impl OwForecastEntry {
    fn into_slot(self) -> ForecastSlot {
        let (description, icon) = description_and_icon(&self.weather);

        ForecastSlot {
            datetime: self.dt_txt,
            temperature: self.main.temp.round() as i32,
            temp_min: None,
            temp_max: None,
            description,
            icon,
            humidity: Some(self.main.humidity.min(100)),
            wind_speed: self.wind.speed.max(0.0),
            precipitation: self.rain.unwrap_or_default().three_hours.unwrap_or(0.0),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn current(&self, coords: Coordinates) -> Result<WeatherReading> {
        let parsed: OwCurrentResponse = self.get("weather", coords, "current").await?;
        Ok(parsed.into_reading())
    }

    async fn forecast(
        &self,
        coords: Coordinates,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ForecastSlot>> {
        let parsed: OwForecastResponse = self.get("forecast", coords, "forecast").await?;
        let slots = parsed.list.into_iter().map(OwForecastEntry::into_slot).collect();

        Ok(filter_by_date(slots, date))
    }
}

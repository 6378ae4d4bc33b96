use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid caller input, rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude must be a finite number in [-90, 90], got {0}")]
    Latitude(f64),

    #[error("longitude must be a finite number in [-180, 180], got {0}")]
    Longitude(f64),

    #[error("invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    Date(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

/// One autocomplete hit from the place search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePrediction {
    pub place_id: String,
    pub description: String,
    pub structured_formatting: StructuredFormatting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub name: String,
    pub formatted_address: String,
    pub geometry: Geometry,
}

impl PlaceDetails {
    /// Validated coordinates of the place.
    pub fn coordinates(&self) -> Result<Coordinates, ValidationError> {
        let loc = self.geometry.location;
        Coordinates::new(loc.lat, loc.lng)
    }
}

/// Canonical point-in-time weather observation.
///
/// Temperatures are whole degrees Celsius. Optional fields are only filled
/// by providers that report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub temperature: i32,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub feels_like: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<f64>,
}

impl WeatherReading {
    pub fn is_rainy(&self) -> bool {
        mentions_rain(&self.description)
    }
}

/// One forecast interval. `datetime` is the provider's timestamp text,
/// whose leading `YYYY-MM-DD` is the slot's calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSlot {
    pub datetime: String,
    pub temperature: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<i32>,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u8>,
    pub wind_speed: f64,
    pub precipitation: f64,
}

impl ForecastSlot {
    /// Calendar-date component of `datetime`.
    pub fn date(&self) -> &str {
        self.datetime
            .split(['T', ' '])
            .next()
            .unwrap_or(&self.datetime)
    }

    pub fn is_rainy(&self) -> bool {
        mentions_rain(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub weather_score: u8,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotLabel {
    Morning,
    Afternoon,
    Evening,
}

impl SlotLabel {
    pub const ALL: [SlotLabel; 3] = [SlotLabel::Morning, SlotLabel::Afternoon, SlotLabel::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotLabel::Morning => "Morning",
            SlotLabel::Afternoon => "Afternoon",
            SlotLabel::Evening => "Evening",
        }
    }
}

impl std::fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Suggestion derived for one forecast slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSuggestion {
    pub label: SlotLabel,
    pub datetime: String,
    pub weather: String,
    pub icon: String,
    pub rain_chance: String,
    pub activities: Vec<String>,
    pub recommendation: String,
}

/// Everything needed to present one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub location_name: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub weather: WeatherReading,
    pub forecast: Vec<ForecastSlot>,
    pub suggestions: Vec<Suggestion>,
    pub slots: Vec<SlotSuggestion>,
}

/// Parse a forecast date filter. Accepts `YYYY-MM-DD` or an RFC 3339
/// timestamp, in which case the UTC calendar date is used.
pub fn parse_date_filter(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::Date(input.to_string()))
}

pub(crate) fn mentions_rain(description: &str) -> bool {
    description.to_lowercase().contains("rain")
}

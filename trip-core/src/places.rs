use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    model::{PlaceDetails, PlacePrediction},
    provider::truncate_body,
};

const BASE_URL: &str = "https://maps.googleapis.com";
const DETAILS_FIELDS: &str = "geometry,name,formatted_address";

/// Google Places client for city autocomplete and coordinate lookup.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    predictions: Vec<PlacePrediction>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    error_message: Option<String>,
    result: Option<PlaceDetails>,
}

impl PlacesClient {
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

    /// City predictions for a free-text query.
    pub async fn autocomplete(&self, input: &str) -> Result<Vec<PlacePrediction>> {
        let input = input.trim();
        if input.is_empty() {
            bail!("Place search input is required");
        }

        let parsed: AutocompleteResponse = self
            .get(
                "autocomplete",
                &[("input", input), ("types", "(cities)")],
            )
            .await?;

        check_status(&parsed.status, parsed.error_message.as_deref(), "autocomplete")?;
        debug!(count = parsed.predictions.len(), "received place predictions");

        Ok(parsed.predictions)
    }

    /// Name, address and coordinates for a place id.
    pub async fn details(&self, place_id: &str) -> Result<PlaceDetails> {
        let place_id = place_id.trim();
        if place_id.is_empty() {
            bail!("Place ID is required");
        }

        let parsed: DetailsResponse = self
            .get(
                "details",
                &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
            )
            .await?;

        check_status(&parsed.status, parsed.error_message.as_deref(), "details")?;

        let mut details = parsed
            .result
            .ok_or_else(|| anyhow!("Google Places returned no details for place '{place_id}'"))?;

        details.coordinates().context("Google Places returned invalid coordinates")?;
        details.place_id.get_or_insert_with(|| place_id.to_string());

        Ok(details)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/maps/api/place/{}/json", self.base_url, endpoint);

        debug!(%url, endpoint, "requesting Google Places");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Google Places ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Google Places {endpoint} response body"))?;

        if !status.is_success() {
            warn!(%status, endpoint, "Google Places request failed");
            return Err(anyhow!(
                "Google Places {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Google Places {endpoint} JSON"))
    }
}

/// Google reports most failures as HTTP 200 with a non-OK `status`.
fn check_status(status: &str, message: Option<&str>, endpoint: &str) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => {
            warn!(status = other, endpoint, "Google Places returned an error status");
            Err(anyhow!(
                "Google Places {} failed with status {}: {}",
                endpoint,
                other,
                message.unwrap_or("no error message"),
            ))
        }
    }
}

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use tracing::info;

use crate::{
    model::{Coordinates, PlaceDetails, PlacePrediction, TripPlan},
    places::PlacesClient,
    provider::WeatherProvider,
    suggest::evaluate,
    window::window_suggestions,
};

/// Runs the place → weather → forecast → suggestions flow for one destination.
///
/// Requests are issued one after another; the first failure aborts the plan.
#[derive(Debug)]
pub struct TripPlanner {
    places: Option<PlacesClient>,
    weather: Box<dyn WeatherProvider>,
}

impl TripPlanner {
    pub fn new(places: Option<PlacesClient>, weather: Box<dyn WeatherProvider>) -> Self {
        Self { places, weather }
    }

    fn places(&self) -> Result<&PlacesClient> {
        self.places.as_ref().ok_or_else(|| {
            anyhow!(
                "No Google Places API key configured.\n\
                 Hint: run `trip configure places` or set GOOGLE_MAPS_API_KEY."
            )
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PlacePrediction>> {
        self.places()?.autocomplete(query).await
    }

    pub async fn plan_for_place(&self, place_id: &str, date: Option<NaiveDate>) -> Result<TripPlan> {
        let place = self.places()?.details(place_id).await?;
        let coords = place.coordinates()?;
        let name = place.name.clone();

        self.build(name, coords, Some(place), date).await
    }

    pub async fn plan_for_coordinates(
        &self,
        name: &str,
        coords: Coordinates,
        date: Option<NaiveDate>,
    ) -> Result<TripPlan> {
        self.build(name.to_string(), coords, None, date).await
    }

    async fn build(
        &self,
        location_name: String,
        coordinates: Coordinates,
        place: Option<PlaceDetails>,
        date: Option<NaiveDate>,
    ) -> Result<TripPlan> {
        info!(
            location = %location_name,
            coords = %coordinates,
            provider = %self.weather.id(),
            "planning trip"
        );

        let weather = self
            .weather
            .current(coordinates)
            .await
            .with_context(|| format!("Failed to fetch current weather for {location_name}"))?;

        let forecast = self
            .weather
            .forecast(coordinates, date)
            .await
            .with_context(|| format!("Failed to fetch forecast for {location_name}"))?;

        let suggestions = evaluate(&weather, &location_name);
        let slots = window_suggestions(&forecast);

        info!(
            suggestions = suggestions.len(),
            forecast_slots = forecast.len(),
            "trip plan ready"
        );

        Ok(TripPlan {
            location_name,
            coordinates,
            place,
            date,
            weather,
            forecast,
            suggestions,
            slots,
        })
    }
}

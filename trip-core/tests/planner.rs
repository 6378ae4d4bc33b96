//! End-to-end plan flow against mock Places and Open-Meteo servers.

use chrono::NaiveDate;
use serde_json::json;
use trip_core::{
    PlacesClient, SlotLabel, TripPlanner, provider::openmeteo::OpenMeteoProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_places(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "predictions": [{
                "place_id": "oslo-id",
                "description": "Oslo, Norway",
                "structured_formatting": { "main_text": "Oslo", "secondary_text": "Norway" }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "oslo-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "name": "Oslo",
                "formatted_address": "Oslo, Norway",
                "geometry": { "location": { "lat": 59.9139, "lng": 10.7522 } }
            }
        })))
        .mount(server)
        .await;
}

async fn mount_weather(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "59.9139"))
        .and(query_param("timezone", "auto"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m,wind_direction_10m",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temperature_2m": 4.8,
                "relative_humidity_2m": 91,
                "apparent_temperature": 1.6,
                "precipitation": 0.6,
                "weather_code": 61,
                "wind_speed_10m": 14.0,
                "wind_direction_10m": 180
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {
                "time": ["2026-10-19", "2026-10-20", "2026-10-21", "2026-10-22", "2026-10-23"],
                "weather_code": [61, 3, 0, 0, 95],
                "temperature_2m_max": [7.0, 9.0, 24.0, 12.0, 10.0],
                "temperature_2m_min": [2.0, 3.0, 19.0, 4.0, 5.0],
                "precipitation_sum": [3.7, 0.0, 0.0, 0.2, 8.1],
                "wind_speed_10m_max": [20.0, 12.0, 8.0, 9.0, 30.0]
            }
        })))
        .mount(server)
        .await;
}

async fn planner() -> (MockServer, MockServer, TripPlanner) {
    let places_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_places(&places_server).await;
    mount_weather(&weather_server).await;

    let planner = TripPlanner::new(
        Some(PlacesClient::new_with_base_url("KEY".into(), &places_server.uri())),
        Box::new(OpenMeteoProvider::new_with_base_url(&weather_server.uri())),
    );

    (places_server, weather_server, planner)
}

#[tokio::test]
async fn search_then_plan_for_place() {
    let (_places, _weather, planner) = planner().await;

    let predictions = planner.search("oslo").await.unwrap();
    assert_eq!(predictions.len(), 1);

    let plan = planner.plan_for_place(&predictions[0].place_id, None).await.unwrap();

    assert_eq!(plan.location_name, "Oslo");
    assert_eq!(plan.place.as_ref().and_then(|p| p.place_id.as_deref()), Some("oslo-id"));
    assert_eq!(plan.weather.temperature, 5);
    assert_eq!(plan.weather.description, "Slight rain");

    // Rain then cold, in rule order.
    let scores: Vec<_> = plan.suggestions.iter().map(|s| s.weather_score).collect();
    assert_eq!(scores, vec![70, 80]);
    assert!(plan.suggestions[0].description.contains("Oslo"));

    assert_eq!(plan.forecast.len(), 5);
    let labels: Vec<_> = plan.slots.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![SlotLabel::Morning, SlotLabel::Afternoon, SlotLabel::Evening]);
    assert_eq!(plan.slots[0].rain_chance, "37%");
    assert_eq!(plan.slots[0].activities[0], "Museums");
    assert_eq!(plan.slots[2].activities[0], "Outdoor Photography");
}

#[tokio::test]
async fn plan_for_place_with_date_filter() {
    let (_places, _weather, planner) = planner().await;
    let date = NaiveDate::from_ymd_opt(2026, 10, 21);

    let plan = planner.plan_for_place("oslo-id", date).await.unwrap();

    assert_eq!(plan.forecast.len(), 1);
    assert_eq!(plan.slots.len(), 1);
    assert_eq!(plan.slots[0].label, SlotLabel::Morning);
    assert_eq!(plan.slots[0].weather, "Clear sky, 22°C");
}

#[tokio::test]
async fn plan_output_is_repeatable() {
    let (_places, _weather, planner) = planner().await;

    let first = planner.plan_for_place("oslo-id", None).await.unwrap();
    let second = planner.plan_for_place("oslo-id", None).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

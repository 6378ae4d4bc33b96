//! Core library for the `trip` planner.
//!
//! This crate defines:
//! - Shared domain models (places, readings, forecast slots, suggestions)
//! - Weather code normalization and the suggestion rules
//! - Abstraction over weather providers, plus the Google Places client
//! - Configuration & credentials handling
//!
//! It is used by `trip-cli`, but can also be reused by other binaries or services.

pub mod conditions;
pub mod config;
pub mod model;
pub mod places;
pub mod planner;
pub mod provider;
pub mod suggest;
pub mod window;

pub use conditions::{Conditions, normalize};
pub use config::{Config, ProviderConfig};
pub use model::{
    Coordinates, ForecastSlot, PlaceDetails, PlacePrediction, SlotLabel, SlotSuggestion,
    Suggestion, TripPlan, ValidationError, WeatherReading, parse_date_filter,
};
pub use places::PlacesClient;
pub use planner::TripPlanner;
pub use provider::{ProviderId, WeatherProvider};
pub use suggest::evaluate;
pub use window::{rain_chance, window_suggestions};

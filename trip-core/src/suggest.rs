//! Weather-driven trip suggestions.
//!
//! Every rule in [`RULES`] is checked against the same reading; all rules
//! that match contribute one suggestion, in table order.

use crate::model::{Suggestion, WeatherReading};

pub const WARM_ABOVE_C: i32 = 20;
pub const COLD_BELOW_C: i32 = 10;
pub const HOT_ABOVE_C: i32 = 30;

const LOCATION: &str = "{location}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Outdoor,
    IndoorRain,
    Cold,
    Hot,
}

/// Evaluation order, which is also output order.
pub const RULES: [Rule; 4] = [Rule::Outdoor, Rule::IndoorRain, Rule::Cold, Rule::Hot];

struct Template {
    title: &'static str,
    description: &'static str,
    weather_score: u8,
    activities: &'static [&'static str],
}

impl Rule {
    pub fn matches(&self, weather: &WeatherReading) -> bool {
        match self {
            Rule::Outdoor => weather.temperature > WARM_ABOVE_C && !weather.is_rainy(),
            Rule::IndoorRain => weather.is_rainy(),
            Rule::Cold => weather.temperature < COLD_BELOW_C,
            Rule::Hot => weather.temperature > HOT_ABOVE_C,
        }
    }

    fn template(&self) -> &'static Template {
        match self {
            Rule::Outdoor => &Template {
                title: "Perfect Day for Outdoor Adventures",
                description: "Great weather in {location}! Ideal conditions for exploring outdoors.",
                weather_score: 95,
                activities: &["Hiking", "Sightseeing", "Photography", "Walking tours"],
            },
            Rule::IndoorRain => &Template {
                title: "Indoor Cultural Experiences",
                description: "Rainy day in {location}? Perfect time for museums and indoor attractions.",
                weather_score: 70,
                activities: &["Museums", "Art galleries", "Shopping", "Cafes"],
            },
            Rule::Cold => &Template {
                title: "Cozy Winter Activities",
                description: "Bundle up in {location}! Great weather for winter activities.",
                weather_score: 80,
                activities: &["Hot drinks", "Indoor markets", "Warm restaurants", "Spas"],
            },
            Rule::Hot => &Template {
                title: "Beat the Heat",
                description: "Hot day in {location}! Stay cool with these activities.",
                weather_score: 75,
                activities: &[
                    "Swimming",
                    "Air-conditioned venues",
                    "Early morning tours",
                    "Shade activities",
                ],
            },
        }
    }

    /// Build this rule's suggestion; `location_name` is inserted as-is.
    pub fn suggestion(&self, location_name: &str) -> Suggestion {
        let t = self.template();
        Suggestion {
            title: t.title.to_string(),
            description: t.description.replacen(LOCATION, location_name, 1),
            weather_score: t.weather_score,
            activities: t.activities.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Suggestions for `weather` at `location_name`. Empty when no rule fires.
pub fn evaluate(weather: &WeatherReading, location_name: &str) -> Vec<Suggestion> {
    RULES
        .iter()
        .filter(|rule| rule.matches(weather))
        .map(|rule| rule.suggestion(location_name))
        .collect()
}

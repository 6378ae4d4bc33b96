use crate::model::{ForecastSlot, SlotLabel, SlotSuggestion};
use crate::suggest::WARM_ABOVE_C;

const OUTDOOR_ACTIVITIES: [&str; 3] = ["Outdoor Photography", "Walking Tours", "Sightseeing"];
const INDOOR_ACTIVITIES: [&str; 3] = ["Museums", "Indoor Dining", "Shopping"];

const OUTDOOR_RECOMMENDATION: &str =
    "Perfect time for outdoor activities with warm temperatures and dry skies.";
const INDOOR_RECOMMENDATION: &str =
    "Best to stay indoors. Perfect weather for cozy indoor experiences.";

/// Rain display value: `round(precipitation * 10)` as a percentage.
pub fn rain_chance(precipitation: f64) -> String {
    format!("{}%", (precipitation * 10.0).round() as i64)
}

/// Suggestions for the first three slots, labelled by position.
pub fn window_suggestions(forecast: &[ForecastSlot]) -> Vec<SlotSuggestion> {
    SlotLabel::ALL
        .iter()
        .zip(forecast)
        .map(|(label, slot)| slot_suggestion(*label, slot))
        .collect()
}

fn slot_suggestion(label: SlotLabel, slot: &ForecastSlot) -> SlotSuggestion {
    let outdoor = slot.temperature > WARM_ABOVE_C && !slot.is_rainy();
    let (activities, recommendation) = if outdoor {
        (OUTDOOR_ACTIVITIES, OUTDOOR_RECOMMENDATION)
    } else {
        (INDOOR_ACTIVITIES, INDOOR_RECOMMENDATION)
    };

    SlotSuggestion {
        label,
        datetime: slot.datetime.clone(),
        weather: format!("{}, {}°C", slot.description, slot.temperature),
        icon: slot.icon.clone(),
        rain_chance: rain_chance(slot.precipitation),
        activities: activities.iter().map(|a| a.to_string()).collect(),
        recommendation: recommendation.to_string(),
    }
}

//! Human-readable terminal output.

use std::fmt::Write;

use trip_core::{PlacePrediction, TripPlan, WeatherReading};

pub fn predictions(predictions: &[PlacePrediction]) {
    print!("{}", format_predictions(predictions));
}

pub fn plan(plan: &TripPlan) {
    print!("{}", format_plan(plan));
}

pub fn format_predictions(predictions: &[PlacePrediction]) -> String {
    if predictions.is_empty() {
        return "No destinations found.\n".to_string();
    }

    let mut out = String::new();
    for p in predictions {
        let _ = writeln!(
            out,
            "{:<24} {}  [{}]",
            p.structured_formatting.main_text, p.structured_formatting.secondary_text, p.place_id
        );
    }
    out
}

fn format_weather(out: &mut String, w: &WeatherReading) {
    let _ = writeln!(out, "Now: {}, {}°C (feels like {}°C)", w.description, w.temperature, w.feels_like);
    let _ = write!(out, "     humidity {}%, wind {:.1}", w.humidity, w.wind_speed);
    if let Some(mm) = w.precipitation {
        let _ = write!(out, ", precipitation {mm:.1} mm");
    }
    if let Some(v) = w.visibility {
        let _ = write!(out, ", visibility {} km", v / 1000);
    }
    if let Some(uv) = w.uv_index {
        let _ = write!(out, ", UV {uv:.0}");
    }
    out.push('\n');
}

pub fn format_plan(plan: &TripPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", plan.location_name);
    if let Some(place) = &plan.place {
        if place.formatted_address != plan.location_name {
            let _ = writeln!(out, "{}", place.formatted_address);
        }
    }
    let _ = writeln!(out, "({})", plan.coordinates);
    if let Some(date) = plan.date {
        let _ = writeln!(out, "Date: {date}");
    }
    out.push('\n');

    format_weather(&mut out, &plan.weather);
    out.push('\n');

    if plan.suggestions.is_empty() {
        out.push_str("No particular suggestions for this weather.\n");
    } else {
        out.push_str("Suggestions\n");
        for s in &plan.suggestions {
            let _ = writeln!(out, "  [{:>3}] {}", s.weather_score, s.title);
            let _ = writeln!(out, "        {}", s.description);
            let _ = writeln!(out, "        {}", s.activities.join(", "));
        }
    }

    if !plan.slots.is_empty() {
        out.push_str("\nBest times to visit\n");
        for slot in &plan.slots {
            let _ = writeln!(
                out,
                "  {:<10} {}  rain {}  ({})",
                slot.label, slot.weather, slot.rain_chance, slot.datetime
            );
            let _ = writeln!(out, "             {}", slot.activities.join(", "));
            let _ = writeln!(out, "             {}", slot.recommendation);
        }
    } else if plan.date.is_some() {
        out.push_str("\nNo forecast available for the selected date.\n");
    }

    out
}

//! Maps Open-Meteo WMO weather codes to a display description and an
//! OpenWeather-style icon code, so both providers render the same icons.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conditions {
    pub description: &'static str,
    pub icon: &'static str,
}

pub const UNKNOWN: Conditions = Conditions { description: "Unknown", icon: "01d" };

const fn c(description: &'static str, icon: &'static str) -> Conditions {
    Conditions { description, icon }
}

/// Total over every `i32`; codes outside the table map to [`UNKNOWN`].
pub fn normalize(code: i32) -> Conditions {
    match code {
        0 => c("Clear sky", "01d"),
        1 => c("Mainly clear", "02d"),
        2 => c("Partly cloudy", "03d"),
        3 => c("Overcast", "04d"),
        45 => c("Fog", "50d"),
        48 => c("Depositing rime fog", "50d"),
        51 => c("Light drizzle", "09d"),
        53 => c("Moderate drizzle", "09d"),
        55 => c("Dense drizzle", "09d"),
        61 => c("Slight rain", "10d"),
        63 => c("Moderate rain", "10d"),
        65 => c("Heavy rain", "10d"),
        71 => c("Slight snow fall", "13d"),
        73 => c("Moderate snow fall", "13d"),
        75 => c("Heavy snow fall", "13d"),
        95 => c("Thunderstorm", "11d"),
        96 => c("Thunderstorm with slight hail", "11d"),
        99 => c("Thunderstorm with heavy hail", "11d"),
        _ => UNKNOWN,
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recommendation rule: which conditions and temperatures it covers
/// and what to wear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingRule {
    pub id: u32,
    /// OpenWeatherMap condition codes, see https://openweathermap.org/weather-conditions
    pub condition_codes: Vec<i32>,
    /// Inclusive lower bound, degrees Celsius.
    pub temp_min: i32,
    /// Inclusive upper bound, degrees Celsius.
    pub temp_max: i32,
    pub message: String,
}

impl ClothingRule {
    pub fn covers_condition(&self, condition_id: i32) -> bool {
        self.condition_codes.contains(&condition_id)
    }

    pub fn covers_temperature(&self, temp_c: f64) -> bool {
        f64::from(self.temp_min) <= temp_c && temp_c <= f64::from(self.temp_max)
    }
}

/// Current weather at a location as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub location_name: Option<String>,
    pub condition_id: i32,
    pub description: String,
    pub temp_now: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

/// Answer for a location lookup, in the shape returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub clothes_plan: String,
    pub description: String,
    pub temp_now: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{config::OpenWeatherConfig, model::WeatherObservation};

use super::{Lookup, ProviderError, WeatherProvider};

const NAME: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &OpenWeatherConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ProviderError::Client {
                provider: NAME,
                source,
            })?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            http,
        })
    }

    async fn fetch_current(&self, location: &str) -> Result<(StatusCode, String), ProviderError> {
        let url = format!("{}/weather", self.base_url);

        // The query carries the API key, so errors are stripped of their URL.
        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout { provider: NAME }
                } else {
                    ProviderError::Transport {
                        provider: NAME,
                        source: e.without_url(),
                    }
                }
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout { provider: NAME }
            } else {
                ProviderError::Body {
                    provider: NAME,
                    source: e.without_url(),
                }
            }
        })?;

        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Classify a raw `/weather` response.
pub(crate) fn interpret(status: StatusCode, body: &str) -> Lookup {
    if status == StatusCode::NOT_FOUND {
        return Lookup::NotFound;
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) if status.is_success() => {
            return Lookup::Malformed(format!("response is not JSON: {err}"));
        }
        Err(_) => {
            return Lookup::Rejected {
                status: status.as_u16(),
                message: truncate_body(body),
            };
        }
    };

    // Error payloads look like {"cod": "404", "message": "city not found"};
    // `cod` may be a string or a number.
    let cod = value.get("cod").and_then(|cod| match cod {
        Value::String(s) => s.parse::<u16>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    });
    if cod == Some(404) {
        return Lookup::NotFound;
    }

    if !status.is_success() || cod.is_some_and(|c| c >= 400) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| truncate_body(body));
        return Lookup::Rejected {
            status: cod.unwrap_or_else(|| status.as_u16()),
            message,
        };
    }

    let parsed: OwCurrentResponse = match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(err) => return Lookup::Malformed(err.to_string()),
    };

    let Some(weather) = parsed.weather.into_iter().next() else {
        return Lookup::Malformed("weather array is empty".to_string());
    };

    Lookup::Found(WeatherObservation {
        location_name: parsed.name,
        condition_id: weather.id,
        description: weather.description,
        temp_now: parsed.main.temp,
        temp_min: parsed.main.temp_min,
        temp_max: parsed.main.temp_max,
        observed_at: parsed.dt.and_then(unix_to_utc),
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn current(&self, location: &str) -> Result<Lookup, ProviderError> {
        let (status, body) = self.fetch_current(location).await?;
        let lookup = interpret(status, &body);

        match &lookup {
            Lookup::Found(obs) => tracing::debug!(
                location,
                condition_id = obs.condition_id,
                temp_now = obs.temp_now,
                observed_at = ?obs.observed_at,
                "openweather observation"
            ),
            Lookup::NotFound => tracing::info!(location, "openweather does not know location"),
            Lookup::Rejected { status, message } => {
                tracing::warn!(location, status, message = %message, "openweather rejected request")
            }
            Lookup::Malformed(reason) => {
                tracing::warn!(location, reason = %reason, "openweather response is malformed")
            }
        }

        Ok(lookup)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: &str = r#"{
        "weather": [{"id": 804, "main": "Clouds", "description": "пасмурно", "icon": "04d"}],
        "main": {"temp": 31.79, "feels_like": 30.0, "temp_min": 31.29, "temp_max": 32.24, "humidity": 40},
        "dt": 1700000000,
        "name": "Moscow",
        "cod": 200
    }"#;

    #[test]
    fn parses_observation() {
        let Lookup::Found(obs) = interpret(StatusCode::OK, MOSCOW) else {
            panic!("expected observation");
        };

        assert_eq!(obs.condition_id, 804);
        assert_eq!(obs.description, "пасмурно");
        assert_eq!(obs.temp_now, 31.79);
        assert_eq!(obs.temp_min, 31.29);
        assert_eq!(obs.temp_max, 32.24);
        assert_eq!(obs.location_name.as_deref(), Some("Moscow"));
        assert_eq!(obs.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn http_404_is_not_found() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(interpret(StatusCode::NOT_FOUND, body), Lookup::NotFound);
    }

    #[test]
    fn cod_404_in_success_response_is_not_found() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        assert_eq!(interpret(StatusCode::OK, body), Lookup::NotFound);
    }

    #[test]
    fn unauthorized_is_rejected_with_message() {
        let body = r#"{"cod":401,"message":"Invalid API key."}"#;
        assert_eq!(
            interpret(StatusCode::UNAUTHORIZED, body),
            Lookup::Rejected {
                status: 401,
                message: "Invalid API key.".into()
            }
        );
    }

    #[test]
    fn missing_fields_are_malformed() {
        let body = r#"{"weather": [{"id": 800, "description": "ясно"}], "cod": 200}"#;
        assert!(matches!(interpret(StatusCode::OK, body), Lookup::Malformed(_)));
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let body = r#"{"weather": [], "main": {"temp": 1.0, "temp_min": 0.0, "temp_max": 2.0}}"#;
        assert_eq!(
            interpret(StatusCode::OK, body),
            Lookup::Malformed("weather array is empty".into())
        );
    }

    #[test]
    fn non_json_success_is_malformed() {
        assert!(matches!(interpret(StatusCode::OK, "<html>"), Lookup::Malformed(_)));
    }

    #[test]
    fn non_json_error_is_rejected() {
        assert!(matches!(
            interpret(StatusCode::BAD_GATEWAY, "bad gateway"),
            Lookup::Rejected { status: 502, .. }
        ));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "я".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 203);
    }
}

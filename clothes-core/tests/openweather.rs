//! Integration tests for OpenWeatherProvider using wiremock.

use std::time::Duration;

use clothes_core::provider::openweather::OpenWeatherProvider;
use clothes_core::{Lookup, OpenWeatherConfig, ProviderError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, timeout_secs: u64) -> OpenWeatherProvider {
    let config = OpenWeatherConfig {
        base_url: format!("{}/data/2.5/", server.uri()),
        timeout_secs,
        ..OpenWeatherConfig::default()
    };
    OpenWeatherProvider::new("TEST_KEY".to_string(), &config).unwrap()
}

fn current_weather(id: i32, description: &str, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 37.62, "lat": 55.75},
        "weather": [{"id": id, "main": "Clear", "description": description, "icon": "01d"}],
        "main": {"temp": temp, "feels_like": temp, "temp_min": temp - 0.5, "temp_max": temp + 0.5, "humidity": 50},
        "dt": 1_700_000_000,
        "name": "Moscow",
        "cod": 200
    })
}

#[tokio::test]
async fn test_current_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Moscow"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "ru"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather(800, "ясно", 31.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lookup = provider(&mock_server, 5).current("Moscow").await.unwrap();

    let obs = match lookup {
        Lookup::Found(obs) => obs,
        other => panic!("expected observation, got {other:?}"),
    };
    assert_eq!(obs.condition_id, 800);
    assert_eq!(obs.description, "ясно");
    assert_eq!(obs.temp_now, 31.0);
    assert_eq!(obs.temp_min, 30.5);
    assert_eq!(obs.temp_max, 31.5);
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let lookup = provider(&mock_server, 5).current("Nowhereville").await.unwrap();
    assert_eq!(lookup, Lookup::NotFound);
}

#[tokio::test]
async fn test_invalid_key_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;

    let lookup = provider(&mock_server, 5).current("Moscow").await.unwrap();
    assert!(matches!(lookup, Lookup::Rejected { status: 401, .. }));
}

#[tokio::test]
async fn test_missing_main_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "weather": [{"id": 800, "description": "ясно"}],
            "name": "Moscow"
        })))
        .mount(&mock_server)
        .await;

    let lookup = provider(&mock_server, 5).current("Moscow").await.unwrap();
    assert!(matches!(lookup, Lookup::Malformed(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_weather(800, "ясно", 20.0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server, 1).current("Moscow").await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout { .. }));
}

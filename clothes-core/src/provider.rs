use crate::{Config, WeatherObservation, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Outcome of asking the upstream service about a location.
///
/// Every variant except `Found` means the upstream answered but gave us
/// nothing usable.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(WeatherObservation),
    /// The upstream does not know this location.
    NotFound,
    /// The upstream returned an error payload, e.g. for an invalid API key.
    Rejected { status: u16, message: String },
    /// A success response that lacks the fields we need.
    Malformed(String),
}

/// The upstream could not be reached or its response could not be read.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client for {provider}")]
    Client {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("timed out waiting for {provider}")]
    Timeout { provider: &'static str },

    #[error("failed to send request to {provider}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {provider} response body")]
    Body {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Short provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Current weather for a free-text location name.
    async fn current(&self, location: &str) -> Result<Lookup, ProviderError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.openweather)?;

    Ok(Box::new(provider))
}

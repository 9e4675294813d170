//! Core library for the clothes recommendation service.
//!
//! This crate defines:
//! - The clothing rule table and its validation
//! - The resolver that matches weather against rules
//! - Abstraction over the upstream weather provider (OpenWeatherMap)
//! - Configuration & credentials handling
//!
//! It is used by `clothes-cli`, which exposes the HTTP API and the command line.

pub mod config;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod rules;

pub use config::{Config, OpenWeatherConfig, ServerConfig};
pub use model::{ClothingRule, Recommendation, WeatherObservation};
pub use provider::{Lookup, ProviderError, WeatherProvider};
pub use resolver::{FALLBACK_PLAN, Resolver};
pub use rules::{RuleError, RuleTable, RuleTemplate, TempBound};

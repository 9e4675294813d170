use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clothes_core::{Config, Lookup, Resolver, WeatherProvider, provider::provider_from_config};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clothes", version, about = "What to wear for the weather")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Listen address, overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the recommendation for a location.
    Show {
        /// City name, e.g. "Moscow".
        location: String,
    },

    /// Print the effective rule table.
    Rules,

    /// Store the OpenWeatherMap API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = Config::resolve_path(self.config.as_deref())?;
        let config = Config::load_from(&path)?;

        match self.command {
            Command::Configure => configure(config, &path),
            Command::Serve { bind } => {
                let (config, resolver) = prepare(config)?;
                let provider: Arc<dyn WeatherProvider> =
                    Arc::from(provider_from_config(&config)?);
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                tracing::info!(
                    config = %path.display(),
                    rules = resolver.all().len(),
                    timeout_secs = config.openweather.timeout_secs,
                    "starting clothes API"
                );

                let state = AppState::new(provider, resolver, config.server.city_list_path);
                server::run(state, &bind, &config.server.base_path).await
            }
            Command::Show { location } => {
                let (config, resolver) = prepare(config)?;
                let provider = provider_from_config(&config)?;
                match provider.current(&location).await? {
                    Lookup::Found(observation) => {
                        let rec = resolver.recommend(&observation);
                        let place = observation.location_name.as_deref().unwrap_or(&location);
                        println!("{place}: {}", rec.description);
                        println!(
                            "  now {:.1}°C (min {:.1}°C, max {:.1}°C)",
                            rec.temp_now, rec.temp_min, rec.temp_max
                        );
                        println!("  {}", rec.clothes_plan);
                        Ok(())
                    }
                    other => Err(anyhow::anyhow!("Location '{location}' not found ({other:?})")),
                }
            }
            Command::Rules => {
                let (_, resolver) = prepare(config)?;
                for rule in resolver.all() {
                    println!(
                        "{:>3}  {:>4}..{:<4}  {:?}\n     {}",
                        rule.id, rule.temp_min, rule.temp_max, rule.condition_codes, rule.message
                    );
                }
                Ok(())
            }
        }
    }
}

/// Apply environment overrides and build the resolver from the effective rule table.
fn prepare(mut config: Config) -> anyhow::Result<(Config, Resolver)> {
    config.apply_env();
    let resolver = Resolver::new(config.rule_table()?);
    Ok((config, resolver))
}

fn configure(mut config: Config, path: &std::path::Path) -> anyhow::Result<()> {
    let key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(key);
    config.save_to(path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

//! HTTP server for the clothes API

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use clothes_core::{Resolver, WeatherProvider};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;

/// Application state shared across handlers. Read-only once built.
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub resolver: Resolver,
    pub city_list_path: PathBuf,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        resolver: Resolver,
        city_list_path: PathBuf,
    ) -> Self {
        Self {
            provider,
            resolver,
            city_list_path,
        }
    }
}

/// Build the router with every API route mounted under `base_path`.
pub fn app(state: AppState, base_path: &str) -> Router {
    let api = routes::plan_routes().with_state(Arc::new(state));

    let router = match normalize_base_path(base_path) {
        Some(prefix) => Router::new().nest(&prefix, api),
        None => api,
    };

    router.layer(TraceLayer::new_for_http())
}

/// "/api/v1/" -> Some("/api/v1"), "api" -> Some("/api"), "/" -> None.
fn normalize_base_path(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// Run the HTTP server until Ctrl-C.
pub async fn run(state: AppState, bind: &str, base_path: &str) -> Result<()> {
    let app = app(state, base_path);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(addr = %bind, base_path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::normalize_base_path;

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base_path("/api/v1"), Some("/api/v1".to_string()));
        assert_eq!(normalize_base_path("/api/v1/"), Some("/api/v1".to_string()));
        assert_eq!(normalize_base_path("api"), Some("/api".to_string()));
        assert_eq!(normalize_base_path("/"), None);
        assert_eq!(normalize_base_path(""), None);
    }
}

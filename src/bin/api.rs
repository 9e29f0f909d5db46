use std::sync::Arc;

use anyhow::{Context, Result};
use tfmkt::{
    app_state::AppState,
    config::{Config, LogFormat},
    fetcher::HttpFetcher,
    routes::create_router,
    scrape::SiteUrls,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let fetcher = HttpFetcher::from_config(&config).context("Failed to build HTTP client")?;
    let state = AppState::new(Arc::new(fetcher), SiteUrls::new(config.base_url()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), base_url = config.base_url(), "listening");

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

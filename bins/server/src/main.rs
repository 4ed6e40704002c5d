//! Sarrafa API Server
//!
//! Main entry point for the exchange shop rate board and calculator service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sarrafa_api::{AppState, RateSettings, create_router};
use sarrafa_rates::{
    ExchangeRateApiClient, RateBoard, RateCache, RateProvider, RateRefresher, RatesError,
    StaticRateProvider,
};
use sarrafa_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sarrafa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let provider = rate_provider(&config).await?;
    info!(provider = provider.name(), base = %config.rates.base_currency, "Rate provider configured");

    let cache = RateCache::new(&config.cache.path);
    let board = bootstrap_board(&config, &cache).await?;
    info!(
        currencies = board.table.len(),
        last_update = ?board.last_update,
        "Rate board ready"
    );

    // Create application state
    let state = AppState::new(
        board,
        RateRefresher::new(provider),
        cache,
        RateSettings::from_config(&config),
    );

    if state.settings.auto_refresh {
        spawn_refresh_loop(state.clone());
    } else if state.is_stale(Utc::now()).await {
        refresh_once(&state).await;
    }

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// ExchangeRate-API when a key is configured, the built-in table otherwise.
///
/// A key the provider rejects is only logged; refreshes keep failing and the
/// board keeps its cached rates until the key is fixed.
async fn rate_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn RateProvider>> {
    match ExchangeRateApiClient::from_config(&config.rates) {
        Ok(client) => {
            if client.check_key(&config.rates.base_currency).await {
                info!("Rate provider API key accepted");
            }
            Ok(Arc::new(client))
        }
        Err(RatesError::MissingApiKey) => {
            warn!("No rate provider API key configured, serving the static rate table");
            Ok(Arc::new(StaticRateProvider::new()))
        }
        Err(e) => Err(e).context("Failed to create rate provider client"),
    }
}

/// Builds the board from the configured currencies and restores their last
/// known rates from the cache.
async fn bootstrap_board(config: &AppConfig, cache: &RateCache) -> anyhow::Result<RateBoard> {
    let base = &config.rates.base_currency;

    if config.currencies.is_empty() {
        warn!("No currencies configured");
    }
    let mut board = RateBoard::from_seeds(base.clone(), &config.currencies)
        .context("Invalid currency configuration")?;

    match cache.load().await {
        Ok(Some(cached)) if cached.table.base() == base => {
            let restored = board.restore_rates(&cached);
            info!(
                path = %cache.path().display(),
                restored,
                configured = board.table.len(),
                "Restored rates from cache"
            );
        }
        Ok(Some(cached)) => warn!(
            cached = %cached.table.base(),
            configured = %base,
            "Ignoring rate cache for a different base currency"
        ),
        Ok(None) => info!("No rate cache found, starting unpriced"),
        Err(e) => warn!(error = %e, "Failed to load rate cache, starting unpriced"),
    }

    Ok(board)
}

/// Refreshes on startup and then every `refresh_interval_secs`.
fn spawn_refresh_loop(state: AppState) {
    let period = Duration::from_secs(state.settings.refresh_interval_secs.max(1));
    info!(interval_secs = period.as_secs(), "Starting rate auto-refresh");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            refresh_once(&state).await;
        }
    });
}

async fn refresh_once(state: &AppState) {
    if let Err(e) = state.refresh_rates().await {
        error!(error = %e, "Rate refresh failed, keeping previous rates");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

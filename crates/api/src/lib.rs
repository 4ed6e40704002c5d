//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Rate board and calculator routes
//! - Manual refresh and refresh status routes
//! - The JSON error body shared by all routes

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use sarrafa_rates::{RateBoard, RateCache, RateRefresher, RefreshReport, UsageStats};
use sarrafa_shared::{AppConfig, AppResult, Language};

/// Refresh and display settings taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateSettings {
    /// Language used when a request does not name one.
    pub language: Language,
    /// Whether the background refresh loop runs.
    pub auto_refresh: bool,
    /// Seconds between background refreshes.
    pub refresh_interval_secs: u64,
    /// Age in seconds after which the board counts as stale.
    pub max_age_secs: u64,
}

impl RateSettings {
    /// Picks the relevant values out of the app config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            language: config.language,
            auto_refresh: config.rates.auto_refresh,
            refresh_interval_secs: config.rates.refresh_interval_secs,
            max_age_secs: config.rates.max_age_secs,
        }
    }

    /// Staleness threshold as a duration.
    #[must_use]
    pub fn max_age(&self) -> Duration {
        i64::try_from(self.max_age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RateSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The rate board.
    pub board: Arc<RwLock<RateBoard>>,
    /// Pulls fresh rates from the configured provider.
    pub refresher: Arc<RateRefresher>,
    /// Local snapshot of the board.
    pub cache: Arc<RateCache>,
    /// Refresh and display settings.
    pub settings: RateSettings,
    /// Held from applying rates until the snapshot is written, so snapshots
    /// land in the order the rates were applied.
    refresh_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Creates the state around an already bootstrapped board.
    pub fn new(board: RateBoard, refresher: RateRefresher, cache: RateCache, settings: RateSettings) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
            refresher: Arc::new(refresher),
            cache: Arc::new(cache),
            settings,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Fetches fresh rates, applies them and persists the snapshot.
    ///
    /// The fetch runs without holding the board lock. A failed cache write is
    /// logged and does not fail the refresh.
    pub async fn refresh_rates(&self) -> AppResult<RefreshReport> {
        let base = self.board.read().await.table.base().clone();
        let rates = self.refresher.fetch(&base).await?;

        let _guard = self.refresh_lock.lock().await;
        let (report, snapshot) = {
            let mut board = self.board.write().await;
            let report = RateRefresher::apply(&mut board, &rates)?;
            (report, board.clone())
        };

        if let Err(e) = self.cache.save(&snapshot).await {
            error!(error = %e, path = %self.cache.path().display(), "Failed to save rate cache");
        }

        info!(
            provider = self.refresher.provider_name(),
            updated = report.updated,
            "Rates refreshed"
        );
        Ok(report)
    }

    /// Request quota of the rate provider, `None` if it does not meter requests.
    pub async fn provider_usage(&self) -> AppResult<Option<UsageStats>> {
        Ok(self.refresher.usage().await?)
    }

    /// Returns true if the board is older than the configured maximum age.
    pub async fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.board.read().await.is_stale(now, self.settings.max_age())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    use sarrafa_core::currency::{Currency, CurrencyTable};
    use sarrafa_rates::{RateBoard, RateCache, RateRefresher, StaticRateProvider};
    use sarrafa_shared::CurrencyCode;

    use super::{AppState, RateSettings, create_router};

    pub fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    pub fn board() -> RateBoard {
        RateBoard::new(
            CurrencyTable::new(
                CurrencyCode::ils(),
                vec![
                    Currency::new(code("USD"), dec!(3.59), dec!(3.71)),
                    Currency::new(code("EUR"), dec!(3.89), dec!(4.01)),
                    Currency::new(code("GBP"), dec!(0), dec!(0)),
                    Currency::new(code("JOD"), dec!(5.14), dec!(5.26)).inactive(),
                ],
            )
            .unwrap(),
        )
    }

    /// State over the sample board; the temp dir holds the cache file.
    pub fn state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            board(),
            RateRefresher::new(Arc::new(StaticRateProvider::new())),
            RateCache::new(dir.path().join("rates.json")),
            RateSettings::default(),
        );
        (state, dir)
    }

    pub async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_settings_defaults() {
        let settings = RateSettings::default();
        assert_eq!(settings.language, Language::Ar);
        assert!(settings.auto_refresh);
        assert_eq!(settings.refresh_interval_secs, 300);
        assert_eq!(settings.max_age(), Duration::hours(1));
    }

    #[test]
    fn test_settings_huge_max_age() {
        let settings = RateSettings {
            max_age_secs: u64::MAX,
            ..RateSettings::default()
        };
        assert_eq!(settings.max_age(), Duration::MAX);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_refreshes_leave_latest_snapshot() {
        let (state, _dir) = test_support::state();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move { state.refresh_rates().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let cached = state.cache.load().await.unwrap().unwrap();
        assert_eq!(cached, *state.board.read().await);
        assert!(!state.cache.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_refresh_rates_saves_cache() {
        let (state, _dir) = test_support::state();
        assert!(state.is_stale(Utc::now()).await);

        let report = state.refresh_rates().await.unwrap();
        assert_eq!(report.updated, 4);
        assert!(!state.is_stale(Utc::now()).await);

        let cached = state.cache.load().await.unwrap().unwrap();
        assert_eq!(cached, *state.board.read().await);
    }
}

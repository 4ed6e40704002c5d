//! Rate refresh routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use sarrafa_rates::{RefreshReport, UsageStats};

use crate::{AppState, error::ApiError};

/// Creates the rate refresh routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rates/refresh", post(refresh_rates))
        .route("/rates/status", get(rates_status))
        .route("/rates/quota", get(rates_quota))
}

/// POST `/rates/refresh` - Fetch and apply the latest market rates.
async fn refresh_rates(State(state): State<AppState>) -> Result<Json<RefreshReport>, ApiError> {
    Ok(Json(state.refresh_rates().await?))
}

/// Freshness of the rate board.
#[derive(Debug, Serialize)]
pub struct RatesStatusResponse {
    /// Last successful refresh.
    pub last_update: Option<DateTime<Utc>>,
    /// Older than the configured maximum age, or never refreshed.
    pub stale: bool,
    /// Whether the background refresh loop runs.
    pub auto_refresh: bool,
    /// Seconds between background refreshes.
    pub refresh_interval_secs: u64,
    /// Rate provider in use.
    pub provider: &'static str,
}

/// GET `/rates/status`
async fn rates_status(State(state): State<AppState>) -> Json<RatesStatusResponse> {
    let last_update = state.board.read().await.last_update;
    Json(RatesStatusResponse {
        last_update,
        stale: sarrafa_rates::is_stale(last_update, Utc::now(), state.settings.max_age()),
        auto_refresh: state.settings.auto_refresh,
        refresh_interval_secs: state.settings.refresh_interval_secs,
        provider: state.refresher.provider_name(),
    })
}

/// Provider request quota.
#[derive(Debug, Serialize)]
pub struct RatesQuotaResponse {
    /// Rate provider in use.
    pub provider: &'static str,
    /// `null` for providers that do not meter requests.
    pub quota: Option<UsageStats>,
}

/// GET `/rates/quota`
async fn rates_quota(State(state): State<AppState>) -> Result<Json<RatesQuotaResponse>, ApiError> {
    Ok(Json(RatesQuotaResponse {
        provider: state.refresher.provider_name(),
        quota: state.provider_usage().await?,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::AppState;
    use crate::test_support::{board, get, send, state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sarrafa_rates::{RateCache, RateRefresher, StaticRateProvider};
    use serde_json::json;

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_then_status() {
        let (state, _dir) = state();

        let (status, body) = send(state.clone(), get("/api/v1/rates/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stale"], true);
        assert_eq!(body["refresh_interval_secs"], 300);
        assert_eq!(body["provider"], "static");

        let (status, body) = send(state.clone(), post("/api/v1/rates/refresh")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], 4);
        assert_eq!(body["missing"], json!([]));

        let (_, body) = send(state.clone(), get("/api/v1/rates/status")).await;
        assert_eq!(body["stale"], false);

        // refreshed USD: 3.65 -/+ 0.06
        let (_, body) = send(state, get("/api/v1/currencies")).await;
        assert_eq!(body["currencies"][0]["buy_rate"], "3.59");
        assert_eq!(body["currencies"][0]["sell_rate"], "3.71");
        assert_eq!(body["currencies"][0]["current_rate"], "3.65");
    }

    #[tokio::test]
    async fn test_quota_for_unmetered_provider() {
        let (state, _dir) = state();
        let (status, body) = send(state, get("/api/v1/rates/quota")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "static");
        assert!(body["quota"].is_null());
    }

    #[tokio::test]
    async fn test_refresh_provider_base_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticRateProvider::with_rates("USD".parse().unwrap(), Default::default());
        let state = AppState::new(
            board(),
            RateRefresher::new(Arc::new(provider)),
            RateCache::new(dir.path().join("rates.json")),
            crate::RateSettings::default(),
        );

        let (status, body) = send(state, post("/api/v1/rates/refresh")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "external_service_error");
    }
}

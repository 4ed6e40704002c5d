//! Rate board listing routes.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sarrafa_core::currency::Currency;
use sarrafa_shared::CurrencyCode;

use crate::{AppState, error::ApiError};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Query parameters for the rate board.
#[derive(Debug, Default, Deserialize)]
pub struct ListCurrenciesQuery {
    /// Only currencies offered in the calculator (`true`) or only hidden ones (`false`).
    pub active: Option<bool>,
}

/// Response for a currency on the board.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    /// Currency code (ISO 4217).
    pub code: CurrencyCode,
    /// Arabic name.
    pub name_ar: String,
    /// English name.
    pub name_en: String,
    /// Hebrew name.
    pub name_he: Option<String>,
    /// Market mid rate.
    pub current_rate: Decimal,
    /// Rate the shop buys at.
    pub buy_rate: Decimal,
    /// Rate the shop sells at.
    pub sell_rate: Decimal,
    /// Offered in the calculator.
    pub is_active: bool,
    /// When the rates were last applied.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Currency> for CurrencyResponse {
    fn from(c: &Currency) -> Self {
        Self {
            code: c.code.clone(),
            name_ar: c.name_ar.clone(),
            name_en: c.name_en.clone(),
            name_he: c.name_he.clone(),
            current_rate: c.current_rate,
            buy_rate: c.buy_rate,
            sell_rate: c.sell_rate,
            is_active: c.is_active,
            updated_at: c.updated_at,
        }
    }
}

/// Response for the whole rate board.
#[derive(Debug, Serialize)]
pub struct RateBoardResponse {
    /// Base currency every rate is quoted against.
    pub base: CurrencyCode,
    /// Last successful refresh.
    pub last_update: Option<DateTime<Utc>>,
    /// Listed currencies.
    pub currencies: Vec<CurrencyResponse>,
}

/// GET `/currencies` - List the rate board.
async fn list_currencies(
    State(state): State<AppState>,
    query: Result<Query<ListCurrenciesQuery>, QueryRejection>,
) -> Result<Json<RateBoardResponse>, ApiError> {
    let Query(query) = query?;
    let board = state.board.read().await;

    let currencies = board
        .table
        .currencies()
        .iter()
        .filter(|c| query.active.is_none_or(|active| c.is_active == active))
        .map(CurrencyResponse::from)
        .collect();

    Ok(Json(RateBoardResponse {
        base: board.table.base().clone(),
        last_update: board.last_update,
        currencies,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, send, state};
    use axum::http::StatusCode;
    use rstest::rstest;

    #[rstest]
    #[case("/api/v1/currencies", 4)]
    #[case("/api/v1/currencies?active=true", 3)]
    #[case("/api/v1/currencies?active=false", 1)]
    #[tokio::test]
    async fn test_list_currencies(#[case] uri: &str, #[case] expected: usize) {
        let (state, _dir) = state();
        let (status, body) = send(state, get(uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["base"], "ILS");
        assert_eq!(body["currencies"].as_array().unwrap().len(), expected);
    }

    #[tokio::test]
    async fn test_list_currencies_rates() {
        let (state, _dir) = state();
        let (_, body) = send(state, get("/api/v1/currencies")).await;

        let usd = &body["currencies"][0];
        assert_eq!(usd["code"], "USD");
        assert_eq!(usd["buy_rate"], "3.59");
        assert_eq!(usd["sell_rate"], "3.71");
        assert!(body["last_update"].is_null());
    }

    #[tokio::test]
    async fn test_list_currencies_bad_query() {
        let (state, _dir) = state();
        let (status, body) = send(state, get("/api/v1/currencies?active=maybe")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}

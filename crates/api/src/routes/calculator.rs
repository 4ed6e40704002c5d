//! Currency calculator routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sarrafa_core::currency::{Breakdown, ConversionRequest, Side, convert, format_amount, parse_amount};
use sarrafa_shared::{CurrencyCode, Language};

use crate::{AppState, error::ApiError};

/// Creates the calculator routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculator/currencies", get(calculator_currencies))
        .route("/calculator/convert", post(convert_amount))
}

/// Currencies the calculator cycles through.
#[derive(Debug, Serialize)]
pub struct CalculatorCurrenciesResponse {
    /// Base currency.
    pub base: CurrencyCode,
    /// Base first, then every active currency in board order.
    pub currencies: Vec<CurrencyCode>,
}

/// GET `/calculator/currencies`
async fn calculator_currencies(State(state): State<AppState>) -> Json<CalculatorCurrenciesResponse> {
    let board = state.board.read().await;
    Json(CalculatorCurrenciesResponse {
        base: board.table.base().clone(),
        currencies: board.table.calculator_codes(),
    })
}

/// Request body for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Amount as typed; blank or non-numeric input converts to nothing.
    pub amount: String,
    /// Currency of the left field.
    pub from: CurrencyCode,
    /// Currency of the right field.
    pub to: CurrencyCode,
    /// Field the amount was typed into.
    #[serde(default)]
    pub side: Side,
    /// Language of the explanation; the configured default when absent.
    pub language: Option<Language>,
}

/// Result of a conversion.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Converted amount with two decimals, `null` for unusable input.
    pub converted_amount: Option<String>,
    /// Human-readable breakdown.
    pub explanation: String,
    /// Legs of the calculation.
    pub breakdown: Option<Breakdown>,
    /// Echo of the edited field.
    pub side: Side,
}

/// POST `/calculator/convert`
async fn convert_amount(
    State(state): State<AppState>,
    body: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(body) = body?;
    let language = body.language.unwrap_or(state.settings.language);

    let Some(amount) = parse_amount(&body.amount) else {
        return Ok(Json(ConvertResponse {
            converted_amount: None,
            explanation: String::new(),
            breakdown: None,
            side: body.side,
        }));
    };

    let request = ConversionRequest {
        amount,
        from: body.from,
        to: body.to,
        side: body.side,
    };
    let result = {
        let board = state.board.read().await;
        convert(&request, &board.table, language)?
    };

    debug!(
        from = %request.from,
        to = %request.to,
        amount = %request.amount,
        result = %result.converted_amount,
        "Converted amount"
    );

    Ok(Json(ConvertResponse {
        converted_amount: Some(format_amount(result.converted_amount)),
        explanation: result.explanation,
        breakdown: Some(result.breakdown),
        side: request.side,
    }))
}

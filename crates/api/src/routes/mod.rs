//! API route definitions.

use axum::{Router, http::Uri};

use sarrafa_shared::AppError;

use crate::{AppState, error::ApiError};

pub mod calculator;
pub mod currencies;
pub mod health;
pub mod rates;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(currencies::routes())
        .merge(calculator::routes())
        .merge(rates::routes())
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> ApiError {
    AppError::NotFound(format!("No route for {}", uri.path())).into()
}

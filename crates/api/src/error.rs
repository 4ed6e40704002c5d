//! JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use sarrafa_core::currency::CurrencyError;
use sarrafa_rates::RatesError;
use sarrafa_shared::AppError;

/// Error rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl ApiError {
    /// Builds an error with an explicit status and code.
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// 400 with a `validation_error` code.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self::new(status, err.error_code().to_ascii_lowercase(), err.to_string())
    }
}

impl From<CurrencyError> for ApiError {
    fn from(err: CurrencyError) -> Self {
        let (status, code) = match &err {
            CurrencyError::CurrencyNotFound(_) => (StatusCode::NOT_FOUND, "currency_not_found"),
            CurrencyError::InvalidRate { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_rate"),
            CurrencyError::InvalidSpread { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_spread")
            }
            CurrencyError::AmountOutOfRange => {
                (StatusCode::UNPROCESSABLE_ENTITY, "amount_out_of_range")
            }
            CurrencyError::DuplicateCurrency(_) => {
                error!(error = %err, "Rate board is inconsistent");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        Self::new(status, code, err.to_string())
    }
}

impl From<RatesError> for ApiError {
    fn from(err: RatesError) -> Self {
        AppError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

//! Rate source and cache error types.

use sarrafa_core::currency::CurrencyError;
use sarrafa_shared::{AppError, CurrencyCode};
use thiserror::Error;

/// Errors from fetching, applying or persisting rates.
#[derive(Debug, Error)]
pub enum RatesError {
    /// No API key configured for the provider.
    #[error("Rate provider API key is not configured")]
    MissingApiKey,

    /// Transport failure talking to the provider.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with an error result.
    #[error("Rate provider returned an error: {0}")]
    Provider(String),

    /// Quotes are against a different base currency than the board.
    #[error("Rates quoted against {got}, board expects {expected}")]
    BaseMismatch {
        /// Board base currency.
        expected: CurrencyCode,
        /// Provider base currency.
        got: CurrencyCode,
    },

    /// Nothing to refresh.
    #[error("No currencies on the rate board")]
    NoCurrencies,

    /// Snapshot file could not be read or written.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot or seed list violates a board invariant.
    #[error("Invalid rate board: {0}")]
    InvalidBoard(#[from] CurrencyError),
}

impl From<RatesError> for AppError {
    fn from(err: RatesError) -> Self {
        match err {
            RatesError::MissingApiKey | RatesError::NoCurrencies => {
                Self::BusinessRule(err.to_string())
            }
            RatesError::Http(_) | RatesError::Provider(_) | RatesError::BaseMismatch { .. } => {
                Self::ExternalService(err.to_string())
            }
            RatesError::Io(_) | RatesError::Serialization(_) => Self::Storage(err.to_string()),
            RatesError::InvalidBoard(_) => Self::Internal(err.to_string()),
        }
    }
}

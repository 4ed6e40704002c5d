//! Currency error types.

use rust_decimal::Decimal;
use thiserror::Error;

use sarrafa_shared::CurrencyCode;

/// Currency-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Code is not on the rate board, or is not currently offered.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(CurrencyCode),

    /// A rate needed for the calculation is zero or negative.
    #[error("Invalid {kind} rate {rate} for {code}")]
    InvalidRate {
        /// Currency whose rate is unusable.
        code: CurrencyCode,
        /// Which side of the quote ("buy", "sell" or "current").
        kind: &'static str,
        /// The offending rate.
        rate: Decimal,
    },

    /// Sell rate is below the buy rate.
    #[error("Sell rate {sell} is below buy rate {buy} for {code}")]
    InvalidSpread {
        /// Currency with the inverted spread.
        code: CurrencyCode,
        /// Buy rate.
        buy: Decimal,
        /// Sell rate.
        sell: Decimal,
    },

    /// The same code appears twice on the board (or the base is listed).
    #[error("Duplicate currency on rate board: {0}")]
    DuplicateCurrency(CurrencyCode),

    /// Arithmetic left the representable decimal range.
    #[error("Amount out of range")]
    AmountOutOfRange,
}

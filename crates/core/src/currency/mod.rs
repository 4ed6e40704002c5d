//! Rate board, buy/sell pricing and currency conversion.
//!
//! Every rate is quoted in units of the shop's base currency per one unit of
//! the foreign currency. Conversions that involve two foreign currencies pivot
//! through the base currency.

pub mod conversion;
pub mod error;
pub mod explanation;
pub mod pricing;
pub mod table;
pub mod types;

#[cfg(test)]
mod props;

pub use conversion::{convert, format_amount, parse_amount, round_amount};
pub use error::CurrencyError;
pub use explanation::{amount_too_large_message, not_found_message, rate_unavailable_message};
pub use pricing::{DEFAULT_COMMISSION_AGOROT, RateQuote, invert_base_quotes};
pub use table::CurrencyTable;
pub use types::{
    Breakdown, ConversionRequest, ConversionResult, Currency, Operation, RateKind, Side,
};

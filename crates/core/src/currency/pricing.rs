//! Buy/sell pricing from a market rate and the shop's commissions.
//!
//! Commissions are stored in agorot (1/100 of the base unit): a 6 agorot
//! commission on a 3.65 market rate buys at 3.59 and sells at 3.71.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use sarrafa_shared::CurrencyCode;

use super::error::CurrencyError;
use super::types::Currency;

/// Commission applied when a currency does not set its own, in agorot.
pub const DEFAULT_COMMISSION_AGOROT: u32 = 6;

/// Decimal places kept when inverting provider quotes.
const INVERTED_RATE_DECIMAL_PLACES: u32 = 8;

/// Market rate with the shop's buy and sell rates derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuote {
    /// Market mid rate.
    pub current: Decimal,
    /// `current - buy_commission / 100`
    pub buy: Decimal,
    /// `current + sell_commission / 100`
    pub sell: Decimal,
}

impl RateQuote {
    /// Derives buy and sell rates from commissions given in agorot.
    #[must_use]
    pub fn with_commission(current: Decimal, buy_commission: Decimal, sell_commission: Decimal) -> Self {
        Self {
            current,
            buy: current - buy_commission / Decimal::ONE_HUNDRED,
            sell: current + sell_commission / Decimal::ONE_HUNDRED,
        }
    }
}

impl Currency {
    /// Prices this currency from a fresh market rate using its commissions.
    ///
    /// Leaves the currency untouched on error.
    ///
    /// # Errors
    ///
    /// - `InvalidRate` if the market rate or the derived buy rate is not positive
    /// - `InvalidSpread` if negative commissions invert the spread
    pub fn apply_market_rate(
        &mut self,
        current: Decimal,
        now: DateTime<Utc>,
    ) -> Result<RateQuote, CurrencyError> {
        if current <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: self.code.clone(),
                kind: "current",
                rate: current,
            });
        }

        let default = Decimal::from(DEFAULT_COMMISSION_AGOROT);
        let quote = RateQuote::with_commission(
            current,
            self.buy_commission.unwrap_or(default),
            self.sell_commission.unwrap_or(default),
        );

        if quote.buy <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: self.code.clone(),
                kind: "buy",
                rate: quote.buy,
            });
        }
        if quote.sell < quote.buy {
            return Err(CurrencyError::InvalidSpread {
                code: self.code.clone(),
                buy: quote.buy,
                sell: quote.sell,
            });
        }

        self.current_rate = quote.current;
        self.buy_rate = quote.buy;
        self.sell_rate = quote.sell;
        self.updated_at = Some(now);
        Ok(quote)
    }
}

/// Turns "1 BASE = x FOREIGN" quotes into "1 FOREIGN = 1/x BASE" rates.
///
/// Malformed codes and non-positive quotes are dropped.
pub fn invert_base_quotes<I, S>(quotes: I) -> BTreeMap<CurrencyCode, Decimal>
where
    I: IntoIterator<Item = (S, Decimal)>,
    S: AsRef<str>,
{
    quotes
        .into_iter()
        .filter(|(_, quote)| *quote > Decimal::ZERO)
        .filter_map(|(code, quote)| {
            let code = code.as_ref().parse::<CurrencyCode>().ok()?;
            let rate = Decimal::ONE
                .checked_div(quote)?
                .round_dp_with_strategy(INVERTED_RATE_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
            (rate > Decimal::ZERO).then_some((code, rate))
        })
        .collect()
}

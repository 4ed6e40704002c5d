//! Where market rates come from.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use sarrafa_shared::CurrencyCode;

use crate::error::RatesError;
use crate::exchangerate_api::UsageStats;

/// Market rates against one base currency.
///
/// Each rate is base-currency units per one unit of the foreign currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRates {
    /// Currency the rates are quoted against.
    pub base: CurrencyCode,
    /// Rate per foreign currency.
    pub rates: BTreeMap<CurrencyCode, Decimal>,
    /// When the rates were obtained.
    pub fetched_at: DateTime<Utc>,
}

/// Source of market rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Fetches the latest rates against `base`.
    async fn latest(&self, base: &CurrencyCode) -> Result<MarketRates, RatesError>;

    /// Request quota, for providers that meter requests.
    async fn usage(&self) -> Result<Option<UsageStats>, RatesError> {
        Ok(None)
    }
}

/// Built-in ILS rate table, used when no provider key is configured.
const STATIC_ILS_RATES: &[(&str, i64, u32)] = &[
    ("USD", 365, 2),
    ("EUR", 395, 2),
    ("GBP", 460, 2),
    ("CHF", 410, 2),
    ("CAD", 270, 2),
    ("AUD", 240, 2),
    ("JPY", 25, 3),
    ("SEK", 35, 2),
    ("NOK", 34, 2),
    ("DKK", 54, 2),
    ("TRY", 12, 2),
    ("RUB", 37, 3),
    ("CNY", 51, 2),
    ("KRW", 28, 4),
    ("THB", 105, 3),
    ("SGD", 275, 2),
    ("HKD", 48, 2),
    ("MXN", 19, 2),
    ("BRL", 62, 2),
    ("AED", 100, 2),
    ("SAR", 98, 2),
    ("EGP", 75, 3),
    ("JOD", 520, 2),
    ("KWD", 1200, 2),
    ("QAR", 101, 2),
];

/// Serves a fixed rate table.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl StaticRateProvider {
    /// Provider for the built-in ILS table.
    #[must_use]
    pub fn new() -> Self {
        let rates = STATIC_ILS_RATES
            .iter()
            .filter_map(|(code, mantissa, scale)| {
                let code = code.parse().ok()?;
                Some((code, Decimal::new(*mantissa, *scale)))
            })
            .collect();

        Self {
            base: CurrencyCode::ils(),
            rates,
        }
    }

    /// Provider for an arbitrary table.
    #[must_use]
    pub fn with_rates(base: CurrencyCode, rates: BTreeMap<CurrencyCode, Decimal>) -> Self {
        Self { base, rates }
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn latest(&self, base: &CurrencyCode) -> Result<MarketRates, RatesError> {
        if *base != self.base {
            return Err(RatesError::BaseMismatch {
                expected: base.clone(),
                got: self.base.clone(),
            });
        }

        Ok(MarketRates {
            base: self.base.clone(),
            rates: self.rates.clone(),
            fetched_at: Utc::now(),
        })
    }
}

//! Applies fetched market rates to the board.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use sarrafa_shared::CurrencyCode;

use crate::board::RateBoard;
use crate::error::RatesError;
use crate::exchangerate_api::UsageStats;
use crate::provider::{MarketRates, RateProvider};

/// Outcome of one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Currencies whose rates were updated.
    pub updated: usize,
    /// Currencies the provider had no quote for.
    pub missing: Vec<CurrencyCode>,
    /// Currencies whose quote could not be priced (e.g. commission exceeds rate).
    pub rejected: Vec<CurrencyCode>,
    /// When the rates were applied.
    pub refreshed_at: DateTime<Utc>,
}

/// Pulls rates from a provider and prices the board with them.
#[derive(Clone)]
pub struct RateRefresher {
    provider: Arc<dyn RateProvider>,
}

impl RateRefresher {
    /// Creates a refresher over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Request quota of the underlying provider, if it reports one.
    pub async fn usage(&self) -> Result<Option<UsageStats>, RatesError> {
        self.provider.usage().await
    }

    /// Fetches rates without touching the board.
    pub async fn fetch(&self, base: &CurrencyCode) -> Result<MarketRates, RatesError> {
        self.provider.latest(base).await
    }

    /// Fetches and applies in one step.
    pub async fn refresh(&self, board: &mut RateBoard) -> Result<RefreshReport, RatesError> {
        let rates = self.fetch(board.table.base()).await?;
        Self::apply(board, &rates)
    }

    /// Prices every listed currency that has a quote.
    ///
    /// Currencies without a quote keep their previous rates.
    pub fn apply(board: &mut RateBoard, rates: &MarketRates) -> Result<RefreshReport, RatesError> {
        if board.table.is_empty() {
            return Err(RatesError::NoCurrencies);
        }
        if rates.base != *board.table.base() {
            return Err(RatesError::BaseMismatch {
                expected: board.table.base().clone(),
                got: rates.base.clone(),
            });
        }

        let now = rates.fetched_at;
        let codes: Vec<CurrencyCode> = board
            .table
            .currencies()
            .iter()
            .map(|c| c.code.clone())
            .collect();

        let mut updated = 0;
        let mut missing = Vec::new();
        let mut rejected = Vec::new();

        for code in codes {
            let (Some(rate), Some(currency)) = (rates.rates.get(&code), board.table.get_mut(&code))
            else {
                warn!(currency = %code, "No market rate for currency");
                missing.push(code);
                continue;
            };

            match currency.apply_market_rate(*rate, now) {
                Ok(quote) => {
                    updated += 1;
                    info!(
                        currency = %code,
                        current = %quote.current,
                        buy = %quote.buy,
                        sell = %quote.sell,
                        "Currency rate updated"
                    );
                }
                Err(e) => {
                    warn!(currency = %code, error = %e, "Market rate rejected");
                    rejected.push(code);
                }
            }
        }

        board.last_update = Some(now);
        info!(updated, missing = missing.len(), rejected = rejected.len(), "Rate board refreshed");

        Ok(RefreshReport {
            updated,
            missing,
            rejected,
            refreshed_at: now,
        })
    }
}

//! The rate board the service serves and refreshes.

use chrono::{DateTime, Duration, Utc};

use sarrafa_core::currency::{Currency, CurrencyTable};
use sarrafa_shared::CurrencyCode;
use sarrafa_shared::config::CurrencySeed;

use crate::error::RatesError;

/// Currency table plus the time rates were last applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateBoard {
    /// Currencies and their rates.
    pub table: CurrencyTable,
    /// Last successful refresh, if any.
    pub last_update: Option<DateTime<Utc>>,
}

impl RateBoard {
    /// Wraps a table that has never been refreshed.
    #[must_use]
    pub const fn new(table: CurrencyTable) -> Self {
        Self {
            table,
            last_update: None,
        }
    }

    /// Builds an unpriced board from configured seeds.
    pub fn from_seeds(base: CurrencyCode, seeds: &[CurrencySeed]) -> Result<Self, RatesError> {
        let currencies = seeds.iter().map(Currency::from).collect();
        Ok(Self::new(CurrencyTable::new(base, currencies)?))
    }

    /// Copies rates from a cached board for currencies still listed here.
    ///
    /// Names, commissions and `is_active` stay as configured. `last_update` is
    /// taken from the cache only if every listed currency had cached rates, so a
    /// newly configured currency makes the board stale. Returns the number of
    /// currencies restored.
    pub fn restore_rates(&mut self, cached: &RateBoard) -> usize {
        if cached.table.base() != self.table.base() {
            return 0;
        }

        let mut restored = 0;
        let codes: Vec<CurrencyCode> = self
            .table
            .currencies()
            .iter()
            .map(|c| c.code.clone())
            .collect();
        for code in &codes {
            let (Some(current), Some(old)) = (self.table.get_mut(code), cached.table.get(code))
            else {
                continue;
            };
            current.current_rate = old.current_rate;
            current.buy_rate = old.buy_rate;
            current.sell_rate = old.sell_rate;
            current.updated_at = old.updated_at;
            restored += 1;
        }

        self.last_update = if restored == codes.len() {
            cached.last_update
        } else {
            None
        };
        restored
    }

    /// Returns true if the board should be refreshed.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        is_stale(self.last_update, now, max_age)
    }
}

/// A board never refreshed is stale; otherwise it is stale once `max_age` has passed.
#[must_use]
pub fn is_stale(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>, max_age: Duration) -> bool {
    last_update.is_none_or(|last| now - last >= max_age)
}

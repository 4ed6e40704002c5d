//! The rate board: every foreign currency the shop trades, keyed by code.

use std::collections::HashSet;

use serde::Serialize;

use sarrafa_shared::CurrencyCode;

use super::error::CurrencyError;
use super::types::Currency;

/// In-memory rate board quoted against a single base currency.
///
/// The base currency itself is never listed; it is implied by `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyTable {
    base: CurrencyCode,
    currencies: Vec<Currency>,
}

impl CurrencyTable {
    /// Builds a board, rejecting duplicates and inverted spreads.
    pub fn new(base: CurrencyCode, currencies: Vec<Currency>) -> Result<Self, CurrencyError> {
        let mut seen = HashSet::new();
        for currency in &currencies {
            if currency.code == base || !seen.insert(&currency.code) {
                return Err(CurrencyError::DuplicateCurrency(currency.code.clone()));
            }
            currency.validate()?;
        }

        Ok(Self { base, currencies })
    }

    /// Creates a board with no foreign currencies.
    #[must_use]
    pub const fn empty(base: CurrencyCode) -> Self {
        Self {
            base,
            currencies: Vec::new(),
        }
    }

    /// The base (local) currency.
    #[must_use]
    pub const fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Returns true if `code` is the base currency.
    #[must_use]
    pub fn is_base(&self, code: &CurrencyCode) -> bool {
        *code == self.base
    }

    /// All listed currencies, in board order.
    #[must_use]
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Number of listed foreign currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Returns true if no foreign currency is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Finds a listed currency whether or not it is active.
    #[must_use]
    pub fn get(&self, code: &CurrencyCode) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == *code)
    }

    /// Mutable access for applying fresh rates.
    pub fn get_mut(&mut self, code: &CurrencyCode) -> Option<&mut Currency> {
        self.currencies.iter_mut().find(|c| c.code == *code)
    }

    /// Iterates the currencies offered in the calculator.
    pub fn active(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter().filter(|c| c.is_active)
    }

    /// Finds an active currency for calculation.
    ///
    /// Missing and inactive codes are both reported as `CurrencyNotFound`.
    pub fn lookup(&self, code: &CurrencyCode) -> Result<&Currency, CurrencyError> {
        self.active()
            .find(|c| c.code == *code)
            .ok_or_else(|| CurrencyError::CurrencyNotFound(code.clone()))
    }

    /// Codes the calculator cycles through: the base first, then active currencies.
    #[must_use]
    pub fn calculator_codes(&self) -> Vec<CurrencyCode> {
        std::iter::once(self.base.clone())
            .chain(self.active().map(|c| c.code.clone()))
            .collect()
    }

    /// Consumes the board, returning its currencies.
    #[must_use]
    pub fn into_currencies(self) -> Vec<Currency> {
        self.currencies
    }
}

//! Currency, conversion request and conversion result types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sarrafa_shared::CurrencyCode;
use sarrafa_shared::config::CurrencySeed;

use super::error::CurrencyError;

/// A foreign currency on the shop's rate board.
///
/// Rates are base-currency units per one unit of this currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency code.
    pub code: CurrencyCode,
    /// Arabic display name.
    pub name_ar: String,
    /// English display name.
    pub name_en: String,
    /// Hebrew display name.
    #[serde(default)]
    pub name_he: Option<String>,
    /// Market mid rate as last fetched.
    pub current_rate: Decimal,
    /// Rate at which the shop buys this currency from a customer.
    pub buy_rate: Decimal,
    /// Rate at which the shop sells this currency to a customer.
    pub sell_rate: Decimal,
    /// Buy commission in agorot; the default applies when unset.
    #[serde(default)]
    pub buy_commission: Option<Decimal>,
    /// Sell commission in agorot; the default applies when unset.
    #[serde(default)]
    pub sell_commission: Option<Decimal>,
    /// Whether the currency is offered in the calculator.
    pub is_active: bool,
    /// When the rates were last applied.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Currency {
    /// Creates an active currency with explicit buy and sell rates.
    ///
    /// The current rate is set to the midpoint of the spread and the code is
    /// used as the display name.
    #[must_use]
    pub fn new(code: CurrencyCode, buy_rate: Decimal, sell_rate: Decimal) -> Self {
        let name = code.to_string();
        Self {
            code,
            name_ar: name.clone(),
            name_en: name,
            name_he: None,
            current_rate: (buy_rate + sell_rate) / Decimal::TWO,
            buy_rate,
            sell_rate,
            buy_commission: None,
            sell_commission: None,
            is_active: true,
            updated_at: None,
        }
    }

    /// Marks the currency as not offered.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns true once a market rate has been applied.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.current_rate > Decimal::ZERO
    }

    /// Checks the spread invariant (`sell_rate >= buy_rate`).
    pub fn validate(&self) -> Result<(), CurrencyError> {
        if self.sell_rate < self.buy_rate {
            return Err(CurrencyError::InvalidSpread {
                code: self.code.clone(),
                buy: self.buy_rate,
                sell: self.sell_rate,
            });
        }
        Ok(())
    }
}

impl From<&CurrencySeed> for Currency {
    /// Seeds start unpriced; the first refresh fills in the rates.
    fn from(seed: &CurrencySeed) -> Self {
        Self {
            code: seed.code.clone(),
            name_ar: seed.name_ar.clone(),
            name_en: seed.name_en.clone(),
            name_he: seed.name_he.clone(),
            current_rate: Decimal::ZERO,
            buy_rate: Decimal::ZERO,
            sell_rate: Decimal::ZERO,
            buy_commission: seed.buy_commission,
            sell_commission: seed.sell_commission,
            is_active: seed.is_active,
            updated_at: None,
        }
    }
}

/// Which of the two calculator fields the user last edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The amount is in the *from* currency; solve for the *to* amount.
    #[default]
    Left,
    /// The amount is in the *to* currency; solve for the *from* amount.
    Right,
}

/// Input to [`convert`](super::convert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Amount typed into the edited field.
    pub amount: Decimal,
    /// Currency of the left field.
    pub from: CurrencyCode,
    /// Currency of the right field.
    pub to: CurrencyCode,
    /// Field the amount was typed into.
    #[serde(default)]
    pub side: Side,
}

/// Side of the quote used by a conversion leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Shop buys the foreign currency.
    Buy,
    /// Shop sells the foreign currency.
    Sell,
}

/// Arithmetic applied by a single-leg conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `amount × rate`
    Multiply,
    /// `amount ÷ rate`
    Divide,
}

impl Operation {
    /// Operator symbol used in explanations.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

/// Structured description of how a result was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakdown {
    /// Both fields hold the same currency.
    SameCurrency,
    /// One side is the base currency.
    Direct {
        /// Input amount.
        amount: Decimal,
        /// Currency of the input amount.
        amount_currency: CurrencyCode,
        /// Arithmetic applied.
        operation: Operation,
        /// Rate used.
        rate: Decimal,
        /// Side of the quote the rate came from.
        rate_kind: RateKind,
        /// Rounded result.
        result: Decimal,
        /// Currency of the result.
        result_currency: CurrencyCode,
    },
    /// Two foreign currencies, pivoting through the base currency.
    Cross {
        /// Input amount.
        amount: Decimal,
        /// Currency of the input amount.
        amount_currency: CurrencyCode,
        /// Rate that takes the input into the base currency.
        to_base_rate: Decimal,
        /// Unrounded base-currency amount.
        base_amount: Decimal,
        /// The base currency.
        base_currency: CurrencyCode,
        /// Rate that takes the base amount into the result currency.
        from_base_rate: Decimal,
        /// Rounded result.
        result: Decimal,
        /// Currency of the result.
        result_currency: CurrencyCode,
    },
}

/// Output of [`convert`](super::convert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Result rounded to 2 decimal places.
    pub converted_amount: Decimal,
    /// Legs of the calculation.
    pub breakdown: Breakdown,
    /// Breakdown rendered for display.
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        "USD".parse().unwrap()
    }

    #[test]
    fn test_new_sets_midpoint() {
        let currency = Currency::new(usd(), dec!(3.59), dec!(3.71));
        assert_eq!(currency.current_rate, dec!(3.65));
        assert!(currency.is_active);
        assert!(currency.is_priced());
        assert_eq!(currency.name_en, "USD");
    }

    #[test]
    fn test_validate_spread() {
        assert!(Currency::new(usd(), dec!(3.59), dec!(3.71)).validate().is_ok());
        assert!(Currency::new(usd(), dec!(3.65), dec!(3.65)).validate().is_ok());

        let err = Currency::new(usd(), dec!(3.71), dec!(3.59))
            .validate()
            .unwrap_err();
        assert!(matches!(err, CurrencyError::InvalidSpread { .. }));
    }

    #[test]
    fn test_from_seed_is_unpriced() {
        let seed = CurrencySeed {
            code: usd(),
            name_ar: "دولار أمريكي".to_string(),
            name_en: "US Dollar".to_string(),
            name_he: Some("דולר אמריקאי".to_string()),
            buy_commission: Some(dec!(4)),
            sell_commission: None,
            is_active: false,
        };
        let currency = Currency::from(&seed);
        assert!(!currency.is_priced());
        assert!(!currency.is_active);
        assert_eq!(currency.buy_commission, Some(dec!(4)));
        assert_eq!(currency.name_he.as_deref(), Some("דולר אמריקאי"));
    }

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
        let side: Side = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(side, Side::Right);
    }
}

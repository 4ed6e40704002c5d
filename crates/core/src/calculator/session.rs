//! Calculator session: two amount fields, two currencies and a breakdown line.
//!
//! Every edit recomputes the opposite field from the one just typed into.
//! Errors never escape a session; they are shown in `details` instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sarrafa_shared::{CurrencyCode, Language};

use crate::currency::{
    ConversionRequest, CurrencyError, CurrencyTable, Side, amount_too_large_message, convert,
    format_amount, not_found_message, parse_amount, rate_unavailable_message,
};

/// Calculator state handed to the customer-details step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Left currency.
    pub from_currency: CurrencyCode,
    /// Right currency.
    pub to_currency: CurrencyCode,
    /// Left amount as displayed.
    pub from_amount: String,
    /// Right amount as displayed.
    pub to_amount: String,
    /// Breakdown line as displayed.
    pub calculation_details: String,
    /// When the draft was taken.
    pub created_at: DateTime<Utc>,
    /// Always true; marks drafts that came from the calculator.
    pub from_calculator: bool,
}

/// Two-field currency calculator.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    from: CurrencyCode,
    to: CurrencyCode,
    from_amount: String,
    to_amount: String,
    details: String,
    input_side: Side,
    language: Language,
    open: bool,
}

impl CalculatorSession {
    /// Creates a closed session converting from the base currency.
    ///
    /// The right field starts on USD when it is offered, otherwise on the
    /// first active currency.
    #[must_use]
    pub fn new(table: &CurrencyTable, language: Language) -> Self {
        let usd: Option<CurrencyCode> = "USD".parse().ok();
        let to = usd
            .filter(|code| table.lookup(code).is_ok())
            .or_else(|| table.active().next().map(|c| c.code.clone()))
            .unwrap_or_else(|| table.base().clone());

        Self {
            from: table.base().clone(),
            to,
            from_amount: String::new(),
            to_amount: String::new(),
            details: String::new(),
            input_side: Side::Left,
            language,
            open: false,
        }
    }

    /// Left currency.
    #[must_use]
    pub const fn from_currency(&self) -> &CurrencyCode {
        &self.from
    }

    /// Right currency.
    #[must_use]
    pub const fn to_currency(&self) -> &CurrencyCode {
        &self.to
    }

    /// Left field text.
    #[must_use]
    pub fn from_amount(&self) -> &str {
        &self.from_amount
    }

    /// Right field text.
    #[must_use]
    pub fn to_amount(&self) -> &str {
        &self.to_amount
    }

    /// Breakdown or fallback message.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Field last edited.
    #[must_use]
    pub const fn input_side(&self) -> Side {
        self.input_side
    }

    /// Display language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Whether the calculator is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Changes the display language; takes effect on the next recompute.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Opens the calculator with empty fields.
    ///
    /// Opening on a foreign currency (a row tapped on the rate board)
    /// preselects base -> that currency.
    pub fn open(&mut self, currency: Option<&CurrencyCode>, table: &CurrencyTable) {
        self.open = true;
        if let Some(code) = currency.filter(|code| !table.is_base(code)) {
            self.from = table.base().clone();
            self.to = code.clone();
        }
        self.clear();
    }

    /// Closes the calculator and clears it.
    pub fn close(&mut self) {
        self.open = false;
        self.clear();
    }

    /// User typed into the left field.
    pub fn edit_from(&mut self, text: &str, table: &CurrencyTable) {
        self.from_amount = text.to_string();
        self.input_side = Side::Left;
        self.recompute(text, Side::Left, table);
    }

    /// User typed into the right field.
    pub fn edit_to(&mut self, text: &str, table: &CurrencyTable) {
        self.to_amount = text.to_string();
        self.input_side = Side::Right;
        self.recompute(text, Side::Right, table);
    }

    /// Swaps currencies and amounts, then recomputes from the left field.
    pub fn swap(&mut self, table: &CurrencyTable) {
        std::mem::swap(&mut self.from, &mut self.to);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);

        if !self.from_amount.is_empty() {
            let text = self.from_amount.clone();
            self.recompute(&text, Side::Left, table);
        }
    }

    /// Advances the left currency to the next one the calculator offers.
    pub fn cycle_from(&mut self, table: &CurrencyTable) {
        self.from = next_code(&self.from, table);
        self.recompute_from_left(table);
    }

    /// Advances the right currency to the next one the calculator offers.
    pub fn cycle_to(&mut self, table: &CurrencyTable) {
        self.to = next_code(&self.to, table);
        self.recompute_from_left(table);
    }

    /// Takes a draft of the current figures and closes the calculator.
    pub fn proceed(&mut self) -> TransactionDraft {
        let draft = TransactionDraft {
            from_currency: self.from.clone(),
            to_currency: self.to.clone(),
            from_amount: self.from_amount.clone(),
            to_amount: self.to_amount.clone(),
            calculation_details: self.details.clone(),
            created_at: Utc::now(),
            from_calculator: true,
        };
        self.close();
        draft
    }

    fn recompute_from_left(&mut self, table: &CurrencyTable) {
        if !self.from_amount.is_empty() {
            let text = self.from_amount.clone();
            self.recompute(&text, Side::Left, table);
        }
    }

    fn recompute(&mut self, text: &str, side: Side, table: &CurrencyTable) {
        let Some(amount) = parse_amount(text) else {
            self.clear();
            return;
        };

        let request = ConversionRequest {
            amount,
            from: self.from.clone(),
            to: self.to.clone(),
            side,
        };

        match convert(&request, table, self.language) {
            Ok(result) => {
                let formatted = format_amount(result.converted_amount);
                match side {
                    Side::Left => self.to_amount = formatted,
                    Side::Right => self.from_amount = formatted,
                }
                self.details = result.explanation;
            }
            Err(CurrencyError::CurrencyNotFound(_)) => {
                self.details = not_found_message(self.language).to_string();
            }
            Err(CurrencyError::AmountOutOfRange) => {
                match side {
                    Side::Left => self.to_amount.clear(),
                    Side::Right => self.from_amount.clear(),
                }
                self.details = amount_too_large_message(self.language).to_string();
            }
            Err(_) => {
                self.details = rate_unavailable_message(self.language).to_string();
            }
        }
    }

    fn clear(&mut self) {
        self.from_amount.clear();
        self.to_amount.clear();
        self.details.clear();
    }
}

/// Next code in the calculator's cycle; an unknown code restarts at the base.
fn next_code(current: &CurrencyCode, table: &CurrencyTable) -> CurrencyCode {
    let codes = table.calculator_codes();
    let next = codes
        .iter()
        .position(|code| code == current)
        .map_or(0, |index| (index + 1) % codes.len());
    codes[next].clone()
}

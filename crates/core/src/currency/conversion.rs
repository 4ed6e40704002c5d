//! Currency conversion logic.
//!
//! Rounding strategy:
//! - Results are rounded to 2 decimal places, midpoint away from zero, which
//!   is what the rate board shows to customers
//! - The intermediate base-currency amount of a cross conversion is kept
//!   unrounded for the arithmetic

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use sarrafa_shared::{CurrencyCode, Language};

use super::error::CurrencyError;
use super::explanation::render;
use super::table::CurrencyTable;
use super::types::{
    Breakdown, ConversionRequest, ConversionResult, Currency, Operation, RateKind, Side,
};

/// Decimal places shown for converted amounts.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Converts an amount between two currencies on the board.
///
/// With [`Side::Left`] the amount is in `from` and the result is in `to`.
/// With [`Side::Right`] the amount is in `to` and the result is the matching
/// `from` amount. The shop buys foreign currency at its buy rate and sells at
/// its sell rate; two foreign currencies pivot through the base currency.
///
/// # Errors
///
/// - `CurrencyNotFound` if a non-base code is missing or inactive
/// - `InvalidRate` if a rate needed for the calculation is not positive
/// - `AmountOutOfRange` if the arithmetic overflows
pub fn convert(
    request: &ConversionRequest,
    table: &CurrencyTable,
    language: Language,
) -> Result<ConversionResult, CurrencyError> {
    let from = resolve(table, &request.from)?;
    let to = resolve(table, &request.to)?;

    let amount = request.amount;
    let breakdown = if request.from == request.to {
        Breakdown::SameCurrency
    } else {
        match (request.side, from, to) {
            // Left, into base: the shop buys `from`.
            (Side::Left, Some(from), None) => direct(
                amount,
                from,
                Operation::Multiply,
                RateKind::Buy,
                table,
                DirectLeg::ToBase,
            )?,
            // Left, out of base: the shop sells `to`.
            (Side::Left, None, Some(to)) => direct(
                amount,
                to,
                Operation::Divide,
                RateKind::Sell,
                table,
                DirectLeg::FromBase,
            )?,
            (Side::Left, Some(from), Some(to)) => {
                cross(amount, from, RateKind::Buy, to, RateKind::Sell, table)?
            }
            // Right, into base: how much `from` buys this many base units.
            (Side::Right, Some(from), None) => direct(
                amount,
                from,
                Operation::Divide,
                RateKind::Buy,
                table,
                DirectLeg::FromBase,
            )?,
            // Right, out of base: base units needed for this much `to`.
            (Side::Right, None, Some(to)) => direct(
                amount,
                to,
                Operation::Multiply,
                RateKind::Sell,
                table,
                DirectLeg::ToBase,
            )?,
            (Side::Right, Some(from), Some(to)) => {
                cross(amount, to, RateKind::Sell, from, RateKind::Buy, table)?
            }
            // Both sides are the base currency, caught by the equality check above.
            (_, None, None) => Breakdown::SameCurrency,
        }
    };

    let converted_amount = match &breakdown {
        Breakdown::SameCurrency => format_decimal(amount),
        Breakdown::Direct { result, .. } | Breakdown::Cross { result, .. } => *result,
    };
    let explanation = render(&breakdown, language);

    Ok(ConversionResult {
        converted_amount,
        breakdown,
        explanation,
    })
}

/// Looks up a foreign currency; the base currency resolves to `None`.
fn resolve<'a>(
    table: &'a CurrencyTable,
    code: &CurrencyCode,
) -> Result<Option<&'a Currency>, CurrencyError> {
    if table.is_base(code) {
        Ok(None)
    } else {
        table.lookup(code).map(Some)
    }
}

/// Whether a direct leg moves the amount into or out of the base currency.
#[derive(Clone, Copy)]
enum DirectLeg {
    ToBase,
    FromBase,
}

fn direct(
    amount: Decimal,
    foreign: &Currency,
    operation: Operation,
    rate_kind: RateKind,
    table: &CurrencyTable,
    leg: DirectLeg,
) -> Result<Breakdown, CurrencyError> {
    let rate = usable_rate(foreign, rate_kind)?;
    let raw = apply(amount, operation, rate)?;

    let (amount_currency, result_currency) = match leg {
        DirectLeg::ToBase => (foreign.code.clone(), table.base().clone()),
        DirectLeg::FromBase => (table.base().clone(), foreign.code.clone()),
    };

    Ok(Breakdown::Direct {
        amount,
        amount_currency,
        operation,
        rate,
        rate_kind,
        result: format_decimal(raw),
        result_currency,
    })
}

/// `amount × source rate ÷ target rate`, through the base currency.
fn cross(
    amount: Decimal,
    source: &Currency,
    source_kind: RateKind,
    target: &Currency,
    target_kind: RateKind,
    table: &CurrencyTable,
) -> Result<Breakdown, CurrencyError> {
    let to_base_rate = usable_rate(source, source_kind)?;
    let from_base_rate = usable_rate(target, target_kind)?;

    let base_amount = apply(amount, Operation::Multiply, to_base_rate)?;
    let raw = apply(base_amount, Operation::Divide, from_base_rate)?;

    Ok(Breakdown::Cross {
        amount,
        amount_currency: source.code.clone(),
        to_base_rate,
        base_amount,
        base_currency: table.base().clone(),
        from_base_rate,
        result: format_decimal(raw),
        result_currency: target.code.clone(),
    })
}

fn usable_rate(currency: &Currency, kind: RateKind) -> Result<Decimal, CurrencyError> {
    let (rate, label) = match kind {
        RateKind::Buy => (currency.buy_rate, "buy"),
        RateKind::Sell => (currency.sell_rate, "sell"),
    };
    if rate <= Decimal::ZERO {
        return Err(CurrencyError::InvalidRate {
            code: currency.code.clone(),
            kind: label,
            rate,
        });
    }
    Ok(rate)
}

fn apply(amount: Decimal, operation: Operation, rate: Decimal) -> Result<Decimal, CurrencyError> {
    match operation {
        Operation::Multiply => amount.checked_mul(rate),
        Operation::Divide => amount.checked_div(rate),
    }
    .ok_or(CurrencyError::AmountOutOfRange)
}

/// Rounds to 2 decimal places, midpoint away from zero.
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds and fixes the scale at 2 so `359` renders as `359.00`.
fn format_decimal(value: Decimal) -> Decimal {
    let mut rounded = round_amount(value);
    rounded.rescale(AMOUNT_DECIMAL_PLACES);
    rounded
}

/// Formats an amount with exactly 2 decimal places.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    format_decimal(value).to_string()
}

/// Parses a calculator field.
///
/// Returns `None` for empty, non-numeric or negative input; callers treat
/// that as "clear both fields" rather than an error. A trailing decimal
/// point is accepted so partially typed values like `"12."` still convert.
#[must_use]
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }

    let amount: Decimal = trimmed.parse().ok()?;
    if amount.is_sign_negative() {
        return None;
    }
    Some(amount)
}

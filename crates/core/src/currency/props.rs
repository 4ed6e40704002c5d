//! Property-based tests for currency conversion.
//!
//! - Identity: same-currency conversion returns the amount
//! - Results carry at most 2 decimal places
//! - Into the base currency uses the buy rate, out of it the sell rate
//! - A round trip through the base currency never gains more than rounding

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sarrafa_shared::{CurrencyCode, Language};

use super::conversion::{convert, round_amount};
use super::table::CurrencyTable;
use super::types::{ConversionRequest, Currency, Side};

/// Strategy to generate amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate buy rates (0.5000 to 20.0000).
fn buy_rate() -> impl Strategy<Value = Decimal> {
    (5_000i64..200_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate spreads (0.00 to 0.20).
fn spread() -> impl Strategy<Value = Decimal> {
    (0i64..=20i64).prop_map(|v| Decimal::new(v, 2))
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

fn board(usd_buy: Decimal, usd_spread: Decimal, eur_buy: Decimal, eur_spread: Decimal) -> CurrencyTable {
    CurrencyTable::new(
        CurrencyCode::ils(),
        vec![
            Currency::new(code("USD"), usd_buy, usd_buy + usd_spread),
            Currency::new(code("EUR"), eur_buy, eur_buy + eur_spread),
        ],
    )
    .unwrap()
}

fn run(table: &CurrencyTable, amount: Decimal, from: &str, to: &str, side: Side) -> Decimal {
    let request = ConversionRequest {
        amount,
        from: code(from),
        to: code(to),
        side,
    };
    convert(&request, table, Language::En)
        .unwrap()
        .converted_amount
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting a currency into itself returns the amount.
    #[test]
    fn prop_same_currency_identity(
        amount in positive_amount(),
        usd in buy_rate(),
        s in spread(),
        side in side(),
    ) {
        let table = board(usd, s, usd, s);
        for c in ["ILS", "USD", "EUR"] {
            prop_assert_eq!(run(&table, amount, c, c, side), amount);
        }
    }

    /// Every result has at most 2 decimal places.
    #[test]
    fn prop_result_has_two_decimals(
        amount in positive_amount(),
        usd in buy_rate(),
        usd_spread in spread(),
        eur in buy_rate(),
        eur_spread in spread(),
        side in side(),
    ) {
        let table = board(usd, usd_spread, eur, eur_spread);
        for (from, to) in [("ILS", "USD"), ("USD", "ILS"), ("USD", "EUR"), ("EUR", "USD")] {
            let result = run(&table, amount, from, to, side);
            prop_assert_eq!(result, round_amount(result));
        }
    }

    /// A->base uses the buy rate and base->A the sell rate.
    #[test]
    fn prop_opposite_rate_sides(
        amount in positive_amount(),
        usd in buy_rate(),
        s in spread(),
    ) {
        let table = board(usd, s, dec!(3.89), dec!(0.12));
        let sell = usd + s;

        prop_assert_eq!(run(&table, amount, "USD", "ILS", Side::Left), round_amount(amount * usd));
        prop_assert_eq!(run(&table, amount, "ILS", "USD", Side::Left), round_amount(amount / sell));
    }

    /// Right-side entry pivots with the mirrored rates of left-side entry.
    #[test]
    fn prop_cross_sides_mirror(
        amount in positive_amount(),
        usd in buy_rate(),
        usd_spread in spread(),
        eur in buy_rate(),
        eur_spread in spread(),
    ) {
        let table = board(usd, usd_spread, eur, eur_spread);

        // Left: amount USD, shop buys USD and sells EUR.
        let left = run(&table, amount, "USD", "EUR", Side::Left);
        prop_assert_eq!(left, round_amount(amount * usd / (eur + eur_spread)));

        // Right: amount EUR on the right, shop sells EUR and buys USD.
        let right = run(&table, amount, "USD", "EUR", Side::Right);
        prop_assert_eq!(right, round_amount(amount * (eur + eur_spread) / usd));
    }

    /// Buying then selling back through the base never gains beyond rounding.
    #[test]
    fn prop_round_trip_never_gains(
        amount in positive_amount(),
        usd in buy_rate(),
        s in spread(),
    ) {
        let table = board(usd, s, dec!(3.89), dec!(0.12));
        let base = run(&table, amount, "USD", "ILS", Side::Left);
        let back = run(&table, base, "ILS", "USD", Side::Left);
        prop_assert!(back <= amount + dec!(0.02), "{} -> {} -> {}", amount, base, back);
    }
}

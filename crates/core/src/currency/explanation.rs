//! Human-readable calculation breakdowns in the shop's three languages.

use sarrafa_shared::Language;

use super::conversion::format_amount;
use super::types::{Breakdown, RateKind};

fn rate_label(kind: RateKind, language: Language) -> &'static str {
    match (kind, language) {
        (RateKind::Buy, Language::Ar) => "سعر الشراء",
        (RateKind::Buy, Language::He) => "שער קנייה",
        (RateKind::Buy, Language::En) => "buy rate",
        (RateKind::Sell, Language::Ar) => "سعر البيع",
        (RateKind::Sell, Language::He) => "שער מכירה",
        (RateKind::Sell, Language::En) => "sell rate",
    }
}

fn same_currency_message(language: Language) -> &'static str {
    match language {
        Language::Ar => "نفس العملة",
        Language::He => "אותו מטבע",
        Language::En => "Same currency",
    }
}

/// Message shown in place of a breakdown when a currency is missing.
#[must_use]
pub const fn not_found_message(language: Language) -> &'static str {
    match language {
        Language::Ar => "عملة غير موجودة",
        Language::He => "המטבע לא נמצא",
        Language::En => "Currency not found",
    }
}

/// Message shown when a currency has no usable rate yet.
#[must_use]
pub const fn rate_unavailable_message(language: Language) -> &'static str {
    match language {
        Language::Ar => "السعر غير متوفر",
        Language::He => "השער אינו זמין",
        Language::En => "Rate unavailable",
    }
}

/// Message shown when the result does not fit in a decimal.
#[must_use]
pub const fn amount_too_large_message(language: Language) -> &'static str {
    match language {
        Language::Ar => "المبلغ كبير جداً",
        Language::He => "הסכום גדול מדי",
        Language::En => "Amount too large",
    }
}

/// Renders a breakdown with 2-decimal figures.
#[must_use]
pub fn render(breakdown: &Breakdown, language: Language) -> String {
    match breakdown {
        Breakdown::SameCurrency => same_currency_message(language).to_string(),
        Breakdown::Direct {
            amount,
            amount_currency,
            operation,
            rate,
            rate_kind,
            result,
            result_currency,
        } => format!(
            "{} {amount_currency} {} {} ({}) = {} {result_currency}",
            format_amount(*amount),
            operation.symbol(),
            format_amount(*rate),
            rate_label(*rate_kind, language),
            format_amount(*result),
        ),
        Breakdown::Cross {
            amount,
            amount_currency,
            to_base_rate,
            base_amount,
            base_currency,
            from_base_rate,
            result,
            result_currency,
        } => format!(
            "{} {amount_currency} × {} = {} {base_currency} ÷ {} = {} {result_currency}",
            format_amount(*amount),
            format_amount(*to_base_rate),
            format_amount(*base_amount),
            format_amount(*from_base_rate),
            format_amount(*result),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::types::Operation;
    use rust_decimal_macros::dec;

    fn direct() -> Breakdown {
        Breakdown::Direct {
            amount: dec!(100),
            amount_currency: "USD".parse().unwrap(),
            operation: Operation::Multiply,
            rate: dec!(3.5912),
            rate_kind: RateKind::Buy,
            result: dec!(359.12),
            result_currency: "ILS".parse().unwrap(),
        }
    }

    #[test]
    fn test_direct_in_each_language() {
        assert_eq!(
            render(&direct(), Language::En),
            "100.00 USD × 3.59 (buy rate) = 359.12 ILS"
        );
        assert_eq!(
            render(&direct(), Language::Ar),
            "100.00 USD × 3.59 (سعر الشراء) = 359.12 ILS"
        );
        assert_eq!(
            render(&direct(), Language::He),
            "100.00 USD × 3.59 (שער קנייה) = 359.12 ILS"
        );
    }

    #[test]
    fn test_cross_rounds_intermediate_for_display() {
        let breakdown = Breakdown::Cross {
            amount: dec!(10),
            amount_currency: "JOD".parse().unwrap(),
            to_base_rate: dec!(5.14),
            base_amount: dec!(51.4),
            base_currency: "ILS".parse().unwrap(),
            from_base_rate: dec!(3.71),
            result: dec!(13.85),
            result_currency: "USD".parse().unwrap(),
        };
        assert_eq!(
            render(&breakdown, Language::Ar),
            "10.00 JOD × 5.14 = 51.40 ILS ÷ 3.71 = 13.85 USD"
        );
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(render(&Breakdown::SameCurrency, Language::Ar), "نفس العملة");
        assert_eq!(not_found_message(Language::Ar), "عملة غير موجودة");
        assert_eq!(not_found_message(Language::En), "Currency not found");
        assert_eq!(rate_unavailable_message(Language::He), "השער אינו זמין");
        assert_eq!(amount_too_large_message(Language::En), "Amount too large");
    }
}

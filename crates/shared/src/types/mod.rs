//! Common types used across the application.

pub mod currency_code;
pub mod language;

pub use currency_code::{CurrencyCode, InvalidCurrencyCode};
pub use language::{Language, UnknownLanguage};

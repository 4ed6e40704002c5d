//! Rate sources and local persistence for the rate board.
//!
//! - `provider` - the [`RateProvider`] seam and the static fallback table
//! - `exchangerate_api` - ExchangeRate-API v6 client
//! - `board` - the shared rate board and its staleness check
//! - `refresh` - applies fetched quotes to the board
//! - `cache` - JSON snapshot used as the offline fallback

pub mod board;
pub mod cache;
pub mod error;
pub mod exchangerate_api;
pub mod provider;
pub mod refresh;

pub use board::{RateBoard, is_stale};
pub use cache::{BoardSnapshot, RateCache};
pub use error::RatesError;
pub use exchangerate_api::{ExchangeRateApiClient, UsageStats};
pub use provider::{MarketRates, RateProvider, StaticRateProvider};
pub use refresh::{RateRefresher, RefreshReport};

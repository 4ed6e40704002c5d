//! Shared types, errors, and configuration for Sarrafa.
//!
//! This crate provides common types used across all other crates:
//! - Validated currency codes
//! - Display languages for the rate board and calculator
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{CurrencyCode, Language};

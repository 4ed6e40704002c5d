//! Core business logic for Sarrafa.
//!
//! This crate contains pure business logic with ZERO web or network dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `currency` - Rate board, buy/sell pricing and the conversion formula
//! - `calculator` - State of the two-field exchange calculator

pub mod calculator;
pub mod currency;

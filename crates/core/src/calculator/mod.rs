//! State of the two-field exchange calculator.

pub mod session;

pub use session::{CalculatorSession, TransactionDraft};

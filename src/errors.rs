use std::result::Result as StdResult;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type shared by the payment manager and its collaborators.
#[derive(Debug, Error)]
pub enum DuesError {
    #[error("User already paid for {from}..{to}")]
    UserAlreadyPaid { from: NaiveDate, to: NaiveDate },
    #[error("Insufficient amount: owed {owed}, offered {offered}")]
    InsufficientAmount { owed: Decimal, offered: Decimal },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Ledger error: {0}")]
    Ledger(String),
    #[error("Due oracle error: {0}")]
    Oracle(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, DuesError>;

impl From<std::io::Error> for DuesError {
    fn from(err: std::io::Error) -> Self {
        DuesError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DuesError {
    fn from(err: serde_json::Error) -> Self {
        DuesError::Config(err.to_string())
    }
}

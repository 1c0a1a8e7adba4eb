//! Balance Error Types

use crate::account::StoreError;
use thiserror::Error;

/// Errors from balance queries and peer-to-peer transfers
#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Cannot transfer money to yourself")]
    SelfTransfer,

    #[error("Sender not found")]
    SenderNotFound,

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Account not found")]
    NotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Database error: {0}")]
    Database(String),
}

impl BalanceError {
    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            BalanceError::SelfTransfer | BalanceError::InsufficientFunds => 400,
            BalanceError::SenderNotFound
            | BalanceError::RecipientNotFound
            | BalanceError::NotFound => 404,
            BalanceError::Database(_) => 500,
        }
    }
}

impl From<StoreError> for BalanceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => BalanceError::NotFound,
            StoreError::InsufficientFunds => BalanceError::InsufficientFunds,
            StoreError::Duplicate => BalanceError::Database("unexpected duplicate".to_string()),
            StoreError::Database(e) => BalanceError::Database(e.to_string()),
        }
    }
}

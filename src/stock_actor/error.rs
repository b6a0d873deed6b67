//! Error types for the stock ledger.

use crate::model::StockKey;
use thiserror::Error;

/// Errors raised by a ledger row while applying an action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    /// Stock amounts must be positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(u32),

    /// The increment would exceed the representable quantity.
    #[error("Quantity overflow on {key}: {quantity} + {amount}")]
    Overflow {
        key: StockKey,
        quantity: u32,
        amount: u32,
    },
}

/// Errors reported by the [`StockLedger`](crate::clients::StockLedger) client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// No row exists for the key.
    #[error("Stock entry not found: {0}")]
    NotFound(StockKey),

    /// The row rejected the operation.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

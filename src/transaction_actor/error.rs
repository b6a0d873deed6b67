//! Error types for the transaction log.

use crate::model::TransactionId;
use thiserror::Error;

/// Errors that can occur during transaction log operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LogError {
    /// Stored lines are write-once.
    #[error("Transaction line {0} is immutable")]
    Immutable(TransactionId),

    /// The line payload is not a valid sale.
    #[error("Invalid transaction line: {0}")]
    InvalidLine(String),

    /// An append was requested with no lines.
    #[error("Nothing to append")]
    EmptyBatch,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

//! Error types for the catalog actors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The requested product or branch was not found.
    #[error("Catalog item not found: {0}")]
    NotFound(String),

    /// Names must contain at least one non-whitespace character.
    #[error("Name must not be blank")]
    BlankName,

    /// Prices cannot be negative.
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

//! Checkout failures.
//!
//! Whatever the variant, a failed checkout has no effect: every reservation made for
//! the order has been released before the error is returned. The one exception is a
//! release that itself fails, which is reported as [`CheckoutError::Persistence`].

use crate::model::{BranchId, OrderLine, ProductId, StockKey};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A line that cannot be satisfied from current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockShortfall {
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub requested: u32,
    pub available: u32,
}

/// A reference in the order that does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRef {
    Product(ProductId),
    Branch(BranchId),
    /// The product and branch exist but the branch has never stocked the product.
    Stock(StockKey),
}

impl fmt::Display for MissingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRef::Product(id) => write!(f, "product {id}"),
            MissingRef::Branch(id) => write!(f, "branch {id}"),
            MissingRef::Stock(key) => write!(f, "stock entry {key}"),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can end a checkout.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// The request is malformed. Nothing was looked up or reserved.
    #[error("Invalid order: {message}")]
    Validation {
        message: String,
        lines: Vec<OrderLine>,
    },

    /// A product, branch or stock row does not exist.
    #[error("Not found: {}", join(.missing))]
    NotFound { missing: Vec<MissingRef> },

    /// Stock is short on every listed line.
    #[error("Insufficient stock on {} line(s)", .lines.len())]
    InsufficientStock { lines: Vec<StockShortfall> },

    /// Stock looked sufficient but a concurrent order took it first.
    #[error("Stock taken by a concurrent order on {} line(s)", .lines.len())]
    ConcurrencyLoss { lines: Vec<StockShortfall> },

    /// Storage failed during reservation, rollback or commit.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Reservations were held past the configured deadline and have been rolled back.
    #[error("Reservation deadline exceeded")]
    DeadlineExceeded,
}

impl CheckoutError {
    /// The error name clients see.
    ///
    /// A concurrency loss is indistinguishable from plain insufficient stock to the caller.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::Validation { .. } => "InvalidRequest",
            CheckoutError::NotFound { .. } => "NotFound",
            CheckoutError::InsufficientStock { .. } | CheckoutError::ConcurrencyLoss { .. } => {
                "InsufficientStock"
            }
            CheckoutError::Persistence(_) => "PersistenceError",
            CheckoutError::DeadlineExceeded => "DeadlineExceeded",
        }
    }

    /// HTTP status code equivalent.
    pub fn status(&self) -> u16 {
        match self {
            CheckoutError::Validation { .. }
            | CheckoutError::InsufficientStock { .. }
            | CheckoutError::ConcurrencyLoss { .. } => 400,
            CheckoutError::NotFound { .. } => 404,
            CheckoutError::Persistence(_) | CheckoutError::DeadlineExceeded => 500,
        }
    }

    /// The short lines, for the two stock variants.
    pub fn shortfalls(&self) -> &[StockShortfall] {
        match self {
            CheckoutError::InsufficientStock { lines } | CheckoutError::ConcurrencyLoss { lines } => {
                lines
            }
            _ => &[],
        }
    }
}

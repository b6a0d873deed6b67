use super::{BranchId, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The key of one ledger row.
///
/// Ordering is by branch, then product. Reservations within an order are always
/// attempted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub branch_id: BranchId,
    pub product_id: ProductId,
}

impl StockKey {
    pub fn new(branch_id: impl Into<BranchId>, product_id: impl Into<ProductId>) -> Self {
        Self {
            branch_id: branch_id.into(),
            product_id: product_id.into(),
        }
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.branch_id, self.product_id)
    }
}

/// Quantity on hand of one product at one branch.
///
/// `quantity` is unsigned: a row can reach zero but never go below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl StockEntry {
    pub fn key(&self) -> StockKey {
        StockKey {
            branch_id: self.branch_id,
            product_id: self.product_id,
        }
    }
}

/// Payload for opening a new ledger row.
#[derive(Debug, Clone)]
pub struct StockEntryCreate {
    pub key: StockKey,
    pub quantity: u32,
}

/// Selects ledger rows in a bulk scan. Unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockFilter {
    pub branch_id: Option<BranchId>,
    pub product_id: Option<ProductId>,
    /// Only rows with `quantity` strictly below this value.
    #[serde(skip)]
    pub below: Option<u32>,
}

impl StockFilter {
    pub fn branch(branch_id: BranchId) -> Self {
        Self {
            branch_id: Some(branch_id),
            ..Self::default()
        }
    }

    pub fn product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    pub fn below(threshold: u32) -> Self {
        Self {
            below: Some(threshold),
            ..Self::default()
        }
    }
}

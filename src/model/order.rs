use super::{BranchId, ProductId, StockKey, UserId};
use serde::{Deserialize, Serialize};

/// One requested line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(
        branch_id: impl Into<BranchId>,
        product_id: impl Into<ProductId>,
        quantity: u32,
    ) -> Self {
        Self {
            branch_id: branch_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }

    pub fn key(&self) -> StockKey {
        StockKey {
            branch_id: self.branch_id,
            product_id: self.product_id,
        }
    }
}

/// A checkout request. Exists only for the duration of one checkout call.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub requester_id: UserId,
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(requester_id: impl Into<UserId>, lines: Vec<OrderLine>) -> Self {
        Self {
            requester_id: requester_id.into(),
            lines,
        }
    }
}

use super::{BranchId, ProductId, StockKey, TransactionId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sold (order, branch, product) line. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionLine {
    pub id: TransactionId,
    pub user_id: UserId,
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Price per unit at the moment of sale.
    pub unit_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl TransactionLine {
    pub fn key(&self) -> StockKey {
        StockKey {
            branch_id: self.branch_id,
            product_id: self.product_id,
        }
    }

    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A line waiting to be appended to the log. The log assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransactionLine {
    pub user_id: UserId,
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Conjunctive query over the log. Unset fields match everything; `from` and `to`
/// are both inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub user_id: Option<UserId>,
    pub branch_id: Option<BranchId>,
    pub product_id: Option<ProductId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn branch(branch_id: BranchId) -> Self {
        Self {
            branch_id: Some(branch_id),
            ..Self::default()
        }
    }

    pub fn accepts(&self, line: &TransactionLine) -> bool {
        self.user_id.map_or(true, |id| id == line.user_id)
            && self.branch_id.map_or(true, |id| id == line.branch_id)
            && self.product_id.map_or(true, |id| id == line.product_id)
            && self.from.map_or(true, |from| line.timestamp >= from)
            && self.to.map_or(true, |to| line.timestamp <= to)
    }
}

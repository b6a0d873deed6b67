//! Request and response bodies.

use super::error::ApiError;
use crate::checkout::{CheckoutError, MissingRef, StockShortfall};
use crate::model::{BranchId, Order, OrderLine, ProductId, StockKey, UserId};
use serde::{Deserialize, Serialize};

/// Body of `POST /transactions`.
///
/// `branch_id` may be given per line (multi-branch cart) or once for the whole order;
/// a per-line value wins.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    pub lines: Vec<CheckoutLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutLineRequest {
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    pub product_id: ProductId,
    /// Signed so that negative input is reported as invalid rather than as a parse error.
    pub quantity: i64,
}

impl CheckoutRequest {
    /// Resolves branches and quantities into an [`Order`], reporting every bad line.
    pub fn into_order(self) -> Result<Order, ApiError> {
        let mut lines = Vec::with_capacity(self.lines.len());
        let mut problems = Vec::new();
        let mut details = Vec::new();

        for line in self.lines {
            let branch_id = line.branch_id.or(self.branch_id);
            let quantity = u32::try_from(line.quantity).ok().filter(|q| *q > 0);
            if let (Some(branch_id), Some(quantity)) = (branch_id, quantity) {
                lines.push(OrderLine {
                    branch_id,
                    product_id: line.product_id,
                    quantity,
                });
                continue;
            }
            if branch_id.is_none() {
                problems.push(format!("{} has no branch_id", line.product_id));
            }
            if quantity.is_none() {
                problems.push(format!(
                    "{} has invalid quantity {}",
                    line.product_id, line.quantity
                ));
            }
            details.push(ErrorDetail {
                product_id: Some(line.product_id),
                branch_id,
                requested: quantity,
                available: None,
            });
        }

        if !problems.is_empty() {
            return Err(ApiError::InvalidRequest {
                message: problems.join("; "),
                details,
            });
        }
        Ok(Order::new(self.user_id, lines))
    }
}

/// Body of `POST /inventory`.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub branch_id: BranchId,
    pub product_id: ProductId,
    pub quantity: i64,
}

impl RestockRequest {
    pub fn key(&self) -> StockKey {
        StockKey {
            branch_id: self.branch_id,
            product_id: self.product_id,
        }
    }
}

/// Query of `GET /inventory/low-stock`.
#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
}

/// One entry of an error's `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u32>,
}

impl From<&StockShortfall> for ErrorDetail {
    fn from(s: &StockShortfall) -> Self {
        Self {
            product_id: Some(s.product_id),
            branch_id: Some(s.branch_id),
            requested: Some(s.requested),
            available: Some(s.available),
        }
    }
}

impl From<&MissingRef> for ErrorDetail {
    fn from(missing: &MissingRef) -> Self {
        match *missing {
            MissingRef::Product(id) => Self {
                product_id: Some(id),
                ..Self::default()
            },
            MissingRef::Branch(id) => Self {
                branch_id: Some(id),
                ..Self::default()
            },
            MissingRef::Stock(key) => Self {
                product_id: Some(key.product_id),
                branch_id: Some(key.branch_id),
                ..Self::default()
            },
        }
    }
}

impl From<&OrderLine> for ErrorDetail {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: Some(line.product_id),
            branch_id: Some(line.branch_id),
            requested: Some(line.quantity),
            available: None,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub details: Vec<ErrorDetail>,
}

impl ErrorBody {
    pub fn new(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl From<&CheckoutError> for ErrorBody {
    fn from(e: &CheckoutError) -> Self {
        let details = match e {
            CheckoutError::Validation { lines, .. } => lines.iter().map(ErrorDetail::from).collect(),
            CheckoutError::NotFound { missing } => missing.iter().map(ErrorDetail::from).collect(),
            other => other.shortfalls().iter().map(ErrorDetail::from).collect(),
        };
        Self {
            error: e.kind(),
            message: e.to_string(),
            details,
        }
    }
}

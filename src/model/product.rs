use super::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable catalog item.
///
/// `unit_price` is read at checkout and copied into every
/// [`TransactionLine`](super::TransactionLine); changing it later does not touch past sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    /// Free-form size label ("500ml", "XL").
    pub size: Option<String>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub size: Option<String>,
}

/// Payload for updating an existing product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub size: Option<String>,
}

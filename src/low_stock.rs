//! Low-stock report: a read-only view over the ledger.
//!
//! Rows below the threshold are grouped by branch. Branches come out in ascending id
//! order, and items within a branch in ascending quantity (lowest first).

use crate::catalog_actor::CatalogError;
use crate::clients::{CatalogReader, StockLedger};
use crate::model::{BranchId, ProductId, StockFilter};
use crate::stock_actor::LedgerError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

const UNKNOWN_BRANCH: &str = "Unknown Branch";
const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchLowStock {
    pub branch_id: BranchId,
    pub branch_name: String,
    pub items: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockReport {
    pub threshold: u32,
    pub branches: Vec<BranchLowStock>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LowStockError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Builds [`LowStockReport`]s on demand.
#[derive(Clone)]
pub struct LowStockMonitor {
    ledger: StockLedger,
    catalog: Arc<dyn CatalogReader>,
    threshold: u32,
}

impl LowStockMonitor {
    pub fn new(ledger: StockLedger, catalog: Arc<dyn CatalogReader>, threshold: u32) -> Self {
        Self {
            ledger,
            catalog,
            threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Report using the configured threshold.
    pub async fn report(&self) -> Result<LowStockReport, LowStockError> {
        self.report_with(self.threshold).await
    }

    /// Report of every row with `quantity < threshold`.
    #[instrument(skip(self))]
    pub async fn report_with(&self, threshold: u32) -> Result<LowStockReport, LowStockError> {
        let entries = self.ledger.entries(StockFilter::below(threshold)).await?;
        debug!(count = entries.len(), "Low rows found");

        let mut grouped: BTreeMap<BranchId, Vec<LowStockItem>> = BTreeMap::new();
        let mut product_names: BTreeMap<ProductId, String> = BTreeMap::new();
        for entry in entries {
            let product_name = match product_names.get(&entry.product_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .catalog
                        .product(entry.product_id)
                        .await?
                        .map_or_else(|| UNKNOWN_PRODUCT.to_string(), |p| p.name);
                    product_names.insert(entry.product_id, name.clone());
                    name
                }
            };
            grouped.entry(entry.branch_id).or_default().push(LowStockItem {
                product_id: entry.product_id,
                product_name,
                quantity: entry.quantity,
            });
        }

        let mut branches = Vec::with_capacity(grouped.len());
        for (branch_id, mut items) in grouped {
            items.sort_by_key(|item| (item.quantity, item.product_id));
            let branch_name = self
                .catalog
                .branch(branch_id)
                .await?
                .map_or_else(|| UNKNOWN_BRANCH.to_string(), |b| b.name);
            branches.push(BranchLowStock {
                branch_id,
                branch_name,
                items,
            });
        }

        Ok(LowStockReport {
            threshold,
            branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, Product, StockKey};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    /// Knows branch 1 and product 1 only.
    struct SmallCatalog;

    #[async_trait]
    impl CatalogReader for SmallCatalog {
        async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
            Ok((id == ProductId(1)).then(|| Product {
                id,
                name: "Espresso beans".into(),
                unit_price: Decimal::new(1200, 2),
                size: Some("1kg".into()),
            }))
        }

        async fn branch(&self, id: BranchId) -> Result<Option<Branch>, CatalogError> {
            Ok((id == BranchId(1)).then(|| Branch {
                id,
                name: "Old Town".into(),
                region: "Centre".into(),
            }))
        }
    }

    #[tokio::test]
    async fn test_report_groups_and_sorts() {
        let ledger = crate::stock_actor::new(16);
        for (branch, product, qty) in [(2, 1, 1), (1, 2, 3), (1, 1, 4), (1, 3, 5), (2, 2, 9)] {
            ledger.credit(StockKey::new(branch, product), qty).await.unwrap();
        }

        let monitor = LowStockMonitor::new(ledger, Arc::new(SmallCatalog), 5);
        let report = monitor.report().await.unwrap();

        assert_eq!(report.threshold, 5);
        assert_eq!(report.branches.len(), 2);

        let first = &report.branches[0];
        assert_eq!(first.branch_name, "Old Town");
        let quantities: Vec<u32> = first.items.iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![3, 4]);
        assert_eq!(first.items[0].product_name, "Unknown Product");
        assert_eq!(first.items[1].product_name, "Espresso beans");

        let second = &report.branches[1];
        assert_eq!(second.branch_name, "Unknown Branch");
        assert_eq!(second.items.len(), 1);

        let wider = monitor.report_with(10).await.unwrap();
        assert_eq!(wider.branches[1].items.len(), 2);
    }
}

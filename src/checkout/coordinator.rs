//! The checkout saga.
//!
//! An order moves through four phases:
//!
//! 1. **Validate** - reject empty orders and zero quantities, merge duplicate lines and
//!    sort them by `(branch, product)`.
//! 2. **Pre-check** - resolve catalog references (snapshotting prices) and read every
//!    row. Known shortfalls fail the order before anything is reserved.
//! 3. **Reserve** - `try_reserve` each line in sorted order. Any refusal releases what
//!    was already reserved.
//! 4. **Commit** - append all lines to the log in one batch. A failed append releases
//!    every reservation.
//!
//! Reservations are bounded by a deadline measured from the start of the reserve
//! phase; it is checked before every reservation and before the commit.

use super::error::{CheckoutError, MissingRef, StockShortfall};
use crate::clients::{CatalogReader, StockLedger, TransactionLog};
use crate::model::{
    BranchId, NewTransactionLine, Order, OrderLine, ProductId, StockKey, TransactionLine, UserId,
};
use crate::stock_actor::{LedgerError, ReserveOutcome};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// One merged, validated order line.
#[derive(Debug, Clone, Copy)]
struct PlannedLine {
    key: StockKey,
    quantity: u32,
}

impl PlannedLine {
    fn shortfall(&self, available: u32) -> StockShortfall {
        StockShortfall {
            branch_id: self.key.branch_id,
            product_id: self.key.product_id,
            requested: self.quantity,
            available,
        }
    }
}

/// Why the reserve phase stopped.
enum ReserveFailure {
    Short(StockShortfall),
    Missing(StockKey),
    Storage(LedgerError),
}

/// Turns orders into committed transaction lines, or into nothing at all.
///
/// The coordinator never touches quantities itself; it only calls the ledger's
/// atomic operations. It is cheap to clone and safe to share between requests.
#[derive(Clone)]
pub struct CheckoutCoordinator {
    ledger: StockLedger,
    log: TransactionLog,
    catalog: Arc<dyn CatalogReader>,
    hold_timeout: Duration,
}

impl CheckoutCoordinator {
    pub fn new(
        ledger: StockLedger,
        log: TransactionLog,
        catalog: Arc<dyn CatalogReader>,
        hold_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            log,
            catalog,
            hold_timeout,
        }
    }

    /// Checks out `order`, returning one stored line per distinct `(branch, product)`.
    ///
    /// The saga runs on its own task. Dropping the returned future does not abandon
    /// it half way: it still ends committed or fully rolled back.
    pub async fn checkout(&self, order: Order) -> Result<Vec<TransactionLine>, CheckoutError> {
        let span = info_span!(
            "checkout",
            user_id = %order.requester_id,
            lines = order.lines.len()
        );
        let saga = self.clone();
        tokio::spawn(async move { saga.run(order).await }.instrument(span))
            .await
            .map_err(|e| CheckoutError::Persistence(format!("checkout task failed: {e}")))?
    }

    async fn run(&self, order: Order) -> Result<Vec<TransactionLine>, CheckoutError> {
        debug!(?order, "checkout called");
        let lines = Self::plan(&order.lines)?;
        let prices = self.resolve_catalog(&lines).await?;
        self.pre_check(&lines).await?;

        let deadline = Instant::now() + self.hold_timeout;
        let reserved = self.reserve_all(&lines, deadline).await?;

        if Instant::now() >= deadline {
            warn!("Deadline passed before commit");
            self.rollback(&reserved).await?;
            return Err(CheckoutError::DeadlineExceeded);
        }
        self.commit(order.requester_id, &reserved, &prices).await
    }

    /// Validates the lines, merges duplicates and sorts by `(branch, product)`.
    fn plan(lines: &[OrderLine]) -> Result<Vec<PlannedLine>, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::Validation {
                message: "order has no lines".into(),
                lines: Vec::new(),
            });
        }
        let zero: Vec<OrderLine> = lines.iter().filter(|l| l.quantity == 0).copied().collect();
        if !zero.is_empty() {
            return Err(CheckoutError::Validation {
                message: "quantities must be positive".into(),
                lines: zero,
            });
        }

        let mut merged: BTreeMap<StockKey, u32> = BTreeMap::new();
        for line in lines {
            let total = merged.entry(line.key()).or_insert(0);
            *total = total.checked_add(line.quantity).ok_or_else(|| CheckoutError::Validation {
                message: format!("total quantity for {} is too large", line.key()),
                lines: vec![*line],
            })?;
        }
        Ok(merged
            .into_iter()
            .map(|(key, quantity)| PlannedLine { key, quantity })
            .collect())
    }

    /// Resolves every branch and product, returning the unit price of each product.
    async fn resolve_catalog(
        &self,
        lines: &[PlannedLine],
    ) -> Result<HashMap<ProductId, Decimal>, CheckoutError> {
        let branches: BTreeSet<BranchId> = lines.iter().map(|l| l.key.branch_id).collect();
        let products: BTreeSet<ProductId> = lines.iter().map(|l| l.key.product_id).collect();
        let storage = |e: crate::catalog_actor::CatalogError| CheckoutError::Persistence(e.to_string());

        let mut missing = Vec::new();
        for id in branches {
            if self.catalog.branch(id).await.map_err(storage)?.is_none() {
                missing.push(MissingRef::Branch(id));
            }
        }
        let mut prices = HashMap::new();
        for id in products {
            match self.catalog.product(id).await.map_err(storage)? {
                Some(product) => {
                    prices.insert(id, product.unit_price);
                }
                None => missing.push(MissingRef::Product(id)),
            }
        }

        if !missing.is_empty() {
            info!(?missing, "Rejected: unknown catalog references");
            return Err(CheckoutError::NotFound { missing });
        }
        Ok(prices)
    }

    /// Reads every row. Fails on missing rows, then on short rows, listing all of them.
    async fn pre_check(&self, lines: &[PlannedLine]) -> Result<(), CheckoutError> {
        let mut missing = Vec::new();
        let mut short = Vec::new();
        for line in lines {
            match self.ledger.get(line.key).await {
                Ok(available) if available < line.quantity => short.push(line.shortfall(available)),
                Ok(_) => {}
                Err(LedgerError::NotFound(key)) => missing.push(MissingRef::Stock(key)),
                Err(e) => return Err(CheckoutError::Persistence(e.to_string())),
            }
        }

        if !missing.is_empty() {
            info!(?missing, "Rejected at pre-check: no stock entry");
            return Err(CheckoutError::NotFound { missing });
        }
        if !short.is_empty() {
            info!(?short, "Rejected at pre-check: insufficient stock");
            return Err(CheckoutError::InsufficientStock { lines: short });
        }
        debug!("Pre-check passed");
        Ok(())
    }

    /// Reserves each line in order. On any failure, everything reserved so far is released.
    async fn reserve_all(
        &self,
        lines: &[PlannedLine],
        deadline: Instant,
    ) -> Result<Vec<PlannedLine>, CheckoutError> {
        let mut reserved: Vec<PlannedLine> = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            if Instant::now() >= deadline {
                warn!(reserved = reserved.len(), "Deadline passed during reservation");
                self.rollback(&reserved).await?;
                return Err(CheckoutError::DeadlineExceeded);
            }

            let failure = match self.ledger.try_reserve(line.key, line.quantity).await {
                Ok(ReserveOutcome::Reserved { remaining }) => {
                    debug!(key = %line.key, quantity = line.quantity, remaining, "Reserved");
                    reserved.push(*line);
                    continue;
                }
                Ok(ReserveOutcome::Insufficient { available }) => {
                    ReserveFailure::Short(line.shortfall(available))
                }
                Ok(ReserveOutcome::NotFound) => ReserveFailure::Missing(line.key),
                Err(e) => ReserveFailure::Storage(e),
            };

            warn!(key = %line.key, reserved = reserved.len(), "Reservation failed, rolling back");
            self.rollback(&reserved).await?;
            return Err(self.describe_failure(failure, &lines[index + 1..]).await);
        }

        info!(lines = reserved.len(), "All lines reserved");
        Ok(reserved)
    }

    /// Builds the error for a failed reserve phase, rechecking the lines never attempted so
    /// the caller learns about every line that cannot be served right now.
    async fn describe_failure(&self, failure: ReserveFailure, unreached: &[PlannedLine]) -> CheckoutError {
        let (mut short, mut missing) = match failure {
            ReserveFailure::Storage(e) => return CheckoutError::Persistence(e.to_string()),
            ReserveFailure::Short(shortfall) => (vec![shortfall], Vec::new()),
            ReserveFailure::Missing(key) => (Vec::new(), vec![MissingRef::Stock(key)]),
        };

        for line in unreached {
            match self.ledger.get(line.key).await {
                Ok(available) if available < line.quantity => short.push(line.shortfall(available)),
                Ok(_) => {}
                Err(LedgerError::NotFound(key)) => missing.push(MissingRef::Stock(key)),
                Err(e) => warn!(key = %line.key, error = %e, "Recheck failed"),
            }
        }

        if !missing.is_empty() {
            CheckoutError::NotFound { missing }
        } else {
            CheckoutError::ConcurrencyLoss { lines: short }
        }
    }

    /// Writes the order to the log. A failed write releases every reservation.
    async fn commit(
        &self,
        user_id: UserId,
        reserved: &[PlannedLine],
        prices: &HashMap<ProductId, Decimal>,
    ) -> Result<Vec<TransactionLine>, CheckoutError> {
        let recorded_at = Utc::now();
        let mut batch = Vec::with_capacity(reserved.len());
        for line in reserved {
            let Some(unit_price) = prices.get(&line.key.product_id).copied() else {
                self.rollback(reserved).await?;
                return Err(CheckoutError::Persistence(format!(
                    "no price captured for {}",
                    line.key.product_id
                )));
            };
            batch.push(NewTransactionLine {
                user_id,
                branch_id: line.key.branch_id,
                product_id: line.key.product_id,
                quantity: line.quantity,
                unit_price,
                recorded_at,
            });
        }

        match self.log.append_all(batch).await {
            Ok(stored) => {
                info!(lines = stored.len(), "Checkout committed");
                Ok(stored)
            }
            Err(e) => {
                error!(error = %e, "Commit failed, rolling back");
                self.rollback(reserved).await?;
                Err(CheckoutError::Persistence(e.to_string()))
            }
        }
    }

    /// Releases reservations, newest first. Keeps going past failures and reports them.
    async fn rollback(&self, reserved: &[PlannedLine]) -> Result<(), CheckoutError> {
        let mut failed = Vec::new();
        for line in reserved.iter().rev() {
            if let Err(e) = self.ledger.release(line.key, line.quantity).await {
                error!(key = %line.key, quantity = line.quantity, error = %e, "Release failed");
                failed.push(line.key);
            }
        }

        if failed.is_empty() {
            debug!(released = reserved.len(), "Rolled back");
            Ok(())
        } else {
            Err(CheckoutError::Persistence(format!(
                "could not release {} reservation(s)",
                failed.len()
            )))
        }
    }
}

//! HTTP API (axum).
//!
//! Identity is handled upstream: requests arrive already authenticated and carry the
//! customer's `user_id`.

pub mod dto;
pub mod error;
pub mod routes;

pub use error::ApiError;

use crate::checkout::CheckoutCoordinator;
use crate::clients::{StockLedger, TransactionLog};
use crate::lifecycle::CheckoutSystem;
use crate::low_stock::LowStockMonitor;
use axum::routing::get;
use axum::Router;

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: CheckoutCoordinator,
    pub ledger: StockLedger,
    pub log: TransactionLog,
    pub monitor: LowStockMonitor,
}

impl AppState {
    pub fn new(system: &CheckoutSystem) -> Self {
        Self {
            coordinator: system.coordinator.clone(),
            ledger: system.ledger.clone(),
            log: system.log.clone(),
            monitor: system.monitor.clone(),
        }
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route(
            "/transactions",
            get(routes::list_transactions).post(routes::create_transactions),
        )
        .route("/transactions/{id}", get(routes::get_transaction))
        .route(
            "/inventory",
            get(routes::list_inventory).post(routes::restock),
        )
        .route("/inventory/low-stock", get(routes::low_stock))
        .route(
            "/inventory/{branch_id}/{product_id}",
            get(routes::get_inventory),
        )
        .with_state(state)
}

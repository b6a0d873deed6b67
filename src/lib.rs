//! # Checkout Engine
//!
//! > **Inventory consistency and all-or-nothing checkout on resource-oriented actors.**
//!
//! Customers check out carts of `(branch, product, quantity)` lines. Each line must be
//! covered by that branch's stock, all decrements apply together or not at all, and
//! every sale is recorded in an append-only log, while many customers may be buying
//! the same product at the same branch at once.
//!
//! ## Design
//!
//! ### Rows are owned by actors
//! Every `(branch, product)` stock row belongs to exactly one ledger actor. A reservation
//! ("take 3 if at least 3 are there") is one message to that actor, so the check and the
//! decrement cannot be separated and a row never goes below zero. No two rows share an
//! actor, so unrelated rows proceed in parallel.
//!
//! ### Orders are sagas
//! The [`CheckoutCoordinator`](checkout::CheckoutCoordinator) reserves lines in a fixed
//! order, commits them to the transaction log in one atomic batch, and releases every
//! reservation if anything fails on the way.
//!
//! ### Errors are typed
//! Each component has its own `thiserror` enum; [`CheckoutError`](checkout::CheckoutError)
//! is the taxonomy callers see.
//!
//! ### Observability
//! `tracing` everywhere; see [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`model`] - ids, stock rows, transaction lines, catalog items
//! - [`stock_actor`], [`transaction_actor`], [`catalog_actor`] - entity implementations
//! - [`clients`] - [`StockLedger`](clients::StockLedger), [`TransactionLog`](clients::TransactionLog),
//!   [`CatalogClient`](clients::CatalogClient)
//! - [`checkout`] - the coordinator and its errors
//! - [`low_stock`] - read-only low-stock report
//! - [`api`] - axum routes
//! - [`config`], [`lifecycle`] - configuration, startup and shutdown
//!
//! ### Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod api;
pub mod catalog_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod low_stock;
pub mod model;
pub mod stock_actor;
pub mod transaction_actor;

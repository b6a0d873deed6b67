//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); actors tag their lines with
//! `entity_type` instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Every actor request and full order payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the checkout saga in detail
//! RUST_LOG=info,checkout_engine::checkout=debug cargo run
//! ```
//!
//! ## Checkout Trace Example
//!
//! Each checkout runs inside a `checkout` span carrying the user and line count.
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO checkout: Action ok entity_type="StockEntry" id=branch_1/product_1 outcome=Reserve(Reserved { remaining: 7 }) user_id=user_1 lines=1
//! INFO checkout: All lines reserved user_id=user_1 lines=1
//! INFO checkout: Created batch entity_type="TransactionLine" count=1 size=1 user_id=user_1 lines=1
//! INFO checkout: Checkout committed user_id=user_1 lines=1
//! ```
//!
//! A rejected order shows where it stopped:
//!
//! ```text
//! INFO checkout: Rejected at pre-check: insufficient stock short=[StockShortfall { .. }]
//! WARN checkout: Reservation failed, rolling back key=branch_1/product_1 reserved=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type identifies the actor
        .compact()
        .init();
}

//! Type-safe wrappers around the framework clients.

pub mod catalog_client;
pub mod ledger_client;
pub mod transaction_log_client;

pub use catalog_client::*;
pub use ledger_client::*;
pub use transaction_log_client::*;

//! The stock ledger: per-(branch, product) quantities and their atomic mutations.
//!
//! Every row is owned by its own actor, spawned when the row is first credited. That
//! actor serializes the operations on its row; different rows never share a queue.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::StockLedger;
use crate::model::StockEntry;
use actor_framework::ActorRegistry;

/// Creates an empty ledger. Row actors get a queue of `buffer_size` requests.
pub fn new(buffer_size: usize) -> StockLedger {
    StockLedger::new(ActorRegistry::<StockEntry>::new(buffer_size, ()))
}

//! The transaction log: append-only storage of completed sale lines.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::TransactionLog;
use crate::model::TransactionLine;
use actor_framework::ResourceActor;

/// Creates the transaction log actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<TransactionLine>, TransactionLog) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, TransactionLog::new(generic_client))
}

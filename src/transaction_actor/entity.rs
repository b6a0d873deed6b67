//! [`ActorEntity`] implementation for [`TransactionLine`].
//!
//! The log only ever appends: ids come from the store's sequence, and updates,
//! deletes and actions are all refused.

use super::error::LogError;
use crate::model::{NewTransactionLine, TransactionFilter, TransactionId, TransactionLine};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for TransactionLine {
    type Id = TransactionId;
    type Create = NewTransactionLine;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Filter = TransactionFilter;
    type Context = ();
    type Error = LogError;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn from_create_params(seq: u32, params: NewTransactionLine) -> Result<Self, Self::Error> {
        if params.quantity == 0 {
            return Err(LogError::InvalidLine(format!(
                "zero quantity for {}/{}",
                params.branch_id, params.product_id
            )));
        }
        if params.unit_price.is_sign_negative() {
            return Err(LogError::InvalidLine(format!(
                "negative unit price {} for {}",
                params.unit_price, params.product_id
            )));
        }
        Ok(Self {
            id: TransactionId(seq),
            user_id: params.user_id,
            branch_id: params.branch_id,
            product_id: params.product_id,
            quantity: params.quantity,
            unit_price: params.unit_price,
            timestamp: params.recorded_at,
        })
    }

    fn matches(&self, filter: &TransactionFilter) -> bool {
        filter.accepts(self)
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(LogError::Immutable(self.id))
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        Err(LogError::Immutable(self.id))
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(LogError::Immutable(self.id))
    }
}

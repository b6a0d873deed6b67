//! [`ActorEntity`] implementation for [`StockEntry`].
//!
//! Rows are keyed by their natural `(branch, product)` key and ignore the store's
//! sequence number. There is no generic update: quantities only move through
//! [`StockAction`]s.

use super::actions::{ReserveOutcome, StockAction, StockActionResult};
use super::error::StockError;
use crate::model::{StockEntry, StockEntryCreate, StockFilter, StockKey};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for StockEntry {
    type Id = StockKey;
    type Create = StockEntryCreate;
    type Update = Infallible;
    type Action = StockAction;
    type ActionResult = StockActionResult;
    type Filter = StockFilter;
    type Context = ();
    type Error = StockError;

    fn id(&self) -> StockKey {
        self.key()
    }

    fn from_create_params(_seq: u32, params: StockEntryCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            branch_id: params.key.branch_id,
            product_id: params.key.product_id,
            quantity: params.quantity,
        })
    }

    fn matches(&self, filter: &StockFilter) -> bool {
        filter.branch_id.map_or(true, |id| id == self.branch_id)
            && filter.product_id.map_or(true, |id| id == self.product_id)
            && filter.below.map_or(true, |limit| self.quantity < limit)
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    /// Applies one quantity change.
    ///
    /// - `Reserve`: takes the amount only if `quantity >= amount`; otherwise the row is
    ///   left as is and the current quantity is reported.
    /// - `Release` / `Credit`: add the amount, refusing to overflow.
    async fn handle_action(
        &mut self,
        action: StockAction,
        _ctx: &(),
    ) -> Result<StockActionResult, Self::Error> {
        match action {
            StockAction::Check => Ok(StockActionResult::Check(self.quantity)),
            StockAction::Reserve(0) | StockAction::Release(0) | StockAction::Credit(0) => {
                Err(StockError::InvalidAmount(0))
            }
            StockAction::Reserve(amount) => {
                let outcome = match self.quantity.checked_sub(amount) {
                    Some(remaining) => {
                        self.quantity = remaining;
                        ReserveOutcome::Reserved { remaining }
                    }
                    None => ReserveOutcome::Insufficient {
                        available: self.quantity,
                    },
                };
                Ok(StockActionResult::Reserve(outcome))
            }
            StockAction::Release(amount) => {
                self.add(amount)?;
                Ok(StockActionResult::Release(self.quantity))
            }
            StockAction::Credit(amount) => {
                self.add(amount)?;
                Ok(StockActionResult::Credit(self.quantity))
            }
        }
    }
}

impl StockEntry {
    fn add(&mut self, amount: u32) -> Result<(), StockError> {
        self.quantity = self
            .quantity
            .checked_add(amount)
            .ok_or(StockError::Overflow {
                key: self.key(),
                quantity: self.quantity,
                amount,
            })?;
        Ok(())
    }
}

use crate::model::{StockEntry, StockEntryCreate, StockFilter, StockKey};
use crate::stock_actor::{LedgerError, ReserveOutcome, StockAction, StockActionResult, StockError};
use actor_framework::{ActorRegistry, FrameworkError};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Client for the stock ledger.
///
/// Quantities are never read-modify-written here: each operation is one action message
/// applied by the actor that owns the row. Every row has an actor of its own.
#[derive(Clone)]
pub struct StockLedger {
    inner: ActorRegistry<StockEntry>,
}

impl StockLedger {
    pub fn new(inner: ActorRegistry<StockEntry>) -> Self {
        Self { inner }
    }

    /// Stops tracking the row actors and returns their tasks for joining.
    pub fn close(&self) -> Vec<JoinHandle<()>> {
        self.inner.close()
    }

    fn map_error(key: StockKey, e: FrameworkError) -> LedgerError {
        if let FrameworkError::NotFound(_) = e {
            return LedgerError::NotFound(key);
        }
        match e.entity_error::<StockError>() {
            Some(stock) => LedgerError::Stock(stock.clone()),
            None => LedgerError::ActorCommunicationError(e.to_string()),
        }
    }

    fn unexpected(reply: StockActionResult) -> LedgerError {
        LedgerError::ActorCommunicationError(format!("unexpected reply {reply:?}"))
    }

    /// Current quantity of a row. No side effects.
    #[instrument(skip(self))]
    pub async fn get(&self, key: StockKey) -> Result<u32, LedgerError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(key, StockAction::Check)
            .await
            .map_err(|e| Self::map_error(key, e))?
        {
            StockActionResult::Check(quantity) => Ok(quantity),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Takes `amount` units if, and only if, the row holds at least that many.
    ///
    /// Check and decrement happen in one step on the owning actor. A missing row is an
    /// outcome here, not an error.
    #[instrument(skip(self))]
    pub async fn try_reserve(&self, key: StockKey, amount: u32) -> Result<ReserveOutcome, LedgerError> {
        debug!("Sending request");
        if amount == 0 {
            return Err(StockError::InvalidAmount(0).into());
        }
        match self.inner.perform_action(key, StockAction::Reserve(amount)).await {
            Ok(StockActionResult::Reserve(outcome)) => Ok(outcome),
            Ok(other) => Err(Self::unexpected(other)),
            Err(FrameworkError::NotFound(_)) => Ok(ReserveOutcome::NotFound),
            Err(e) => Err(Self::map_error(key, e)),
        }
    }

    /// Returns previously reserved units. Yields the quantity afterwards.
    #[instrument(skip(self))]
    pub async fn release(&self, key: StockKey, amount: u32) -> Result<u32, LedgerError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(key, StockAction::Release(amount))
            .await
            .map_err(|e| Self::map_error(key, e))?
        {
            StockActionResult::Release(quantity) => Ok(quantity),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Restocks a row, opening it with `amount` units when it does not exist yet.
    #[instrument(skip(self))]
    pub async fn credit(&self, key: StockKey, amount: u32) -> Result<StockEntry, LedgerError> {
        debug!("Sending request");
        if amount == 0 {
            return Err(StockError::InvalidAmount(0).into());
        }
        let opening = StockEntryCreate {
            key,
            quantity: amount,
        };
        self.inner
            .upsert(key, opening, StockAction::Credit(amount))
            .await
            .map_err(|e| Self::map_error(key, e))
    }

    /// Rows selected by `filter`, ordered by branch then product.
    #[instrument(skip(self))]
    pub async fn entries(&self, filter: StockFilter) -> Result<Vec<StockEntry>, LedgerError> {
        debug!("Sending request");
        let mut entries = self
            .inner
            .list(filter)
            .await
            .map_err(|e| LedgerError::ActorCommunicationError(e.to_string()))?;
        entries.sort_by_key(StockEntry::key);
        Ok(entries)
    }
}

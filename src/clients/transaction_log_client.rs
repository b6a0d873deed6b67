use crate::model::{NewTransactionLine, TransactionFilter, TransactionLine};
use crate::transaction_actor::LogError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the append-only transaction log.
///
/// Besides the appends below, `get` and `list` come from [`ActorClient`].
#[derive(Clone)]
pub struct TransactionLog {
    inner: ResourceClient<TransactionLine>,
}

impl TransactionLog {
    pub fn new(inner: ResourceClient<TransactionLine>) -> Self {
        Self { inner }
    }

    /// Appends a single line.
    #[instrument(skip(self, line))]
    pub async fn append(&self, line: NewTransactionLine) -> Result<TransactionLine, LogError> {
        let mut stored = self.append_all(vec![line]).await?;
        stored.pop().ok_or(LogError::EmptyBatch)
    }

    /// Appends every line or none of them.
    ///
    /// The batch travels as one message, so a failure leaves the log exactly as it was.
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub async fn append_all(
        &self,
        lines: Vec<NewTransactionLine>,
    ) -> Result<Vec<TransactionLine>, LogError> {
        if lines.is_empty() {
            return Err(LogError::EmptyBatch);
        }
        debug!(?lines, "append_all called");
        self.inner.create_many(lines).await.map_err(Self::map_error)
    }

    /// Lines matching `filter`, most recent first (ties: higher id first).
    #[instrument(skip(self))]
    pub async fn query(&self, filter: TransactionFilter) -> Result<Vec<TransactionLine>, LogError> {
        let mut lines = self.list(filter).await?;
        lines.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(lines)
    }
}

#[async_trait]
impl ActorClient<TransactionLine> for TransactionLog {
    type Error = LogError;

    fn inner(&self) -> &ResourceClient<TransactionLine> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.entity_error::<LogError>() {
            Some(log) => log.clone(),
            None => LogError::ActorCommunicationError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BranchId, ProductId, TransactionId, UserId};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn log() -> TransactionLog {
        let (actor, log) = crate::transaction_actor::new(16);
        tokio::spawn(actor.run(()));
        log
    }

    fn sale(user: u32, branch: u32, product: u32, minutes: i64) -> NewTransactionLine {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        NewTransactionLine {
            user_id: UserId(user),
            branch_id: BranchId(branch),
            product_id: ProductId(product),
            quantity: 1,
            unit_price: Decimal::new(100, 2),
            recorded_at: base + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_append_assigns_ids() {
        let log = log();
        let first = log.append(sale(1, 1, 1, 0)).await.unwrap();
        let batch = log
            .append_all(vec![sale(1, 1, 2, 0), sale(1, 2, 2, 0)])
            .await
            .unwrap();

        assert_eq!(first.id, TransactionId(1));
        assert_eq!(batch[0].id, TransactionId(2));
        assert_eq!(batch[1].id, TransactionId(3));
        assert_eq!(log.get(TransactionId(3)).await.unwrap(), Some(batch[1].clone()));
    }

    #[tokio::test]
    async fn test_invalid_batch_leaves_log_untouched() {
        let log = log();
        let mut bad = sale(1, 1, 1, 0);
        bad.quantity = 0;

        let err = log.append_all(vec![sale(1, 1, 2, 0), bad]).await.unwrap_err();
        assert!(matches!(err, LogError::InvalidLine(_)));
        assert!(log.query(TransactionFilter::default()).await.unwrap().is_empty());

        assert_eq!(log.append_all(vec![]).await, Err(LogError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_query_is_conjunctive_and_newest_first() {
        let log = log();
        log.append_all(vec![
            sale(1, 1, 1, 0),
            sale(1, 2, 1, 10),
            sale(2, 1, 1, 20),
            sale(1, 1, 2, 30),
        ])
        .await
        .unwrap();

        let mine = log.query(TransactionFilter::user(UserId(1))).await.unwrap();
        let ids: Vec<u32> = mine.iter().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![4, 2, 1]);

        let filter = TransactionFilter {
            user_id: Some(UserId(1)),
            branch_id: Some(BranchId(1)),
            ..TransactionFilter::default()
        };
        assert_eq!(log.query(filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_query_date_bounds_are_inclusive() {
        let log = log();
        log.append_all(vec![sale(1, 1, 1, 0), sale(1, 1, 1, 10), sale(1, 1, 1, 20)])
            .await
            .unwrap();

        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let filter = TransactionFilter {
            from: Some(base + Duration::minutes(10)),
            to: Some(base + Duration::minutes(20)),
            ..TransactionFilter::default()
        };
        let ids: Vec<TransactionId> = log.query(filter).await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![TransactionId(3), TransactionId(2)]);
    }

    #[tokio::test]
    async fn test_stored_lines_cannot_be_changed() {
        let log = log();
        let line = log.append(sale(1, 1, 1, 0)).await.unwrap();

        let update = log.inner().update(line.id, ()).await.unwrap_err();
        assert_eq!(TransactionLog::map_error(update), LogError::Immutable(line.id));

        let delete = log.inner().delete(line.id).await.unwrap_err();
        assert_eq!(TransactionLog::map_error(delete), LogError::Immutable(line.id));
        assert_eq!(log.get(line.id).await.unwrap(), Some(line));
    }
}

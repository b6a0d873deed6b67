use crate::checkout::CheckoutCoordinator;
use crate::clients::{CatalogClient, CatalogReader, StockLedger, TransactionLog};
use crate::config::Config;
use crate::low_stock::LowStockMonitor;
use std::sync::Arc;
use tracing::{error, info};

/// Starts every actor and wires the services that use them.
///
/// # Architecture
///
/// - **Stock ledger**: one actor per row, spawned when the row is first credited
/// - **Transaction log**: one actor, append-only
/// - **Catalog**: one product actor and one branch actor
///
/// The [`CheckoutCoordinator`] and [`LowStockMonitor`] are plain services on top of the
/// clients; they hold no state of their own.
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), String> {
/// use checkout_engine::config::Config;
/// use checkout_engine::lifecycle::CheckoutSystem;
///
/// let system = CheckoutSystem::new(&Config::default());
/// // ... hand system.coordinator to the API ...
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct CheckoutSystem {
    pub ledger: StockLedger,
    pub log: TransactionLog,
    pub catalog: CatalogClient,
    pub coordinator: CheckoutCoordinator,
    pub monitor: LowStockMonitor,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CheckoutSystem {
    /// Creates the fixed actors and spawns each on its own task. Ledger row actors are
    /// spawned later, on demand.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &Config) -> Self {
        // 1. Create actors (no dependencies)
        let ledger = crate::stock_actor::new(config.actor_buffer);
        let (log_actor, log) = crate::transaction_actor::new(config.actor_buffer);
        let (product_actor, branch_actor, catalog) = crate::catalog_actor::new(config.actor_buffer);

        // 2. Start actors. None of them needs a context.
        let handles = vec![
            tokio::spawn(log_actor.run(())),
            tokio::spawn(product_actor.run(())),
            tokio::spawn(branch_actor.run(())),
        ];

        // 3. Services over the clients
        let reader: Arc<dyn CatalogReader> = Arc::new(catalog.clone());
        let coordinator = CheckoutCoordinator::new(
            ledger.clone(),
            log.clone(),
            reader.clone(),
            config.reservation_timeout,
        );
        let monitor = LowStockMonitor::new(ledger.clone(), reader, config.low_stock_threshold);

        info!(
            actors = handles.len(),
            actor_buffer = config.actor_buffer,
            "Checkout system started"
        );

        Self {
            ledger,
            log,
            catalog,
            coordinator,
            monitor,
            handles,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes the actor channels; each actor drains what is queued
    /// and exits. Every clone of a client (e.g. one held by the HTTP router) must be
    /// dropped first or this waits for it.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        let mut handles = self.handles;
        handles.extend(self.ledger.close());

        drop(self.coordinator);
        drop(self.monitor);
        drop(self.ledger);
        drop(self.log);
        drop(self.catalog);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

//! # Checkout Engine
//!
//! Starts the actor system, optionally seeds a demo catalog, and serves the HTTP API
//! until Ctrl-C.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use checkout_engine::api::{create_router, AppState};
use checkout_engine::config::Config;
use checkout_engine::lifecycle::{setup_tracing, CheckoutSystem};
use checkout_engine::model::{BranchCreate, ProductCreate, StockKey};
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

/// Two branches, three products and some stock, enough to try checkouts by hand.
async fn seed_demo(system: &CheckoutSystem) -> Result<(), String> {
    let branches = [("Old Town", "Centre"), ("Harbour", "South")];
    let products = [
        ("Espresso beans", Decimal::new(1250, 2), Some("1kg")),
        ("Oat milk", Decimal::new(199, 2), Some("1L")),
        ("Paper filters", Decimal::new(349, 2), None),
    ];

    let mut branch_ids = Vec::new();
    for (name, region) in branches {
        let id = system
            .catalog
            .create_branch(BranchCreate {
                name: name.into(),
                region: region.into(),
            })
            .await
            .map_err(|e| e.to_string())?;
        branch_ids.push(id);
    }

    let mut product_ids = Vec::new();
    for (name, unit_price, size) in products {
        let id = system
            .catalog
            .create_product(ProductCreate {
                name: name.into(),
                unit_price,
                size: size.map(Into::into),
            })
            .await
            .map_err(|e| e.to_string())?;
        product_ids.push(id);
    }

    for (b, branch_id) in branch_ids.iter().enumerate() {
        for (p, product_id) in product_ids.iter().enumerate() {
            let quantity = (3 + 4 * b + 2 * p) as u32;
            system
                .ledger
                .credit(StockKey::new(*branch_id, *product_id), quantity)
                .await
                .map_err(|e| e.to_string())?;
        }
    }

    info!(
        branches = branch_ids.len(),
        products = product_ids.len(),
        "Demo catalog seeded"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }
    info!("Ctrl-C received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenv::dotenv().ok();
    setup_tracing();

    let config = Config::from_env();
    info!(?config, "Starting checkout engine");

    let system = CheckoutSystem::new(&config);

    if config.seed_demo {
        seed_demo(&system)
            .instrument(tracing::info_span!("seed_demo"))
            .await?;
    }

    let app = create_router(AppState::new(&system));
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind {addr}: {e}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    // The router (and its client clones) is gone once serve returns.
    system.shutdown().await
}

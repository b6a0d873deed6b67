use actor_framework::ActorClient;
use checkout_engine::checkout::{CheckoutCoordinator, CheckoutError, MissingRef, StockShortfall};
use checkout_engine::clients::CatalogReader;
use checkout_engine::config::Config;
use checkout_engine::lifecycle::CheckoutSystem;
use checkout_engine::model::{
    BranchCreate, BranchId, Order, OrderLine, ProductCreate, ProductId, StockKey,
    TransactionFilter, UserId,
};
use checkout_engine::stock_actor::ReserveOutcome;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

// --- Fixture ---

/// Branch 1 ("Old Town") and branch 2, products A and B priced 2.50 and 4.00.
struct Shop {
    system: CheckoutSystem,
    branch: BranchId,
    other_branch: BranchId,
    a: ProductId,
    b: ProductId,
}

impl Shop {
    async fn open() -> Self {
        let system = CheckoutSystem::new(&Config::default());
        let branch = system
            .catalog
            .create_branch(BranchCreate {
                name: "Old Town".into(),
                region: "Centre".into(),
            })
            .await
            .unwrap();
        let other_branch = system
            .catalog
            .create_branch(BranchCreate {
                name: "Harbour".into(),
                region: "South".into(),
            })
            .await
            .unwrap();
        let a = system
            .catalog
            .create_product(ProductCreate {
                name: "A".into(),
                unit_price: Decimal::new(250, 2),
                size: None,
            })
            .await
            .unwrap();
        let b = system
            .catalog
            .create_product(ProductCreate {
                name: "B".into(),
                unit_price: Decimal::new(400, 2),
                size: None,
            })
            .await
            .unwrap();
        Self {
            system,
            branch,
            other_branch,
            a,
            b,
        }
    }

    fn key(&self, product: ProductId) -> StockKey {
        StockKey::new(self.branch, product)
    }

    async fn stock(&self, product: ProductId, quantity: u32) {
        self.system
            .ledger
            .credit(self.key(product), quantity)
            .await
            .unwrap();
    }

    async fn quantity(&self, product: ProductId) -> u32 {
        self.system.ledger.get(self.key(product)).await.unwrap()
    }

    async fn logged(&self) -> usize {
        self.system
            .log
            .query(TransactionFilter::default())
            .await
            .unwrap()
            .len()
    }

    fn order(&self, lines: &[(ProductId, u32)]) -> Order {
        Order::new(
            UserId(1),
            lines
                .iter()
                .map(|(product, qty)| OrderLine::new(self.branch, *product, *qty))
                .collect(),
        )
    }
}

// --- Scenarios ---

#[tokio::test]
async fn test_single_line_checkout_succeeds() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 10).await;

    let lines = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 3)]))
        .await
        .unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(lines[0].unit_price, Decimal::new(250, 2));
    assert_eq!(lines[0].user_id, UserId(1));
    assert_eq!(shop.quantity(shop.a).await, 7);
    assert_eq!(shop.logged().await, 1);

    shop.system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_one_short_line_fails_whole_order() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 2).await;
    // Row B exists but is empty.
    shop.stock(shop.b, 1).await;
    shop.system.ledger.try_reserve(shop.key(shop.b), 1).await.unwrap();

    let err = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 2), (shop.b, 1)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::InsufficientStock {
            lines: vec![StockShortfall {
                branch_id: shop.branch,
                product_id: shop.b,
                requested: 1,
                available: 0,
            }]
        }
    );
    assert_eq!(shop.quantity(shop.a).await, 2);
    assert_eq!(shop.logged().await, 0);
}

#[tokio::test]
async fn test_every_short_line_is_reported() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 1).await;
    shop.stock(shop.b, 1).await;

    let err = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.b, 5), (shop.a, 4)]))
        .await
        .unwrap_err();

    let short: Vec<(ProductId, u32, u32)> = err
        .shortfalls()
        .iter()
        .map(|s| (s.product_id, s.requested, s.available))
        .collect();
    assert_eq!(short, vec![(shop.a, 4, 1), (shop.b, 5, 1)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_for_same_row() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 10).await;

    let first = shop.system.coordinator.clone();
    let second = shop.system.coordinator.clone();
    let order = shop.order(&[(shop.a, 6)]);
    let (r1, r2) = tokio::join!(first.checkout(order.clone()), second.checkout(order));

    let (ok, failed): (Vec<_>, Vec<_>) = [r1, r2].into_iter().partition(Result::is_ok);
    assert_eq!(ok.len(), 1);
    assert_eq!(failed.len(), 1);

    let err = failed.into_iter().next().unwrap().unwrap_err();
    assert_eq!(err.kind(), "InsufficientStock");
    assert_eq!(err.shortfalls()[0].available, 4);
    assert_eq!(shop.quantity(shop.a).await, 4);
    assert_eq!(shop.logged().await, 1);
}

#[tokio::test]
async fn test_unknown_product_fails_before_reserving() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;
    let ghost = ProductId(999);

    let err = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1), (ghost, 1)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::NotFound {
            missing: vec![MissingRef::Product(ghost)]
        }
    );
    assert_eq!(err.status(), 404);
    assert_eq!(shop.quantity(shop.a).await, 5);
    assert_eq!(shop.logged().await, 0);
}

#[tokio::test]
async fn test_unstocked_row_is_not_found() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;

    let err = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1), (shop.b, 1)]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::NotFound {
            missing: vec![MissingRef::Stock(shop.key(shop.b))]
        }
    );
    assert_eq!(shop.quantity(shop.a).await, 5);
}

#[tokio::test]
async fn test_invalid_orders_touch_nothing() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;

    let empty = shop.system.coordinator.checkout(shop.order(&[])).await;
    assert!(matches!(empty, Err(CheckoutError::Validation { .. })));

    let zero = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1), (shop.a, 0)]))
        .await
        .unwrap_err();
    assert_eq!(zero.kind(), "InvalidRequest");
    assert_eq!(shop.quantity(shop.a).await, 5);
}

// --- Checkout extras ---

#[tokio::test]
async fn test_multi_branch_order() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;
    shop.system
        .ledger
        .credit(StockKey::new(shop.other_branch, shop.a), 5)
        .await
        .unwrap();

    let order = Order::new(
        UserId(3),
        vec![
            OrderLine::new(shop.other_branch, shop.a, 2),
            OrderLine::new(shop.branch, shop.a, 1),
        ],
    );
    let lines = shop.system.coordinator.checkout(order).await.unwrap();

    let branches: Vec<BranchId> = lines.iter().map(|l| l.branch_id).collect();
    assert_eq!(branches, vec![shop.branch, shop.other_branch]);
    assert_eq!(shop.quantity(shop.a).await, 4);
    assert_eq!(
        shop.system
            .ledger
            .get(StockKey::new(shop.other_branch, shop.a))
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn test_duplicate_lines_are_merged() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;

    let lines = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1), (shop.a, 2)]))
        .await
        .unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 3);
    assert_eq!(shop.quantity(shop.a).await, 2);

    // Merged quantity is what gets checked.
    let err = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1), (shop.a, 2)]))
        .await
        .unwrap_err();
    assert_eq!(err.shortfalls()[0].requested, 3);
}

#[tokio::test]
async fn test_price_is_snapshotted() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;

    let sold = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 2)]))
        .await
        .unwrap();
    shop.system
        .catalog
        .update_price(shop.a, Decimal::new(999, 2))
        .await
        .unwrap();

    let stored = shop.system.log.get(sold[0].id).await.unwrap().unwrap();
    assert_eq!(stored.unit_price, Decimal::new(250, 2));
    assert_eq!(stored.total(), Decimal::new(500, 2));

    let later = shop
        .system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1)]))
        .await
        .unwrap();
    assert_eq!(later[0].unit_price, Decimal::new(999, 2));
}

#[tokio::test]
async fn test_expired_deadline_reserves_nothing() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;

    let catalog: Arc<dyn CatalogReader> = Arc::new(shop.system.catalog.clone());
    let impatient = CheckoutCoordinator::new(
        shop.system.ledger.clone(),
        shop.system.log.clone(),
        catalog,
        Duration::ZERO,
    );

    let err = impatient
        .checkout(shop.order(&[(shop.a, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err, CheckoutError::DeadlineExceeded);
    assert_eq!(shop.quantity(shop.a).await, 5);
    assert_eq!(shop.logged().await, 0);
}

// --- Properties ---

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_lost_concurrent_decrements() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;
    let key = shop.key(shop.a);

    let l1 = shop.system.ledger.clone();
    let l2 = shop.system.ledger.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { l1.try_reserve(key, 3).await }),
        tokio::spawn(async move { l2.try_reserve(key, 3).await }),
    );
    let mut outcomes = vec![r1.unwrap().unwrap(), r2.unwrap().unwrap()];
    outcomes.sort_by_key(|o| matches!(o, ReserveOutcome::Insufficient { .. }));

    assert_eq!(outcomes[0], ReserveOutcome::Reserved { remaining: 2 });
    assert_eq!(outcomes[1], ReserveOutcome::Insufficient { available: 2 });
    assert_eq!(shop.quantity(shop.a).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stock_is_conserved_under_contention() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 20).await;
    shop.stock(shop.b, 10).await;

    let mut handles = Vec::new();
    for i in 0..60u32 {
        let coordinator = shop.system.coordinator.clone();
        // Mix single-line and two-line orders, in both line orders.
        let lines = match i % 3 {
            0 => vec![OrderLine::new(shop.branch, shop.a, 1)],
            1 => vec![
                OrderLine::new(shop.branch, shop.a, 1),
                OrderLine::new(shop.branch, shop.b, 1),
            ],
            _ => vec![
                OrderLine::new(shop.branch, shop.b, 2),
                OrderLine::new(shop.branch, shop.a, 1),
            ],
        };
        handles.push(tokio::spawn(async move {
            coordinator.checkout(Order::new(UserId(i), lines)).await
        }));
    }
    // A restock racing with the checkouts.
    shop.stock(shop.b, 3).await;

    let mut committed_orders = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed_orders += 1,
            Err(e) => assert_eq!(e.kind(), "InsufficientStock", "unexpected {e:?}"),
        }
    }
    assert!(committed_orders > 0);

    let log = shop.system.log.query(TransactionFilter::default()).await.unwrap();
    let sold = |product: ProductId| -> u32 {
        log.iter()
            .filter(|l| l.product_id == product)
            .map(|l| l.quantity)
            .sum()
    };
    assert_eq!(shop.quantity(shop.a).await, 20 - sold(shop.a));
    assert_eq!(shop.quantity(shop.b).await, 13 - sold(shop.b));

    // All-or-nothing per order: every user appears with a complete set of lines.
    for user in 0..60u32 {
        let lines = shop
            .system
            .log
            .query(TransactionFilter::user(UserId(user)))
            .await
            .unwrap();
        let expected = if user % 3 == 0 { 1 } else { 2 };
        assert!(lines.is_empty() || lines.len() == expected);
    }
}

#[tokio::test]
async fn test_reads_are_idempotent() {
    let shop = Shop::open().await;
    shop.stock(shop.a, 5).await;
    shop.system
        .coordinator
        .checkout(shop.order(&[(shop.a, 1)]))
        .await
        .unwrap();

    let q1 = shop.system.log.query(TransactionFilter::default()).await.unwrap();
    let q2 = shop.system.log.query(TransactionFilter::default()).await.unwrap();
    assert_eq!(q1, q2);
    assert_eq!(shop.quantity(shop.a).await, shop.quantity(shop.a).await);
}

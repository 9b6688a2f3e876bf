//! Racing writers on a file-backed database with a multi-connection pool.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dine_in, line, seed};
use saffron_core::{CoreError, Money, NoopPublisher, PaymentMethod, TableStatus};
use saffron_db::{Database, DbConfig, OrderService, PaymentService, ServiceError};

async fn file_backed(dir: &tempfile::TempDir) -> common::Fixture {
    let config = DbConfig::new(dir.path().join("race.db"))
        .max_connections(4)
        .busy_timeout(Duration::from_secs(10));
    seed(Database::new(config).await.unwrap()).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_waiters_same_table_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let fx = file_backed(&dir).await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let first = tokio::spawn({
        let orders = orders.clone();
        let order = dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]);
        async move { orders.create(order).await }
    });
    let second = tokio::spawn({
        let orders = orders.clone();
        let order = dine_in(&fx.table_t5, vec![line(&fx.item_b, 1, &[])]);
        async move { orders.create(order).await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    let won = results.iter().filter(|r| r.is_ok()).count();
    let occupied = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::Domain(CoreError::TableOccupied { .. }))))
        .count();

    assert_eq!(won, 1);
    assert_eq!(occupied, 1);
    assert_eq!(fx.db.orders().count().await.unwrap(), 1);

    let table = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_cashiers_same_order_one_payment() {
    let dir = tempfile::tempdir().unwrap();
    let fx = file_backed(&dir).await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));
    let payments = PaymentService::new(fx.db.clone());

    let order_id = orders
        .create(dine_in(&fx.table_t6, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap()
        .order
        .id;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let payments = payments.clone();
            let order_id = order_id.clone();
            tokio::spawn(async move {
                payments
                    .process(&order_id, PaymentMethod::Cash, Money::from_cents(12_000))
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(ServiceError::Domain(CoreError::OrderAlreadyPaid { .. })))));
    assert_eq!(fx.db.payments().count_for_order(&order_id).await.unwrap(), 1);
}

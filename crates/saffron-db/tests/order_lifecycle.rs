//! Order lifecycle against an in-memory database.

mod common;

use std::sync::Arc;

use common::{dine_in, line, setup, takeaway, FailingPublisher, RecordingPublisher};
use saffron_core::{
    CoreError, ErrorKind, Money, NoopPublisher, OrderItemStatus, OrderStatus, OrderType, OrderUpdate, PaymentMethod,
    TableStatus, KITCHEN_CHANNEL, ORDER_PLACED_EVENT,
};
use saffron_db::{OrderFilter, OrderService, PaymentService, ServiceError, TableService};

fn table_status(status: Option<TableStatus>) -> TableStatus {
    status.expect("table exists")
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_dine_in_prices_lines_and_occupies_table() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let details = orders
        .create(dine_in(
            &fx.table_t5,
            vec![line(&fx.item_a, 2, &[&fx.mod_10]), line(&fx.item_b, 1, &[&fx.mod_20])],
        ))
        .await
        .unwrap();

    assert_eq!(details.order.status, OrderStatus::Pending);
    assert_eq!(details.order.order_type, OrderType::DineIn);
    assert_eq!(details.order.total().to_string(), "430.00");
    assert_eq!(details.lines.len(), 2);
    assert_eq!(details.lines[0].item.subtotal(), Money::from_cents(26_000));
    assert_eq!(details.lines[1].item.subtotal(), Money::from_cents(17_000));
    assert_eq!(details.lines[0].category_name, "Main Courses");
    assert_eq!(details.lines[0].modifiers[0].name_snapshot, "Extra Cheese");
    assert!(details.payment.is_none());

    let table = details.table.expect("dine-in order carries its table");
    assert_eq!(table.table_number, "T5");
    assert_eq!(table.status, TableStatus::Occupied);

    let stored = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Occupied);
}

#[tokio::test]
async fn test_create_takeaway_with_two_modifiers() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let details = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 1, &[&fx.mod_10, &fx.mod_20])]))
        .await
        .unwrap();

    assert_eq!(details.order.total().to_string(), "150.00");
    assert_eq!(details.order.order_type, OrderType::Takeaway);
    assert_eq!(details.order.customer_name.as_deref(), Some("Bilal"));
    assert!(details.order.table_id.is_none());
    assert!(details.table.is_none());
    assert_eq!(details.lines[0].modifiers.len(), 2);
}

#[tokio::test]
async fn test_create_on_occupied_table_writes_nothing() {
    let fx = setup().await;
    fx.db
        .tables()
        .set_status(&fx.table_t5, TableStatus::Occupied)
        .await
        .unwrap();
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let err = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(CoreError::TableOccupied { ref table_number }) if table_number == "T5"
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(fx.db.orders().count().await.unwrap(), 0);

    let stored = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Occupied);
}

#[tokio::test]
async fn test_create_on_reserved_table_claims_it() {
    let fx = setup().await;
    fx.db
        .tables()
        .set_status(&fx.table_t6, TableStatus::Reserved)
        .await
        .unwrap();
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    orders
        .create(dine_in(&fx.table_t6, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();

    let stored = fx.db.tables().get_by_id(&fx.table_t6).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Occupied);
}

#[tokio::test]
async fn test_create_with_unavailable_item_rolls_back() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let err = orders
        .create(dine_in(
            &fx.table_t5,
            vec![line(&fx.item_a, 1, &[]), line(&fx.item_off, 1, &[])],
        ))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Lobster Thermidor"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(fx.db.orders().count().await.unwrap(), 0);

    // The claim was rolled back with everything else
    let stored = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Available);
}

#[tokio::test]
async fn test_switching_off_an_item_only_affects_new_lines() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let placed = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 2, &[])]))
        .await
        .unwrap();

    fx.db.catalog().set_availability(&fx.item_a, false).await.unwrap();

    // Lines already on the order keep their snapshot
    let reloaded = orders.get(&placed.order.id).await.unwrap();
    assert_eq!(reloaded.lines.len(), 1);
    assert_eq!(reloaded.order.total(), Money::from_cents(24_000));

    // New lines for the item are refused, on create and on update
    let err = orders
        .create(takeaway("Hina", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = orders
        .update(&placed.order.id, OrderUpdate::new(None, vec![line(&fx.item_a, 1, &[])]).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(orders.get(&placed.order.id).await.unwrap().lines.len(), 1);

    // Switching it back on makes it orderable again
    fx.db.catalog().set_availability(&fx.item_a, true).await.unwrap();
    orders
        .create(takeaway("Hina", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();

    let err = fx.db.catalog().set_availability("no-such-item", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_with_unknown_references() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let err = orders
        .create(dine_in("no-such-table", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = orders
        .create(takeaway("Bilal", vec![line("no-such-item", 1, &[])]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 1, &["no-such-modifier"])]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(fx.db.orders().count().await.unwrap(), 0);
}

// =============================================================================
// Kitchen Notification
// =============================================================================

#[tokio::test]
async fn test_create_publishes_one_kitchen_ticket() {
    let fx = setup().await;
    let publisher = RecordingPublisher::new();
    let orders = OrderService::new(fx.db.clone(), publisher.clone());

    let details = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 2, &[&fx.mod_10])]))
        .await
        .unwrap();

    let calls = publisher.calls();
    assert_eq!(calls.len(), 1);

    let (channel, event, payload) = &calls[0];
    assert_eq!(channel, KITCHEN_CHANNEL);
    assert_eq!(event, ORDER_PLACED_EVENT);
    assert_eq!(payload["order_id"], details.order.id.as_str());
    assert_eq!(payload["total_amount"], "260.00");
    assert_eq!(payload["table"]["number"], "T5");
    assert_eq!(payload["items"][0]["quantity"], 2);

    // Updates and cancels stay quiet
    orders
        .update(&details.order.id, OrderUpdate::new(Some(OrderStatus::Confirmed), vec![]).unwrap())
        .await
        .unwrap();
    orders.cancel(&details.order.id).await.unwrap();
    assert_eq!(publisher.calls().len(), 1);
}

#[tokio::test]
async fn test_failed_create_publishes_nothing() {
    let fx = setup().await;
    let publisher = RecordingPublisher::new();
    let orders = OrderService::new(fx.db.clone(), publisher.clone());

    orders
        .create(takeaway("Bilal", vec![line(&fx.item_off, 1, &[])]))
        .await
        .unwrap_err();

    assert!(publisher.calls().is_empty());
}

#[tokio::test]
async fn test_publisher_failure_does_not_fail_create() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(FailingPublisher));

    let details = orders
        .create(takeaway("Bilal", vec![line(&fx.item_b, 1, &[])]))
        .await
        .unwrap();

    assert_eq!(details.order.total().to_string(), "150.00");
    assert_eq!(fx.db.orders().count().await.unwrap(), 1);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_appends_lines_and_recomputes_total() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let created = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();
    assert_eq!(created.order.total().to_string(), "120.00");

    let updated = orders
        .update(
            &created.order.id,
            OrderUpdate::new(None, vec![line(&fx.item_b, 2, &[&fx.mod_10])]).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(updated.lines.len(), 2);
    assert_eq!(updated.order.total().to_string(), "440.00");
    assert_eq!(updated.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_update_status_follows_allowed_transitions() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let id = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap()
        .order
        .id;

    for status in [OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready] {
        let details = orders
            .update(&id, OrderUpdate::new(Some(status), vec![]).unwrap())
            .await
            .unwrap();
        assert_eq!(details.order.status, status);
    }

    // Ready → Pending is backwards
    let err = orders
        .update(&id, OrderUpdate::new(Some(OrderStatus::Pending), vec![]).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(CoreError::InvalidStatusTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Pending
        })
    ));

    // Same status is a no-op
    let details = orders
        .update(&id, OrderUpdate::new(Some(OrderStatus::Ready), vec![]).unwrap())
        .await
        .unwrap();
    assert_eq!(details.order.status, OrderStatus::Ready);
}

#[tokio::test]
async fn test_update_cannot_complete_or_cancel() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let id = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap()
        .order
        .id;

    for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
        let err = orders
            .update(&id, OrderUpdate::new(Some(status), vec![]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    let details = orders.get(&id).await.unwrap();
    assert_eq!(details.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_update_rejects_terminal_orders_without_changes() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));
    let payments = PaymentService::new(fx.db.clone());

    let paid = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();
    payments
        .process(&paid.order.id, PaymentMethod::Cash, Money::from_cents(12_000))
        .await
        .unwrap();

    let cancelled = orders
        .create(takeaway("Bilal", vec![line(&fx.item_b, 1, &[])]))
        .await
        .unwrap();
    orders.cancel(&cancelled.order.id).await.unwrap();

    for (id, total) in [(&paid.order.id, "120.00"), (&cancelled.order.id, "150.00")] {
        let err = orders
            .update(id, OrderUpdate::new(None, vec![line(&fx.item_b, 3, &[])]).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CoreError::OrderNotModifiable { .. })));

        assert_eq!(fx.db.orders().count_items(id).await.unwrap(), 1);
        assert_eq!(orders.get(id).await.unwrap().order.total().to_string(), total);
    }
}

#[tokio::test]
async fn test_update_unknown_order() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let err = orders
        .update("missing", OrderUpdate::new(Some(OrderStatus::Confirmed), vec![]).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// =============================================================================
// Cancel
// =============================================================================

#[tokio::test]
async fn test_cancel_frees_table_and_blocks_payment() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));
    let payments = PaymentService::new(fx.db.clone());

    let created = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();

    let cancelled = orders.cancel(&created.order.id).await.unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);

    let stored = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Available);

    let err = payments
        .process(&created.order.id, PaymentMethod::Cash, Money::from_cents(12_000))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cancelled"));
    assert_eq!(fx.db.payments().count_for_order(&created.order.id).await.unwrap(), 0);

    // Cancelling twice is a conflict
    let err = orders.cancel(&created.order.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_cancel_leaves_reserved_table_alone() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let created = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();
    fx.db
        .tables()
        .set_status(&fx.table_t5, TableStatus::Reserved)
        .await
        .unwrap();

    orders.cancel(&created.order.id).await.unwrap();

    let stored = fx.db.tables().get_by_id(&fx.table_t5).await.unwrap();
    assert_eq!(table_status(stored.map(|t| t.status)), TableStatus::Reserved);
}

// =============================================================================
// Item Status and Reads
// =============================================================================

#[tokio::test]
async fn test_item_status_on_active_and_terminal_orders() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let created = orders
        .create(takeaway("Bilal", vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();
    let item_id = created.lines[0].item.id.clone();

    let item = orders
        .update_item_status(&item_id, OrderItemStatus::Cooking)
        .await
        .unwrap();
    assert_eq!(item.status, OrderItemStatus::Cooking);

    orders.cancel(&created.order.id).await.unwrap();
    let err = orders
        .update_item_status(&item_id, OrderItemStatus::Ready)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = fx.db.orders().get_item(&item_id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderItemStatus::Cooking);

    let err = orders
        .update_item_status("missing", OrderItemStatus::Ready)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_active_and_filtered() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));

    let dine = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();
    let take = orders
        .create(takeaway("Bilal", vec![line(&fx.item_b, 1, &[])]))
        .await
        .unwrap();
    orders.cancel(&take.order.id).await.unwrap();

    let active = orders.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].order.id, dine.order.id);

    let filter = OrderFilter {
        order_type: Some(OrderType::Takeaway),
        statuses: vec![OrderStatus::Cancelled],
    };
    let found = orders.list(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].order.id, take.order.id);

    let everything = orders.list(&OrderFilter::default()).await.unwrap();
    assert_eq!(everything.len(), 2);
}

// =============================================================================
// Tables
// =============================================================================

#[tokio::test]
async fn test_table_overview_and_delete_guard() {
    let fx = setup().await;
    let orders = OrderService::new(fx.db.clone(), Arc::new(NoopPublisher));
    let tables = TableService::new(fx.db.clone());

    let created = orders
        .create(dine_in(&fx.table_t5, vec![line(&fx.item_a, 1, &[])]))
        .await
        .unwrap();

    let overview = tables.list().await.unwrap();
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].table.table_number, "T5");
    assert_eq!(overview[0].active_orders.len(), 1);
    assert!(overview[1].active_orders.is_empty());

    let err = tables.delete(&fx.table_t5).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(CoreError::TableHasActiveOrders { .. })));

    orders.cancel(&created.order.id).await.unwrap();
    tables.delete(&fx.table_t5).await.unwrap();

    // Historical order survives without its table
    let details = orders.get(&created.order.id).await.unwrap();
    assert!(details.order.table_id.is_none());

    let err = tables.delete(&fx.table_t5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_table_create_rejects_duplicate_number() {
    let fx = setup().await;
    let tables = TableService::new(fx.db.clone());

    let created = tables.create(" T7 ", None).await.unwrap();
    assert_eq!(created.table_number, "T7");
    assert_eq!(created.status, TableStatus::Available);

    let err = tables.create("T7", Some(TableStatus::Reserved)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = tables.create("   ", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

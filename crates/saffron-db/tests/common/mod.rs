//! Shared fixtures for the service tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use saffron_core::{
    KitchenPublisher, LineRequest, NewOrder, OrderKind, OrderType, PublishError, StaffRef, TableStatus,
};
use saffron_db::{Database, DbConfig};

/// A small menu and floor plan.
pub struct Fixture {
    pub db: Database,
    /// 120.00
    pub item_a: String,
    /// 150.00
    pub item_b: String,
    /// Switched off
    pub item_off: String,
    /// +10.00
    pub mod_10: String,
    /// +20.00
    pub mod_20: String,
    /// T5, available
    pub table_t5: String,
    /// T6, available
    pub table_t6: String,
}

pub async fn setup() -> Fixture {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(db).await
}

pub async fn seed(db: Database) -> Fixture {
    let catalog = db.catalog();
    let mains = catalog.insert_category("Main Courses").await.unwrap();

    let item_a = catalog
        .insert_menu_item(&mains.id, "Grilled Chicken", None, 12_000, true)
        .await
        .unwrap();
    let item_b = catalog
        .insert_menu_item(&mains.id, "Ribeye Steak", Some("300g"), 15_000, true)
        .await
        .unwrap();
    let item_off = catalog
        .insert_menu_item(&mains.id, "Lobster Thermidor", None, 45_000, false)
        .await
        .unwrap();

    let mod_10 = catalog.insert_modifier("Extra Cheese", 1_000).await.unwrap();
    let mod_20 = catalog.insert_modifier("Extra Bacon", 2_000).await.unwrap();
    for item in [&item_a.id, &item_b.id] {
        catalog.link_modifier(item, &mod_10.id).await.unwrap();
        catalog.link_modifier(item, &mod_20.id).await.unwrap();
    }

    let t5 = db.tables().insert("T5", TableStatus::Available).await.unwrap();
    let t6 = db.tables().insert("T6", TableStatus::Available).await.unwrap();

    Fixture {
        db,
        item_a: item_a.id,
        item_b: item_b.id,
        item_off: item_off.id,
        mod_10: mod_10.id,
        mod_20: mod_20.id,
        table_t5: t5.id,
        table_t6: t6.id,
    }
}

pub fn waiter() -> StaffRef {
    StaffRef {
        id: "staff-1".to_string(),
        name: "Aisha".to_string(),
    }
}

pub fn line(menu_item_id: &str, quantity: i64, modifier_ids: &[&str]) -> LineRequest {
    LineRequest::new(
        menu_item_id,
        quantity,
        None,
        modifier_ids.iter().map(|id| id.to_string()),
    )
    .unwrap()
}

pub fn dine_in(table_id: &str, lines: Vec<LineRequest>) -> NewOrder {
    let kind = OrderKind::resolve(OrderType::DineIn, Some(table_id), None, None).unwrap();
    NewOrder::new(kind, waiter(), lines).unwrap()
}

pub fn takeaway(customer: &str, lines: Vec<LineRequest>) -> NewOrder {
    let kind = OrderKind::resolve(OrderType::Takeaway, None, Some(customer), Some("0300-1234567")).unwrap();
    NewOrder::new(kind, waiter(), lines).unwrap()
}

// =============================================================================
// Publishers
// =============================================================================

/// Records every publish call.
#[derive(Default)]
pub struct RecordingPublisher {
    pub calls: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, String, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl KitchenPublisher for RecordingPublisher {
    fn publish(&self, channel: &str, event: &str, payload: serde_json::Value) -> Result<(), PublishError> {
        self.calls
            .lock()
            .unwrap()
            .push((channel.to_string(), event.to_string(), payload));
        Ok(())
    }
}

/// Always fails.
pub struct FailingPublisher;

impl KitchenPublisher for FailingPublisher {
    fn publish(&self, _channel: &str, _event: &str, _payload: serde_json::Value) -> Result<(), PublishError> {
        Err(PublishError::Unavailable("broker down".to_string()))
    }
}

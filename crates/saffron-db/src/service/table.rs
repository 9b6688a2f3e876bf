//! # Table Service
//!
//! Floor management around the occupancy bit: create, set status by hand,
//! delete when no order is open on the table.

use chrono::Utc;
use tracing::info;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::table;
use crate::service::ServiceResult;
use saffron_core::validation::validate_table_number;
use saffron_core::{CoreError, DiningTable, TableOverview, TableStatus};

#[derive(Debug, Clone)]
pub struct TableService {
    db: Database,
}

impl TableService {
    pub fn new(db: Database) -> Self {
        TableService { db }
    }

    /// All tables by number, each with its active orders.
    pub async fn list(&self) -> ServiceResult<Vec<TableOverview>> {
        Ok(self.db.tables().list_overview().await?)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<DiningTable> {
        self.db
            .tables()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id).into())
    }

    /// Creates a table. The number must be unique (Conflict otherwise).
    pub async fn create(&self, table_number: &str, status: Option<TableStatus>) -> ServiceResult<DiningTable> {
        let table_number = validate_table_number(table_number)?;
        let created = self
            .db
            .tables()
            .insert(&table_number, status.unwrap_or_default())
            .await?;

        info!(table_id = %created.id, table_number = %created.table_number, "Table created");
        Ok(created)
    }

    /// Sets a table's status by hand.
    pub async fn set_status(&self, id: &str, status: TableStatus) -> ServiceResult<DiningTable> {
        let updated = self.db.tables().set_status(id, status).await?;

        info!(table_id = %id, status = %status, "Table status set");
        Ok(updated)
    }

    /// Deletes a table unless an order is still open on it.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut tx = self.db.pool().begin().await?;

        if !table::touch(&mut tx, id, Utc::now()).await? {
            return Err(DbError::not_found("Table", id).into());
        }

        let existing = table::fetch(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id))?;

        if table::count_active_orders(&mut tx, id).await? > 0 {
            return Err(CoreError::TableHasActiveOrders {
                table_number: existing.table_number,
            }
            .into());
        }

        table::delete(&mut tx, id).await?;
        tx.commit().await?;

        info!(table_id = %id, table_number = %existing.table_number, "Table deleted");
        Ok(())
    }
}

//! # Catalog Repository
//!
//! Read access to categories, menu items and modifiers, plus the inserts
//! the seed tool uses. The menu itself is maintained outside this service.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use saffron_core::{Category, MenuItem, MenuItemDetails, Modifier};

/// Filters for [`CatalogRepository::list_menu_items`].
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category_id: Option<String>,
    pub available_only: bool,
}

/// Repository for catalog lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists all categories by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Lists menu items by name, optionally filtered.
    pub async fn list_menu_items(&self, filter: &MenuFilter) -> DbResult<Vec<MenuItem>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, category_id, name, description, price_cents, is_available, created_at, updated_at \
             FROM menu_items WHERE 1 = 1",
        );

        if let Some(category_id) = &filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id.clone());
        }
        if filter.available_only {
            query.push(" AND is_available = 1");
        }
        query.push(" ORDER BY name");

        let items = query.build_query_as::<MenuItem>().fetch_all(&self.pool).await?;

        Ok(items)
    }

    /// Gets a menu item with its category name and offerable modifiers.
    pub async fn get_menu_item_details(&self, id: &str) -> DbResult<Option<MenuItemDetails>> {
        let mut conn = self.pool.acquire().await?;

        let Some(item) = fetch_menu_item(&mut conn, id).await? else {
            return Ok(None);
        };

        let category_name: String = sqlx::query_scalar("SELECT name FROM categories WHERE id = ?1")
            .bind(&item.category_id)
            .fetch_optional(&mut *conn)
            .await?
            .unwrap_or_default();

        let modifiers = sqlx::query_as::<_, Modifier>(
            r#"
            SELECT m.id, m.name, m.price_change_cents, m.created_at
            FROM modifiers m
            JOIN menu_item_modifiers mim ON mim.modifier_id = m.id
            WHERE mim.menu_item_id = ?1
            ORDER BY m.name
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(MenuItemDetails {
            item,
            category_name,
            modifiers,
        }))
    }

    /// Lists all modifiers by name.
    pub async fn list_modifiers(&self) -> DbResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            "SELECT id, name, price_change_cents, created_at FROM modifiers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Counts menu items. The seed tool uses it to stay idempotent.
    pub async fn count_menu_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Inserts (seed tool, tests)
    // =========================================================================

    /// Inserts a category.
    pub async fn insert_category(&self, name: &str) -> DbResult<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a menu item.
    pub async fn insert_menu_item(
        &self,
        category_id: &str,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
        is_available: bool,
    ) -> DbResult<MenuItem> {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            price_cents,
            is_available,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, category_id, name, description,
                price_cents, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(item.is_available)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Switches a menu item on or off.
    pub async fn set_availability(&self, id: &str, is_available: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE menu_items SET is_available = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_available)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        Ok(())
    }

    /// Inserts a modifier.
    pub async fn insert_modifier(&self, name: &str, price_change_cents: i64) -> DbResult<Modifier> {
        let modifier = Modifier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_change_cents,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO modifiers (id, name, price_change_cents, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&modifier.id)
            .bind(&modifier.name)
            .bind(modifier.price_change_cents)
            .bind(modifier.created_at)
            .execute(&self.pool)
            .await?;

        Ok(modifier)
    }

    /// Marks a modifier as offerable on a menu item.
    pub async fn link_modifier(&self, menu_item_id: &str, modifier_id: &str) -> DbResult<()> {
        sqlx::query("INSERT OR IGNORE INTO menu_item_modifiers (menu_item_id, modifier_id) VALUES (?1, ?2)")
            .bind(menu_item_id)
            .bind(modifier_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Fetches a menu item on the given connection.
pub async fn fetch_menu_item(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, category_id, name, description, price_cents, is_available, created_at, updated_at
        FROM menu_items
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

/// Fetches the modifiers for `ids`, in the same order.
///
/// Fails with NotFound on the first id that doesn't exist.
pub async fn fetch_modifiers(conn: &mut SqliteConnection, ids: &[String]) -> DbResult<Vec<Modifier>> {
    let mut modifiers = Vec::with_capacity(ids.len());

    for id in ids {
        let modifier = sqlx::query_as::<_, Modifier>(
            "SELECT id, name, price_change_cents, created_at FROM modifiers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Modifier", id.as_str()))?;

        modifiers.push(modifier);
    }

    Ok(modifiers)
}

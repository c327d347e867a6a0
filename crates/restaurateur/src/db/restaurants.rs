//! Restaurant and menu repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use star_burger_core::{MenuItem, ProductId, Restaurant, RestaurantId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct RestaurantRow {
    id: i32,
    name: String,
    address: String,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: RestaurantId::new(row.id),
            name: row.name,
            address: row.address,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    restaurant_id: i32,
    product_id: i32,
    availability: bool,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            restaurant_id: RestaurantId::new(row.restaurant_id),
            product_id: ProductId::new(row.product_id),
            available: row.availability,
        }
    }
}

/// Repository for restaurants and their menus.
pub struct RestaurantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RestaurantRepository<'a> {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every restaurant in primary key order.
    ///
    /// This order is the tie-breaker for equal-distance candidates, so it
    /// must stay stable between calls.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(
            r"
            SELECT id, name, address
            FROM restaurant
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded restaurants");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List all menu rows, available or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_menu_items(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT restaurant_id, product_id, availability
            FROM restaurant_menu_item
            ORDER BY product_id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded menu items");
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

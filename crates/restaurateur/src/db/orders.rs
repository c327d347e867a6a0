//! Order repository.
//!
//! Orders are read-only for this service. Each listing issues two queries:
//! one for the order headers with their cost totals, and one for the product
//! lines of all returned orders.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use star_burger_core::{OrderId, OrderStatus, PaymentType, ProductId, Restaurant, RestaurantId};

use super::RepositoryError;
use crate::models::Order;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    status: String,
    payment_type: String,
    firstname: String,
    lastname: String,
    phonenumber: String,
    address: String,
    comment: String,
    registered_at: DateTime<Utc>,
    total_cost: Decimal,
    restaurant_id: Option<i32>,
    restaurant_name: Option<String>,
    restaurant_address: Option<String>,
}

impl OrderRow {
    fn into_order(self, required_products: HashSet<ProductId>) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;
        let payment_type = self.payment_type.parse::<PaymentType>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;

        let restaurant = match (self.restaurant_id, self.restaurant_name) {
            (Some(id), Some(name)) => Some(Restaurant {
                id: RestaurantId::new(id),
                name,
                address: self.restaurant_address.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Order {
            id: OrderId::new(self.id),
            status,
            payment_type,
            firstname: self.firstname,
            lastname: self.lastname,
            phonenumber: self.phonenumber,
            address: self.address,
            comment: self.comment,
            registered_at: self.registered_at,
            total_cost: self.total_cost,
            restaurant,
            required_products,
        })
    }
}

const ORDER_SELECT: &str = r"
    SELECT o.id, o.status, o.payment_type, o.firstname, o.lastname,
           o.phonenumber, o.address, o.comment, o.registered_at,
           COALESCE(SUM(i.quantity * i.price), 0)::NUMERIC AS total_cost,
           r.id AS restaurant_id, r.name AS restaurant_name,
           r.address AS restaurant_address
    FROM orders o
    LEFT JOIN order_item i ON i.order_id = o.id
    LEFT JOIN restaurant r ON r.id = o.restaurant_id
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for reading customer orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders that are not done yet, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a status code is unknown.
    #[instrument(skip(self))]
    pub async fn list_unfinished(&self) -> Result<Vec<Order>, RepositoryError> {
        let query = format!(
            "{ORDER_SELECT}
            WHERE o.status <> $1
            GROUP BY o.id, r.id
            ORDER BY o.registered_at, o.status"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(OrderStatus::Done.code())
            .fetch_all(self.pool)
            .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut products = self.required_products(&ids).await?;

        debug!(count = rows.len(), "Loaded unfinished orders");
        rows.into_iter()
            .map(|row| {
                let required = products.remove(&row.id).unwrap_or_default();
                row.into_order(required)
            })
            .collect()
    }

    /// Get a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_by_id(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let query = format!(
            "{ORDER_SELECT}
            WHERE o.id = $1
            GROUP BY o.id, r.id"
        );
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id.get())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut products = self.required_products(&[row.id]).await?;
        let required = products.remove(&row.id).unwrap_or_default();
        row.into_order(required)
    }

    /// Distinct products per order for the given order IDs.
    async fn required_products(
        &self,
        order_ids: &[i64],
    ) -> Result<HashMap<i64, HashSet<ProductId>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i32)> = sqlx::query_as(
            r"
            SELECT DISTINCT order_id, product_id
            FROM order_item
            WHERE order_id = ANY($1)
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i64, HashSet<ProductId>> = HashMap::new();
        for (order_id, product_id) in rows {
            by_order
                .entry(order_id)
                .or_default()
                .insert(ProductId::new(product_id));
        }
        Ok(by_order)
    }
}

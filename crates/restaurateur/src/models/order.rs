//! Orders as seen by the dispatch pass.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use star_burger_core::{OrderId, OrderStatus, PaymentType, ProductId, Restaurant};

/// An order that has not been delivered yet.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_type: PaymentType,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    /// Delivery address; doubles as the geocode cache key.
    pub address: String,
    pub comment: String,
    pub registered_at: DateTime<Utc>,
    /// Sum of `quantity * price` over the order lines.
    pub total_cost: Decimal,
    /// Restaurant a manager already picked, if any.
    pub restaurant: Option<Restaurant>,
    /// Distinct products across the order lines.
    pub required_products: HashSet<ProductId>,
}

impl Order {
    /// Customer name for display.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

//! Restaurants and their menu availability rows.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, RestaurantId};

/// A restaurant that can take delivery orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    /// Street address; doubles as the geocode cache key.
    pub address: String,
}

/// One row of a restaurant menu.
///
/// Each `(restaurant_id, product_id)` pair appears at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub restaurant_id: RestaurantId,
    pub product_id: ProductId,
    /// Whether the product is currently on sale at this restaurant.
    pub available: bool,
}

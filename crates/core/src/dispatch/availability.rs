//! Per-restaurant sets of products currently on sale.

use std::collections::{HashMap, HashSet};

use crate::types::{MenuItem, ProductId, RestaurantId};

/// Maps each restaurant to the products it can currently sell.
///
/// Restaurants with no available products are absent from the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuAvailabilityIndex {
    by_restaurant: HashMap<RestaurantId, HashSet<ProductId>>,
}

impl MenuAvailabilityIndex {
    /// Build the index from menu rows. Rows marked unavailable are skipped.
    #[must_use]
    pub fn build<I>(menu_items: I) -> Self
    where
        I: IntoIterator<Item = MenuItem>,
    {
        let mut by_restaurant: HashMap<RestaurantId, HashSet<ProductId>> = HashMap::new();
        for item in menu_items.into_iter().filter(|item| item.available) {
            by_restaurant
                .entry(item.restaurant_id)
                .or_default()
                .insert(item.product_id);
        }
        Self { by_restaurant }
    }

    /// Products currently available at `restaurant`, if it has any.
    #[must_use]
    pub fn available_products(&self, restaurant: RestaurantId) -> Option<&HashSet<ProductId>> {
        self.by_restaurant.get(&restaurant)
    }

    /// Number of restaurants with at least one available product.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_restaurant.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_restaurant.is_empty()
    }
}

impl FromIterator<MenuItem> for MenuAvailabilityIndex {
    fn from_iter<T: IntoIterator<Item = MenuItem>>(iter: T) -> Self {
        Self::build(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(restaurant: i32, product: i32, available: bool) -> MenuItem {
        MenuItem {
            restaurant_id: RestaurantId::new(restaurant),
            product_id: ProductId::new(product),
            available,
        }
    }

    #[test]
    fn test_only_available_items_contribute() {
        let index = MenuAvailabilityIndex::build([
            item(1, 10, true),
            item(1, 11, false),
            item(2, 10, false),
        ]);

        let first = index.available_products(RestaurantId::new(1));
        assert_eq!(first, Some(&HashSet::from([ProductId::new(10)])));
        assert_eq!(index.available_products(RestaurantId::new(2)), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_empty_menu_builds_empty_index() {
        let index: MenuAvailabilityIndex = std::iter::empty().collect();
        assert!(index.is_empty());
        assert_eq!(index.available_products(RestaurantId::new(1)), None);
    }

    #[test]
    fn test_groups_products_per_restaurant() {
        let index = MenuAvailabilityIndex::build([
            item(1, 1, true),
            item(1, 2, true),
            item(2, 1, true),
            item(2, 2, true),
            item(2, 3, true),
        ]);

        let first = index.available_products(RestaurantId::new(1));
        assert_eq!(first.map(HashSet::len), Some(2));
        let second = index.available_products(RestaurantId::new(2));
        assert_eq!(second.map(HashSet::len), Some(3));
    }
}

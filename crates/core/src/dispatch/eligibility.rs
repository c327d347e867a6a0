//! Menu coverage check for orders.

use std::collections::HashSet;

use super::availability::MenuAvailabilityIndex;
use crate::types::{ProductId, Restaurant};

/// Restaurants able to cook every product in `required`.
///
/// A restaurant qualifies iff `required` is a subset of its available
/// products. Restaurants missing from `index` never qualify, except that an
/// empty `required` set is satisfied by every restaurant. The result keeps the
/// order of `restaurants`.
///
/// Orders already pinned to a restaurant should not be passed here; the
/// pinned restaurant is their only candidate.
#[must_use]
pub fn match_restaurants<'a>(
    required: &HashSet<ProductId>,
    index: &MenuAvailabilityIndex,
    restaurants: &'a [Restaurant],
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|restaurant| {
            index
                .available_products(restaurant.id)
                .map_or(required.is_empty(), |available| {
                    required.is_subset(available)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{MenuItem, RestaurantId};

    fn restaurant(id: i32) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: format!("Restaurant {id}"),
            address: format!("Street {id}"),
        }
    }

    fn menu(restaurant: i32, products: &[i32]) -> Vec<MenuItem> {
        products
            .iter()
            .map(|&product| MenuItem {
                restaurant_id: RestaurantId::new(restaurant),
                product_id: ProductId::new(product),
                available: true,
            })
            .collect()
    }

    fn products(ids: &[i32]) -> HashSet<ProductId> {
        ids.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_only_full_coverage_is_eligible() {
        let restaurants = [restaurant(1), restaurant(2)];
        let index = MenuAvailabilityIndex::build(
            menu(1, &[1, 2]).into_iter().chain(menu(2, &[1, 2, 3])),
        );

        let eligible = match_restaurants(&products(&[1, 2, 3]), &index, &restaurants);

        let ids: Vec<_> = eligible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RestaurantId::new(2)]);
    }

    #[test]
    fn test_no_restaurant_sells_product() {
        let restaurants = [restaurant(1), restaurant(2)];
        let index = MenuAvailabilityIndex::build(menu(1, &[2]).into_iter().chain(menu(2, &[3])));

        assert!(match_restaurants(&products(&[1]), &index, &restaurants).is_empty());
    }

    #[test]
    fn test_empty_order_matches_every_restaurant() {
        let restaurants = [restaurant(1), restaurant(2), restaurant(3)];
        let index = MenuAvailabilityIndex::build(menu(2, &[5]));

        let eligible = match_restaurants(&HashSet::new(), &index, &restaurants);

        assert_eq!(eligible.len(), 3);
    }

    #[test]
    fn test_preserves_enumeration_order() {
        let restaurants = [restaurant(3), restaurant(1), restaurant(2)];
        let index = MenuAvailabilityIndex::build(
            menu(1, &[1])
                .into_iter()
                .chain(menu(2, &[1]))
                .chain(menu(3, &[1])),
        );

        let eligible = match_restaurants(&products(&[1]), &index, &restaurants);

        let ids: Vec<_> = eligible.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_eligible_iff_subset(
            menus in prop::collection::vec(prop::collection::hash_set(0..12i32, 0..8), 1..6),
            required in prop::collection::hash_set(0..12i32, 0..5),
        ) {
            let restaurants: Vec<Restaurant> = (0..menus.len())
                .map(|i| restaurant(i32::try_from(i).unwrap_or(i32::MAX)))
                .collect();
            let items = menus.iter().zip(&restaurants).flat_map(|(products, r)| {
                products.iter().map(move |&product| MenuItem {
                    restaurant_id: r.id,
                    product_id: ProductId::new(product),
                    available: true,
                })
            });
            let index = MenuAvailabilityIndex::build(items);
            let required_ids = products(&required.iter().copied().collect::<Vec<_>>());

            let eligible: HashSet<RestaurantId> =
                match_restaurants(&required_ids, &index, &restaurants)
                    .into_iter()
                    .map(|r| r.id)
                    .collect();

            for (products, r) in menus.iter().zip(&restaurants) {
                let covers = required.is_subset(products);
                prop_assert_eq!(eligible.contains(&r.id), covers);
            }
        }
    }
}

//! Candidate restaurants for unassigned orders.
//!
//! One dispatch pass loads restaurants and menus once into a
//! [`DispatchContext`], then computes a ranked candidate list per order.
//! Geocoding problems degrade a candidate to "unknown distance" and never
//! fail the order or the batch.

use futures::future::join_all;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use star_burger_core::{
    Candidate, Coordinate, MenuAvailabilityIndex, OrderId, Ranking, Restaurant, match_restaurants,
    rank,
};

use super::GeocodeResolver;
use crate::db::{RepositoryError, RestaurantRepository};
use crate::models::Order;

/// Restaurants and menu availability shared by every order of one pass.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// All restaurants in id order.
    pub restaurants: Vec<Restaurant>,
    pub index: MenuAvailabilityIndex,
}

impl DispatchContext {
    #[must_use]
    pub const fn new(restaurants: Vec<Restaurant>, index: MenuAvailabilityIndex) -> Self {
        Self { restaurants, index }
    }

    /// Load current restaurants and availability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(pool))]
    pub async fn load(pool: &PgPool) -> Result<Self, RepositoryError> {
        let repo = RestaurantRepository::new(pool);
        let restaurants = repo.list_all().await?;
        let index = MenuAvailabilityIndex::build(repo.list_menu_items().await?);

        debug!(
            restaurants = restaurants.len(),
            stocked = index.len(),
            "Loaded dispatch context"
        );
        Ok(Self::new(restaurants, index))
    }
}

/// Candidate list for one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCandidates {
    pub order_id: OrderId,
    pub candidates: Vec<Candidate>,
}

/// Computes candidate restaurants for orders.
#[derive(Debug, Clone)]
pub struct CandidateAssigner {
    resolver: GeocodeResolver,
}

impl CandidateAssigner {
    #[must_use]
    pub const fn new(resolver: GeocodeResolver) -> Self {
        Self { resolver }
    }

    /// Candidates for a single order.
    ///
    /// An order already pinned to a restaurant gets that restaurant alone.
    /// Otherwise every restaurant that stocks all of the order's products is
    /// listed, nearest first, followed by those whose distance is unknown.
    #[instrument(skip_all, fields(order_id = %order.id))]
    pub async fn assign_candidates(&self, order: &Order, ctx: &DispatchContext) -> OrderCandidates {
        if let Some(restaurant) = &order.restaurant {
            return OrderCandidates {
                order_id: order.id,
                candidates: vec![Candidate::assigned(restaurant)],
            };
        }

        let eligible = match_restaurants(&order.required_products, &ctx.index, &ctx.restaurants);
        if eligible.is_empty() {
            debug!("No restaurant can fulfil the order");
            return OrderCandidates {
                order_id: order.id,
                candidates: Vec::new(),
            };
        }

        let Some(origin) = self.locate(&order.address).await else {
            return OrderCandidates {
                order_id: order.id,
                candidates: Ranking::unknown_only(eligible).into_candidates(),
            };
        };

        let coordinates = join_all(eligible.iter().map(|r| self.locate(&r.address))).await;
        let ranking = rank(origin, eligible.into_iter().zip(coordinates));

        OrderCandidates {
            order_id: order.id,
            candidates: ranking.into_candidates(),
        }
    }

    /// Candidates for every order, in input order.
    pub async fn assign_all(
        &self,
        orders: &[Order],
        ctx: &DispatchContext,
    ) -> Vec<OrderCandidates> {
        join_all(orders.iter().map(|order| self.assign_candidates(order, ctx))).await
    }

    /// Resolve an address, folding failures into "unknown".
    async fn locate(&self, address: &str) -> Option<Coordinate> {
        match self.resolver.resolve(address).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!(address = %address, error = %e, "Distance unknown");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use star_burger_core::{
        GeocodeCacheEntry, MenuItem, OrderStatus, PaymentType, ProductId, RestaurantId,
    };

    use super::*;
    use crate::geocoder::{GeocodeError, Geocoder};
    use crate::services::{GeocodeStore, ResolverSettings};

    struct NullStore;

    #[async_trait]
    impl GeocodeStore for NullStore {
        async fn find(&self, _: &str) -> Result<Option<GeocodeCacheEntry>, RepositoryError> {
            Ok(None)
        }

        async fn save(&self, _: &str, _: Coordinate) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    /// Geocoder answering from a fixed table; unknown addresses fail.
    #[derive(Default)]
    struct TableGeocoder {
        table: HashMap<String, Coordinate>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table
                .get(address)
                .map(|c| vec![*c])
                .ok_or_else(|| GeocodeError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                })
        }
    }

    fn restaurant(id: i32, name: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            address: format!("{name} address"),
        }
    }

    fn order(products: &[i32]) -> Order {
        Order {
            id: OrderId::new(1),
            status: OrderStatus::Create,
            payment_type: PaymentType::Cash,
            firstname: "Иван".to_string(),
            lastname: "Петров".to_string(),
            phonenumber: "+79990000000".to_string(),
            address: "customer".to_string(),
            comment: String::new(),
            registered_at: Utc::now(),
            total_cost: Decimal::new(35000, 2),
            restaurant: None,
            required_products: products.iter().copied().map(ProductId::new).collect(),
        }
    }

    fn stock(restaurant: i32, products: &[i32]) -> Vec<MenuItem> {
        products
            .iter()
            .map(|&p| MenuItem {
                restaurant_id: RestaurantId::new(restaurant),
                product_id: ProductId::new(p),
                available: true,
            })
            .collect()
    }

    fn assigner(geocoder: Arc<TableGeocoder>) -> CandidateAssigner {
        CandidateAssigner::new(GeocodeResolver::new(
            Arc::new(NullStore),
            geocoder,
            ResolverSettings::default(),
        ))
    }

    fn coord(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    #[tokio::test]
    async fn test_pre_assigned_order_skips_matching() {
        let geocoder = Arc::new(TableGeocoder::default());
        let pinned = restaurant(7, "Pinned");
        let mut o = order(&[1]);
        o.restaurant = Some(pinned.clone());

        let result = assigner(geocoder.clone())
            .assign_candidates(&o, &DispatchContext::default())
            .await;

        assert_eq!(result.candidates, vec![Candidate::assigned(&pinned)]);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_eligible_restaurant_makes_no_calls() {
        let geocoder = Arc::new(TableGeocoder::default());
        let ctx = DispatchContext::new(
            vec![restaurant(1, "A")],
            MenuAvailabilityIndex::build(stock(1, &[2])),
        );

        let result = assigner(geocoder.clone()).assign_candidates(&order(&[1]), &ctx).await;

        assert!(result.candidates.is_empty());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_restaurant_lookup_is_unknown_distance() {
        let mut table = HashMap::new();
        table.insert("customer".to_string(), coord(37.6175, 55.7520));
        table.insert("Far address".to_string(), coord(37.70, 55.80));
        table.insert("Near address".to_string(), coord(37.62, 55.755));
        let geocoder = Arc::new(TableGeocoder {
            table,
            ..TableGeocoder::default()
        });

        let menu: Vec<MenuItem> = [1, 2, 3].iter().flat_map(|&r| stock(r, &[1])).collect();
        let ctx = DispatchContext::new(
            vec![
                restaurant(1, "Far"),
                restaurant(2, "Broken"),
                restaurant(3, "Near"),
            ],
            MenuAvailabilityIndex::build(menu),
        );

        let result = assigner(geocoder).assign_candidates(&order(&[1]), &ctx).await;

        let ids: Vec<i32> = result
            .candidates
            .iter()
            .map(|c| c.restaurant_id().get())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(matches!(result.candidates[0], Candidate::Ranked(_)));
        assert!(matches!(result.candidates[1], Candidate::Ranked(_)));
        assert_eq!(
            result.candidates[2].label(),
            "Broken - расстояние неизвестно"
        );
    }

    #[tokio::test]
    async fn test_unresolved_customer_address_leaves_all_unknown() {
        let mut table = HashMap::new();
        table.insert("A address".to_string(), coord(37.62, 55.755));
        let geocoder = Arc::new(TableGeocoder {
            table,
            ..TableGeocoder::default()
        });
        let ctx = DispatchContext::new(
            vec![restaurant(1, "A")],
            MenuAvailabilityIndex::build(stock(1, &[1])),
        );

        let result = assigner(geocoder.clone()).assign_candidates(&order(&[1]), &ctx).await;

        assert_eq!(result.candidates.len(), 1);
        assert!(matches!(result.candidates[0], Candidate::UnknownDistance(_)));
        // Restaurant addresses are not looked up without an origin.
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_assign_all_keeps_order_sequence() {
        let geocoder = Arc::new(TableGeocoder::default());
        let ctx = DispatchContext::default();
        let mut second = order(&[]);
        second.id = OrderId::new(2);
        let orders = vec![order(&[1]), second];

        let results = assigner(geocoder).assign_all(&orders, &ctx).await;

        let ids: Vec<i64> = results.iter().map(|r| r.order_id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(results.iter().all(|r| r.candidates.is_empty()));
    }
}

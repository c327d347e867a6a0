//! Integration tests for Star Burger.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests (no services needed)
//! cargo test -p star-burger-integration-tests
//!
//! # Database and HTTP tests
//! DATABASE_URL=postgres://... cargo test -p star-burger-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `geocode_resolver` - cache-aside resolution against in-memory fakes
//! - `candidate_assignment` - dispatch passes against in-memory fakes
//! - `geocode_store` - the `location` table (requires `PostgreSQL`)
//! - `restaurateur_api` - JSON endpoints (requires a running server)
//!
//! This library holds the fakes and fixtures shared by those tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use star_burger_core::{
    Coordinate, GeocodeCacheEntry, MenuItem, OrderId, OrderStatus, PaymentType, ProductId,
    Restaurant, RestaurantId,
};
use star_burger_restaurateur::db::RepositoryError;
use star_burger_restaurateur::geocoder::{GeocodeError, Geocoder};
use star_burger_restaurateur::models::Order;
use star_burger_restaurateur::services::{GeocodeResolver, GeocodeStore, ResolverSettings};

// =============================================================================
// Geocode Store
// =============================================================================

/// [`GeocodeStore`] kept in a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryGeocodeStore {
    entries: Mutex<HashMap<String, GeocodeCacheEntry>>,
    saves: AtomicUsize,
    fail_writes: bool,
}

impl InMemoryGeocodeStore {
    /// A store whose writes always fail.
    #[must_use]
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Pre-populate an entry.
    pub fn insert(&self, address: &str, coordinate: Option<Coordinate>) {
        self.entries.lock().unwrap().insert(
            address.to_string(),
            GeocodeCacheEntry {
                address: address.to_string(),
                coordinate,
                updated_at: Utc::now(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, address: &str) -> Option<GeocodeCacheEntry> {
        self.entries.lock().unwrap().get(address).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `save` calls, failed ones included.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeStore for InMemoryGeocodeStore {
    async fn find(&self, address: &str) -> Result<Option<GeocodeCacheEntry>, RepositoryError> {
        Ok(self.get(address))
    }

    async fn save(&self, address: &str, coordinate: Coordinate) -> Result<(), RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(RepositoryError::DataCorruption("read-only store".to_string()));
        }
        self.insert(address, Some(coordinate));
        Ok(())
    }
}

// =============================================================================
// Geocoder
// =============================================================================

/// What [`ScriptedGeocoder`] answers for an address.
#[derive(Debug, Clone)]
pub enum Reply {
    Found(Vec<Coordinate>),
    Fail(GeocodeError),
}

/// [`Geocoder`] answering from a table and counting calls per address.
///
/// Addresses missing from the table get no matches.
#[derive(Debug, Default)]
pub struct ScriptedGeocoder {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl ScriptedGeocoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn found(self, address: &str, coordinate: Coordinate) -> Self {
        self.reply(address, Reply::Found(vec![coordinate]))
    }

    #[must_use]
    pub fn failing(self, address: &str, error: GeocodeError) -> Self {
        self.reply(address, Reply::Fail(error))
    }

    /// Replace the answer for `address`.
    #[must_use]
    pub fn reply(self, address: &str, reply: Reply) -> Self {
        self.set_reply(address, reply);
        self
    }

    /// Replace the answer for `address` on a shared geocoder.
    pub fn set_reply(&self, address: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(address.to_string(), reply);
    }

    /// Calls made for `address`.
    #[must_use]
    pub fn calls_for(&self, address: &str) -> usize {
        self.calls.lock().unwrap().get(address).copied().unwrap_or(0)
    }

    /// Calls made for any address.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().get(address).cloned();
        match reply {
            Some(Reply::Found(coordinates)) => Ok(coordinates),
            Some(Reply::Fail(error)) => Err(error),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Resolver over the given fakes with default settings.
#[must_use]
pub fn resolver(
    store: Arc<InMemoryGeocodeStore>,
    geocoder: Arc<ScriptedGeocoder>,
) -> GeocodeResolver {
    resolver_with(store, geocoder, ResolverSettings::default())
}

#[must_use]
pub fn resolver_with(
    store: Arc<InMemoryGeocodeStore>,
    geocoder: Arc<ScriptedGeocoder>,
    settings: ResolverSettings,
) -> GeocodeResolver {
    GeocodeResolver::new(store, geocoder, settings)
}

#[must_use]
pub fn coordinate(longitude: f64, latitude: f64) -> Coordinate {
    Coordinate::new(longitude, latitude).unwrap()
}

#[must_use]
pub fn restaurant(id: i32, name: &str, address: &str) -> Restaurant {
    Restaurant {
        id: RestaurantId::new(id),
        name: name.to_string(),
        address: address.to_string(),
    }
}

/// Menu rows marking `products` available at `restaurant`.
#[must_use]
pub fn menu(restaurant: i32, products: &[i32]) -> Vec<MenuItem> {
    products
        .iter()
        .map(|&product| MenuItem {
            restaurant_id: RestaurantId::new(restaurant),
            product_id: ProductId::new(product),
            available: true,
        })
        .collect()
}

/// A new unassigned order for `products` delivered to `address`.
#[must_use]
pub fn order(id: i64, address: &str, products: &[i32]) -> Order {
    Order {
        id: OrderId::new(id),
        status: OrderStatus::Create,
        payment_type: PaymentType::Cash,
        firstname: "Test".to_string(),
        lastname: "Customer".to_string(),
        phonenumber: "+70000000000".to_string(),
        address: address.to_string(),
        comment: String::new(),
        registered_at: Utc::now(),
        total_cost: Decimal::ZERO,
        restaurant: None,
        required_products: products.iter().copied().map(ProductId::new).collect::<HashSet<_>>(),
    }
}

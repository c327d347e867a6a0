//! Database operations for the restaurateur `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `restaurant` - Restaurants and their street addresses (read-only here)
//! - `restaurant_menu_item` - Menu rows with availability flags (read-only here)
//! - `orders`, `order_item` - Customer orders and their lines (read-only here)
//! - `location` - Geocode cache, the only table this crate writes
//!
//! # Migrations
//!
//! Migrations are stored in `crates/restaurateur/migrations/` and run via:
//! ```bash
//! cargo run -p star-burger-cli -- migrate
//! ```

pub mod locations;
pub mod orders;
pub mod restaurants;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use locations::PgGeocodeStore;
pub use orders::OrderRepository;
pub use restaurants::RestaurantRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    use secrecy::ExposeSecret;

    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

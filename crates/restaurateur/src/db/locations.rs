//! Geocode cache backed by the `location` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use star_burger_core::{Coordinate, GeocodeCacheEntry};

use super::RepositoryError;
use crate::services::GeocodeStore;

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    address: String,
    longitude: Option<f64>,
    latitude: Option<f64>,
    updated_at: DateTime<Utc>,
}

impl From<LocationRow> for GeocodeCacheEntry {
    fn from(row: LocationRow) -> Self {
        Self {
            coordinate: Coordinate::from_columns(row.longitude, row.latitude),
            address: row.address,
            updated_at: row.updated_at,
        }
    }
}

/// [`GeocodeStore`] over a `PostgreSQL` pool.
///
/// Rows are keyed by the exact address string. Saving an address that is
/// already present overwrites its coordinate.
#[derive(Debug, Clone)]
pub struct PgGeocodeStore {
    pool: PgPool,
}

impl PgGeocodeStore {
    /// Create a store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of cached addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM location")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl GeocodeStore for PgGeocodeStore {
    #[instrument(skip(self))]
    async fn find(&self, address: &str) -> Result<Option<GeocodeCacheEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT address, longitude, latitude, updated_at
            FROM location
            WHERE address = $1
            ",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), fields(%coordinate))]
    async fn save(&self, address: &str, coordinate: Coordinate) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO location (address, longitude, latitude, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (address) DO UPDATE
            SET longitude = EXCLUDED.longitude,
                latitude = EXCLUDED.latitude,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(address)
        .bind(coordinate.longitude)
        .bind(coordinate.latitude)
        .execute(&self.pool)
        .await?;

        debug!("Saved geocode cache entry");
        Ok(())
    }
}

//! Cache-aside address resolution.
//!
//! [`GeocodeResolver::resolve`] checks, in order:
//!
//! 1. an in-process `moka` layer, which also collapses concurrent lookups of
//!    the same address into one load (singleflight);
//! 2. the persistent geocode cache ([`GeocodeStore`]);
//! 3. the remote [`Geocoder`], whose first match is written back to the
//!    persistent cache.
//!
//! "Not found" answers and failures are never cached in either layer, so an
//! unresolved address is looked up again on the next call.
//!
//! Each lookup runs in a detached task, and remote calls are bounded by a
//! semaphore and a timeout. If a caller stops waiting, the lookup still
//! finishes, fills the cache and answers every other caller waiting on the
//! same address.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, instrument, warn};

use star_burger_core::{Coordinate, GeocodeCacheEntry};

use crate::config::GeocoderConfig;
use crate::db::RepositoryError;
use crate::geocoder::{GeocodeError, Geocoder};

/// Persistent address → coordinate storage.
#[async_trait]
pub trait GeocodeStore: Send + Sync {
    /// Entry stored under exactly `address`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the storage cannot be read.
    async fn find(&self, address: &str) -> Result<Option<GeocodeCacheEntry>, RepositoryError>;

    /// Insert or overwrite the entry for `address`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    async fn save(&self, address: &str, coordinate: Coordinate) -> Result<(), RepositoryError>;
}

/// Tuning knobs for [`GeocodeResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Upper bound on one remote lookup.
    pub timeout: Duration,
    /// Remote lookups allowed in flight at once.
    pub max_concurrency: usize,
    /// Addresses kept in the in-process layer.
    pub memory_capacity: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_concurrency: 4,
            memory_capacity: 10_000,
        }
    }
}

impl From<&GeocoderConfig> for ResolverSettings {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_concurrency: config.max_concurrency,
            memory_capacity: config.memory_capacity,
        }
    }
}

/// Why a load produced no cacheable value.
#[derive(Debug)]
enum Miss {
    NotFound,
    Failed(GeocodeError),
}

/// Resolves addresses through the geocode cache, falling back to the
/// geocoder on a miss.
#[derive(Clone)]
pub struct GeocodeResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    store: Arc<dyn GeocodeStore>,
    geocoder: Arc<dyn Geocoder>,
    memory: Cache<String, Option<Coordinate>>,
    permits: Semaphore,
    timeout: Duration,
}

impl std::fmt::Debug for GeocodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeResolver")
            .field("memory_entries", &self.inner.memory.entry_count())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl GeocodeResolver {
    /// Create a resolver over `store` and `geocoder`.
    #[must_use]
    pub fn new(
        store: Arc<dyn GeocodeStore>,
        geocoder: Arc<dyn Geocoder>,
        settings: ResolverSettings,
    ) -> Self {
        let memory = Cache::builder()
            .max_capacity(settings.memory_capacity)
            .build();

        Self {
            inner: Arc::new(ResolverInner {
                store,
                geocoder,
                memory,
                permits: Semaphore::new(settings.max_concurrency.max(1)),
                timeout: settings.timeout,
            }),
        }
    }

    /// Resolve `address` to a coordinate.
    ///
    /// Returns `Ok(None)` when the address is blank, when the geocoder has no
    /// match for it, or when the persistent cache holds it without a position.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` when the cache cannot be read or the geocoder is
    /// unreachable, times out, or answers with an error status. Nothing is
    /// cached in that case.
    #[instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Ok(None);
        }

        // The cache lookup runs detached, so a caller that stops waiting
        // cannot cancel a load other callers are sharing.
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let lookup = tokio::spawn(
            async move {
                let init = load(Arc::clone(&inner), key.clone());
                inner.memory.try_get_with(key, init).await
            }
            .in_current_span(),
        );

        match lookup.await {
            Ok(Ok(coordinate)) => Ok(coordinate),
            Ok(Err(miss)) => match miss.as_ref() {
                Miss::NotFound => {
                    debug!("Address not found by geocoder");
                    Ok(None)
                }
                Miss::Failed(err) => Err(err.clone()),
            },
            Err(e) => Err(GeocodeError::Aborted(e.to_string())),
        }
    }

    /// Drop the in-process copy of every address.
    ///
    /// The persistent cache is untouched.
    pub fn clear_memory(&self) {
        self.inner.memory.invalidate_all();
    }
}

/// Cache key for `address`.
///
/// Lookups are exact-match; only surrounding whitespace is ignored.
#[must_use]
pub fn normalize_address(address: &str) -> &str {
    address.trim()
}

/// Load a value for the in-process layer.
async fn load(inner: Arc<ResolverInner>, address: String) -> Result<Option<Coordinate>, Miss> {
    match inner.store.find(&address).await {
        Ok(Some(entry)) => {
            debug!(address = %address, "Geocode cache hit");
            return Ok(entry.coordinate);
        }
        Ok(None) => debug!(address = %address, "Geocode cache miss"),
        Err(e) => {
            warn!(address = %address, error = %e, "Geocode cache read failed");
            return Err(Miss::Failed(GeocodeError::Store(e.to_string())));
        }
    }

    fetch_and_store(&inner, &address).await
}

/// Ask the geocoder and persist its first match.
async fn fetch_and_store(inner: &ResolverInner, address: &str) -> Result<Option<Coordinate>, Miss> {
    let _permit = inner
        .permits
        .acquire()
        .await
        .map_err(|e| Miss::Failed(GeocodeError::Aborted(e.to_string())))?;

    let lookup = inner.geocoder.geocode(address);
    let matches = match tokio::time::timeout(inner.timeout, lookup).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            warn!(address = %address, error = %e, "Geocoder request failed");
            return Err(Miss::Failed(e));
        }
        Err(_) => {
            warn!(
                address = %address,
                timeout = ?inner.timeout,
                "Geocoder request timed out"
            );
            return Err(Miss::Failed(GeocodeError::Timeout(inner.timeout)));
        }
    };

    let Some(&coordinate) = matches.first() else {
        return Err(Miss::NotFound);
    };

    // A failed write still returns the coordinate.
    if let Err(e) = inner.store.save(address, coordinate).await {
        warn!(address = %address, error = %e, "Failed to persist geocode cache entry");
    } else {
        debug!(address = %address, %coordinate, "Geocode cache entry stored");
    }

    Ok(Some(coordinate))
}

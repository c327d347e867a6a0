//! Address geocoding over HTTP.
//!
//! This module provides:
//! - [`Geocoder`], the seam the resolver calls on a cache miss
//! - [`YandexGeocoder`], the production implementation backed by the
//!   Yandex Geocoder HTTP API
//! - [`GeocodeError`], shared by the client and the resolver
//!
//! A geocoder returns every match it found, most relevant first. An empty
//! list means "address not found", which is not an error.

mod client;
mod error;
mod types;

use async_trait::async_trait;

use star_burger_core::Coordinate;

pub use client::YandexGeocoder;
pub use error::GeocodeError;
pub use types::GeocodeResponse;

/// Resolves free-form addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up `address`, returning matches in relevance order.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` when the service cannot be reached or answers
    /// with a non-success status.
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError>;
}

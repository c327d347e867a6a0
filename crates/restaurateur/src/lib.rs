//! Star Burger restaurateur library.
//!
//! Shows restaurant managers, for every unfinished order, which restaurants
//! can cook it and how far each one is from the customer.
//!
//! The pieces, from the bottom up:
//! - [`db`] - `PostgreSQL` repositories and the persistent geocode cache
//! - [`geocoder`] - Yandex Geocoder HTTP client
//! - [`services`] - cache-aside resolution and candidate assignment
//! - [`routes`] - JSON endpoints over the services

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod geocoder;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use sqlx::PgPool;

use config::GeocoderConfig;
use db::PgGeocodeStore;
use geocoder::{GeocodeError, YandexGeocoder};
use services::{GeocodeResolver, ResolverSettings};

/// Resolver over the `location` table and the Yandex Geocoder.
///
/// # Errors
///
/// Returns `GeocodeError::Http` if the HTTP client cannot be built.
pub fn build_resolver(
    pool: PgPool,
    config: &GeocoderConfig,
) -> Result<GeocodeResolver, GeocodeError> {
    let geocoder = YandexGeocoder::new(config)?;
    Ok(GeocodeResolver::new(
        Arc::new(PgGeocodeStore::new(pool)),
        Arc::new(geocoder),
        ResolverSettings::from(config),
    ))
}

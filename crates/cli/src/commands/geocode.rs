//! Resolve a single address through the geocode cache.

use tracing::info;

use star_burger_restaurateur::config::RestaurateurConfig;
use star_burger_restaurateur::{build_resolver, db};

/// Print the coordinate of `address`, querying the geocoder on a cache miss.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the database is
/// unreachable, or the geocoder fails.
pub async fn run(address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = RestaurateurConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let store = db::PgGeocodeStore::new(pool.clone());
    let resolver = build_resolver(pool, &config.geocoder)?;

    let coordinate = resolver.resolve(address).await?;
    info!(cached = store.count().await?, "Geocode cache size");

    #[allow(clippy::print_stdout)]
    {
        match coordinate {
            Some(c) => println!("{address}: lon {} lat {}", c.longitude, c.latitude),
            None => println!("{address}: not found"),
        }
    }
    Ok(())
}

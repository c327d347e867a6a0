//! Yandex Geocoder HTTP client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};
use url::Url;

use star_burger_core::Coordinate;

use super::types::GeocodeResponse;
use super::{GeocodeError, Geocoder};
use crate::config::GeocoderConfig;

/// Client for the Yandex Geocoder API.
///
/// Issues one `GET` per lookup with `geocode`, `apikey` and `format=json`
/// query parameters.
#[derive(Clone)]
pub struct YandexGeocoder {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for YandexGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexGeocoder")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl YandexGeocoder {
    /// Create a new geocoder client.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::Http` if the HTTP client cannot be built.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    #[instrument(skip(self), fields(address = %address))]
    async fn geocode(&self, address: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        let response = self
            .client
            .get(request_url(&self.base_url, &self.api_key, address))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Geocoder returned non-success status");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let coordinates = parse_coordinates(&body);
        debug!(matches = coordinates.len(), "Geocoder answered");
        Ok(coordinates)
    }
}

/// Full request URL for `address`.
fn request_url(base_url: &Url, api_key: &SecretString, address: &str) -> Url {
    let mut url = base_url.clone();
    url.query_pairs_mut()
        .append_pair("geocode", address)
        .append_pair("apikey", api_key.expose_secret())
        .append_pair("format", "json");
    url
}

/// Extract match coordinates from a response body.
///
/// A body that does not have the expected shape counts as "no matches".
fn parse_coordinates(body: &str) -> Vec<Coordinate> {
    match serde_json::from_str::<GeocodeResponse>(body) {
        Ok(response) => response.coordinates(),
        Err(e) => {
            warn!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Unexpected geocoder response shape"
            );
            Vec::new()
        }
    }
}

//! Geocoding error type.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while resolving an address.
///
/// Every variant means "distance unknown for now": callers surface the
/// affected restaurant or order without a distance and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Geocoder answered with a non-success status.
    #[error("geocoder returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Geocoder did not answer in time.
    #[error("geocoder timed out after {0:?}")]
    Timeout(Duration),

    /// Reading the geocode cache failed.
    #[error("geocode cache error: {0}")]
    Store(String),

    /// The background lookup task died.
    #[error("geocode lookup aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        Self::Http(err.to_string())
    }
}

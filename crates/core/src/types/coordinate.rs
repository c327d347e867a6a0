//! Geographic coordinates and geocode cache entries.
//!
//! Coordinates always carry named `longitude`/`latitude` fields. Geocoders,
//! storage rows and distance calculations all disagree on positional order,
//! so no API in this workspace accepts or returns a bare `(f64, f64)` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude out of range: {0}")]
    Longitude(f64),

    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude out of range: {0}")]
    Latitude(f64),
}

/// A point on the WGS-84 ellipsoid, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Degrees east of the prime meridian.
    pub longitude: f64,
    /// Degrees north of the equator.
    pub latitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError` if either component is not finite or lies
    /// outside its valid range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordinateError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Build a coordinate from nullable storage columns.
    ///
    /// Returns `None` unless both components are present and valid.
    #[must_use]
    pub fn from_columns(longitude: Option<f64>, latitude: Option<f64>) -> Option<Self> {
        match (longitude, latitude) {
            (Some(lon), Some(lat)) => Self::new(lon, lat).ok(),
            _ => None,
        }
    }

    /// Parse a whitespace separated `"<longitude> <latitude>"` string.
    ///
    /// This is the `pos` format used by GML points in geocoder responses.
    #[must_use]
    pub fn parse_lon_lat(pos: &str) -> Option<Self> {
        let mut parts = pos.split_whitespace();
        let longitude = parts.next()?.parse().ok()?;
        let latitude = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(longitude, latitude).ok()
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate.longitude, coordinate.latitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(lon {}, lat {})", self.longitude, self.latitude)
    }
}

/// A persisted address → coordinate resolution.
///
/// At most one entry exists per distinct address string. A `None`
/// coordinate means the address was stored without a usable position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCacheEntry {
    /// Exact address string used as the lookup key.
    pub address: String,
    /// Resolved position, if any.
    pub coordinate: Option<Coordinate>,
    /// When the entry was last written.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(181.0, 0.0),
            Err(CoordinateError::Longitude(181.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -90.5),
            Err(CoordinateError::Latitude(-90.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse_lon_lat_keeps_component_order() {
        let coordinate = Coordinate::parse_lon_lat("37.61 55.75");
        assert_eq!(
            coordinate,
            Some(Coordinate {
                longitude: 37.61,
                latitude: 55.75
            })
        );
    }

    #[test]
    fn test_parse_lon_lat_rejects_garbage() {
        assert_eq!(Coordinate::parse_lon_lat(""), None);
        assert_eq!(Coordinate::parse_lon_lat("37.61"), None);
        assert_eq!(Coordinate::parse_lon_lat("37.61 55.75 10"), None);
        assert_eq!(Coordinate::parse_lon_lat("east north"), None);
    }

    #[test]
    fn test_from_columns_requires_both() {
        assert_eq!(Coordinate::from_columns(Some(37.6), None), None);
        assert_eq!(Coordinate::from_columns(None, Some(55.7)), None);
        assert!(Coordinate::from_columns(Some(37.6), Some(55.7)).is_some());
    }

    #[test]
    fn test_geo_point_uses_longitude_as_x() {
        let point: geo::Point<f64> = Coordinate {
            longitude: 37.61,
            latitude: 55.75,
        }
        .into();
        assert!((point.x() - 37.61).abs() < f64::EPSILON);
        assert!((point.y() - 55.75).abs() < f64::EPSILON);
    }
}

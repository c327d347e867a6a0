//! Response shapes of the Yandex Geocoder JSON API.
//!
//! Only the path to each match's position is modelled:
//! `response.GeoObjectCollection.featureMember[*].GeoObject.Point.pos`,
//! where `pos` is `"<longitude> <latitude>"`.

use serde::Deserialize;

use star_burger_core::Coordinate;

/// Top-level geocoder response.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    pub geo_object_collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
pub struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    pub feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureMember {
    #[serde(rename = "GeoObject")]
    pub geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
pub struct GeoObject {
    #[serde(rename = "Point")]
    pub point: Point,
}

#[derive(Debug, Deserialize)]
pub struct Point {
    pub pos: String,
}

impl GeocodeResponse {
    /// Coordinates of all matches, most relevant first.
    ///
    /// Members whose `pos` does not parse are skipped.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.response
            .geo_object_collection
            .feature_member
            .iter()
            .filter_map(|member| Coordinate::parse_lon_lat(&member.geo_object.point.pos))
            .collect()
    }
}

//! Distance ranking of candidate restaurants.
//!
//! Distances are geodesic (WGS-84 ellipsoid, Karney's algorithm), not road
//! distances. Sorting uses the exact distance; only the displayed value is
//! rounded, so two restaurants that round to the same figure still keep a
//! stable relative order.

use geo::GeodesicDistance;
use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, Restaurant, RestaurantId};

/// A restaurant with a known distance from the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    /// Distance in kilometres, rounded to two decimals.
    pub distance_km: f64,
    pub label: String,
}

/// A restaurant whose distance could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownDistance {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub label: String,
}

impl UnknownDistance {
    fn new(restaurant: &Restaurant) -> Self {
        Self {
            restaurant_id: restaurant.id,
            restaurant_name: restaurant.name.clone(),
            label: format!("{} - расстояние неизвестно", restaurant.name),
        }
    }
}

/// One entry of the candidate list shown for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    /// The order is already pinned to this restaurant.
    Assigned {
        restaurant_id: RestaurantId,
        restaurant_name: String,
    },
    Ranked(RankedCandidate),
    UnknownDistance(UnknownDistance),
}

impl Candidate {
    /// The sole candidate of an order pinned to `restaurant`.
    #[must_use]
    pub fn assigned(restaurant: &Restaurant) -> Self {
        Self::Assigned {
            restaurant_id: restaurant.id,
            restaurant_name: restaurant.name.clone(),
        }
    }

    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        match self {
            Self::Assigned { restaurant_id, .. } => *restaurant_id,
            Self::Ranked(ranked) => ranked.restaurant_id,
            Self::UnknownDistance(unknown) => unknown.restaurant_id,
        }
    }

    /// Display label for the candidate list.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Assigned {
                restaurant_name, ..
            } => restaurant_name,
            Self::Ranked(ranked) => &ranked.label,
            Self::UnknownDistance(unknown) => &unknown.label,
        }
    }
}

/// Result of ranking candidates by distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Nearest first; ties keep input order.
    pub ranked: Vec<RankedCandidate>,
    /// Candidates without a usable coordinate, in input order.
    pub unknown: Vec<UnknownDistance>,
}

impl Ranking {
    /// A ranking where no distance is known, e.g. the customer address did
    /// not resolve.
    #[must_use]
    pub fn unknown_only<'a, I>(restaurants: I) -> Self
    where
        I: IntoIterator<Item = &'a Restaurant>,
    {
        Self {
            ranked: Vec::new(),
            unknown: restaurants.into_iter().map(UnknownDistance::new).collect(),
        }
    }

    /// Ranked candidates followed by those with unknown distance.
    #[must_use]
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.ranked
            .into_iter()
            .map(Candidate::Ranked)
            .chain(self.unknown.into_iter().map(Candidate::UnknownDistance))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len() + self.unknown.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty() && self.unknown.is_empty()
    }
}

/// Geodesic distance between two coordinates in kilometres.
#[must_use]
pub fn geodesic_distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let from: geo::Point<f64> = from.into();
    let to: geo::Point<f64> = to.into();
    from.geodesic_distance(&to) / 1000.0
}

/// Round kilometres to two decimals for display.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Sort `candidates` by distance from `origin`.
///
/// Candidates without a coordinate are reported in [`Ranking::unknown`]
/// instead of being dropped.
#[must_use]
pub fn rank<'a, I>(origin: Coordinate, candidates: I) -> Ranking
where
    I: IntoIterator<Item = (&'a Restaurant, Option<Coordinate>)>,
{
    let mut measured = Vec::new();
    let mut unknown = Vec::new();

    for (restaurant, coordinate) in candidates {
        match coordinate {
            Some(coordinate) => {
                measured.push((restaurant, geodesic_distance_km(origin, coordinate)));
            }
            None => unknown.push(UnknownDistance::new(restaurant)),
        }
    }

    // `sort_by` is stable, so equal distances keep their input order.
    measured.sort_by(|(_, a), (_, b)| a.total_cmp(b));

    let ranked = measured
        .into_iter()
        .map(|(restaurant, km)| {
            let distance_km = round_km(km);
            RankedCandidate {
                restaurant_id: restaurant.id,
                restaurant_name: restaurant.name.clone(),
                distance_km,
                label: format!("{} - {distance_km:.2} км.", restaurant.name),
            }
        })
        .collect();

    Ranking { ranked, unknown }
}

//! Order dispatch rules.
//!
//! Deciding which restaurants can take an unassigned order happens in three
//! pure steps:
//!
//! 1. [`MenuAvailabilityIndex::build`] turns menu rows into per-restaurant
//!    sets of products currently on sale. Build it once per dispatch pass;
//!    availability changes too often to keep it longer.
//! 2. [`match_restaurants`] keeps the restaurants whose available products
//!    cover everything the order needs.
//! 3. [`rank`] sorts the survivors by geodesic distance from the customer.
//!
//! Address resolution sits between steps 2 and 3 and lives in the service
//! crate, since it needs storage and the network.

pub mod availability;
pub mod eligibility;
pub mod ranking;

pub use availability::MenuAvailabilityIndex;
pub use eligibility::match_restaurants;
pub use ranking::{
    Candidate, RankedCandidate, Ranking, UnknownDistance, geodesic_distance_km, rank, round_km,
};

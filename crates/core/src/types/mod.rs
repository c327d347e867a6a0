//! Core types for Star Burger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coordinate;
pub mod id;
pub mod restaurant;
pub mod status;

pub use coordinate::{Coordinate, CoordinateError, GeocodeCacheEntry};
pub use id::*;
pub use restaurant::{MenuItem, Restaurant};
pub use status::*;

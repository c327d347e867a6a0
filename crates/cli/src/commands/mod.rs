//! CLI command implementations.

pub mod assign;
pub mod geocode;
pub mod migrate;

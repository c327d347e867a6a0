//! Business logic between the repositories and the HTTP layer.
//!
//! - [`geocoding`] - cache-aside address resolution
//! - [`assignment`] - candidate restaurants per order

pub mod assignment;
pub mod geocoding;

pub use assignment::{CandidateAssigner, DispatchContext, OrderCandidates};
pub use geocoding::{GeocodeResolver, GeocodeStore, ResolverSettings, normalize_address};

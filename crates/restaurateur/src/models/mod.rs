//! Domain models for the restaurateur service.

pub mod order;

pub use order::Order;

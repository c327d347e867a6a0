//! Star Burger Core - Shared types and dispatch algorithms.
//!
//! This crate provides common types used across all Star Burger components:
//! - `restaurateur` - Order dispatch service for restaurant managers
//! - `cli` - Command-line tools for migrations and dispatch runs
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here is deterministic over its inputs,
//! which keeps the dispatch rules testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, coordinates, restaurants and order statuses
//! - [`dispatch`] - Menu availability index, eligibility matching and
//!   distance ranking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dispatch;
pub mod types;

pub use dispatch::*;
pub use types::*;

//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//!
//! - `postgres` - sqlx-backed store implementations
//! - `memory` - in-memory store implementations (tests, local development)
//! - `stripe` - payment provider adapter (REST + webhook verification)
//! - `http` - axum handlers, routes, and DTOs

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;

//! Axum router configuration for rarity endpoints.

use axum::{routing::get, Router};

use super::super::ApiState;
use super::handlers::calculate_rarity;

/// Create the rarity API router.
///
/// # Routes
/// - `GET /` - Calculate rarity for a birthdate (public)
pub fn routes() -> Router<ApiState> {
    Router::new().route("/", get(calculate_rarity))
}

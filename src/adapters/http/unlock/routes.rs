//! Axum router configuration for unlock endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::ApiState;
use super::handlers::{check_access, unlock_feature};

/// Create the unlock API router.
///
/// # Routes (require authentication)
/// - `GET /:feature/access` - Check access to a gated feature
/// - `POST /:feature` - Unlock a gated feature
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/:feature/access", get(check_access))
        .route("/:feature", post(unlock_feature))
}

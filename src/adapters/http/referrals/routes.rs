//! Axum router configuration for referral endpoints.

use axum::{routing::post, Router};

use super::super::ApiState;
use super::handlers::{create_referral, record_conversion};

/// Create the referrals API router.
///
/// # Routes (require authentication)
/// - `POST /` - Get or create the caller's referral for a feature
/// - `POST /convert` - Record a conversion for the caller
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/", post(create_referral))
        .route("/convert", post(record_conversion))
}

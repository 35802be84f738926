//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::super::ApiState;
use super::handlers::handle_stripe_webhook;

/// Create the webhook router.
///
/// Separate from the user-facing routes because webhooks don't require user
/// authentication (they're verified via signature).
///
/// # Routes
/// - `POST /stripe` - Handle payment provider webhooks
pub fn routes() -> Router<ApiState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

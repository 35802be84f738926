//! Axum router configuration for credit endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::ApiState;
use super::handlers::{checkout_success, get_credits, grant_bonus, purchase_credits};

/// Create the credits API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `GET /` - Current balance and ledger history
/// - `POST /purchase` - Start a credit pack checkout
///
/// ## Redirect Endpoints (no auth, session id is the secret)
/// - `GET /success` - Confirm a completed checkout
///
/// ## Admin Endpoints (require admin role)
/// - `POST /grant` - Grant bonus credits
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(get_credits))
        .route("/purchase", post(purchase_credits))
        .route("/success", get(checkout_success))
        .route("/grant", post(grant_bonus))
}

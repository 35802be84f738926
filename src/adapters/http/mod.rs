//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter (handlers, routes, DTOs).
//! Cross-cutting pieces live here: shared application state, the
//! authenticated-user extractor, and the API error envelope.

mod auth;
mod error;
mod state;

pub mod credits;
pub mod payments;
pub mod rarity;
pub mod referrals;
pub mod unlock;

pub use auth::{AuthenticatedUser, AuthenticationRequired};
pub use error::{ApiError, ErrorResponse};
pub use state::ApiState;

use axum::Router;

/// Assemble the full API router.
///
/// # Routes
///
/// - `/api/credits` - balance, purchase, success confirmation, grants
/// - `/api/rarity` - rarity score calculation
/// - `/api/referrals` - referral links and conversions
/// - `/api/unlock` - gated feature access and unlocking
/// - `/api/webhooks` - payment provider webhooks (signature-verified)
pub fn api_router() -> Router<ApiState> {
    Router::new()
        .nest("/api/credits", credits::routes())
        .nest("/api/rarity", rarity::routes())
        .nest("/api/referrals", referrals::routes())
        .nest("/api/unlock", unlock::routes())
        .nest("/api/webhooks", payments::routes())
}

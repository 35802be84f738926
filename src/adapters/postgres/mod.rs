//! PostgreSQL adapters - Database implementations for store ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//!
//! - `PostgresCreditLedger` - ledger rows + conditional balance updates
//! - `PostgresReferralStore` - referrals with transactional conversions
//! - `PostgresSubscriptionRepository` - subscription lifecycle rows
//! - `PostgresUnlockStore` - persisted unlock flags

mod credit_ledger;
mod referral_store;
mod subscription_repository;
mod unlock_store;

pub use credit_ledger::PostgresCreditLedger;
pub use referral_store::PostgresReferralStore;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use unlock_store::PostgresUnlockStore;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use uuid::Uuid;

/// Parses a UserId into the UUID our tables key users by.
pub(crate) fn parse_user_id_as_uuid(user_id: &UserId) -> Result<Uuid, DomainError> {
    Uuid::parse_str(user_id.as_str()).map_err(|e| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("User ID must be a valid UUID: {}", e),
        )
    })
}

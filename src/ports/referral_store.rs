//! Referral store port.
//!
//! # Design
//!
//! - `get_or_create` is idempotent per (user, feature, target): repeated
//!   calls return the same record, created on first call.
//! - `record_conversion` writes the conversion row and increments the
//!   referral counter in one transaction; two concurrent conversions can
//!   never produce a lost update, and the unique constraint on
//!   (referral, referred user) resolves double-submits.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::referral::{ConversionOutcome, Referral};
use crate::domain::unlock::GatedFeature;

/// Port for referral persistence and conversion recording.
#[async_trait]
pub trait ReferralStore: Send + Sync {
    /// Returns the referral for (user, feature, target), creating it lazily.
    async fn get_or_create(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Referral, DomainError>;

    /// Looks up an existing referral without creating one.
    async fn find(
        &self,
        user_id: &UserId,
        feature: GatedFeature,
        target_id: Option<&str>,
    ) -> Result<Option<Referral>, DomainError>;

    /// Looks up a referral by its shareable code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Referral>, DomainError>;

    /// Records a conversion for the referral behind `code`.
    ///
    /// Self-referrals and duplicate conversions are no-ops reported through
    /// the outcome, not errors.
    async fn record_conversion(
        &self,
        code: &str,
        referred_user_id: &UserId,
    ) -> Result<ConversionOutcome, DomainError>;
}

//! Referral aggregate entity.
//!
//! # Invariants
//!
//! - One referral record per (referrer, feature, target); creation is lazy
//!   on first visit to a gated feature.
//! - `successful_referrals` is monotonically non-decreasing, incremented
//!   only when a verified conversion is recorded, never decremented.
//! - `referral_code` is globally unique and never changes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{ReferralId, Timestamp, UserId};
use crate::domain::unlock::GatedFeature;

/// Successful referrals required to unlock a gated feature.
///
/// Shared across every gated feature; the product has never diverged
/// per-feature.
pub const REFERRAL_UNLOCK_THRESHOLD: u32 = 3;

/// A user's referral campaign for one gated feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    /// Unique identifier for this referral record.
    pub id: ReferralId,

    /// The referrer.
    pub user_id: UserId,

    /// Shareable unique code embedded in referral links.
    pub referral_code: String,

    /// The feature this referral unlocks.
    pub feature: GatedFeature,

    /// Scopes the referral to one entity (e.g. a single archetype page).
    pub target_id: Option<String>,

    /// Verified conversion count. Never decreases.
    pub successful_referrals: u32,

    /// When the record was created.
    pub created_at: Timestamp,
}

impl Referral {
    /// Creates a fresh referral with a generated code and zero conversions.
    pub fn new(user_id: UserId, feature: GatedFeature, target_id: Option<String>) -> Self {
        Self {
            id: ReferralId::new(),
            user_id,
            referral_code: generate_code(),
            feature,
            target_id,
            successful_referrals: 0,
            created_at: Timestamp::now(),
        }
    }

    /// True once the conversion count reaches the threshold.
    pub fn has_enough(&self, threshold: u32) -> bool {
        self.successful_referrals >= threshold
    }

    /// Conversions still needed to reach the threshold.
    pub fn remaining(&self, threshold: u32) -> u32 {
        threshold.saturating_sub(self.successful_referrals)
    }

    /// Records one verified conversion.
    pub fn record_success(&mut self) {
        self.successful_referrals += 1;
    }
}

/// Short unique token for referral links.
fn generate_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(12);
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_referral() -> Referral {
        Referral::new(
            UserId::new("user-1").unwrap(),
            GatedFeature::Report,
            None,
        )
    }

    #[test]
    fn new_referral_starts_at_zero() {
        let referral = test_referral();
        assert_eq!(referral.successful_referrals, 0);
        assert!(!referral.has_enough(REFERRAL_UNLOCK_THRESHOLD));
    }

    #[test]
    fn codes_are_unique_and_short() {
        let a = test_referral();
        let b = test_referral();
        assert_ne!(a.referral_code, b.referral_code);
        assert_eq!(a.referral_code.len(), 12);
    }

    #[test]
    fn threshold_boundary_at_three() {
        let mut referral = test_referral();
        referral.successful_referrals = 2;
        assert!(!referral.has_enough(REFERRAL_UNLOCK_THRESHOLD));

        referral.record_success();
        assert!(referral.has_enough(REFERRAL_UNLOCK_THRESHOLD));
    }

    #[test]
    fn remaining_counts_down_and_floors_at_zero() {
        let mut referral = test_referral();
        assert_eq!(referral.remaining(REFERRAL_UNLOCK_THRESHOLD), 3);

        referral.record_success();
        assert_eq!(referral.remaining(REFERRAL_UNLOCK_THRESHOLD), 2);

        referral.successful_referrals = 10;
        assert_eq!(referral.remaining(REFERRAL_UNLOCK_THRESHOLD), 0);
    }

    #[test]
    fn record_success_only_moves_up() {
        let mut referral = test_referral();
        referral.record_success();
        referral.record_success();
        assert_eq!(referral.successful_referrals, 2);
    }
}

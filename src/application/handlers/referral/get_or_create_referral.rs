//! GetOrCreateReferralHandler - Command handler for referral links.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::referral::{Referral, REFERRAL_UNLOCK_THRESHOLD};
use crate::domain::unlock::GatedFeature;
use crate::ports::ReferralStore;

/// Command to fetch (or lazily create) a user's referral for a feature.
#[derive(Debug, Clone)]
pub struct GetOrCreateReferralCommand {
    pub user_id: UserId,
    pub feature: GatedFeature,
    pub target_id: Option<String>,
}

/// The referral plus progress toward the unlock threshold.
#[derive(Debug, Clone)]
pub struct GetOrCreateReferralResult {
    pub referral: Referral,
    pub threshold: u32,
    pub remaining: u32,
}

/// Handler for referral link retrieval.
///
/// Idempotent: repeated calls for the same (user, feature, target) return
/// the same record and code.
pub struct GetOrCreateReferralHandler {
    referrals: Arc<dyn ReferralStore>,
}

impl GetOrCreateReferralHandler {
    pub fn new(referrals: Arc<dyn ReferralStore>) -> Self {
        Self { referrals }
    }

    pub async fn handle(
        &self,
        cmd: GetOrCreateReferralCommand,
    ) -> Result<GetOrCreateReferralResult, DomainError> {
        let referral = self
            .referrals
            .get_or_create(&cmd.user_id, cmd.feature, cmd.target_id.as_deref())
            .await?;

        let remaining = referral.remaining(REFERRAL_UNLOCK_THRESHOLD);

        Ok(GetOrCreateReferralResult {
            referral,
            threshold: REFERRAL_UNLOCK_THRESHOLD,
            remaining,
        })
    }
}

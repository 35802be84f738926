//! Shared snapshot gathering for the unlock handlers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::unlock::{AccessSnapshot, GatedFeature};
use crate::ports::{CreditLedger, ReferralStore, SubscriptionRepository, UnlockStore};

/// Reads the four inputs the unlock policy evaluates.
///
/// The referral lookup never creates a record; lazy creation only happens
/// when the user explicitly requests a referral link.
pub(super) async fn gather(
    unlock_store: &Arc<dyn UnlockStore>,
    subscriptions: &Arc<dyn SubscriptionRepository>,
    referrals: &Arc<dyn ReferralStore>,
    ledger: &Arc<dyn CreditLedger>,
    user_id: &UserId,
    feature: GatedFeature,
    target_id: Option<&str>,
) -> Result<AccessSnapshot, DomainError> {
    let already_unlocked = unlock_store
        .find(user_id, feature, target_id)
        .await?
        .is_some();

    let subscription_active = subscriptions
        .find_by_user_id(user_id)
        .await?
        .map(|s| s.has_access())
        .unwrap_or(false);

    let successful_referrals = referrals
        .find(user_id, feature, target_id)
        .await?
        .map(|r| r.successful_referrals)
        .unwrap_or(0);

    let credit_balance = ledger.balance(user_id).await.map_err(DomainError::from)?;

    Ok(AccessSnapshot {
        already_unlocked,
        subscription_active,
        successful_referrals,
        credit_balance,
    })
}

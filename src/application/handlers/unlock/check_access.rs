//! CheckAccessHandler - Query handler for gated feature access.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::unlock::{evaluate, AccessDecision, GatedFeature};
use crate::ports::{CreditLedger, ReferralStore, SubscriptionRepository, UnlockStore};

use super::snapshot;

/// Query to check access to a gated feature.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
    pub feature: GatedFeature,
    pub target_id: Option<String>,
}

/// Result of the access check.
#[derive(Debug, Clone)]
pub struct CheckAccessResult {
    pub decision: AccessDecision,
}

/// Handler for checking gated-feature access.
///
/// Read-only: never persists an unlock and never deducts credits, even when
/// the credit path would qualify.
pub struct CheckAccessHandler {
    unlock_store: Arc<dyn UnlockStore>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    referrals: Arc<dyn ReferralStore>,
    ledger: Arc<dyn CreditLedger>,
}

impl CheckAccessHandler {
    pub fn new(
        unlock_store: Arc<dyn UnlockStore>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        referrals: Arc<dyn ReferralStore>,
        ledger: Arc<dyn CreditLedger>,
    ) -> Self {
        Self {
            unlock_store,
            subscriptions,
            referrals,
            ledger,
        }
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, DomainError> {
        let snapshot = snapshot::gather(
            &self.unlock_store,
            &self.subscriptions,
            &self.referrals,
            &self.ledger,
            &query.user_id,
            query.feature,
            query.target_id.as_deref(),
        )
        .await?;

        Ok(CheckAccessResult {
            decision: evaluate(query.feature, &snapshot),
        })
    }
}

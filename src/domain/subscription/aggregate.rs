//! Subscription aggregate entity.
//!
//! # Invariants
//!
//! - At most one subscription per user is in an access-granting status
//!   (enforced by a partial unique index; see migrations).
//! - Status transitions follow the state machine rules.
//! - Records are retained after cancellation for history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine, SubscriptionId, Timestamp, UserId};

use super::SubscriptionStatus;

/// A user's provider-billed subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription record.
    pub id: SubscriptionId,

    /// User who owns this subscription.
    pub user_id: UserId,

    /// Payment provider's subscription id.
    pub stripe_subscription_id: String,

    /// Provider plan/price identifier.
    pub plan_id: String,

    /// Current status in the billing lifecycle.
    pub status: SubscriptionStatus,

    /// When cancellation was requested, if it was.
    pub canceled_at: Option<Timestamp>,

    /// Period end when the subscription is set to cancel at period end.
    pub ends_at: Option<Timestamp>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Creates a subscription after successful checkout.
    pub fn new(
        user_id: UserId,
        stripe_subscription_id: String,
        plan_id: String,
        status: SubscriptionStatus,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            stripe_subscription_id,
            plan_id,
            status,
            canceled_at: None,
            ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this subscription currently grants access.
    ///
    /// A cancelled subscription keeps access until `ends_at` when it was
    /// cancelled at period end.
    pub fn has_access(&self) -> bool {
        if self.status.has_access() {
            return true;
        }

        if self.status == SubscriptionStatus::Canceled {
            if let Some(ends_at) = self.ends_at {
                return Timestamp::now() <= ends_at;
            }
        }

        false
    }

    /// Renew after a paid invoice.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn renew(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Active)?;
        self.canceled_at = None;
        self.ends_at = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Mark payment as past due (failed but in grace period).
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn mark_past_due(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::PastDue)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Cancel this subscription.
    ///
    /// `ends_at` carries the period end when the provider reports
    /// cancel-at-period-end; `None` means immediate.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn cancel(&mut self, ends_at: Option<Timestamp>) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Canceled)?;
        self.canceled_at = Some(Timestamp::now());
        self.ends_at = ends_at;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Record a provider-side cancel-at-period-end without changing status.
    ///
    /// The subscription stays in its current status; `ends_at` marks when
    /// access will lapse.
    pub fn note_pending_cancellation(&mut self, ends_at: Timestamp) {
        self.ends_at = Some(ends_at);
        self.updated_at = Timestamp::now();
    }

    /// Sync to a status reported by the payment provider.
    ///
    /// Same-status updates are no-ops rather than errors: the provider
    /// re-sends current state freely.
    ///
    /// # Errors
    ///
    /// Returns error if the reported transition is not allowed.
    pub fn sync_status(&mut self, status: SubscriptionStatus) -> Result<(), DomainError> {
        if self.status == status {
            return Ok(());
        }
        self.transition_to(status)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition subscription from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_subscription(status: SubscriptionStatus) -> Subscription {
        Subscription::new(
            UserId::new("user-1").unwrap(),
            "sub_123".to_string(),
            "price_monthly".to_string(),
            status,
        )
    }

    #[test]
    fn active_subscription_has_access() {
        assert!(test_subscription(SubscriptionStatus::Active).has_access());
    }

    #[test]
    fn trialing_subscription_has_access() {
        assert!(test_subscription(SubscriptionStatus::Trialing).has_access());
    }

    #[test]
    fn canceled_without_period_end_has_no_access() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.cancel(None).unwrap();
        assert!(!sub.has_access());
    }

    #[test]
    fn canceled_at_period_end_keeps_access_until_then() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.cancel(Some(Timestamp::now().add_days(10))).unwrap();
        assert!(sub.has_access());
    }

    #[test]
    fn canceled_past_period_end_loses_access() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.cancel(Some(Timestamp::now().minus_days(1))).unwrap();
        assert!(!sub.has_access());
    }

    #[test]
    fn renew_clears_cancellation_fields() {
        let mut sub = test_subscription(SubscriptionStatus::PastDue);
        sub.renew().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.canceled_at.is_none());
        assert!(sub.ends_at.is_none());
    }

    #[test]
    fn past_due_then_recovery() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.mark_past_due().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PastDue);
        assert!(sub.has_access()); // grace period

        sub.renew().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[test]
    fn sync_same_status_is_noop() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        let updated_before = sub.updated_at;
        sub.sync_status(SubscriptionStatus::Active).unwrap();
        assert_eq!(sub.updated_at, updated_before);
    }

    #[test]
    fn canceled_cannot_sync_to_active() {
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.cancel(None).unwrap();
        assert!(sub.sync_status(SubscriptionStatus::Active).is_err());
    }
}

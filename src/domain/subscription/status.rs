//! Subscription status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of a billed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In a free trial period. Access granted.
    Trialing,

    /// Paid and current. Access granted.
    Active,

    /// Payment failed but within the provider's retry window.
    /// Access continues during the grace period.
    PastDue,

    /// Ended by the user or by exhausted retries. Soft end-state;
    /// access may continue until `ends_at` when cancelled at period end.
    Canceled,
}

impl SubscriptionStatus {
    /// Returns true if this status grants access on its own.
    ///
    /// `Canceled` is excluded here; the aggregate layers the period-end
    /// check on top.
    pub fn has_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::PastDue
        )
    }

    /// Maps a payment-provider status string to ours.
    ///
    /// Returns `None` for provider states we do not track (incomplete,
    /// unpaid, paused); callers treat those as no-ops.
    pub fn from_provider(s: &str) -> Option<Self> {
        match s {
            "trialing" => Some(SubscriptionStatus::Trialing),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "canceled" => Some(SubscriptionStatus::Canceled),
            _ => None,
        }
    }

    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIALING
            (Trialing, Active)
                | (Trialing, PastDue)
                | (Trialing, Canceled)
            // From ACTIVE
                | (Active, PastDue)
                | (Active, Canceled)
                | (Active, Active) // Renewal
            // From PAST_DUE
                | (PastDue, Active)
                | (PastDue, Canceled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trialing => vec![Active, PastDue, Canceled],
            Active => vec![PastDue, Canceled, Active],
            PastDue => vec![Active, Canceled],
            Canceled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trialing_can_activate() {
        let result = SubscriptionStatus::Trialing.transition_to(SubscriptionStatus::Active);
        assert_eq!(result, Ok(SubscriptionStatus::Active));
    }

    #[test]
    fn active_can_renew_to_active() {
        let result = SubscriptionStatus::Active.transition_to(SubscriptionStatus::Active);
        assert_eq!(result, Ok(SubscriptionStatus::Active));
    }

    #[test]
    fn past_due_can_recover() {
        let result = SubscriptionStatus::PastDue.transition_to(SubscriptionStatus::Active);
        assert_eq!(result, Ok(SubscriptionStatus::Active));
    }

    #[test]
    fn canceled_is_terminal() {
        assert!(SubscriptionStatus::Canceled.is_terminal());
        assert!(SubscriptionStatus::Canceled
            .transition_to(SubscriptionStatus::Active)
            .is_err());
    }

    #[test]
    fn has_access_per_status() {
        assert!(SubscriptionStatus::Active.has_access());
        assert!(SubscriptionStatus::Trialing.has_access());
        assert!(SubscriptionStatus::PastDue.has_access());
        assert!(!SubscriptionStatus::Canceled.has_access());
    }

    #[test]
    fn provider_statuses_map() {
        assert_eq!(
            SubscriptionStatus::from_provider("active"),
            Some(SubscriptionStatus::Active)
        );
        assert_eq!(
            SubscriptionStatus::from_provider("past_due"),
            Some(SubscriptionStatus::PastDue)
        );
        assert_eq!(SubscriptionStatus::from_provider("incomplete"), None);
    }

    #[test]
    fn storage_strings_roundtrip() {
        for status in [
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(SubscriptionStatus::from_provider(status.as_str()), Some(status));
        }
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in [
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            for target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }
}

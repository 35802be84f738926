//! Unlock decision policy.
//!
//! Pure evaluation over a snapshot of the user's state. Priority order when
//! several paths qualify:
//!
//! 1. A persisted unlock flag short-circuits everything (terminal
//!    per-artifact).
//! 2. An active subscription grants access without spending credits.
//! 3. Enough successful referrals grant access, independent of credits.
//! 4. An affordable credit balance is the fallback paid path; the actual
//!    deduction happens in the unlock command, not here.

use serde::{Deserialize, Serialize};

use super::{GatedFeature, UnlockMethod};
use crate::domain::referral::REFERRAL_UNLOCK_THRESHOLD;

/// Point-in-time view of everything the policy needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessSnapshot {
    /// A persisted unlock flag exists for this (user, feature, target).
    pub already_unlocked: bool,

    /// The user holds a subscription in an access-granting status.
    pub subscription_active: bool,

    /// Verified conversion count on the user's referral for this feature.
    pub successful_referrals: u32,

    /// Denormalized credit balance.
    pub credit_balance: u32,
}

/// Why access was granted or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    AlreadyUnlocked,
    Subscription,
    Referral,
    Credits,
    Locked,
}

impl AccessReason {
    /// The unlock method to persist when access came from this reason.
    ///
    /// `AlreadyUnlocked` and `Locked` persist nothing.
    pub fn unlock_method(&self) -> Option<UnlockMethod> {
        match self {
            AccessReason::Subscription => Some(UnlockMethod::Subscription),
            AccessReason::Referral => Some(UnlockMethod::Referral),
            AccessReason::Credits => Some(UnlockMethod::Credits),
            AccessReason::AlreadyUnlocked | AccessReason::Locked => None,
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

/// Evaluates the unlock policy for one gated feature.
pub fn evaluate(feature: GatedFeature, snapshot: &AccessSnapshot) -> AccessDecision {
    if snapshot.already_unlocked {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::AlreadyUnlocked,
        };
    }

    if snapshot.subscription_active {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::Subscription,
        };
    }

    if snapshot.successful_referrals >= REFERRAL_UNLOCK_THRESHOLD {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::Referral,
        };
    }

    if snapshot.credit_balance >= feature.credit_cost() {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::Credits,
        };
    }

    AccessDecision {
        allowed: false,
        reason: AccessReason::Locked,
    }
}

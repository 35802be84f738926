//! Referral conversion event.
//!
//! A conversion is created when a referred user completes the qualifying
//! action. At most one conversion exists per (referral, referred user):
//! revisits never count twice. Conversions are immutable and never deleted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversionId, ReferralId, Timestamp, UserId};
use crate::domain::unlock::GatedFeature;

/// One verified conversion attributed to a referral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralConversion {
    pub id: ConversionId,
    pub referral_id: ReferralId,
    pub referred_user_id: UserId,
    pub feature: GatedFeature,
    pub converted_at: Timestamp,
}

impl ReferralConversion {
    pub fn new(referral_id: ReferralId, referred_user_id: UserId, feature: GatedFeature) -> Self {
        Self {
            id: ConversionId::new(),
            referral_id,
            referred_user_id,
            feature,
            converted_at: Timestamp::now(),
        }
    }
}

/// Result of attempting to record a conversion.
///
/// Self-referrals and duplicates are silent no-ops by product decision:
/// the caller learns why nothing happened, the end user sees nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Conversion stored; carries the referral's new total.
    Recorded { new_total: u32 },

    /// The referred user is the referrer. No state change.
    SelfReferral,

    /// This referred user already converted for this referral. No state
    /// change.
    Duplicate,

    /// No referral exists for the presented code. No state change.
    CodeNotFound,
}

impl ConversionOutcome {
    /// True only when a conversion row was actually written.
    pub fn recorded(&self) -> bool {
        matches!(self, ConversionOutcome::Recorded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_reports_true() {
        assert!(ConversionOutcome::Recorded { new_total: 1 }.recorded());
    }

    #[test]
    fn rejections_report_false() {
        assert!(!ConversionOutcome::SelfReferral.recorded());
        assert!(!ConversionOutcome::Duplicate.recorded());
        assert!(!ConversionOutcome::CodeNotFound.recorded());
    }

    #[test]
    fn conversion_captures_referral_linkage() {
        let referral_id = ReferralId::new();
        let conversion = ReferralConversion::new(
            referral_id,
            UserId::new("referred-1").unwrap(),
            GatedFeature::RarityDetail,
        );

        assert_eq!(conversion.referral_id, referral_id);
        assert_eq!(conversion.feature, GatedFeature::RarityDetail);
    }
}

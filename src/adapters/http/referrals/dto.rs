//! HTTP DTOs for referral endpoints.

use serde::{Deserialize, Serialize};

/// Request to fetch (or lazily create) a referral link.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReferralRequest {
    /// Gated feature: "report", "rarity_detail", "cosmic_snapshot",
    /// "compatibility".
    pub feature: String,
    /// Optional entity scope (e.g. one archetype).
    #[serde(default)]
    pub target_id: Option<String>,
}

/// Referral link with progress toward the unlock threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralResponse {
    pub referral_code: String,
    pub feature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub successful_referrals: u32,
    pub threshold: u32,
    pub remaining: u32,
}

/// Request to record a conversion for a referral code.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordConversionRequest {
    pub referral_code: String,
}

/// Conversion outcome as exposed to the caller.
///
/// Silent no-ops (self-referral, duplicate) report `counted: false` with no
/// further explanation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResponse {
    pub counted: bool,
}

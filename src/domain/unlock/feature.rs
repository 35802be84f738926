//! Gated features and persisted unlocks.

use serde::{Deserialize, Serialize};

use crate::domain::credits::{
    COMPATIBILITY_REPORT_COST, COSMIC_SNAPSHOT_COST, RARITY_DETAIL_COST, REPORT_PDF_COST,
};
use crate::domain::foundation::{Timestamp, UserId};

/// An artifact behind the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedFeature {
    /// Full report PDF download.
    Report,
    /// Rarity-score detail view.
    RarityDetail,
    /// Cosmic snapshot.
    CosmicSnapshot,
    /// Compatibility report.
    Compatibility,
}

impl GatedFeature {
    /// Stable string form used in storage, routes, and ledger rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatedFeature::Report => "report",
            GatedFeature::RarityDetail => "rarity_detail",
            GatedFeature::CosmicSnapshot => "cosmic_snapshot",
            GatedFeature::Compatibility => "compatibility",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "report" => Some(GatedFeature::Report),
            "rarity_detail" => Some(GatedFeature::RarityDetail),
            "cosmic_snapshot" => Some(GatedFeature::CosmicSnapshot),
            "compatibility" => Some(GatedFeature::Compatibility),
            _ => None,
        }
    }

    /// Credits deducted when this feature is unlocked on the paid path.
    pub fn credit_cost(&self) -> u32 {
        match self {
            GatedFeature::Report => REPORT_PDF_COST,
            GatedFeature::RarityDetail => RARITY_DETAIL_COST,
            GatedFeature::CosmicSnapshot => COSMIC_SNAPSHOT_COST,
            GatedFeature::Compatibility => COMPATIBILITY_REPORT_COST,
        }
    }
}

/// How an unlock was earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockMethod {
    Subscription,
    Referral,
    Credits,
}

impl UnlockMethod {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockMethod::Subscription => "subscription",
            UnlockMethod::Referral => "referral",
            UnlockMethod::Credits => "credits",
        }
    }

    /// Parses the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "subscription" => Some(UnlockMethod::Subscription),
            "referral" => Some(UnlockMethod::Referral),
            "credits" => Some(UnlockMethod::Credits),
            _ => None,
        }
    }
}

/// Persisted unlock flag for one (user, feature, target) artifact.
///
/// Unlocked is terminal per-artifact: once written, later access checks
/// short-circuit without re-evaluating subscription/referral/credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureUnlock {
    pub user_id: UserId,
    pub feature: GatedFeature,
    pub target_id: Option<String>,
    pub method: UnlockMethod,
    pub unlocked_at: Timestamp,
}

impl FeatureUnlock {
    pub fn new(
        user_id: UserId,
        feature: GatedFeature,
        target_id: Option<String>,
        method: UnlockMethod,
    ) -> Self {
        Self {
            user_id,
            feature,
            target_id,
            method,
            unlocked_at: Timestamp::now(),
        }
    }
}

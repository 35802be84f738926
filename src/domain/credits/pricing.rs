//! Credit prices and purchasable packs.
//!
//! Prices are fixed configuration constants, not computed values.

use serde::{Deserialize, Serialize};

/// Credits required to download a report PDF.
pub const REPORT_PDF_COST: u32 = 2;

/// Credits required for a compatibility report.
pub const COMPATIBILITY_REPORT_COST: u32 = 2;

/// Credits required for the rarity-score detail view.
pub const RARITY_DETAIL_COST: u32 = 1;

/// Credits required for a cosmic snapshot.
pub const COSMIC_SNAPSHOT_COST: u32 = 1;

/// Purchasable credit pack catalog.
///
/// Pack ids travel through checkout-session metadata so the webhook can
/// correlate a completed payment back to the credits to award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditPack {
    Starter,
    Plus,
    Pro,
}

impl CreditPack {
    /// All packs, smallest first.
    pub const ALL: [CreditPack; 3] = [CreditPack::Starter, CreditPack::Plus, CreditPack::Pro];

    /// Stable identifier used in checkout metadata.
    pub fn id(&self) -> &'static str {
        match self {
            CreditPack::Starter => "starter",
            CreditPack::Plus => "plus",
            CreditPack::Pro => "pro",
        }
    }

    /// Looks up a pack by its stable identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "starter" => Some(CreditPack::Starter),
            "plus" => Some(CreditPack::Plus),
            "pro" => Some(CreditPack::Pro),
            _ => None,
        }
    }

    /// Credits awarded when the pack is purchased.
    pub fn credits(&self) -> u32 {
        match self {
            CreditPack::Starter => 10,
            CreditPack::Plus => 25,
            CreditPack::Pro => 60,
        }
    }

    /// Price in cents.
    pub fn price_cents(&self) -> u32 {
        match self {
            CreditPack::Starter => 499,
            CreditPack::Plus => 999,
            CreditPack::Pro => 1999,
        }
    }

    /// Display name shown at checkout.
    pub fn display_name(&self) -> &'static str {
        match self {
            CreditPack::Starter => "Starter Pack",
            CreditPack::Plus => "Plus Pack",
            CreditPack::Pro => "Pro Pack",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_ids_roundtrip() {
        for pack in CreditPack::ALL {
            assert_eq!(CreditPack::from_id(pack.id()), Some(pack));
        }
    }

    #[test]
    fn unknown_pack_id_is_none() {
        assert_eq!(CreditPack::from_id("mega"), None);
    }

    #[test]
    fn larger_packs_carry_more_credits() {
        assert!(CreditPack::Plus.credits() > CreditPack::Starter.credits());
        assert!(CreditPack::Pro.credits() > CreditPack::Plus.credits());
    }

    #[test]
    fn larger_packs_cost_more() {
        assert!(CreditPack::Plus.price_cents() > CreditPack::Starter.price_cents());
        assert!(CreditPack::Pro.price_cents() > CreditPack::Plus.price_cents());
    }

    #[test]
    fn fixed_feature_prices() {
        assert_eq!(REPORT_PDF_COST, 2);
        assert_eq!(COMPATIBILITY_REPORT_COST, 2);
    }
}

//! Rarity bands: label and display color per score range.

use serde::{Deserialize, Serialize};

/// Score band for a rarity score in [1, 100].
///
/// Total over the valid score range: every score maps to exactly one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityBand {
    /// 90 and above.
    ExtremelyRare,
    /// 75 to 89.
    VeryRare,
    /// 60 to 74.
    Rare,
    /// 45 to 59.
    Uncommon,
    /// 25 to 44.
    Common,
    /// Below 25.
    VeryCommon,
}

impl RarityBand {
    /// Maps a score to its band.
    pub fn for_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => RarityBand::ExtremelyRare,
            75..=89 => RarityBand::VeryRare,
            60..=74 => RarityBand::Rare,
            45..=59 => RarityBand::Uncommon,
            25..=44 => RarityBand::Common,
            _ => RarityBand::VeryCommon,
        }
    }

    /// Human-readable label shown next to the score.
    pub fn label(&self) -> &'static str {
        match self {
            RarityBand::ExtremelyRare => "Extremely Rare",
            RarityBand::VeryRare => "Very Rare",
            RarityBand::Rare => "Rare",
            RarityBand::Uncommon => "Uncommon",
            RarityBand::Common => "Common",
            RarityBand::VeryCommon => "Very Common",
        }
    }

    /// Fixed display color for the band.
    pub fn color(&self) -> &'static str {
        match self {
            RarityBand::ExtremelyRare => "#6C3483",
            RarityBand::VeryRare => "#8E44AD",
            RarityBand::Rare => "#2980B9",
            RarityBand::Uncommon => "#16A085",
            RarityBand::Common => "#F39C12",
            RarityBand::VeryCommon => "#95A5A6",
        }
    }
}

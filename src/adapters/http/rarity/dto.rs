//! HTTP DTOs for rarity endpoints.

use serde::{Deserialize, Serialize};

/// Query parameters for the rarity calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct RarityParams {
    /// Birthdate in YYYY-MM-DD form.
    pub birthdate: String,
}

/// Rarity score with presentation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RarityResponse {
    pub score: u8,
    pub label: &'static str,
    pub color: &'static str,
}

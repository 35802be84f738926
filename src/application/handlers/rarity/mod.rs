//! Rarity handlers.
//!
//! ## Queries
//! - Calculate the rarity score for a birthdate string

mod calculate_rarity;

pub use calculate_rarity::{CalculateRarityHandler, CalculateRarityQuery, CalculateRarityResult};

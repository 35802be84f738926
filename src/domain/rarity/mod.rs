//! Birthdate rarity scoring.
//!
//! Pure, deterministic calendar heuristics: no I/O, no randomness.
//! The same input date always produces the same score.

mod bands;
mod scorer;

pub use bands::RarityBand;
pub use scorer::{rarity_score, DEFAULT_SCORE};

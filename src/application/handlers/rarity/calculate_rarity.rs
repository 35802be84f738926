//! CalculateRarityHandler - Query handler for rarity scores.

use chrono::NaiveDate;

use crate::domain::rarity::{rarity_score, RarityBand, DEFAULT_SCORE};

/// Query carrying the raw birthdate string from the request.
#[derive(Debug, Clone)]
pub struct CalculateRarityQuery {
    /// Expected format: YYYY-MM-DD.
    pub birthdate: String,
}

/// Score with its presentation band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculateRarityResult {
    pub score: u8,
    pub band: RarityBand,
    /// True when the input failed to parse and the default was served.
    pub fallback: bool,
}

/// Handler for rarity score calculation.
///
/// A malformed birthdate never becomes a caller-visible error: the handler
/// logs the recoverable failure and serves the default score. This is the
/// legacy contract; the log line is what keeps it observable.
pub struct CalculateRarityHandler;

impl CalculateRarityHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, query: CalculateRarityQuery) -> CalculateRarityResult {
        match NaiveDate::parse_from_str(&query.birthdate, "%Y-%m-%d") {
            Ok(date) => {
                let score = rarity_score(date);
                CalculateRarityResult {
                    score,
                    band: RarityBand::for_score(score),
                    fallback: false,
                }
            }
            Err(err) => {
                tracing::warn!(
                    birthdate = %query.birthdate,
                    error = %err,
                    "unparseable birthdate, serving default rarity score"
                );
                CalculateRarityResult {
                    score: DEFAULT_SCORE,
                    band: RarityBand::for_score(DEFAULT_SCORE),
                    fallback: true,
                }
            }
        }
    }
}

impl Default for CalculateRarityHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(birthdate: &str) -> CalculateRarityQuery {
        CalculateRarityQuery {
            birthdate: birthdate.to_string(),
        }
    }

    #[test]
    fn valid_date_is_scored() {
        let handler = CalculateRarityHandler::new();
        let result = handler.handle(query("1992-02-29"));

        assert!(!result.fallback);
        assert!((1..=100).contains(&result.score));
        assert!(matches!(
            result.band,
            RarityBand::ExtremelyRare | RarityBand::VeryRare
        ));
    }

    #[test]
    fn same_input_twice_gives_same_result() {
        let handler = CalculateRarityHandler::new();
        assert_eq!(handler.handle(query("1990-07-04")), handler.handle(query("1990-07-04")));
    }

    #[test]
    fn garbage_input_falls_back_to_default() {
        let handler = CalculateRarityHandler::new();
        let result = handler.handle(query("not-a-date"));

        assert!(result.fallback);
        assert_eq!(result.score, DEFAULT_SCORE);
        assert_eq!(result.band, RarityBand::Uncommon);
    }

    #[test]
    fn impossible_date_falls_back_to_default() {
        let handler = CalculateRarityHandler::new();
        let result = handler.handle(query("2023-02-30"));

        assert!(result.fallback);
        assert_eq!(result.score, DEFAULT_SCORE);
    }
}

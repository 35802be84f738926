//! Rarity score computation.
//!
//! A birthdate's rarity is the clamped sum of four additive factors:
//!
//! 1. **Month factor** [0, 25] - months with fewer births score higher,
//!    derived from a fixed relative birth-frequency table.
//! 2. **Day factor** [0, ~20] - distance from mid-month; Feb 29 adds a
//!    flat +25 on top for leap-day rarity.
//! 3. **Special-date bonus** [0, 30] - a fixed table of notable calendar
//!    dates; dates not in the table contribute 0.
//! 4. **Leap-year bonus** - +5 for leap-year births that are not Feb 29
//!    (already counted by the day factor and special table).
//!
//! The sum is clamped to [1, 100].

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;

/// Score returned when an incoming birthdate cannot be parsed.
///
/// Callers at the transport boundary fall back to this instead of
/// propagating a parse failure; the fallback must be logged where it
/// happens.
pub const DEFAULT_SCORE: u8 = 50;

/// Relative birth-frequency index per month, January first.
/// September (index 8) is the peak at 100.
const MONTH_WEIGHTS: [f64; 12] = [
    88.0, 85.0, 92.0, 90.0, 94.0, 96.0, 98.0, 99.0, 100.0, 97.0, 89.0, 87.0,
];

const MAX_MONTH_WEIGHT: f64 = 100.0;

/// Fixed bonuses for notable calendar dates, keyed by (month, day).
static SPECIAL_DATES: Lazy<HashMap<(u32, u32), i32>> = Lazy::new(|| {
    HashMap::from([
        ((1, 1), 30),   // New Year's Day
        ((2, 14), 15),  // Valentine's Day
        ((2, 29), 30),  // Leap day
        ((3, 17), 5),   // St. Patrick's Day
        ((4, 1), 10),   // April Fools'
        ((7, 4), 10),   // Independence Day
        ((10, 31), 20), // Halloween
        ((11, 11), 15), // 11/11
        ((12, 24), 10), // Christmas Eve
        ((12, 25), 25), // Christmas
        ((12, 31), 15), // New Year's Eve
    ])
});

/// Computes the rarity score for a birthdate, in [1, 100].
pub fn rarity_score(birthdate: NaiveDate) -> u8 {
    let total = month_factor(birthdate.month())
        + day_factor(birthdate)
        + special_date_bonus(birthdate.month(), birthdate.day())
        + leap_year_bonus(birthdate);

    total.clamp(1, 100) as u8
}

/// Month factor: scaled distance from the peak-frequency month.
fn month_factor(month: u32) -> i32 {
    let weight = MONTH_WEIGHTS[(month - 1) as usize];
    (((MAX_MONTH_WEIGHT - weight) / MAX_MONTH_WEIGHT) * 25.0).round() as i32
}

/// Day factor: scaled distance from mid-month, plus the leap-day flat bonus.
fn day_factor(date: NaiveDate) -> i32 {
    let mid = (days_in_month(date) + 1) / 2;
    let distance = (date.day() as i32 - mid).abs();
    let mut factor = ((distance as f64 / mid as f64) * 20.0).round() as i32;

    if date.month() == 2 && date.day() == 29 {
        factor += 25;
    }

    factor
}

fn special_date_bonus(month: u32, day: u32) -> i32 {
    SPECIAL_DATES.get(&(month, day)).copied().unwrap_or(0)
}

/// +5 for leap-year births, except Feb 29 which is already counted.
fn leap_year_bonus(date: NaiveDate) -> i32 {
    let is_leap_year = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
    if is_leap_year && !(date.month() == 2 && date.day() == 29) {
        5
    } else {
        0
    }
}

fn days_in_month(date: NaiveDate) -> i32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or(date);
    first_of_next
        .signed_duration_since(NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date))
        .num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rarity::RarityBand;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_date_scores_identically() {
        let d = date(1990, 6, 15);
        assert_eq!(rarity_score(d), rarity_score(d));
    }

    #[test]
    fn score_is_within_range_for_sample_dates() {
        for d in [
            date(2000, 1, 1),
            date(1999, 9, 15),
            date(1988, 2, 29),
            date(1970, 12, 25),
            date(2023, 10, 31),
        ] {
            let score = rarity_score(d);
            assert!((1..=100).contains(&score), "score {} out of range for {}", score, d);
        }
    }

    #[test]
    fn mid_month_peak_frequency_clamps_to_one() {
        // September 15 of a non-leap year: every factor is zero.
        assert_eq!(rarity_score(date(2023, 9, 15)), 1);
    }

    #[test]
    fn leap_day_lands_in_very_rare_band_or_above() {
        let score = rarity_score(date(2020, 2, 29));
        let band = RarityBand::for_score(score);
        assert!(
            matches!(band, RarityBand::ExtremelyRare | RarityBand::VeryRare),
            "leap day scored {} ({:?})",
            score,
            band
        );
    }

    #[test]
    fn leap_day_outscores_adjacent_days() {
        let leap = rarity_score(date(2020, 2, 29));
        assert!(leap > rarity_score(date(2020, 2, 28)));
        assert!(leap > rarity_score(date(2020, 3, 1)));
    }

    #[test]
    fn leap_year_bonus_applies_off_leap_day() {
        // Same calendar day, leap vs non-leap year; only the +5 differs.
        let leap_year = rarity_score(date(2020, 6, 15));
        let common_year = rarity_score(date(2021, 6, 15));
        assert_eq!(leap_year, common_year + 5);
    }

    #[test]
    fn special_dates_outscore_neighbors() {
        assert!(rarity_score(date(2023, 12, 25)) > rarity_score(date(2023, 12, 20)));
        assert!(rarity_score(date(2023, 10, 31)) > rarity_score(date(2023, 10, 30)));
    }

    #[test]
    fn new_years_day_carries_largest_special_bonus() {
        // Jan 1: month 3 + day 19 + special 30 = 52 in a non-leap year.
        assert_eq!(rarity_score(date(2023, 1, 1)), 52);
    }

    #[test]
    fn special_table_has_eleven_entries() {
        assert_eq!(SPECIAL_DATES.len(), 11);
    }

    #[test]
    fn days_in_month_handles_december() {
        assert_eq!(days_in_month(date(2023, 12, 5)), 31);
    }

    #[test]
    fn days_in_month_handles_leap_february() {
        assert_eq!(days_in_month(date(2020, 2, 5)), 29);
        assert_eq!(days_in_month(date(2021, 2, 5)), 28);
    }

    proptest! {
        #[test]
        fn score_always_in_range(year in 1900i32..2100, ordinal in 1u32..=365) {
            let d = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            let score = rarity_score(d);
            prop_assert!((1..=100).contains(&score));
        }

        #[test]
        fn score_is_deterministic(year in 1900i32..2100, ordinal in 1u32..=365) {
            let d = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            prop_assert_eq!(rarity_score(d), rarity_score(d));
        }
    }
}

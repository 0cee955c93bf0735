//! Daily Seed Derivation
//!
//! Maps `(game_id, calendar date)` to the 32-bit seed every player shares
//! for that day's challenge. All timezones sharing a UTC calendar day get
//! the same seed.

use chrono::{Datelike, NaiveDate};

/// Unix epoch as a `NaiveDate` (1970-01-01).
fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date is valid")
}

/// Seed for a calendar day: whole days since the Unix epoch.
///
/// Computed from the UTC year/month/day only, so every timezone sharing a
/// UTC calendar day shares a seed.
pub fn daily_seed(date: NaiveDate) -> u32 {
    let days = date.num_days_from_ce() - unix_epoch().num_days_from_ce();
    days as u32
}

/// Classic multiply-shift string hash.
///
/// `h = (h << 5) - h + byte` per byte, wrapping. Stable across platforms
/// and releases; the published daily challenges depend on it.
pub fn hash_str(s: &str) -> u32 {
    let mut h: u32 = 0;
    for b in s.bytes() {
        h = (h << 5).wrapping_sub(h).wrapping_add(b as u32);
    }
    h
}

/// Boost-style hash combiner.
#[inline]
pub fn hash_combine(a: u32, b: u32) -> u32 {
    a ^ b
        .wrapping_add(0x9E37_79B9)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

/// Per-game daily seed: the day seed mixed with the game id hash.
///
/// Each game gets a distinct but date-derived stream, so two games on the
/// same day never replay each other's puzzles.
pub fn game_seed(game_id: &str, date: NaiveDate) -> u32 {
    hash_combine(daily_seed(date), hash_str(game_id))
}

// =============================================================================
// TESTS
// =============================================================================

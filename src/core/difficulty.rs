//! Game Configuration & Daily Difficulty
//!
//! Pure functions mapping `(game_id, date)` to the immutable engine
//! config. Consumed by the external daily-challenge scheduler and by
//! test fixtures.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Deserialize};

use super::seed::game_seed;

/// Immutable engine construction input.
///
/// Constructed externally from `(game_id, calendar date)`; the seed is the
/// date-derived per-game seed, so all players on a given day receive the
/// identical challenge. The date travels along so the final result record
/// can be stamped with the challenge day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the engine's `SeededRng`
    pub seed: u32,

    /// Difficulty scalar (feeds the level-score formula and curves)
    pub difficulty: f64,

    /// Game identifier (registry key, e.g. "grid-deduction")
    pub game_id: String,

    /// UTC calendar day of the challenge
    pub date: NaiveDate,
}

impl GameConfig {
    /// Build a config with an explicit seed (test fixtures, replays).
    pub fn with_seed(game_id: &str, seed: u32, difficulty: f64, date: NaiveDate) -> Self {
        Self {
            seed,
            difficulty,
            game_id: game_id.to_string(),
            date,
        }
    }
}

/// Daily difficulty for a calendar day.
///
/// Weekday ramp: Monday 1.0 rising in 0.5 steps to Sunday 4.0. Pure and
/// date-derived, so every player sees the same curve.
pub fn calculate_difficulty(date: NaiveDate, _game_id: &str) -> f64 {
    let weekday = date.weekday().num_days_from_monday(); // 0..=6
    1.0 + weekday as f64 * 0.5
}

/// The scheduler entry point: full config for `(game_id, date)`.
pub fn config_for(game_id: &str, date: NaiveDate) -> GameConfig {
    GameConfig {
        seed: game_seed(game_id, date),
        difficulty: calculate_difficulty(date, game_id),
        game_id: game_id.to_string(),
        date,
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Shared Engine State
//!
//! Lifecycle status, the common per-engine state block, and the immutable
//! result/progress records emitted to the store layer.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

/// Lives every engine starts with unless its logic overrides.
pub const DEFAULT_MAX_LIVES: u32 = 3;

// =============================================================================
// STATUS
// =============================================================================

/// Engine lifecycle status.
///
/// Transitions only along
/// `Loading -> Ready -> Playing <-> Paused` and `Playing -> Completed`;
/// `Completed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Engine constructed, `init()` not yet run
    #[default]
    Loading,
    /// Ready for `start()`
    Ready,
    /// Accepting input and advancing timers
    Playing,
    /// Clock frozen; `resume()` returns to `Playing`
    Paused,
    /// Terminal; no further input or timers
    Completed,
}

/// Game category for the meta-progression layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameCategory {
    /// Recall games (sequences, positions, pairs)
    Memory,
    /// Focus and discrimination games
    Attention,
    /// Reaction and throughput games
    Speed,
    /// Deduction and pattern games
    Logic,
    /// Arithmetic and estimation games
    Math,
    /// Word games
    Language,
}

impl GameCategory {
    /// Stable string form (store keys, logging).
    pub fn as_str(self) -> &'static str {
        match self {
            GameCategory::Memory => "memory",
            GameCategory::Attention => "attention",
            GameCategory::Speed => "speed",
            GameCategory::Logic => "logic",
            GameCategory::Math => "math",
            GameCategory::Language => "language",
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// The engine-owned state block, mutated only by the engine.
///
/// Snapshots of this struct are pushed to listeners after every mutation;
/// the fields mirror what the presentation layer renders in the shared HUD
/// (score, lives, level).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Lifecycle status
    pub status: GameStatus,

    /// Accumulated score (never decreases)
    pub score: u32,

    /// Current level, 1-based
    pub level: u32,

    /// Remaining lives; 0 forces completion
    pub lives: u32,

    /// Engine-clock time of `start()` (ms)
    pub start_time: Option<u64>,

    /// Engine-clock time of completion (ms)
    pub end_time: Option<u64>,

    /// Cumulative correct/attempts ratio, in `[0, 1]`; 1.0 before the
    /// first attempt, never reset for the engine's lifetime
    pub accuracy: f64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state in `Loading`.
    pub fn new() -> Self {
        Self {
            status: GameStatus::Loading,
            score: 0,
            level: 1,
            lives: DEFAULT_MAX_LIVES,
            start_time: None,
            end_time: None,
            accuracy: 1.0,
        }
    }

    /// Hash this snapshot for replay verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.status as u8);
        hasher.update_u32(self.score);
        hasher.update_u32(self.level);
        hasher.update_u32(self.lives);
        hasher.update_u64(self.start_time.unwrap_or(u64::MAX));
        hasher.update_u64(self.end_time.unwrap_or(u64::MAX));
        hasher.update_f64(self.accuracy);
    }

    /// Standalone fingerprint of this snapshot.
    pub fn fingerprint(&self) -> StateHash {
        let mut hasher = StateHasher::for_snapshot();
        self.hash_into(&mut hasher);
        hasher.finalize()
    }
}

// =============================================================================
// RESULT & PROGRESS
// =============================================================================

/// Terminal outcome of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// All levels cleared
    Win,
    /// Lives exhausted
    Lose,
}

/// Immutable result record, emitted exactly once per engine lifetime.
///
/// Ownership passes to the store layer via the completion event; the
/// engine keeps no reference afterward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    /// Game identifier
    pub game_id: String,

    /// Challenge calendar day
    pub date: NaiveDate,

    /// Final score
    pub score: u32,

    /// `end_time - start_time` on the engine clock
    pub duration_ms: u64,

    /// Final cumulative accuracy
    pub accuracy: f64,

    /// Levels fully cleared: `max_level` on a win, else `level - 1`
    pub levels_completed: u32,

    /// The game's level cap
    pub max_level: u32,

    /// Category for streak/quest accumulation
    pub category: GameCategory,

    /// Win or lose
    pub outcome: GameOutcome,
}

/// Telemetry snapshot appended on every level/game completion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Level at the time of the event
    pub level: u32,

    /// Score at the time of the event
    pub score: u32,

    /// Engine-clock timestamp (ms)
    pub at_ms: u64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new();
        assert_eq!(state.status, GameStatus::Loading);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, DEFAULT_MAX_LIVES);
        assert_eq!(state.accuracy, 1.0);
        assert!(state.start_time.is_none());
    }

    #[test]
    fn test_fingerprint_sensitive_to_fields() {
        let a = GameState::new();
        let mut b = GameState::new();
        b.score = 1;
        assert_ne!(a.fingerprint(), b.fingerprint());

        let mut c = GameState::new();
        c.accuracy = 0.5;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_stable() {
        let a = GameState::new();
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }

    #[test]
    fn test_category_str() {
        assert_eq!(GameCategory::Memory.as_str(), "memory");
        assert_eq!(GameCategory::Language.as_str(), "language");
    }
}

//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism. They are the foundation of the daily-challenge guarantee:
//! same game, same day, same puzzle, everywhere.

pub mod rng;
pub mod seed;
pub mod hash;
pub mod difficulty;

// Re-export core types
pub use rng::SeededRng;
pub use seed::{daily_seed, game_seed, hash_combine, hash_str};
pub use hash::{StateHash, StateHasher};
pub use difficulty::{GameConfig, calculate_difficulty, config_for};

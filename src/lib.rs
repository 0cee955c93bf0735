//! # Mindforge Game Core
//!
//! Deterministic engines for the Mindforge daily brain-training suite.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     MINDFORGE CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── rng.rs       - Mulberry32 seeded PRNG                   │
//! │  ├── seed.rs      - Daily/game seed derivation               │
//! │  ├── hash.rs      - Snapshot fingerprints for replay checks  │
//! │  └── difficulty.rs- GameConfig + daily difficulty            │
//! │                                                              │
//! │  engine/          - Shared lifecycle framework               │
//! │  ├── state.rs     - Status machine, results, progress        │
//! │  ├── input.rs     - Discrete input events                    │
//! │  ├── timer.rs     - Scoped virtual timers                    │
//! │  ├── core.rs      - Score/lives/accuracy bookkeeping         │
//! │  └── engine.rs    - GameEngine<G> + Engine trait             │
//! │                                                              │
//! │  games/           - The 20 concrete game engines             │
//! │  ├── mod.rs       - Registry (id -> engine)                  │
//! │  ├── wordlists.rs - Immutable word/category tables           │
//! │  └── *.rs         - One module per game                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The entire crate is single-threaded and deterministic:
//! - All randomness flows from one seeded Mulberry32 stream per engine
//! - Time is a virtual clock driven by the host's `advance(elapsed_ms)`
//! - No system time, no OS timers, no shared mutable state
//!
//! Given the same `(game_id, date)` the generated challenge — and, for
//! identical input sequences, every emitted state snapshot and the final
//! result — is identical on any platform. That is the "daily challenge"
//! contract: all players on a UTC calendar day face the same puzzle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod engine;
pub mod games;

// Re-export commonly used types
pub use crate::core::difficulty::{GameConfig, calculate_difficulty, config_for};
pub use crate::core::rng::SeededRng;
pub use crate::core::seed::{daily_seed, game_seed};
pub use engine::{
    Engine, EngineError, EngineEvent, GameCategory, GameOutcome, GameResult, GameState,
    GameStatus, InputAction, InputEvent,
};
pub use games::create_engine;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Countdown granularity for round timers (ms)
pub const TICK_MS: u64 = 100;

/// Visual feedback delay before advancing a round/level (ms)
pub const FEEDBACK_DELAY_MS: u64 = 1500;

//! Shared Engine Framework
//!
//! The lifecycle/state-machine layer every game composes:
//!
//! - `state`: status machine, shared state block, result/progress records
//! - `input`: the union of per-game input shapes
//! - `timer`: scoped virtual timers driven by `advance(elapsed_ms)`
//! - `core`: score/lives/accuracy bookkeeping and event emission
//! - `engine`: `GameEngine<G>` plus the object-safe `Engine` trait
//! - `error`: the construction-time error type

pub mod state;
pub mod input;
pub mod timer;
pub mod core;
pub mod engine;
pub mod error;

// Re-export key types
pub use state::{
    GameCategory, GameOutcome, GameProgress, GameResult, GameState, GameStatus,
    DEFAULT_MAX_LIVES,
};
pub use input::{InputAction, InputEvent};
pub use timer::{TimerAction, TimerId, TimerQueue};
pub use self::core::{EngineCore, EngineEvent, GameDescriptor};
pub use engine::{Engine, GameEngine, GameLogic};
pub use error::EngineError;

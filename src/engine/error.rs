//! Engine Errors
//!
//! Gameplay failure is modeled as state, never as errors (wrong answers,
//! exhausted lives, generation fallbacks are all handled internally). The
//! only caller-visible failure is asking the registry for a game that
//! does not exist.

use thiserror::Error;

/// Errors surfaced across the engine boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No concrete engine is registered under this id.
    #[error("unknown game id: {0}")]
    UnknownGame(String),
}

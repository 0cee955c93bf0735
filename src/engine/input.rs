//! Input Events
//!
//! The union of every discrete input shape the presentation layer can
//! forward. Each game matches the variants it understands; anything else
//! is silently ignored — games must never crash on a bad tap.

use serde::{Serialize, Deserialize};

/// Auxiliary actions shared by several games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAction {
    /// Reveal a hint (games that support one; usually costs reward)
    Hint,
    /// Commit the current selection
    Confirm,
}

/// A discrete input event funneled through `Engine::handle_input`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Choose an indexed option, card, pad, or bucket
    Select(usize),

    /// Tap a grid cell
    Cell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Place a digit into a grid cell
    Place {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Digit value (1-based)
        value: u8,
    },

    /// Clear a grid cell
    Erase {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Submit a typed answer (word, digit string)
    Submit(String),

    /// A bare tap (reaction games)
    Tap,

    /// Auxiliary action
    Action(InputAction),
}

//! Spatial Recall
//!
//! A sequence of grid cells lights up, then the player taps them back in
//! order. The grid and the sequence grow with the level.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;
use crate::FEEDBACK_DELAY_MS;

/// Registry id.
pub const GAME_ID: &str = "spatial-recall";

const MAX_LEVELS: u32 = 8;

/// Per-cell highlight duration during the showing phase (ms).
const SHOW_MS_PER_CELL: u64 = 900;

/// Grid side length for a level.
pub fn grid_size(level: u32) -> usize {
    (3 + level as usize / 3).min(6)
}

/// Highlighted cells for a level.
pub fn sequence_length(level: u32) -> usize {
    2 + level as usize
}

/// Generate the highlight sequence: distinct cells in presentation order.
pub fn generate_sequence(rng: &mut SeededRng, level: u32) -> Vec<(usize, usize)> {
    let size = grid_size(level);
    let cells: Vec<usize> = (0..size * size).collect();
    rng.pick_multiple(&cells, sequence_length(level))
        .into_iter()
        .map(|c| (c / size, c % size))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Showing,
    Input,
    Feedback,
}

/// Spatial recall game logic.
pub struct SpatialRecall {
    sequence: Vec<(usize, usize)>,
    progress: usize,
    phase: Phase,
    last_correct: bool,
    streak: u32,
}

impl SpatialRecall {
    /// Fresh logic; the first sequence is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            progress: 0,
            phase: Phase::Showing,
            last_correct: false,
            streak: 0,
        }
    }

    fn deal(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.sequence = generate_sequence(&mut core.rng, level);
        self.progress = 0;
        self.phase = Phase::Showing;
        let show_time = SHOW_MS_PER_CELL * self.sequence.len() as u64;
        core.schedule(show_time, TimerAction::PhaseEnd);
    }
}

impl Default for SpatialRecall {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for SpatialRecall {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Memory,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        self.deal(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Cell { row, col } = *input else {
            return;
        };
        if self.phase != Phase::Input {
            return;
        }
        let size = grid_size(core.level());
        if row >= size || col >= size {
            return;
        }

        if self.sequence[self.progress] == (row, col) {
            self.progress += 1;
            if self.progress == self.sequence.len() {
                self.streak += 1;
                let points =
                    50 + 10 * self.sequence.len() as u32 + (self.streak * 10).min(50);
                self.last_correct = true;
                self.phase = Phase::Feedback;
                core.correct(points);
                core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
            }
        } else {
            self.streak = 0;
            self.last_correct = false;
            core.mistake();
            if core.is_playing() {
                self.phase = Phase::Feedback;
                core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
            }
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::PhaseEnd => {
                if self.phase == Phase::Showing {
                    self.phase = Phase::Input;
                }
            }
            TimerAction::Feedback => {
                if self.phase != Phase::Feedback {
                    return;
                }
                if self.last_correct {
                    core.level_complete(0);
                } else {
                    self.deal(core);
                }
            }
            _ => {}
        }
    }

    fn view(&self) -> Value {
        json!({
            "phase": match self.phase {
                Phase::Showing => "showing",
                Phase::Input => "input",
                Phase::Feedback => "feedback",
            },
            "sequence": if self.phase == Phase::Showing {
                json!(self.sequence)
            } else {
                Value::Null
            },
            "sequenceLength": self.sequence.len(),
            "progress": self.progress,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::core::difficulty::GameConfig;
    use crate::engine::engine::{Engine, GameEngine};

    fn test_engine(seed: u32) -> GameEngine<SpatialRecall> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, SpatialRecall::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_curves() {
        assert_eq!(grid_size(1), 3);
        assert_eq!(grid_size(3), 4);
        assert_eq!(grid_size(8), 5);
        assert_eq!(sequence_length(1), 3);
    }

    #[test]
    fn test_sequence_cells_distinct_and_in_grid() {
        let mut rng = SeededRng::new(42);
        for level in 1..=8 {
            let seq = generate_sequence(&mut rng, level);
            assert_eq!(seq.len(), sequence_length(level));
            let size = grid_size(level);
            let mut seen = std::collections::HashSet::new();
            for (r, c) in seq {
                assert!(r < size && c < size);
                assert!(seen.insert((r, c)), "repeated cell");
            }
        }
    }

    #[test]
    fn test_correct_replay_advances_level() {
        let mut engine = test_engine(42);
        let seq = engine.logic().sequence.clone();
        engine.advance(SHOW_MS_PER_CELL * seq.len() as u64);
        assert_eq!(engine.logic().phase, Phase::Input);

        for (row, col) in seq {
            engine.handle_input(&InputEvent::Cell { row, col });
        }
        assert!(engine.logic().last_correct);
        assert!(engine.state().score > 0);

        engine.advance(FEEDBACK_DELAY_MS);
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.logic().phase, Phase::Showing);
    }

    #[test]
    fn test_wrong_tap_costs_life_and_reshows() {
        let mut engine = test_engine(42);
        let seq = engine.logic().sequence.clone();
        engine.advance(SHOW_MS_PER_CELL * seq.len() as u64);

        // Tap a cell that is not the first in the sequence
        let wrong = (0..9)
            .map(|i| (i / 3, i % 3))
            .find(|cell| *cell != seq[0])
            .unwrap();
        engine.handle_input(&InputEvent::Cell { row: wrong.0, col: wrong.1 });
        assert_eq!(engine.state().lives, 2);

        engine.advance(FEEDBACK_DELAY_MS);
        assert_eq!(engine.state().level, 1);
        assert_eq!(engine.logic().phase, Phase::Showing);
    }

    #[test]
    fn test_taps_ignored_during_showing() {
        let mut engine = test_engine(42);
        let first = engine.logic().sequence[0];
        engine.handle_input(&InputEvent::Cell { row: first.0, col: first.1 });
        assert_eq!(engine.logic().progress, 0);
    }
}

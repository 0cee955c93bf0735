//! Pattern Echo
//!
//! Simon-style sequence memory over four pads. The sequence replays one
//! step at a time, then the player echoes it; a miss replays the same
//! sequence from the top.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::FEEDBACK_DELAY_MS;

/// Registry id.
pub const GAME_ID: &str = "pattern-echo";

const MAX_LEVELS: u32 = 8;

/// Number of pads.
pub const PAD_COUNT: usize = 4;

/// Delay between replayed steps (ms).
const STEP_MS: u64 = 600;

/// Sequence length for a level.
pub fn sequence_length(level: u32) -> usize {
    2 + level as usize
}

/// Generate the pad sequence (repeats allowed, as in the classic game).
pub fn generate_sequence(rng: &mut SeededRng, level: u32) -> Vec<usize> {
    (0..sequence_length(level))
        .map(|_| rng.next_int(0, PAD_COUNT as i64 - 1) as usize)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Showing,
    Input,
    Feedback,
}

/// Pattern echo game logic.
pub struct PatternEcho {
    sequence: Vec<usize>,
    shown: usize,
    progress: usize,
    phase: Phase,
    last_correct: bool,
    step_timer: Option<TimerId>,
}

impl PatternEcho {
    /// Fresh logic; the first sequence is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            shown: 0,
            progress: 0,
            phase: Phase::Showing,
            last_correct: false,
            step_timer: None,
        }
    }

    fn replay(&mut self, core: &mut EngineCore) {
        self.shown = 0;
        self.progress = 0;
        self.phase = Phase::Showing;
        if let Some(id) = self.step_timer.take() {
            core.cancel(id);
        }
        self.step_timer = Some(core.schedule_repeating(STEP_MS, TimerAction::StepShow));
    }
}

impl Default for PatternEcho {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for PatternEcho {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Memory,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.sequence = generate_sequence(&mut core.rng, level);
        self.last_correct = false;
        self.replay(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(pad) = *input else {
            return;
        };
        if self.phase != Phase::Input || pad >= PAD_COUNT {
            return;
        }

        if self.sequence[self.progress] == pad {
            self.progress += 1;
            if self.progress == self.sequence.len() {
                let points = 40 + 15 * self.sequence.len() as u32;
                self.last_correct = true;
                self.phase = Phase::Feedback;
                core.correct(points);
                core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
            }
        } else {
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
            TimerAction::StepShow => {
                if self.phase != Phase::Showing {
                    return;
                }
                self.shown += 1;
                if self.shown >= self.sequence.len() {
                    if let Some(id) = self.step_timer.take() {
                        core.cancel(id);
                    }
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
                    // Same sequence again from the top
                    self.replay(core);
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
            "padCount": PAD_COUNT,
            "sequenceLength": self.sequence.len(),
            // Pads lit so far during the replay
            "shown": if self.phase == Phase::Showing {
                json!(self.sequence[..self.shown].to_vec())
            } else {
                Value::Null
            },
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

    fn test_engine(seed: u32) -> GameEngine<PatternEcho> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, PatternEcho::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_sequence_in_pad_range() {
        let mut rng = SeededRng::new(42);
        for level in 1..=8 {
            let seq = generate_sequence(&mut rng, level);
            assert_eq!(seq.len(), sequence_length(level));
            assert!(seq.iter().all(|&p| p < PAD_COUNT));
        }
    }

    #[test]
    fn test_replay_then_echo_advances() {
        let mut engine = test_engine(42);
        let seq = engine.logic().sequence.clone();
        assert_eq!(seq.len(), 3);

        // Steps reveal one per STEP_MS; input is ignored until all shown
        engine.handle_input(&InputEvent::Select(seq[0]));
        assert_eq!(engine.logic().progress, 0);

        engine.advance(STEP_MS * seq.len() as u64);
        assert_eq!(engine.logic().phase, Phase::Input);

        for pad in seq {
            engine.handle_input(&InputEvent::Select(pad));
        }
        assert!(engine.logic().last_correct);
        engine.advance(FEEDBACK_DELAY_MS);
        assert_eq!(engine.state().level, 2);
    }

    #[test]
    fn test_miss_replays_same_sequence() {
        let mut engine = test_engine(42);
        let seq = engine.logic().sequence.clone();
        engine.advance(STEP_MS * seq.len() as u64);

        let wrong = (0..PAD_COUNT).find(|&p| p != seq[0]).unwrap();
        engine.handle_input(&InputEvent::Select(wrong));
        assert_eq!(engine.state().lives, 2);

        engine.advance(FEEDBACK_DELAY_MS);
        // Back in the showing phase with the identical sequence
        assert_eq!(engine.logic().phase, Phase::Showing);
        assert_eq!(engine.logic().sequence, seq);
        assert_eq!(engine.state().level, 1);
    }
}

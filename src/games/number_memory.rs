//! Number Memory
//!
//! Memorize a digit string shown briefly, then type it back. One round
//! per level; the string grows with the level and the display time grows
//! with the string.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;
use crate::FEEDBACK_DELAY_MS;

/// Registry id.
pub const GAME_ID: &str = "number-memory";

const MAX_LEVELS: u32 = 8;

/// Digits shown at a level.
pub fn number_length(level: u32) -> usize {
    3 + level as usize
}

/// How long the digits stay on screen (ms).
pub fn display_time_ms(length: usize) -> u64 {
    1000 + length as u64 * 400
}

/// Generate the digit string: first digit 1-9, the rest 0-9.
pub fn generate_number(rng: &mut SeededRng, length: usize) -> String {
    let mut digits = String::with_capacity(length);
    digits.push((b'0' + rng.next_int(1, 9) as u8) as char);
    for _ in 1..length {
        digits.push((b'0' + rng.next_int(0, 9) as u8) as char);
    }
    digits
}

/// Round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Showing,
    Input,
    Feedback,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Showing => "showing",
            Phase::Input => "input",
            Phase::Feedback => "feedback",
        }
    }
}

/// Number memory game logic.
pub struct NumberMemory {
    digits: String,
    phase: Phase,
    last_correct: bool,
    streak: u32,
}

impl NumberMemory {
    /// Fresh logic; the first number is generated on `start()`.
    pub fn new() -> Self {
        Self {
            digits: String::new(),
            phase: Phase::Showing,
            last_correct: false,
            streak: 0,
        }
    }

    fn deal(&mut self, core: &mut EngineCore) {
        let length = number_length(core.level());
        self.digits = generate_number(&mut core.rng, length);
        self.phase = Phase::Showing;
        core.schedule(display_time_ms(length), TimerAction::PhaseEnd);
    }
}

impl Default for NumberMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for NumberMemory {
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
        let InputEvent::Submit(answer) = input else {
            return;
        };
        if self.phase != Phase::Input {
            return;
        }

        if *answer == self.digits {
            self.streak += 1;
            // The level reward lands on submit; the advance itself waits
            // for the feedback delay and awards nothing further.
            let points = core.level_score() + (self.streak * 15).min(75);
            self.last_correct = true;
            self.phase = Phase::Feedback;
            core.correct(points);
            core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
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
                    core.advance_level();
                } else {
                    // Retry the level with a fresh number
                    self.deal(core);
                }
            }
            _ => {}
        }
    }

    fn view(&self) -> Value {
        json!({
            "phase": self.phase.as_str(),
            // The digits are only rendered during the showing phase
            "digits": if self.phase == Phase::Showing { Some(self.digits.as_str()) } else { None },
            "length": self.digits.len(),
            "feedback": if self.phase == Phase::Feedback {
                json!({ "isCorrect": self.last_correct })
            } else {
                Value::Null
            },
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

    fn test_engine(seed: u32, difficulty: f64) -> GameEngine<NumberMemory> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            difficulty,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, NumberMemory::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_curve() {
        assert_eq!(number_length(1), 4);
        assert_eq!(number_length(5), 8);
        assert_eq!(display_time_ms(4), 2600);
    }

    #[test]
    fn test_generated_digits_shape() {
        let mut rng = SeededRng::new(1);
        for _ in 0..100 {
            let digits = generate_number(&mut rng, 6);
            assert_eq!(digits.len(), 6);
            assert_ne!(digits.as_bytes()[0], b'0');
            assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_seed_42_level_1_scenario() {
        // The canonical daily-challenge scenario: seed 42, difficulty 4.
        let mut engine = test_engine(42, 4.0);

        assert_eq!(engine.logic().digits.len(), 4);
        assert_eq!(engine.logic().digits, "6486");
        assert_eq!(engine.logic().phase, Phase::Showing);

        // Display phase is 1000 + 4*400 = 2600ms
        engine.advance(2599);
        assert_eq!(engine.logic().phase, Phase::Showing);
        engine.advance(1);
        assert_eq!(engine.logic().phase, Phase::Input);

        // Exact digits: +155 = level score (100 + 4*10) + streak bonus 15
        engine.handle_input(&InputEvent::Submit("6486".into()));
        assert_eq!(engine.state().score, 155);
        assert_eq!(engine.logic().phase, Phase::Feedback);
        assert!(engine.logic().last_correct);

        // Auto-advance to level 2 after the 1500ms feedback delay
        engine.advance(1500);
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.logic().phase, Phase::Showing);
        assert_eq!(engine.logic().digits.len(), 5);
    }

    #[test]
    fn test_wrong_answer_retries_level() {
        let mut engine = test_engine(42, 1.0);
        engine.advance(display_time_ms(4));
        engine.handle_input(&InputEvent::Submit("0000".into()));
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.state().score, 0);

        engine.advance(FEEDBACK_DELAY_MS);
        // Same level, fresh number, back in the showing phase
        assert_eq!(engine.state().level, 1);
        assert_eq!(engine.logic().phase, Phase::Showing);
    }

    #[test]
    fn test_input_ignored_while_showing() {
        let mut engine = test_engine(42, 1.0);
        let digits = engine.logic().digits.clone();
        engine.handle_input(&InputEvent::Submit(digits));
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.logic().phase, Phase::Showing);
    }

    #[test]
    fn test_digits_hidden_after_showing() {
        let mut engine = test_engine(42, 1.0);
        assert!(engine.view()["digits"].is_string());
        engine.advance(display_time_ms(4));
        assert!(engine.view()["digits"].is_null());
    }
}

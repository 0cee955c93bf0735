//! Color Clash
//!
//! Stroop interference: a color word rendered in an ink color that
//! usually disagrees with it. The player must pick the INK color, not the
//! word, before the round clock runs out.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "color-clash";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 8;

/// Color names used for words and inks.
pub const COLOR_NAMES: &[&str] = &["red", "blue", "green", "yellow", "purple", "orange"];

/// Probability that word and ink disagree.
const INCONGRUENT_P: f64 = 0.7;

/// Answer options shown per round.
pub const OPTION_COUNT: usize = 4;

/// Round clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (3000u64.saturating_sub(level as u64 * 120)).max(1500)
}

/// One Stroop trial.
#[derive(Clone, Debug)]
pub struct StroopTrial {
    /// Index of the displayed word
    pub word: usize,
    /// Index of the ink color (the right answer)
    pub ink: usize,
    /// Option color indices; exactly one equals `ink`
    pub options: Vec<usize>,
    /// Position of `ink` within `options`
    pub answer: usize,
}

/// Build one trial from the engine's stream.
pub fn generate_trial(rng: &mut SeededRng) -> StroopTrial {
    let colors = COLOR_NAMES.len();
    let word = rng.next_int(0, colors as i64 - 1) as usize;
    let ink = if rng.chance(INCONGRUENT_P) {
        let offset = rng.next_int(1, colors as i64 - 1) as usize;
        (word + offset) % colors
    } else {
        word
    };

    // Distractor inks, distinct from the answer and each other
    let others: Vec<usize> = (0..colors).filter(|&c| c != ink).collect();
    let mut options = rng.pick_multiple(&others, OPTION_COUNT - 1);
    options.push(ink);
    let options = rng.shuffle(&options);
    let answer = options.iter().position(|&c| c == ink).expect("ink present");

    StroopTrial {
        word,
        ink,
        options,
        answer,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Color clash game logic.
pub struct ColorClash {
    trial: Option<StroopTrial>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl ColorClash {
    /// Fresh logic; the first trial is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            trial: None,
            round: 0,
            phase: Phase::Question,
            time_limit: 0,
            time_remaining: 0,
            tick_timer: None,
            streak: 0,
            last_correct: false,
        }
    }

    fn start_round(&mut self, core: &mut EngineCore) {
        self.trial = Some(generate_trial(&mut core.rng));
        self.phase = Phase::Question;
        self.time_remaining = self.time_limit;
        self.stop_clock(core);
        self.tick_timer = Some(core.schedule_repeating(TICK_MS, TimerAction::Tick));
    }

    fn stop_clock(&mut self, core: &mut EngineCore) {
        if let Some(id) = self.tick_timer.take() {
            core.cancel(id);
        }
    }

    fn finish_round(&mut self, core: &mut EngineCore, correct: bool) {
        self.stop_clock(core);
        self.last_correct = correct;
        if correct {
            self.streak += 1;
            let time_bonus =
                (50.0 * self.time_remaining as f64 / self.time_limit as f64).round() as u32;
            let points = 50 + time_bonus + (self.streak * 10).min(50);
            self.phase = Phase::Feedback;
            core.correct(points);
            core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
        } else {
            self.streak = 0;
            core.mistake();
            if core.is_playing() {
                self.phase = Phase::Feedback;
                core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
            }
        }
    }
}

impl Default for ColorClash {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for ColorClash {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Attention,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.round = 1;
        self.time_limit = time_limit_ms(level);
        self.streak = 0;
        self.start_round(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(choice) = *input else {
            return;
        };
        if self.phase != Phase::Question || choice >= OPTION_COUNT {
            return;
        }
        let answer = self.trial.as_ref().map(|t| t.answer);
        if let Some(answer) = answer {
            self.finish_round(core, choice == answer);
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::Tick => {
                if self.phase != Phase::Question {
                    return;
                }
                self.time_remaining = self.time_remaining.saturating_sub(TICK_MS);
                if self.time_remaining == 0 {
                    self.finish_round(core, false);
                }
            }
            TimerAction::Feedback => {
                if self.phase != Phase::Feedback {
                    return;
                }
                if self.round >= ROUNDS_PER_LEVEL {
                    core.level_complete(0);
                } else {
                    self.round += 1;
                    self.start_round(core);
                }
            }
            _ => {}
        }
    }

    fn view(&self) -> Value {
        let Some(trial) = &self.trial else {
            return json!({ "phase": "loading" });
        };
        json!({
            "phase": match self.phase {
                Phase::Question => "question",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "word": COLOR_NAMES[trial.word],
            "ink": COLOR_NAMES[trial.ink],
            "options": trial.options.iter().map(|&c| COLOR_NAMES[c]).collect::<Vec<_>>(),
            "timeRemaining": self.time_remaining,
            "lastCorrect": self.last_correct,
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

    fn test_engine(seed: u32) -> GameEngine<ColorClash> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, ColorClash::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_trial_shape() {
        let mut rng = SeededRng::new(42);
        for _ in 0..200 {
            let trial = generate_trial(&mut rng);
            assert_eq!(trial.options.len(), OPTION_COUNT);
            assert_eq!(trial.options[trial.answer], trial.ink);
            // Options are distinct
            let mut opts = trial.options.clone();
            opts.sort();
            opts.dedup();
            assert_eq!(opts.len(), OPTION_COUNT);
        }
    }

    #[test]
    fn test_incongruent_majority() {
        let mut rng = SeededRng::new(42);
        let clashes = (0..1000)
            .filter(|_| {
                let t = generate_trial(&mut rng);
                t.word != t.ink
            })
            .count();
        // p = 0.7; allow a generous band
        assert!((600..=800).contains(&clashes), "{clashes} clashes");
    }

    #[test]
    fn test_ink_answer_scores() {
        let mut engine = test_engine(42);
        let answer = engine.logic().trial.as_ref().unwrap().answer;
        engine.handle_input(&InputEvent::Select(answer));
        assert!(engine.logic().last_correct);
        assert_eq!(engine.state().score, 110);
    }

    #[test]
    fn test_word_bait_is_wrong_when_incongruent() {
        let mut engine = test_engine(42);
        // Find a trial where word != ink and the word color is an option
        loop {
            let (word, ink, bait) = {
                let t = engine.logic().trial.as_ref().unwrap();
                (t.word, t.ink, t.options.iter().position(|&c| c == t.word))
            };
            if word != ink {
                if let Some(bait_idx) = bait {
                    engine.handle_input(&InputEvent::Select(bait_idx));
                    assert!(!engine.logic().last_correct);
                    assert_eq!(engine.state().lives, 2);
                    return;
                }
            }
            // Answer correctly and move on to the next trial
            let answer = engine.logic().trial.as_ref().unwrap().answer;
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
            if engine.state().status != crate::engine::state::GameStatus::Playing {
                return; // ran out of game before finding a bait trial
            }
        }
    }

    #[test]
    fn test_rounds_advance_level() {
        let mut engine = test_engine(7);
        for _ in 0..ROUNDS_PER_LEVEL {
            let answer = engine.logic().trial.as_ref().unwrap().answer;
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
    }
}

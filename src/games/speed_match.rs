//! Speed Match
//!
//! One-back symbol matching: for each stimulus, decide whether it matches
//! the previous one before the round clock runs out. Eight rounds per
//! level with a shrinking time budget.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "speed-match";

const MAX_LEVELS: u32 = 8;

/// Question rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 8;

/// Distinct stimulus symbols.
pub const SYMBOL_COUNT: usize = 6;

/// Answer index meaning "same as previous".
pub const ANSWER_MATCH: usize = 0;

/// Answer index meaning "different".
pub const ANSWER_DIFFERENT: usize = 1;

/// Round time budget for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (3000u64.saturating_sub(level as u64 * 150)).max(1200)
}

/// Generate the stimulus run: one leading symbol plus one per round.
///
/// Matches are forced in roughly half the rounds so the answer mix stays
/// balanced at every level.
pub fn generate_run(rng: &mut SeededRng, rounds: usize) -> Vec<usize> {
    let mut run = Vec::with_capacity(rounds + 1);
    run.push(rng.next_int(0, SYMBOL_COUNT as i64 - 1) as usize);
    for _ in 0..rounds {
        let prev = *run.last().expect("run is non-empty");
        let next = if rng.chance(0.5) {
            prev
        } else {
            // Pick a different symbol
            let offset = rng.next_int(1, SYMBOL_COUNT as i64 - 1) as usize;
            (prev + offset) % SYMBOL_COUNT
        };
        run.push(next);
    }
    run
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Speed match game logic.
pub struct SpeedMatch {
    run: Vec<usize>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl SpeedMatch {
    /// Fresh logic; the first run is generated on `start()`.
    pub fn new() -> Self {
        Self {
            run: Vec::new(),
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

impl Default for SpeedMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for SpeedMatch {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Speed,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.run = generate_run(&mut core.rng, ROUNDS_PER_LEVEL);
        self.round = 1;
        self.time_limit = time_limit_ms(level);
        self.streak = 0;
        self.start_round(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(choice) = *input else {
            return;
        };
        if self.phase != Phase::Question {
            return;
        }
        if choice != ANSWER_MATCH && choice != ANSWER_DIFFERENT {
            return;
        }

        let is_match = self.run[self.round] == self.run[self.round - 1];
        let answered_match = choice == ANSWER_MATCH;
        self.finish_round(core, is_match == answered_match);
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
        json!({
            "phase": match self.phase {
                Phase::Question => "question",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "roundsPerLevel": ROUNDS_PER_LEVEL,
            "current": self.run.get(self.round),
            "previous": self.round.checked_sub(1).and_then(|i| self.run.get(i)),
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

    fn test_engine(seed: u32) -> GameEngine<SpeedMatch> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, SpeedMatch::new());
        engine.init();
        engine.start();
        engine
    }

    fn right_answer(engine: &GameEngine<SpeedMatch>) -> usize {
        let logic = engine.logic();
        if logic.run[logic.round] == logic.run[logic.round - 1] {
            ANSWER_MATCH
        } else {
            ANSWER_DIFFERENT
        }
    }

    #[test]
    fn test_time_limit_curve() {
        assert_eq!(time_limit_ms(1), 2850);
        assert_eq!(time_limit_ms(8), 1800);
        assert_eq!(time_limit_ms(100), 1200);
    }

    #[test]
    fn test_run_shape() {
        let mut rng = SeededRng::new(42);
        let run = generate_run(&mut rng, ROUNDS_PER_LEVEL);
        assert_eq!(run.len(), ROUNDS_PER_LEVEL + 1);
        assert!(run.iter().all(|&s| s < SYMBOL_COUNT));
    }

    #[test]
    fn test_correct_round_scores_with_time_bonus() {
        let mut engine = test_engine(42);
        let answer = right_answer(&engine);
        engine.handle_input(&InputEvent::Select(answer));
        // Full clock: 50 base + 50 time bonus + 10 streak
        assert_eq!(engine.state().score, 110);
        assert_eq!(engine.logic().phase, Phase::Feedback);
    }

    #[test]
    fn test_timeout_is_a_mistake() {
        let mut engine = test_engine(42);
        // The limit is not a tick multiple; the timeout lands on the
        // first tick at or past it.
        engine.advance(time_limit_ms(1) + TICK_MS);
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.logic().streak, 0);
    }

    #[test]
    fn test_eight_rounds_complete_a_level() {
        let mut engine = test_engine(42);
        for _ in 0..ROUNDS_PER_LEVEL {
            let answer = right_answer(&engine);
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.logic().round, 1);
    }

    #[test]
    fn test_wrong_answer_resets_streak() {
        let mut engine = test_engine(42);
        let answer = right_answer(&engine);
        engine.handle_input(&InputEvent::Select(answer));
        engine.advance(FEEDBACK_DELAY_MS);
        assert_eq!(engine.logic().streak, 1);

        let wrong = 1 - right_answer(&engine);
        engine.handle_input(&InputEvent::Select(wrong));
        assert_eq!(engine.logic().streak, 0);
        assert_eq!(engine.state().lives, 2);
    }
}

//! Reaction Rush
//!
//! Wait for the go signal, then tap as fast as possible. Tapping early
//! costs a life; slow taps time out. Five rounds per level with a
//! tightening response window.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::FEEDBACK_DELAY_MS;

/// Registry id.
pub const GAME_ID: &str = "reaction-rush";

const MAX_LEVELS: u32 = 6;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 5;

/// Random wait before the go signal (ms).
const WAIT_MIN_MS: i64 = 1200;
const WAIT_MAX_MS: i64 = 3500;

/// Window to react after the signal (ms).
pub fn response_window_ms(level: u32) -> u64 {
    (2000u64.saturating_sub(level as u64 * 150)).max(800)
}

/// Points for a reaction time: faster is better, floor of 20.
pub fn reaction_points(reaction_ms: u64) -> u32 {
    (150i64 - reaction_ms as i64 / 10).max(20) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Waiting,
    Go,
    Feedback,
}

/// Reaction rush game logic.
pub struct ReactionRush {
    phase: Phase,
    round: usize,
    go_at: u64,
    pending_timer: Option<TimerId>,
    streak: u32,
    last_reaction_ms: Option<u64>,
}

impl ReactionRush {
    /// Fresh logic; the first round starts on `start()`.
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            round: 0,
            go_at: 0,
            pending_timer: None,
            streak: 0,
            last_reaction_ms: None,
        }
    }

    fn start_round(&mut self, core: &mut EngineCore) {
        self.phase = Phase::Waiting;
        self.last_reaction_ms = None;
        self.clear_pending(core);
        let wait = core.rng.next_int(WAIT_MIN_MS, WAIT_MAX_MS) as u64;
        self.pending_timer = Some(core.schedule(wait, TimerAction::Go));
    }

    fn clear_pending(&mut self, core: &mut EngineCore) {
        if let Some(id) = self.pending_timer.take() {
            core.cancel(id);
        }
    }

    fn to_feedback(&mut self, core: &mut EngineCore) {
        self.phase = Phase::Feedback;
        core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
    }
}

impl Default for ReactionRush {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for ReactionRush {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Speed,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        self.round = 1;
        self.streak = 0;
        self.start_round(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        if *input != InputEvent::Tap {
            return;
        }
        match self.phase {
            Phase::Waiting => {
                // Jumped the gun
                self.clear_pending(core);
                self.streak = 0;
                core.mistake();
                if core.is_playing() {
                    self.to_feedback(core);
                }
            }
            Phase::Go => {
                self.clear_pending(core);
                let reaction = core.now_ms() - self.go_at;
                self.last_reaction_ms = Some(reaction);
                self.streak += 1;
                let points = reaction_points(reaction) + (self.streak * 10).min(50);
                core.correct(points);
                self.to_feedback(core);
            }
            Phase::Feedback => {}
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::Go => {
                if self.phase != Phase::Waiting {
                    return;
                }
                self.phase = Phase::Go;
                self.go_at = core.now_ms();
                let level = core.level();
                self.pending_timer =
                    Some(core.schedule(response_window_ms(level), TimerAction::PhaseEnd));
            }
            TimerAction::PhaseEnd => {
                // Signal expired with no tap
                if self.phase != Phase::Go {
                    return;
                }
                self.pending_timer = None;
                self.streak = 0;
                core.mistake();
                if core.is_playing() {
                    self.to_feedback(core);
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
                Phase::Waiting => "waiting",
                Phase::Go => "go",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "roundsPerLevel": ROUNDS_PER_LEVEL,
            "lastReactionMs": self.last_reaction_ms,
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

    fn test_engine(seed: u32) -> GameEngine<ReactionRush> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, ReactionRush::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_reaction_points_curve() {
        assert_eq!(reaction_points(0), 150);
        assert_eq!(reaction_points(500), 100);
        assert_eq!(reaction_points(5000), 20);
    }

    #[test]
    fn test_early_tap_costs_life() {
        let mut engine = test_engine(42);
        assert_eq!(engine.logic().phase, Phase::Waiting);
        engine.handle_input(&InputEvent::Tap);
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.logic().phase, Phase::Feedback);
    }

    /// Step time forward in small increments until the go signal fires.
    fn advance_to_go(engine: &mut GameEngine<ReactionRush>) {
        while engine.logic().phase == Phase::Waiting {
            engine.advance(100);
        }
        assert_eq!(engine.logic().phase, Phase::Go);
    }

    #[test]
    fn test_tap_after_signal_scores_by_speed() {
        let mut engine = test_engine(42);
        advance_to_go(&mut engine);

        engine.advance(300);
        engine.handle_input(&InputEvent::Tap);

        let reaction = engine.core().now_ms() - engine.logic().go_at;
        assert_eq!(engine.logic().last_reaction_ms, Some(reaction));
        assert!(reaction >= 300);
        assert_eq!(
            engine.state().score,
            reaction_points(reaction) + 10 // streak bonus for the first hit
        );
    }

    #[test]
    fn test_signal_timeout_is_a_mistake() {
        let mut engine = test_engine(42);
        advance_to_go(&mut engine);
        engine.advance(response_window_ms(1));
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.logic().phase, Phase::Feedback);
    }

    #[test]
    fn test_five_rounds_complete_level() {
        let mut engine = test_engine(42);
        for _ in 0..ROUNDS_PER_LEVEL {
            advance_to_go(&mut engine);
            engine.handle_input(&InputEvent::Tap);
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
    }
}

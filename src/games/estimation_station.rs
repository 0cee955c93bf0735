//! Estimation Station
//!
//! A cluster of dots flashes briefly; the player picks its exact count
//! from four nearby options. Counts and option spread grow with the
//! level.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "estimation-station";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 3;

/// How long the dots stay visible (ms).
const DISPLAY_MS: u64 = 1200;

/// Answer options per round.
pub const OPTION_COUNT: usize = 4;

/// Distractor spread for a level.
pub fn option_spread(level: u32) -> i64 {
    2 + level as i64
}

/// Answer clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (4000u64.saturating_sub(level as u64 * 150)).max(2000)
}

/// One estimation round.
#[derive(Clone, Debug)]
pub struct EstimationRound {
    /// The true dot count
    pub count: i64,
    /// Candidate counts; exactly one is right
    pub options: Vec<i64>,
    /// Index of `count` within `options`
    pub answer: usize,
}

/// Build one round: a count near the level's band plus close distractors.
pub fn generate_round(rng: &mut SeededRng, level: u32) -> EstimationRound {
    let base = 10 + level as i64 * 8;
    let count = base + rng.next_int(-4, 4);
    let spread = option_spread(level);

    let mut wrongs: Vec<i64> = Vec::new();
    let mut attempts = 0;
    while wrongs.len() < OPTION_COUNT - 1 {
        attempts += 1;
        let candidate = if attempts <= 100 {
            let offset = rng.next_int(1, spread);
            if rng.chance(0.5) {
                count + offset
            } else {
                count - offset
            }
        } else {
            // Degenerate band exhausted; fall back to sequential offsets
            count + attempts as i64 - 100
        };
        if candidate > 0 && candidate != count && !wrongs.contains(&candidate) {
            wrongs.push(candidate);
        }
    }

    let mut options = wrongs;
    options.push(count);
    let options = rng.shuffle(&options);
    let answer = options.iter().position(|&o| o == count).expect("count present");

    EstimationRound {
        count,
        options,
        answer,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Showing,
    Input,
    Feedback,
}

/// Estimation station game logic.
pub struct EstimationStation {
    round_data: Option<EstimationRound>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl EstimationStation {
    /// Fresh logic; the first round is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            round_data: None,
            round: 0,
            phase: Phase::Showing,
            time_limit: 0,
            time_remaining: 0,
            tick_timer: None,
            streak: 0,
            last_correct: false,
        }
    }

    fn start_round(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.round_data = Some(generate_round(&mut core.rng, level));
        self.phase = Phase::Showing;
        self.stop_clock(core);
        core.schedule(DISPLAY_MS, TimerAction::PhaseEnd);
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

impl Default for EstimationStation {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for EstimationStation {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Math,
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
        if self.phase != Phase::Input || choice >= OPTION_COUNT {
            return;
        }
        let answer = self.round_data.as_ref().map(|r| r.answer);
        if let Some(answer) = answer {
            self.finish_round(core, choice == answer);
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::PhaseEnd => {
                if self.phase != Phase::Showing {
                    return;
                }
                self.phase = Phase::Input;
                self.time_remaining = self.time_limit;
                self.tick_timer = Some(core.schedule_repeating(TICK_MS, TimerAction::Tick));
            }
            TimerAction::Tick => {
                if self.phase != Phase::Input {
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
        let Some(round) = &self.round_data else {
            return json!({ "phase": "loading" });
        };
        json!({
            "phase": match self.phase {
                Phase::Showing => "showing",
                Phase::Input => "input",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            // The count drives the dot cluster; hidden once input opens
            "dotCount": if self.phase == Phase::Showing { Some(round.count) } else { None },
            "options": if self.phase == Phase::Showing { Value::Null } else { json!(round.options) },
            "timeRemaining": self.time_remaining,
            "lastCorrect": self.last_correct,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Number Chain
//!
//! Mental running arithmetic: a start value and a chain of operations
//! revealed one step at a time, then the final result picked from four
//! options. Multiplication joins the chain at higher levels.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "number-chain";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 2;

/// Delay between revealed steps (ms).
const STEP_MS: u64 = 1100;

/// Answer options per round.
pub const OPTION_COUNT: usize = 4;

/// Chain length for a level.
pub fn step_count(level: u32) -> usize {
    3 + level as usize / 2
}

/// Answer clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (6000u64.saturating_sub(level as u64 * 250)).max(3000)
}

/// One chain operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOp {
    /// `+ n`
    Add(i64),
    /// `- n`
    Sub(i64),
    /// `x n`
    Mul(i64),
}

impl ChainOp {
    /// Apply to a running value.
    pub fn apply(self, value: i64) -> i64 {
        match self {
            ChainOp::Add(n) => value + n,
            ChainOp::Sub(n) => value - n,
            ChainOp::Mul(n) => value * n,
        }
    }

    /// Display string, e.g. `+7`.
    pub fn display(self) -> String {
        match self {
            ChainOp::Add(n) => format!("+{n}"),
            ChainOp::Sub(n) => format!("-{n}"),
            ChainOp::Mul(n) => format!("x{n}"),
        }
    }
}

/// One chain round.
#[derive(Clone, Debug)]
pub struct ChainRound {
    /// Starting value
    pub start: i64,
    /// Operations in reveal order
    pub ops: Vec<ChainOp>,
    /// The final value
    pub result: i64,
    /// Candidate results; exactly one is right
    pub options: Vec<i64>,
    /// Index of `result` within `options`
    pub answer: usize,
}

/// Build one round, keeping the running value in a sane mental band.
pub fn generate_round(rng: &mut SeededRng, level: u32) -> ChainRound {
    let start = rng.next_int(2, 9);
    let allow_mul = level >= 3;

    let mut value = start;
    let mut ops = Vec::with_capacity(step_count(level));
    for _ in 0..step_count(level) {
        let op = if allow_mul && value <= 30 && rng.chance(0.25) {
            ChainOp::Mul(rng.next_int(2, 3))
        } else if value >= 10 && rng.chance(0.5) {
            ChainOp::Sub(rng.next_int(1, 9))
        } else {
            ChainOp::Add(rng.next_int(1, 9))
        };
        value = op.apply(value);
        ops.push(op);
    }

    let result = value;
    let mut wrongs: Vec<i64> = Vec::new();
    let mut attempts = 0;
    while wrongs.len() < OPTION_COUNT - 1 {
        attempts += 1;
        let candidate = if attempts <= 100 {
            let offset = rng.next_int(1, 6);
            if rng.chance(0.5) { result + offset } else { result - offset }
        } else {
            result + attempts - 100
        };
        if candidate != result && candidate >= 0 && !wrongs.contains(&candidate) {
            wrongs.push(candidate);
        }
    }

    let mut options = wrongs;
    options.push(result);
    let options = rng.shuffle(&options);
    let answer = options
        .iter()
        .position(|&o| o == result)
        .expect("result present");

    ChainRound {
        start,
        ops,
        result,
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

/// Number chain game logic.
pub struct NumberChain {
    round_data: Option<ChainRound>,
    shown: usize,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    step_timer: Option<TimerId>,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl NumberChain {
    /// Fresh logic; the first chain is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            round_data: None,
            shown: 0,
            round: 0,
            phase: Phase::Showing,
            time_limit: 0,
            time_remaining: 0,
            step_timer: None,
            tick_timer: None,
            streak: 0,
            last_correct: false,
        }
    }

    fn start_round(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.round_data = Some(generate_round(&mut core.rng, level));
        self.shown = 0;
        self.phase = Phase::Showing;
        self.stop_timers(core);
        self.step_timer = Some(core.schedule_repeating(STEP_MS, TimerAction::StepShow));
    }

    fn stop_timers(&mut self, core: &mut EngineCore) {
        if let Some(id) = self.step_timer.take() {
            core.cancel(id);
        }
        if let Some(id) = self.tick_timer.take() {
            core.cancel(id);
        }
    }

    fn finish_round(&mut self, core: &mut EngineCore, correct: bool) {
        self.stop_timers(core);
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

impl Default for NumberChain {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for NumberChain {
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
            TimerAction::StepShow => {
                if self.phase != Phase::Showing {
                    return;
                }
                let steps = self.round_data.as_ref().map(|r| r.ops.len()).unwrap_or(0);
                self.shown += 1;
                if self.shown >= steps {
                    if let Some(id) = self.step_timer.take() {
                        core.cancel(id);
                    }
                    self.phase = Phase::Input;
                    self.time_remaining = self.time_limit;
                    self.tick_timer =
                        Some(core.schedule_repeating(TICK_MS, TimerAction::Tick));
                }
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
            "start": round.start,
            "steps": round.ops.iter().take(self.shown).map(|op| op.display()).collect::<Vec<_>>(),
            "stepCount": round.ops.len(),
            "options": if self.phase == Phase::Showing { Value::Null } else { json!(round.options) },
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

    fn test_engine(seed: u32) -> GameEngine<NumberChain> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, NumberChain::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_chain_result_consistent() {
        let mut rng = SeededRng::new(42);
        for level in 1..=8 {
            for _ in 0..50 {
                let round = generate_round(&mut rng, level);
                assert_eq!(round.ops.len(), step_count(level));
                let mut value = round.start;
                for op in &round.ops {
                    value = op.apply(value);
                }
                assert_eq!(value, round.result);
                assert_eq!(round.options[round.answer], round.result);
                let hits = round.options.iter().filter(|&&o| o == round.result).count();
                assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn test_no_mul_before_level_3() {
        let mut rng = SeededRng::new(42);
        for _ in 0..100 {
            let round = generate_round(&mut rng, 1);
            assert!(round.ops.iter().all(|op| !matches!(op, ChainOp::Mul(_))));
        }
    }

    #[test]
    fn test_steps_reveal_then_answer() {
        let mut engine = test_engine(42);
        let steps = engine.logic().round_data.as_ref().unwrap().ops.len();

        // Input ignored during the reveal
        engine.handle_input(&InputEvent::Select(0));
        assert_eq!(engine.state().lives, 3);
        assert_eq!(engine.state().score, 0);

        engine.advance(STEP_MS * steps as u64);
        assert_eq!(engine.logic().phase, Phase::Input);

        let answer = engine.logic().round_data.as_ref().unwrap().answer;
        engine.handle_input(&InputEvent::Select(answer));
        assert!(engine.logic().last_correct);
        assert_eq!(engine.state().score, 110);
    }

    #[test]
    fn test_two_rounds_per_level() {
        let mut engine = test_engine(42);
        for _ in 0..ROUNDS_PER_LEVEL {
            let steps = engine.logic().round_data.as_ref().unwrap().ops.len();
            engine.advance(STEP_MS * steps as u64);
            let answer = engine.logic().round_data.as_ref().unwrap().answer;
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
    }
}

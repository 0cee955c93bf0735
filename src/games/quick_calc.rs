//! Quick Calc
//!
//! Timed mental arithmetic: one expression per round with four candidate
//! answers. Operands grow and multiplication/division join the operator
//! pool as the level climbs.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "quick-calc";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 6;

/// Answer options per round.
pub const OPTION_COUNT: usize = 4;

/// Round clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (5000u64.saturating_sub(level as u64 * 300)).max(2500)
}

/// Operators available at a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcOp {
    /// Addition
    Add,
    /// Subtraction (never negative results)
    Sub,
    /// Multiplication
    Mul,
    /// Division (always exact)
    Div,
}

impl CalcOp {
    fn symbol(self) -> &'static str {
        match self {
            CalcOp::Add => "+",
            CalcOp::Sub => "-",
            CalcOp::Mul => "x",
            CalcOp::Div => "/",
        }
    }
}

/// Operator pool for a level: +/- first, x from 3, / from 5.
pub fn op_pool(level: u32) -> &'static [CalcOp] {
    match level {
        0..=2 => &[CalcOp::Add, CalcOp::Sub],
        3..=4 => &[CalcOp::Add, CalcOp::Sub, CalcOp::Mul],
        _ => &[CalcOp::Add, CalcOp::Sub, CalcOp::Mul, CalcOp::Div],
    }
}

/// One arithmetic round.
#[derive(Clone, Debug)]
pub struct CalcRound {
    /// Left operand
    pub a: i64,
    /// Operator
    pub op: CalcOp,
    /// Right operand
    pub b: i64,
    /// The exact result
    pub result: i64,
    /// Candidates; exactly one is right
    pub options: Vec<i64>,
    /// Index of `result` within `options`
    pub answer: usize,
}

impl CalcRound {
    /// Display string, e.g. `7 x 8`.
    pub fn display(&self) -> String {
        format!("{} {} {}", self.a, self.op.symbol(), self.b)
    }
}

/// Build one round; division is always exact, subtraction never negative.
pub fn generate_round(rng: &mut SeededRng, level: u32) -> CalcRound {
    let hi = 10 + 3 * level as i64;
    let op = *rng.pick(op_pool(level)).expect("op pool non-empty");

    let (a, b, result) = match op {
        CalcOp::Add => {
            let a = rng.next_int(2, hi);
            let b = rng.next_int(2, hi);
            (a, b, a + b)
        }
        CalcOp::Sub => {
            let a = rng.next_int(2, hi);
            let b = rng.next_int(2, hi);
            // Keep the result non-negative
            let (a, b) = if a >= b { (a, b) } else { (b, a) };
            (a, b, a - b)
        }
        CalcOp::Mul => {
            let a = rng.next_int(2, 9);
            let b = rng.next_int(2, 12);
            (a, b, a * b)
        }
        CalcOp::Div => {
            let b = rng.next_int(2, 9);
            let quotient = rng.next_int(2, 12);
            (b * quotient, b, quotient)
        }
    };

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

    CalcRound {
        a,
        op,
        b,
        result,
        options,
        answer,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Quick calc game logic.
pub struct QuickCalc {
    round_data: Option<CalcRound>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl QuickCalc {
    /// Fresh logic; the first round is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            round_data: None,
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
        let level = core.level();
        self.round_data = Some(generate_round(&mut core.rng, level));
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

impl Default for QuickCalc {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for QuickCalc {
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
        if self.phase != Phase::Question || choice >= OPTION_COUNT {
            return;
        }
        let answer = self.round_data.as_ref().map(|r| r.answer);
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
        let Some(round) = &self.round_data else {
            return json!({ "phase": "loading" });
        };
        json!({
            "phase": match self.phase {
                Phase::Question => "question",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "expression": round.display(),
            "options": round.options,
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

    fn test_engine(seed: u32) -> GameEngine<QuickCalc> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, QuickCalc::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_rounds_are_consistent() {
        let mut rng = SeededRng::new(42);
        for level in 1..=8 {
            for _ in 0..100 {
                let round = generate_round(&mut rng, level);
                let expected = match round.op {
                    CalcOp::Add => round.a + round.b,
                    CalcOp::Sub => round.a - round.b,
                    CalcOp::Mul => round.a * round.b,
                    CalcOp::Div => round.a / round.b,
                };
                assert_eq!(round.result, expected);
                assert!(round.result >= 0);
                if round.op == CalcOp::Div {
                    assert_eq!(round.a % round.b, 0, "division must be exact");
                }
                assert_eq!(round.options[round.answer], round.result);
            }
        }
    }

    #[test]
    fn test_operator_gating() {
        let mut rng = SeededRng::new(7);
        for _ in 0..100 {
            let round = generate_round(&mut rng, 1);
            assert!(matches!(round.op, CalcOp::Add | CalcOp::Sub));
        }
    }

    #[test]
    fn test_display() {
        let round = CalcRound {
            a: 7,
            op: CalcOp::Mul,
            b: 8,
            result: 56,
            options: vec![54, 56, 57, 60],
            answer: 1,
        };
        assert_eq!(round.display(), "7 x 8");
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut engine = test_engine(42);
        let answer = engine.logic().round_data.as_ref().unwrap().answer;
        engine.handle_input(&InputEvent::Select(answer));
        assert_eq!(engine.state().score, 110);
    }

    #[test]
    fn test_six_rounds_per_level() {
        let mut engine = test_engine(42);
        for _ in 0..ROUNDS_PER_LEVEL {
            let answer = engine.logic().round_data.as_ref().unwrap().answer;
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
    }

    #[test]
    fn test_timeout_path() {
        let mut engine = test_engine(42);
        engine.advance(time_limit_ms(1) + TICK_MS);
        assert_eq!(engine.state().lives, 2);
    }
}

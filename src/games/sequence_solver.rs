//! Sequence Solver
//!
//! Number-pattern completion: four shown terms and four candidates for
//! the fifth. The pattern pool widens with the level, from plain
//! arithmetic steps to Fibonacci-style sums.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "sequence-solver";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 2;

/// Terms shown before the blank.
pub const SHOWN_TERMS: usize = 4;

/// Answer options per round.
pub const OPTION_COUNT: usize = 4;

/// Answer clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (8000u64.saturating_sub(level as u64 * 300)).max(4000)
}

/// Pattern families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    /// Constant difference
    Arithmetic,
    /// Constant ratio
    Geometric,
    /// Consecutive squares
    Squares,
    /// Alternating +a / -b
    Alternating,
    /// Each term the sum of the previous two
    FibonacciLike,
}

impl PatternKind {
    fn as_str(self) -> &'static str {
        match self {
            PatternKind::Arithmetic => "arithmetic",
            PatternKind::Geometric => "geometric",
            PatternKind::Squares => "squares",
            PatternKind::Alternating => "alternating",
            PatternKind::FibonacciLike => "fibonacci",
        }
    }
}

/// Patterns available at a level.
pub fn pattern_pool(level: u32) -> &'static [PatternKind] {
    match level {
        0..=2 => &[PatternKind::Arithmetic],
        3..=4 => &[PatternKind::Arithmetic, PatternKind::Geometric],
        5..=6 => &[
            PatternKind::Arithmetic,
            PatternKind::Geometric,
            PatternKind::Squares,
        ],
        _ => &[
            PatternKind::Arithmetic,
            PatternKind::Geometric,
            PatternKind::Squares,
            PatternKind::Alternating,
            PatternKind::FibonacciLike,
        ],
    }
}

/// One sequence round.
#[derive(Clone, Debug)]
pub struct SequenceRound {
    /// Pattern family
    pub kind: PatternKind,
    /// The visible terms
    pub terms: Vec<i64>,
    /// The hidden next term
    pub next: i64,
    /// Candidates; exactly one is right
    pub options: Vec<i64>,
    /// Index of `next` within `options`
    pub answer: usize,
}

/// Build one round from the engine's stream.
pub fn generate_round(rng: &mut SeededRng, level: u32) -> SequenceRound {
    let kind = *rng.pick(pattern_pool(level)).expect("pattern pool non-empty");

    let mut terms = Vec::with_capacity(SHOWN_TERMS + 1);
    match kind {
        PatternKind::Arithmetic => {
            let start = rng.next_int(1, 12);
            let diff = rng.next_int(2, 7);
            for i in 0..=SHOWN_TERMS as i64 {
                terms.push(start + diff * i);
            }
        }
        PatternKind::Geometric => {
            let start = rng.next_int(1, 4);
            let ratio = rng.next_int(2, 3);
            let mut v = start;
            for _ in 0..=SHOWN_TERMS {
                terms.push(v);
                v *= ratio;
            }
            terms.truncate(SHOWN_TERMS + 1);
        }
        PatternKind::Squares => {
            let start = rng.next_int(1, 4);
            for i in 0..=SHOWN_TERMS as i64 {
                let n = start + i;
                terms.push(n * n);
            }
        }
        PatternKind::Alternating => {
            let start = rng.next_int(5, 15);
            let up = rng.next_int(4, 9);
            let down = rng.next_int(1, 3);
            let mut v = start;
            for i in 0..=SHOWN_TERMS {
                terms.push(v);
                v = if i % 2 == 0 { v + up } else { v - down };
            }
            terms.truncate(SHOWN_TERMS + 1);
        }
        PatternKind::FibonacciLike => {
            let a = rng.next_int(1, 4);
            let b = rng.next_int(2, 5);
            terms.push(a);
            terms.push(b);
            while terms.len() <= SHOWN_TERMS {
                let n = terms.len();
                terms.push(terms[n - 1] + terms[n - 2]);
            }
        }
    }

    let next = terms[SHOWN_TERMS];
    let shown = terms[..SHOWN_TERMS].to_vec();

    let mut wrongs: Vec<i64> = Vec::new();
    let mut attempts = 0;
    while wrongs.len() < OPTION_COUNT - 1 {
        attempts += 1;
        let candidate = if attempts <= 100 {
            let offset = rng.next_int(1, 8);
            if rng.chance(0.5) { next + offset } else { next - offset }
        } else {
            next + attempts - 100
        };
        if candidate != next && candidate >= 0 && !wrongs.contains(&candidate) {
            wrongs.push(candidate);
        }
    }

    let mut options = wrongs;
    options.push(next);
    let options = rng.shuffle(&options);
    let answer = options.iter().position(|&o| o == next).expect("next present");

    SequenceRound {
        kind,
        terms: shown,
        next,
        options,
        answer,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Sequence solver game logic.
pub struct SequenceSolver {
    round_data: Option<SequenceRound>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl SequenceSolver {
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

impl Default for SequenceSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for SequenceSolver {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Logic,
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
            "kind": round.kind.as_str(),
            "terms": round.terms,
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

    fn test_engine(seed: u32) -> GameEngine<SequenceSolver> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, SequenceSolver::new());
        engine.init();
        engine.start();
        engine
    }

    /// Oracle: recompute the fifth term from the four shown ones.
    fn oracle_next(kind: PatternKind, terms: &[i64]) -> i64 {
        match kind {
            PatternKind::Arithmetic => terms[3] + (terms[1] - terms[0]),
            PatternKind::Geometric => terms[3] * (terms[1] / terms[0]),
            PatternKind::Squares => {
                let root = (terms[0] as f64).sqrt() as i64;
                let n = root + SHOWN_TERMS as i64;
                n * n
            }
            PatternKind::Alternating => {
                // terms[1] -> terms[2] is the down step; index 4 goes down
                let down = terms[1] - terms[2];
                terms[3] - down
            }
            PatternKind::FibonacciLike => terms[2] + terms[3],
        }
    }

    #[test]
    fn test_patterns_match_oracle() {
        let mut rng = SeededRng::new(42);
        for level in 1..=8 {
            for _ in 0..50 {
                let round = generate_round(&mut rng, level);
                assert_eq!(round.terms.len(), SHOWN_TERMS);
                assert_eq!(
                    oracle_next(round.kind, &round.terms),
                    round.next,
                    "{:?} {:?}",
                    round.kind,
                    round.terms
                );
                assert_eq!(round.options[round.answer], round.next);
            }
        }
    }

    #[test]
    fn test_level_gates_pattern_pool() {
        let mut rng = SeededRng::new(7);
        for _ in 0..50 {
            let round = generate_round(&mut rng, 1);
            assert_eq!(round.kind, PatternKind::Arithmetic);
        }
    }

    #[test]
    fn test_correct_answer_scores() {
        let mut engine = test_engine(42);
        let answer = engine.logic().round_data.as_ref().unwrap().answer;
        engine.handle_input(&InputEvent::Select(answer));
        assert!(engine.logic().last_correct);
        assert_eq!(engine.state().score, 110);
    }

    #[test]
    fn test_rounds_advance_level() {
        let mut engine = test_engine(42);
        for _ in 0..ROUNDS_PER_LEVEL {
            let answer = engine.logic().round_data.as_ref().unwrap().answer;
            engine.handle_input(&InputEvent::Select(answer));
            engine.advance(FEEDBACK_DELAY_MS);
        }
        assert_eq!(engine.state().level, 2);
    }
}

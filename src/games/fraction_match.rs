//! Fraction Match
//!
//! A target fraction and four candidate representations (scaled
//! fractions, decimals, percents); exactly one is equivalent. Values are
//! compared as rationals by cross-multiplication, never as floats.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "fraction-match";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 4;

/// Answer options per round.
pub const OPTION_COUNT: usize = 4;

/// Answer clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (6000u64.saturating_sub(level as u64 * 300)).max(3000)
}

/// Denominator pool for a level.
pub fn denominators(level: u32) -> &'static [i64] {
    match level {
        0..=3 => &[2, 3, 4, 5],
        4..=6 => &[2, 3, 4, 5, 6, 8, 10],
        _ => &[3, 4, 5, 6, 8, 10, 12],
    }
}

/// How an option is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    /// `num/den`
    Fraction,
    /// Rounded decimal, e.g. `0.75`
    Decimal,
    /// Rounded percent, e.g. `75%`
    Percent,
}

/// One candidate value.
#[derive(Clone, Debug)]
pub struct FractionOption {
    /// Numerator
    pub num: i64,
    /// Denominator
    pub den: i64,
    /// Display form
    pub repr: Representation,
}

impl FractionOption {
    /// Exact value equality via cross-multiplication.
    pub fn equals(&self, num: i64, den: i64) -> bool {
        self.num * den == num * self.den
    }

    /// Display string for the presentation layer.
    pub fn display(&self) -> String {
        match self.repr {
            Representation::Fraction => format!("{}/{}", self.num, self.den),
            Representation::Decimal => format!("{:.2}", self.num as f64 / self.den as f64),
            Representation::Percent => {
                format!("{:.0}%", 100.0 * self.num as f64 / self.den as f64)
            }
        }
    }
}

/// One round: target fraction plus candidates.
#[derive(Clone, Debug)]
pub struct FractionRound {
    /// Target numerator (reduced)
    pub num: i64,
    /// Target denominator (reduced)
    pub den: i64,
    /// Candidates; exactly one equals the target
    pub options: Vec<FractionOption>,
    /// Index of the equivalent candidate
    pub answer: usize,
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn pick_repr(rng: &mut SeededRng) -> Representation {
    match rng.next_int(0, 2) {
        0 => Representation::Fraction,
        1 => Representation::Decimal,
        _ => Representation::Percent,
    }
}

/// Build one round from the engine's stream.
pub fn generate_round(rng: &mut SeededRng, level: u32) -> FractionRound {
    let dens = denominators(level);
    let den_raw = *rng.pick(dens).expect("denominator pool non-empty");
    let num_raw = rng.next_int(1, den_raw - 1);
    let g = gcd(num_raw, den_raw);
    let (num, den) = (num_raw / g, den_raw / g);

    // The equivalent candidate: a scaled fraction, or the same value in
    // decimal/percent form.
    let repr = pick_repr(rng);
    let correct = match repr {
        Representation::Fraction => {
            let k = rng.next_int(2, 3);
            FractionOption { num: num * k, den: den * k, repr }
        }
        other => FractionOption { num, den, repr: other },
    };

    let mut options: Vec<FractionOption> = vec![correct];
    let mut attempts = 0;
    while options.len() < OPTION_COUNT {
        attempts += 1;
        let (dn, dd) = if attempts <= 200 {
            let dd = *rng.pick(dens).expect("denominator pool non-empty");
            (rng.next_int(1, dd - 1), dd)
        } else {
            // Band exhausted; nudge the target by 1/(2*den) steps
            (num * 2 + attempts - 200, den * 2)
        };
        let distinct_value = dn * den != num * dd
            && options.iter().all(|o| !o.equals(dn, dd));
        if distinct_value {
            let repr = pick_repr(rng);
            options.push(FractionOption { num: dn, den: dd, repr });
        }
    }

    let options = rng.shuffle(&options);
    let answer = options
        .iter()
        .position(|o| o.equals(num, den))
        .expect("equivalent candidate present");

    FractionRound {
        num,
        den,
        options,
        answer,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Fraction match game logic.
pub struct FractionMatch {
    round_data: Option<FractionRound>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl FractionMatch {
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

impl Default for FractionMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for FractionMatch {
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
            "target": format!("{}/{}", round.num, round.den),
            "options": round.options.iter().map(|o| o.display()).collect::<Vec<_>>(),
            "timeRemaining": self.time_remaining,
            "lastCorrect": self.last_correct,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

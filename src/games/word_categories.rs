//! Word Categories
//!
//! Sort a stream of words into their category buckets against the clock.
//! Two buckets early, three from level 4; eight words per level.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::games::wordlists::CATEGORIES;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "word-categories";

const MAX_LEVELS: u32 = 8;

/// Words sorted per level.
pub const ROUNDS_PER_LEVEL: usize = 8;

/// Buckets shown at a level.
pub fn bucket_count(level: u32) -> usize {
    if level >= 4 { 3 } else { 2 }
}

/// Per-word clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (4000u64.saturating_sub(level as u64 * 150)).max(2000)
}

/// A generated sorting level.
#[derive(Clone, Debug)]
pub struct SortLevel {
    /// Indices into [`CATEGORIES`] for each bucket
    pub buckets: Vec<usize>,
    /// `(word, bucket index)` per round, in play order
    pub rounds: Vec<(&'static str, usize)>,
}

/// Choose the buckets and the word stream for a level.
pub fn generate_sort_level(rng: &mut SeededRng, level: u32) -> SortLevel {
    let indices: Vec<usize> = (0..CATEGORIES.len()).collect();
    let buckets = rng.pick_multiple(&indices, bucket_count(level));

    // Pool every word of the chosen categories tagged with its bucket,
    // then deal the level's rounds from a shuffle.
    let pool: Vec<(&'static str, usize)> = buckets
        .iter()
        .enumerate()
        .flat_map(|(bucket, &cat)| {
            CATEGORIES[cat].1.iter().map(move |&word| (word, bucket))
        })
        .collect();
    let rounds = rng.pick_multiple(&pool, ROUNDS_PER_LEVEL);

    SortLevel { buckets, rounds }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Question,
    Feedback,
}

/// Word categories game logic.
pub struct WordCategories {
    level_data: Option<SortLevel>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl WordCategories {
    /// Fresh logic; the first stream is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            level_data: None,
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

impl Default for WordCategories {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for WordCategories {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Language,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.level_data = Some(generate_sort_level(&mut core.rng, level));
        self.round = 1;
        self.time_limit = time_limit_ms(level);
        self.streak = 0;
        self.start_round(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(bucket) = *input else {
            return;
        };
        if self.phase != Phase::Question {
            return;
        }
        let Some(level_data) = &self.level_data else {
            return;
        };
        if bucket >= level_data.buckets.len() {
            return;
        }
        let expected = level_data.rounds[self.round - 1].1;
        self.finish_round(core, bucket == expected);
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
        let Some(level_data) = &self.level_data else {
            return json!({ "phase": "loading" });
        };
        json!({
            "phase": match self.phase {
                Phase::Question => "question",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "roundsPerLevel": ROUNDS_PER_LEVEL,
            "buckets": level_data.buckets.iter()
                .map(|&cat| CATEGORIES[cat].0)
                .collect::<Vec<_>>(),
            "word": level_data.rounds[self.round - 1].0,
            "timeRemaining": self.time_remaining,
            "lastCorrect": self.last_correct,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

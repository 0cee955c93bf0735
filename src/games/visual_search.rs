//! Visual Search
//!
//! A field of near-identical glyphs with a single odd one out; tap the
//! odd glyph before the round clock expires. Four rounds per level with a
//! growing field.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::{FEEDBACK_DELAY_MS, TICK_MS};

/// Registry id.
pub const GAME_ID: &str = "visual-search";

const MAX_LEVELS: u32 = 8;

/// Rounds per level.
pub const ROUNDS_PER_LEVEL: usize = 4;

/// Near-identical glyph pairs (base, odd).
pub const GLYPH_PAIRS: &[(&str, &str)] = &[
    ("O", "Q"), ("E", "F"), ("P", "R"), ("C", "G"), ("I", "l"),
    ("6", "9"), ("M", "W"), ("b", "d"), ("n", "h"), ("v", "y"),
];

/// Field size at a level.
pub fn cell_count(level: u32) -> usize {
    (9 + 3 * level as usize).min(36)
}

/// Round clock for a level (ms).
pub fn time_limit_ms(level: u32) -> u64 {
    (6000u64.saturating_sub(level as u64 * 300)).max(2500)
}

/// A generated search field.
#[derive(Clone, Debug)]
pub struct SearchField {
    /// The repeated glyph
    pub base: &'static str,
    /// The one different glyph
    pub odd: &'static str,
    /// Where the odd glyph hides
    pub odd_index: usize,
    /// Field size
    pub cells: usize,
}

/// Pick the glyph pair and hide the odd one.
pub fn generate_field(rng: &mut SeededRng, level: u32) -> SearchField {
    let cells = cell_count(level);
    let &(base, odd) = rng.pick(GLYPH_PAIRS).expect("glyph pairs non-empty");
    let odd_index = rng.next_int(0, cells as i64 - 1) as usize;
    SearchField {
        base,
        odd,
        odd_index,
        cells,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Searching,
    Feedback,
}

/// Visual search game logic.
pub struct VisualSearch {
    field: Option<SearchField>,
    round: usize,
    phase: Phase,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
    last_correct: bool,
}

impl VisualSearch {
    /// Fresh logic; the first field is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            field: None,
            round: 0,
            phase: Phase::Searching,
            time_limit: 0,
            time_remaining: 0,
            tick_timer: None,
            streak: 0,
            last_correct: false,
        }
    }

    fn start_round(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.field = Some(generate_field(&mut core.rng, level));
        self.phase = Phase::Searching;
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

impl Default for VisualSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for VisualSearch {
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
        let InputEvent::Select(idx) = *input else {
            return;
        };
        if self.phase != Phase::Searching {
            return;
        }
        let Some(field) = &self.field else {
            return;
        };
        if idx >= field.cells {
            return;
        }
        let hit = idx == field.odd_index;
        if hit {
            self.finish_round(core, true);
        } else {
            // A wrong tap costs a life but the search continues
            self.streak = 0;
            core.mistake();
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::Tick => {
                if self.phase != Phase::Searching {
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
        let Some(field) = &self.field else {
            return json!({ "phase": "loading" });
        };
        json!({
            "phase": match self.phase {
                Phase::Searching => "searching",
                Phase::Feedback => "feedback",
            },
            "round": self.round,
            "roundsPerLevel": ROUNDS_PER_LEVEL,
            "cells": (0..field.cells).map(|i| {
                if i == field.odd_index { field.odd } else { field.base }
            }).collect::<Vec<_>>(),
            "timeRemaining": self.time_remaining,
            "lastCorrect": self.last_correct,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

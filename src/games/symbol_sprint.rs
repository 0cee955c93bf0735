//! Symbol Sprint
//!
//! A grid of symbols with a target glyph scattered through it; tap every
//! instance before the clock runs out. The grid grows with the level.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::TICK_MS;

/// Registry id.
pub const GAME_ID: &str = "symbol-sprint";

const MAX_LEVELS: u32 = 8;

/// Distinct symbols in the pool.
pub const SYMBOL_COUNT: usize = 8;

/// Grid cells at a level.
pub fn cell_count(level: u32) -> usize {
    12 + 2 * level as usize
}

/// Target instances hidden in the grid.
pub fn target_count(level: u32) -> usize {
    3 + level as usize / 2
}

/// Round clock for a level (ms); more cells buy more time.
pub fn time_limit_ms(level: u32) -> u64 {
    4000 + cell_count(level) as u64 * 250
}

/// A generated sprint grid.
#[derive(Clone, Debug)]
pub struct SprintGrid {
    /// Symbol per cell
    pub cells: Vec<usize>,
    /// The glyph to hunt
    pub target: usize,
}

/// Build the grid: the target placed at distinct cells, filler elsewhere.
pub fn generate_grid(rng: &mut SeededRng, level: u32) -> SprintGrid {
    let cells = cell_count(level);
    let targets = target_count(level);
    let target = rng.next_int(0, SYMBOL_COUNT as i64 - 1) as usize;

    let positions: Vec<usize> = (0..cells).collect();
    let target_cells = rng.pick_multiple(&positions, targets);

    let grid: Vec<usize> = (0..cells)
        .map(|i| {
            if target_cells.contains(&i) {
                target
            } else {
                // Any non-target filler symbol
                let offset = rng.next_int(1, SYMBOL_COUNT as i64 - 1) as usize;
                (target + offset) % SYMBOL_COUNT
            }
        })
        .collect();

    SprintGrid {
        cells: grid,
        target,
    }
}

/// Symbol sprint game logic.
pub struct SymbolSprint {
    grid: Option<SprintGrid>,
    found: Vec<bool>,
    time_limit: u64,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    streak: u32,
}

impl SymbolSprint {
    /// Fresh logic; the first grid is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            grid: None,
            found: Vec::new(),
            time_limit: 0,
            time_remaining: 0,
            tick_timer: None,
            streak: 0,
        }
    }

    fn deal(&mut self, core: &mut EngineCore) {
        let level = core.level();
        let grid = generate_grid(&mut core.rng, level);
        self.found = vec![false; grid.cells.len()];
        self.grid = Some(grid);
        self.time_limit = time_limit_ms(level);
        self.time_remaining = self.time_limit;
        self.stop_clock(core);
        self.tick_timer = Some(core.schedule_repeating(TICK_MS, TimerAction::Tick));
    }

    fn stop_clock(&mut self, core: &mut EngineCore) {
        if let Some(id) = self.tick_timer.take() {
            core.cancel(id);
        }
    }

    fn remaining_targets(&self) -> usize {
        let Some(grid) = &self.grid else {
            return 0;
        };
        grid.cells
            .iter()
            .zip(&self.found)
            .filter(|(&symbol, &found)| symbol == grid.target && !found)
            .count()
    }
}

impl Default for SymbolSprint {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for SymbolSprint {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Speed,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        self.streak = 0;
        self.deal(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(idx) = *input else {
            return;
        };
        let Some(grid) = &self.grid else {
            return;
        };
        if idx >= grid.cells.len() || self.found[idx] {
            return;
        }

        if grid.cells[idx] == grid.target {
            self.found[idx] = true;
            self.streak += 1;
            let points = 20 + (self.streak * 5).min(25);
            core.correct(points);
            if self.remaining_targets() == 0 {
                self.stop_clock(core);
                let bonus = (50.0 * self.time_remaining as f64 / self.time_limit as f64)
                    .round() as u32;
                core.level_complete(bonus);
            }
        } else {
            self.streak = 0;
            core.mistake();
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        if action != TimerAction::Tick {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(TICK_MS);
        if self.time_remaining == 0 {
            self.stop_clock(core);
            core.mistake();
            if core.is_playing() {
                self.deal(core);
            }
        }
    }

    fn view(&self) -> Value {
        let Some(grid) = &self.grid else {
            return json!({ "phase": "loading" });
        };
        json!({
            "cells": grid.cells,
            "target": grid.target,
            "found": self.found,
            "remaining": self.remaining_targets(),
            "timeRemaining": self.time_remaining,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Grid Deduction
//!
//! Latin-square deduction puzzle (4×4 with 2×2 boxes, 6×6 with 2×3 boxes
//! at higher levels). A fully solved grid is built by backtracking, then
//! cells are removed to form the givens; user fills are checked against
//! the stored solution per cell.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;

/// Registry id.
pub const GAME_ID: &str = "grid-deduction";

const MAX_LEVELS: u32 = 8;

// =============================================================================
// GENERATION (pure)
// =============================================================================

/// Grid geometry for a level: small grids early, 6×6 from level 4.
pub fn grid_spec(level: u32) -> (usize, usize, usize) {
    if level <= 3 {
        (4, 2, 2) // size, box_rows, box_cols
    } else {
        (6, 2, 3)
    }
}

/// Cells removed from the solved grid to form the puzzle.
pub fn cells_to_remove(size: usize, level: u32, difficulty: f64) -> usize {
    let base = if size == 4 { 6 } else { 12 };
    let wanted = base + 2 * (level as usize - 1) + difficulty as usize;
    wanted.min(size * size - size)
}

/// A generated puzzle: the solved grid plus the given mask.
#[derive(Clone, Debug)]
pub struct GridPuzzle {
    /// Grid side length
    pub size: usize,
    /// Box height
    pub box_rows: usize,
    /// Box width
    pub box_cols: usize,
    /// Fully solved grid, row-major, values `1..=size`
    pub solution: Vec<Vec<u8>>,
    /// `true` where the cell is pre-filled for the player
    pub givens: Vec<Vec<bool>>,
}

/// Row/column/box uniqueness check for a candidate placement.
fn placement_valid(
    grid: &[Vec<u8>],
    row: usize,
    col: usize,
    value: u8,
    box_rows: usize,
    box_cols: usize,
) -> bool {
    let size = grid.len();
    for i in 0..size {
        if grid[row][i] == value || grid[i][col] == value {
            return false;
        }
    }
    let br = (row / box_rows) * box_rows;
    let bc = (col / box_cols) * box_cols;
    for r in br..br + box_rows {
        for c in bc..bc + box_cols {
            if grid[r][c] == value {
                return false;
            }
        }
    }
    true
}

/// Row-major backtracking fill with RNG-shuffled candidate order.
///
/// A full valid fill always exists for these box shapes, so this returns
/// true from the top-level call.
fn fill_grid(
    grid: &mut Vec<Vec<u8>>,
    idx: usize,
    rng: &mut SeededRng,
    box_rows: usize,
    box_cols: usize,
) -> bool {
    let size = grid.len();
    if idx == size * size {
        return true;
    }
    let row = idx / size;
    let col = idx % size;

    let digits: Vec<u8> = (1..=size as u8).collect();
    for value in rng.shuffle(&digits) {
        if placement_valid(grid, row, col, value, box_rows, box_cols) {
            grid[row][col] = value;
            if fill_grid(grid, idx + 1, rng, box_rows, box_cols) {
                return true;
            }
            grid[row][col] = 0;
        }
    }
    false
}

/// Build the puzzle for `(level, difficulty)` from the engine's stream.
pub fn generate_puzzle(rng: &mut SeededRng, level: u32, difficulty: f64) -> GridPuzzle {
    let (size, box_rows, box_cols) = grid_spec(level);

    let mut solution = vec![vec![0u8; size]; size];
    let filled = fill_grid(&mut solution, 0, rng, box_rows, box_cols);
    debug_assert!(filled, "a {size}x{size} latin square fill always exists");

    let mut givens = vec![vec![true; size]; size];
    let all_cells: Vec<usize> = (0..size * size).collect();
    let removed = rng.pick_multiple(&all_cells, cells_to_remove(size, level, difficulty));
    for cell in removed {
        givens[cell / size][cell % size] = false;
    }

    GridPuzzle {
        size,
        box_rows,
        box_cols,
        solution,
        givens,
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// One editable cell as the player sees it.
#[derive(Clone, Copy, Debug, Default)]
struct CellState {
    value: Option<u8>,
    given: bool,
    is_error: bool,
}

/// Grid deduction game logic.
pub struct GridDeduction {
    puzzle: Option<GridPuzzle>,
    cells: Vec<Vec<CellState>>,
}

impl GridDeduction {
    /// Fresh logic; the first puzzle is built on `start()`.
    pub fn new() -> Self {
        Self {
            puzzle: None,
            cells: Vec::new(),
        }
    }

    fn is_solved(&self) -> bool {
        let Some(puzzle) = &self.puzzle else {
            return false;
        };
        self.cells.iter().enumerate().all(|(r, row)| {
            row.iter()
                .enumerate()
                .all(|(c, cell)| cell.value == Some(puzzle.solution[r][c]))
        })
    }
}

impl Default for GridDeduction {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for GridDeduction {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Logic,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        let difficulty = core.difficulty();
        let puzzle = generate_puzzle(&mut core.rng, level, difficulty);

        self.cells = (0..puzzle.size)
            .map(|r| {
                (0..puzzle.size)
                    .map(|c| CellState {
                        value: puzzle.givens[r][c].then_some(puzzle.solution[r][c]),
                        given: puzzle.givens[r][c],
                        is_error: false,
                    })
                    .collect()
            })
            .collect();
        self.puzzle = Some(puzzle);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let Some(puzzle) = &self.puzzle else {
            return;
        };
        let size = puzzle.size;

        match *input {
            InputEvent::Place { row, col, value } => {
                if row >= size || col >= size || value == 0 || value as usize > size {
                    return;
                }
                if self.cells[row][col].given {
                    return;
                }
                let expected = puzzle.solution[row][col];
                self.cells[row][col].value = Some(value);
                if value == expected {
                    self.cells[row][col].is_error = false;
                    core.correct(0);
                    if self.is_solved() {
                        let bonus = core.state().lives * 25;
                        core.level_complete(bonus);
                    }
                } else {
                    // Wrong digit: marked, costs a life, stays editable.
                    self.cells[row][col].is_error = true;
                    core.mistake();
                }
            }
            InputEvent::Erase { row, col } => {
                if row >= size || col >= size || self.cells[row][col].given {
                    return;
                }
                self.cells[row][col].value = None;
                self.cells[row][col].is_error = false;
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, _core: &mut EngineCore, _action: TimerAction) {}

    fn view(&self) -> Value {
        let Some(puzzle) = &self.puzzle else {
            return json!({ "phase": "loading" });
        };
        json!({
            "size": puzzle.size,
            "boxRows": puzzle.box_rows,
            "boxCols": puzzle.box_cols,
            "cells": self.cells.iter().map(|row| {
                row.iter().map(|cell| json!({
                    "value": cell.value,
                    "given": cell.given,
                    "isError": cell.is_error,
                })).collect::<Vec<_>>()
            }).collect::<Vec<_>>(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Memory Match
//!
//! Classic pairs: a shuffled layout of face-down symbol pairs. Two flips
//! either match (and stay solved) or flip back after a short delay. Fewer
//! moves means a bigger completion bonus; mismatches never cost lives.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;

/// Registry id.
pub const GAME_ID: &str = "memory-match";

const MAX_LEVELS: u32 = 6;

/// Delay before a mismatched pair flips back (ms).
const FLIP_BACK_MS: u64 = 800;

/// Symbol pool (indices into the presentation's glyph table).
pub const SYMBOL_POOL: usize = 12;

/// Pairs dealt at a level.
pub fn pair_count(level: u32) -> usize {
    (4 + level as usize).min(10)
}

/// Deal the shuffled board: each symbol appears exactly twice.
pub fn generate_board(rng: &mut SeededRng, level: u32) -> Vec<usize> {
    let symbols: Vec<usize> = (0..SYMBOL_POOL).collect();
    let chosen = rng.pick_multiple(&symbols, pair_count(level));
    let mut board: Vec<usize> = chosen.iter().chain(chosen.iter()).copied().collect();
    board = rng.shuffle(&board);
    board
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CardState {
    symbol: usize,
    face_up: bool,
    matched: bool,
}

/// Memory match game logic.
pub struct MemoryMatch {
    cards: Vec<CardState>,
    /// Indices currently face-up and unresolved (0..=2)
    open: Vec<usize>,
    /// True while a mismatched pair is waiting to flip back
    busy: bool,
    moves: u32,
}

impl MemoryMatch {
    /// Fresh logic; the first board is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            open: Vec::new(),
            busy: false,
            moves: 0,
        }
    }

    fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }
}

impl Default for MemoryMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for MemoryMatch {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Memory,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.cards = generate_board(&mut core.rng, level)
            .into_iter()
            .map(|symbol| CardState {
                symbol,
                face_up: false,
                matched: false,
            })
            .collect();
        self.open.clear();
        self.busy = false;
        self.moves = 0;
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Select(idx) = *input else {
            return;
        };
        if self.busy || idx >= self.cards.len() {
            return;
        }
        if self.cards[idx].matched || self.cards[idx].face_up {
            return;
        }

        self.cards[idx].face_up = true;
        self.open.push(idx);
        if self.open.len() < 2 {
            return;
        }

        self.moves += 1;
        let (a, b) = (self.open[0], self.open[1]);
        if self.cards[a].symbol == self.cards[b].symbol {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
            self.open.clear();
            core.correct(25);
            if self.all_matched() {
                let pairs = (self.cards.len() / 2) as u32;
                let bonus = (pairs * 20).saturating_sub(self.moves * 5);
                core.level_complete(bonus);
            }
        } else {
            self.busy = true;
            core.schedule(FLIP_BACK_MS, TimerAction::Feedback);
        }
    }

    fn on_timer(&mut self, _core: &mut EngineCore, action: TimerAction) {
        if action != TimerAction::Feedback || !self.busy {
            return;
        }
        for &idx in &self.open {
            self.cards[idx].face_up = false;
        }
        self.open.clear();
        self.busy = false;
    }

    fn view(&self) -> Value {
        json!({
            "cards": self.cards.iter().map(|c| json!({
                "symbol": if c.face_up || c.matched { Some(c.symbol) } else { None },
                "faceUp": c.face_up,
                "matched": c.matched,
            })).collect::<Vec<_>>(),
            "moves": self.moves,
            "busy": self.busy,
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

    fn test_engine(seed: u32) -> GameEngine<MemoryMatch> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, MemoryMatch::new());
        engine.init();
        engine.start();
        engine
    }

    #[test]
    fn test_board_has_exact_pairs() {
        let mut rng = SeededRng::new(42);
        for level in 1..=6 {
            let board = generate_board(&mut rng, level);
            assert_eq!(board.len(), pair_count(level) * 2);
            let mut counts = std::collections::HashMap::new();
            for s in board {
                *counts.entry(s).or_insert(0) += 1;
            }
            assert!(counts.values().all(|&c| c == 2));
        }
    }

    fn find_pair(engine: &GameEngine<MemoryMatch>) -> (usize, usize) {
        let cards = &engine.logic().cards;
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                if cards[i].symbol == cards[j].symbol {
                    return (i, j);
                }
            }
        }
        unreachable!("a pair always exists")
    }

    fn find_mismatch(engine: &GameEngine<MemoryMatch>) -> (usize, usize) {
        let cards = &engine.logic().cards;
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                if cards[i].symbol != cards[j].symbol {
                    return (i, j);
                }
            }
        }
        unreachable!("a mismatch always exists")
    }

    #[test]
    fn test_match_stays_and_scores() {
        let mut engine = test_engine(42);
        let (a, b) = find_pair(&engine);
        engine.handle_input(&InputEvent::Select(a));
        engine.handle_input(&InputEvent::Select(b));
        assert!(engine.logic().cards[a].matched);
        assert!(engine.logic().cards[b].matched);
        assert_eq!(engine.state().score, 25);
        assert_eq!(engine.state().lives, 3);
    }

    #[test]
    fn test_mismatch_flips_back_without_penalty() {
        let mut engine = test_engine(42);
        let (a, b) = find_mismatch(&engine);
        engine.handle_input(&InputEvent::Select(a));
        engine.handle_input(&InputEvent::Select(b));
        assert!(engine.logic().busy);

        // Further taps are ignored while waiting
        let (c, _) = find_pair(&engine);
        engine.handle_input(&InputEvent::Select(c));
        assert!(engine.logic().open.len() <= 2);

        engine.advance(FLIP_BACK_MS);
        assert!(!engine.logic().cards[a].face_up);
        assert!(!engine.logic().cards[b].face_up);
        assert!(!engine.logic().busy);
        assert_eq!(engine.state().lives, 3);
    }

    #[test]
    fn test_clearing_board_advances_level() {
        let mut engine = test_engine(42);
        // Solve with perfect information
        loop {
            if engine.state().level != 1 {
                break;
            }
            let (a, b) = find_unmatched_pair(&engine);
            engine.handle_input(&InputEvent::Select(a));
            engine.handle_input(&InputEvent::Select(b));
        }
        assert_eq!(engine.state().level, 2);
    }

    fn find_unmatched_pair(engine: &GameEngine<MemoryMatch>) -> (usize, usize) {
        let cards = &engine.logic().cards;
        for i in 0..cards.len() {
            if cards[i].matched {
                continue;
            }
            for j in i + 1..cards.len() {
                if !cards[j].matched && cards[i].symbol == cards[j].symbol {
                    return (i, j);
                }
            }
        }
        unreachable!("unmatched pair exists while level incomplete")
    }
}

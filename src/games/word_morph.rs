//! Word Morph
//!
//! Word-ladder game over the fixed 4-letter dictionary. Level generation
//! searches for a start/target pair at an exact breadth-first distance in
//! the one-letter-substitution graph; the player transforms the start
//! word one valid move at a time.

use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;
use crate::games::wordlists::WORDS_4;

/// Registry id.
pub const GAME_ID: &str = "word-morph";

const MAX_LEVELS: u32 = 6;

/// Known-good pair used when the search comes up empty:
/// cold -> cord -> word -> ward -> warm.
const FALLBACK: (&str, &str, u32) = ("cold", "warm", 4);

// =============================================================================
// GENERATION (pure)
// =============================================================================

/// True if the words differ in exactly one position.
pub fn differs_by_one(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count() == 1
}

/// BFS distances from `start` to every dictionary word.
///
/// Returns one entry per dictionary index; `u32::MAX` marks unreachable.
fn bfs_distances(start: &str, dict: &[&str]) -> Vec<u32> {
    let mut dist = vec![u32::MAX; dict.len()];
    let Some(start_idx) = dict.iter().position(|w| *w == start) else {
        return dist;
    };
    dist[start_idx] = 0;
    let mut queue = VecDeque::from([start_idx]);

    while let Some(idx) = queue.pop_front() {
        let d = dist[idx];
        for (j, word) in dict.iter().enumerate() {
            if dist[j] == u32::MAX && differs_by_one(dict[idx], word) {
                dist[j] = d + 1;
                queue.push_back(j);
            }
        }
    }
    dist
}

/// A generated ladder: endpoints plus the shortest-path length.
#[derive(Clone, Debug)]
pub struct MorphPuzzle {
    /// Starting word
    pub start: String,
    /// Word to reach
    pub target: String,
    /// BFS distance between the two
    pub optimal_steps: u32,
}

/// Search for a pair at the level's target distance; fall back to the
/// known-good ladder after 50 failed attempts.
pub fn generate_pair(rng: &mut SeededRng, level: u32) -> MorphPuzzle {
    let target_steps = (2 + level / 2).min(5);

    for _ in 0..50 {
        let start = *rng.pick(WORDS_4).expect("dictionary is non-empty");
        let dist = bfs_distances(start, WORDS_4);
        let candidates: Vec<usize> = (0..WORDS_4.len())
            .filter(|&i| dist[i] == target_steps)
            .collect();
        if let Some(&target_idx) = rng.pick(&candidates) {
            return MorphPuzzle {
                start: start.to_string(),
                target: WORDS_4[target_idx].to_string(),
                optimal_steps: target_steps,
            };
        }
    }

    MorphPuzzle {
        start: FALLBACK.0.to_string(),
        target: FALLBACK.1.to_string(),
        optimal_steps: FALLBACK.2,
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Feedback tag for the last submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveFeedback {
    None,
    Accepted,
    NotAWord,
    NotOneLetter,
    AlreadyUsed,
}

impl MoveFeedback {
    fn as_str(self) -> &'static str {
        match self {
            MoveFeedback::None => "none",
            MoveFeedback::Accepted => "accepted",
            MoveFeedback::NotAWord => "not_a_word",
            MoveFeedback::NotOneLetter => "not_one_letter",
            MoveFeedback::AlreadyUsed => "already_used",
        }
    }
}

/// Word morph game logic.
pub struct WordMorph {
    puzzle: Option<MorphPuzzle>,
    /// Move chain including the start word
    chain: Vec<String>,
    feedback: MoveFeedback,
}

impl WordMorph {
    /// Fresh logic; the first ladder is built on `start()`.
    pub fn new() -> Self {
        Self {
            puzzle: None,
            chain: Vec::new(),
            feedback: MoveFeedback::None,
        }
    }

    fn current(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or("")
    }
}

impl Default for WordMorph {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for WordMorph {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Language,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        let puzzle = generate_pair(&mut core.rng, level);
        self.chain = vec![puzzle.start.clone()];
        self.feedback = MoveFeedback::None;
        self.puzzle = Some(puzzle);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Submit(word) = input else {
            return;
        };
        let Some(puzzle) = &self.puzzle else {
            return;
        };
        let word = word.to_ascii_lowercase();

        if !WORDS_4.contains(&word.as_str()) {
            self.feedback = MoveFeedback::NotAWord;
            return;
        }
        if !differs_by_one(self.current(), &word) {
            self.feedback = MoveFeedback::NotOneLetter;
            return;
        }
        if self.chain.contains(&word) {
            self.feedback = MoveFeedback::AlreadyUsed;
            return;
        }

        let reached_target = word == puzzle.target;
        let optimal = puzzle.optimal_steps;
        self.chain.push(word);
        self.feedback = MoveFeedback::Accepted;
        core.correct(0);

        if reached_target {
            // Efficiency bonus rewards near-optimal ladders.
            let actual = (self.chain.len() - 1) as u32;
            let bonus = (100.0 * optimal as f64 / actual as f64).round() as u32;
            core.level_complete(bonus);
        }
    }

    fn on_timer(&mut self, _core: &mut EngineCore, _action: TimerAction) {}

    fn view(&self) -> Value {
        let Some(puzzle) = &self.puzzle else {
            return json!({ "phase": "loading" });
        };
        json!({
            "start": puzzle.start,
            "target": puzzle.target,
            "optimalSteps": puzzle.optimal_steps,
            "current": self.current(),
            "chain": self.chain,
            "feedback": self.feedback.as_str(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

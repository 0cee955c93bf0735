//! Anagram Blitz
//!
//! Timed anagram hunt. A letter rack is built from a curated seed word
//! padded to the level's minimum length; every findable word (dictionary
//! words whose letter multiset fits the rack) is precomputed once per
//! level. Reaching the target count before the clock runs out clears the
//! level.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameCategory;
use crate::engine::timer::{TimerAction, TimerId};
use crate::engine::engine::GameLogic;
use crate::games::wordlists::{ANAGRAM_DICT, ANAGRAM_SEEDS, CONSONANTS, VOWELS};
use crate::TICK_MS;

/// Registry id.
pub const GAME_ID: &str = "anagram-blitz";

const MAX_LEVELS: u32 = 6;

/// Round clock (ms).
const ROUND_TIME_MS: u64 = 60_000;

/// Points by word length; exponential doubling from 3 letters up.
const SCORE_BY_LEN: [u32; 9] = [0, 0, 0, 100, 200, 400, 800, 1600, 3200];

// =============================================================================
// GENERATION (pure)
// =============================================================================

/// Letter histogram over a-z.
fn letter_counts(word: &str) -> [u8; 26] {
    let mut counts = [0u8; 26];
    for b in word.bytes() {
        counts[(b - b'a') as usize] += 1;
    }
    counts
}

/// True if `word`'s letters fit inside the rack histogram.
pub fn fits_rack(word: &str, rack: &[u8; 26]) -> bool {
    let mut remaining = *rack;
    word.bytes().all(|b| {
        let i = (b - b'a') as usize;
        if remaining[i] == 0 {
            false
        } else {
            remaining[i] -= 1;
            true
        }
    })
}

/// A generated rack with its full answer space.
#[derive(Clone, Debug)]
pub struct AnagramPuzzle {
    /// Rack letters in display order
    pub letters: Vec<char>,
    /// Every dictionary word findable in the rack
    pub possible: Vec<String>,
    /// Words needed to clear the level
    pub target: usize,
}

/// Build the rack and precompute its answer space.
pub fn generate_rack(rng: &mut SeededRng, level: u32) -> AnagramPuzzle {
    let min_len = (6 + (level as usize - 1) / 2).min(8);

    let seed = *rng.pick(ANAGRAM_SEEDS).expect("seed list is non-empty");
    let mut letters: Vec<char> = seed.chars().collect();
    while letters.len() < min_len {
        let letter = if rng.chance(0.6) {
            *rng.pick(VOWELS).expect("vowels")
        } else {
            *rng.pick(CONSONANTS).expect("consonants")
        };
        letters.push(letter);
    }
    let letters = rng.shuffle(&letters);

    let rack: String = letters.iter().collect();
    let counts = letter_counts(&rack);
    let possible: Vec<String> = ANAGRAM_DICT
        .iter()
        .filter(|w| w.len() >= 3 && fits_rack(w, &counts))
        .map(|w| w.to_string())
        .collect();
    let target = 3.max(possible.len() / 5);

    AnagramPuzzle {
        letters,
        possible,
        target,
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Feedback tag for the last submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WordFeedback {
    None,
    Accepted,
    TooShort,
    Duplicate,
    NotAWord,
    TimeUp,
}

impl WordFeedback {
    fn as_str(self) -> &'static str {
        match self {
            WordFeedback::None => "none",
            WordFeedback::Accepted => "accepted",
            WordFeedback::TooShort => "too_short",
            WordFeedback::Duplicate => "duplicate",
            WordFeedback::NotAWord => "not_a_word",
            WordFeedback::TimeUp => "time_up",
        }
    }
}

/// Anagram blitz game logic.
pub struct AnagramBlitz {
    puzzle: Option<AnagramPuzzle>,
    found: Vec<String>,
    time_remaining: u64,
    tick_timer: Option<TimerId>,
    feedback: WordFeedback,
}

impl AnagramBlitz {
    /// Fresh logic; the first rack is dealt on `start()`.
    pub fn new() -> Self {
        Self {
            puzzle: None,
            found: Vec::new(),
            time_remaining: 0,
            tick_timer: None,
            feedback: WordFeedback::None,
        }
    }

    fn deal(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.puzzle = Some(generate_rack(&mut core.rng, level));
        self.found.clear();
        self.time_remaining = ROUND_TIME_MS;
        self.feedback = WordFeedback::None;
        if let Some(id) = self.tick_timer.take() {
            core.cancel(id);
        }
        self.tick_timer = Some(core.schedule_repeating(TICK_MS, TimerAction::Tick));
    }

    fn stop_clock(&mut self, core: &mut EngineCore) {
        if let Some(id) = self.tick_timer.take() {
            core.cancel(id);
        }
    }
}

impl Default for AnagramBlitz {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for AnagramBlitz {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Language,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        self.deal(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let InputEvent::Submit(word) = input else {
            return;
        };
        let Some(puzzle) = &self.puzzle else {
            return;
        };
        let word = word.to_ascii_lowercase();

        if word.len() < 3 {
            self.feedback = WordFeedback::TooShort;
            return;
        }
        if self.found.contains(&word) {
            self.feedback = WordFeedback::Duplicate;
            return;
        }
        if !puzzle.possible.contains(&word) {
            self.feedback = WordFeedback::NotAWord;
            return;
        }

        let target = puzzle.target;
        let points = SCORE_BY_LEN[word.len().min(8)];
        self.found.push(word);
        self.feedback = WordFeedback::Accepted;
        core.correct(points);

        if self.found.len() >= target {
            self.stop_clock(core);
            core.level_complete(0);
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        if action != TimerAction::Tick {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(TICK_MS);
        if self.time_remaining == 0 {
            // Clock ran out short of the target: costs a life, fresh rack.
            self.stop_clock(core);
            self.feedback = WordFeedback::TimeUp;
            core.mistake();
            if core.is_playing() {
                self.deal(core);
            }
        }
    }

    fn view(&self) -> Value {
        let Some(puzzle) = &self.puzzle else {
            return json!({ "phase": "loading" });
        };
        json!({
            "letters": puzzle.letters,
            "found": self.found,
            "foundCount": self.found.len(),
            "target": puzzle.target,
            "possibleCount": puzzle.possible.len(),
            "timeRemaining": self.time_remaining,
            "feedback": self.feedback.as_str(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

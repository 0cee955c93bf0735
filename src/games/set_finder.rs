//! Set Finder
//!
//! "Set"-style card matching. Cards have four attributes with three
//! values each (81 distinct cards); a triple is a valid set iff every
//! attribute is all-same or all-different across the three cards. Deals
//! are re-drawn until they contain the level's required number of sets.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::{InputAction, InputEvent};
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;

/// Registry id.
pub const GAME_ID: &str = "set-finder";

const MAX_LEVELS: u32 = 6;

/// Full deck size: 3 shapes x 3 colors x 3 counts x 3 fills.
pub const DECK_SIZE: u8 = 81;

// =============================================================================
// CARD MODEL
// =============================================================================

/// Attribute values of a card id (base-3 digits).
#[inline]
pub fn card_attrs(id: u8) -> [u8; 4] {
    [id % 3, (id / 3) % 3, (id / 9) % 3, (id / 27) % 3]
}

/// The set rule: each attribute all-same or all-distinct.
pub fn is_valid_set(a: u8, b: u8, c: u8) -> bool {
    let (aa, ba, ca) = (card_attrs(a), card_attrs(b), card_attrs(c));
    (0..4).all(|i| {
        let (x, y, z) = (aa[i], ba[i], ca[i]);
        (x == y && y == z) || (x != y && y != z && x != z)
    })
}

/// Enumerate every valid set in a deal by brute force (O(n³)).
///
/// Triples come back id-sorted, and the list is in deal order, so equal
/// deals always produce the identical list.
pub fn find_all_sets(cards: &[u8]) -> Vec<[u8; 3]> {
    let mut sets = Vec::new();
    for i in 0..cards.len() {
        for j in i + 1..cards.len() {
            for k in j + 1..cards.len() {
                if is_valid_set(cards[i], cards[j], cards[k]) {
                    let mut triple = [cards[i], cards[j], cards[k]];
                    triple.sort();
                    sets.push(triple);
                }
            }
        }
    }
    sets
}

/// A dealt hand plus its precomputed sets.
#[derive(Clone, Debug)]
pub struct SetDeal {
    /// Face-up card ids
    pub cards: Vec<u8>,
    /// Every valid set, id-sorted triples
    pub valid_sets: Vec<[u8; 3]>,
    /// Sets the player must find this level
    pub required: u32,
}

/// Deal until the hand holds at least the level's required sets
/// (up to 100 attempts; the richest attempt wins otherwise).
pub fn generate_deal(rng: &mut SeededRng, level: u32) -> SetDeal {
    let deal_size = 9 + 3 * ((level as usize - 1) / 2);
    let required = 2 + level / 2;
    let deck: Vec<u8> = (0..DECK_SIZE).collect();

    let mut best: Option<SetDeal> = None;
    for _ in 0..100 {
        let cards = rng.pick_multiple(&deck, deal_size);
        let valid_sets = find_all_sets(&cards);
        if valid_sets.len() as u32 >= required {
            return SetDeal {
                cards,
                valid_sets,
                required,
            };
        }
        if best
            .as_ref()
            .map(|b| valid_sets.len() > b.valid_sets.len())
            .unwrap_or(true)
        {
            best = Some(SetDeal {
                cards,
                valid_sets,
                required,
            });
        }
    }

    // Exhausted the attempt budget: play the richest deal we saw.
    let mut deal = best.expect("at least one attempt ran");
    deal.required = required.min(deal.valid_sets.len() as u32).max(1);
    deal
}

// =============================================================================
// ENGINE
// =============================================================================

/// Feedback tag for the last selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetFeedback {
    None,
    Correct,
    Wrong,
    AlreadyFound,
}

impl SetFeedback {
    fn as_str(self) -> &'static str {
        match self {
            SetFeedback::None => "none",
            SetFeedback::Correct => "correct",
            SetFeedback::Wrong => "wrong",
            SetFeedback::AlreadyFound => "already_found",
        }
    }
}

/// Set finder game logic.
pub struct SetFinder {
    deal: Option<SetDeal>,
    /// Sets remaining to be claimed this level
    remaining: Vec<[u8; 3]>,
    selected: Vec<u8>,
    sets_found: u32,
    streak: u32,
    hint_used: bool,
    hint_card: Option<u8>,
    feedback: SetFeedback,
}

impl SetFinder {
    /// Fresh logic; the first deal happens on `start()`.
    pub fn new() -> Self {
        Self {
            deal: None,
            remaining: Vec::new(),
            selected: Vec::new(),
            sets_found: 0,
            streak: 0,
            hint_used: false,
            hint_card: None,
            feedback: SetFeedback::None,
        }
    }

    fn resolve_selection(&mut self, core: &mut EngineCore) {
        let mut triple = [self.selected[0], self.selected[1], self.selected[2]];
        triple.sort();
        self.selected.clear();

        if let Some(pos) = self.remaining.iter().position(|s| *s == triple) {
            self.remaining.remove(pos);
            self.sets_found += 1;
            self.streak += 1;
            let mut points = 100 + (self.streak * 20).min(100);
            if self.hint_used {
                points /= 2;
            }
            self.feedback = SetFeedback::Correct;
            core.correct(points);

            let required = self.deal.as_ref().map(|d| d.required).unwrap_or(0);
            if self.sets_found >= required {
                core.level_complete(0);
            }
        } else if is_valid_set(triple[0], triple[1], triple[2]) {
            // A real set, but one that was already claimed this level.
            self.feedback = SetFeedback::AlreadyFound;
        } else {
            self.feedback = SetFeedback::Wrong;
            self.streak = 0;
            core.mistake();
        }
    }
}

impl Default for SetFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for SetFinder {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Logic,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        let level = core.level();
        let deal = generate_deal(&mut core.rng, level);
        self.remaining = deal.valid_sets.clone();
        self.deal = Some(deal);
        self.selected.clear();
        self.sets_found = 0;
        self.streak = 0;
        self.hint_used = false;
        self.hint_card = None;
        self.feedback = SetFeedback::None;
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        let Some(deal) = &self.deal else {
            return;
        };

        match input {
            InputEvent::Select(idx) => {
                let Some(&card) = deal.cards.get(*idx) else {
                    return;
                };
                if let Some(pos) = self.selected.iter().position(|&c| c == card) {
                    self.selected.remove(pos);
                    return;
                }
                self.selected.push(card);
                if self.selected.len() == 3 {
                    self.resolve_selection(core);
                }
            }
            InputEvent::Action(InputAction::Hint) => {
                if !self.hint_used {
                    if let Some(set) = self.remaining.first() {
                        self.hint_used = true;
                        self.hint_card = Some(set[0]);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, _core: &mut EngineCore, _action: TimerAction) {}

    fn view(&self) -> Value {
        let Some(deal) = &self.deal else {
            return json!({ "phase": "loading" });
        };
        json!({
            "cards": deal.cards.iter().map(|&id| {
                let attrs = card_attrs(id);
                json!({
                    "id": id,
                    "shape": attrs[0],
                    "color": attrs[1],
                    "count": attrs[2],
                    "fill": attrs[3],
                })
            }).collect::<Vec<_>>(),
            "selected": self.selected,
            "setsFound": self.sets_found,
            "required": deal.required,
            "hintCard": self.hint_card,
            "feedback": self.feedback.as_str(),
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

    #[test]
    fn test_card_attrs_cover_deck() {
        // 81 ids decode to 81 distinct attribute tuples
        let mut seen = std::collections::HashSet::new();
        for id in 0..DECK_SIZE {
            assert!(seen.insert(card_attrs(id)));
            assert!(card_attrs(id).iter().all(|&a| a < 3));
        }
        assert_eq!(seen.len(), 81);
    }

    #[test]
    fn test_set_rule_examples() {
        // All four attributes identical except one varying: 0,1,2 in the
        // first attribute, rest equal -> valid
        assert!(is_valid_set(0, 1, 2));
        // Two equal, one different in the first attribute -> invalid
        assert!(!is_valid_set(0, 0, 1));
        // Every attribute all-different: 0, 40, 80 (base-3: 0000,1111,2222)
        assert!(is_valid_set(0, 40, 80));
    }

    #[test]
    fn test_set_rule_against_oracle() {
        // Property check vs an attribute-wise oracle over random triples.
        let mut rng = SeededRng::new(4242);
        for _ in 0..2000 {
            let a = rng.next_int(0, 80) as u8;
            let b = rng.next_int(0, 80) as u8;
            let c = rng.next_int(0, 80) as u8;
            if a == b || b == c || a == c {
                continue;
            }
            let oracle = (0..4).all(|i| {
                let vals = [card_attrs(a)[i], card_attrs(b)[i], card_attrs(c)[i]];
                let distinct = vals[0] != vals[1] && vals[1] != vals[2] && vals[0] != vals[2];
                let same = vals[0] == vals[1] && vals[1] == vals[2];
                distinct || same
            });
            assert_eq!(is_valid_set(a, b, c), oracle);
        }
    }

    #[test]
    fn test_third_card_completes_any_pair() {
        // Classic property: every pair has exactly one completing card.
        for a in 0..10u8 {
            for b in (a + 1)..20u8 {
                let completions = (0..DECK_SIZE)
                    .filter(|&c| c != a && c != b && is_valid_set(a, b, c))
                    .count();
                assert_eq!(completions, 1, "pair ({a},{b})");
            }
        }
    }

    #[test]
    fn test_generated_deal_meets_requirement() {
        for seed in [1u32, 42, 1234] {
            let mut rng = SeededRng::new(seed);
            for level in 1..=6 {
                let deal = generate_deal(&mut rng, level);
                assert!(deal.valid_sets.len() as u32 >= deal.required);
                assert!(deal.required >= 1);
                // Each listed set is valid and id-sorted
                for set in &deal.valid_sets {
                    assert!(is_valid_set(set[0], set[1], set[2]));
                    assert!(set[0] < set[1] && set[1] < set[2]);
                }
            }
        }
    }

    fn test_engine(seed: u32) -> GameEngine<SetFinder> {
        let config = GameConfig::with_seed(
            GAME_ID,
            seed,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let mut engine = GameEngine::new(config, SetFinder::new());
        engine.init();
        engine.start();
        engine
    }

    fn index_of(engine: &GameEngine<SetFinder>, card: u8) -> usize {
        engine
            .logic()
            .deal
            .as_ref()
            .unwrap()
            .cards
            .iter()
            .position(|&c| c == card)
            .unwrap()
    }

    #[test]
    fn test_selecting_valid_set_scores_and_removes() {
        let mut engine = test_engine(42);
        let set = engine.logic().remaining[0];
        let score_before = engine.state().score;

        for card in set {
            let idx = index_of(&engine, card);
            engine.handle_input(&InputEvent::Select(idx));
        }

        assert_eq!(engine.logic().feedback, SetFeedback::Correct);
        assert_eq!(engine.logic().sets_found, 1);
        assert!(!engine.logic().remaining.contains(&set));
        // 100 base + 20 streak bonus
        assert_eq!(engine.state().score, score_before + 120);
        assert!(engine.logic().selected.is_empty());
    }

    #[test]
    fn test_selecting_invalid_triple_costs_life() {
        let mut engine = test_engine(42);

        // Build a non-set triple from the deal: take a valid set's first
        // two cards plus any card that does not complete it.
        let (a, b) = {
            let set = engine.logic().remaining[0];
            (set[0], set[1])
        };
        let spoiler = {
            let deal = engine.logic().deal.as_ref().unwrap();
            *deal
                .cards
                .iter()
                .find(|&&c| c != a && c != b && !is_valid_set(a, b, c))
                .expect("a non-completing card exists in any 9+ card deal")
        };

        for card in [a, b, spoiler] {
            let idx = index_of(&engine, card);
            engine.handle_input(&InputEvent::Select(idx));
        }

        assert_eq!(engine.logic().feedback, SetFeedback::Wrong);
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.logic().sets_found, 0);
    }

    #[test]
    fn test_deselect_toggles() {
        let mut engine = test_engine(7);
        engine.handle_input(&InputEvent::Select(0));
        assert_eq!(engine.logic().selected.len(), 1);
        engine.handle_input(&InputEvent::Select(0));
        assert!(engine.logic().selected.is_empty());
    }

    #[test]
    fn test_hint_marks_a_live_set_card() {
        let mut engine = test_engine(7);
        engine.handle_input(&InputEvent::Action(InputAction::Hint));
        let hint = engine.logic().hint_card.expect("hint set");
        assert!(engine
            .logic()
            .remaining
            .iter()
            .any(|set| set.contains(&hint)));
        assert!(engine.logic().hint_used);
    }
}

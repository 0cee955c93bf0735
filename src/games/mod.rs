//! The Game Catalog
//!
//! One module per game plus the registry mapping a `GameConfig` to a
//! boxed engine. Ids are stable; the published daily challenges hash
//! them into the seed stream.

pub mod wordlists;

pub mod anagram_blitz;
pub mod color_clash;
pub mod estimation_station;
pub mod fraction_match;
pub mod grid_deduction;
pub mod memory_match;
pub mod number_chain;
pub mod number_memory;
pub mod pattern_echo;
pub mod quick_calc;
pub mod reaction_rush;
pub mod sequence_solver;
pub mod set_finder;
pub mod spatial_recall;
pub mod speed_match;
pub mod symbol_sprint;
pub mod target_tracker;
pub mod visual_search;
pub mod word_categories;
pub mod word_morph;

use crate::core::difficulty::GameConfig;
use crate::engine::engine::{Engine, GameEngine};
use crate::engine::error::EngineError;

/// Every playable game id, in catalog order.
pub const GAME_IDS: [&str; 20] = [
    grid_deduction::GAME_ID,
    word_morph::GAME_ID,
    set_finder::GAME_ID,
    anagram_blitz::GAME_ID,
    number_memory::GAME_ID,
    spatial_recall::GAME_ID,
    pattern_echo::GAME_ID,
    memory_match::GAME_ID,
    speed_match::GAME_ID,
    symbol_sprint::GAME_ID,
    reaction_rush::GAME_ID,
    visual_search::GAME_ID,
    target_tracker::GAME_ID,
    color_clash::GAME_ID,
    estimation_station::GAME_ID,
    fraction_match::GAME_ID,
    number_chain::GAME_ID,
    sequence_solver::GAME_ID,
    word_categories::GAME_ID,
    quick_calc::GAME_ID,
];

/// Build the engine for a config.
///
/// The only caller-visible failure of the whole core: a `game_id` with no
/// concrete implementation. The router layer above falls back to its
/// "coming soon" display on this error.
pub fn create_engine(config: &GameConfig) -> Result<Box<dyn Engine>, EngineError> {
    let config = config.clone();
    let engine: Box<dyn Engine> = match config.game_id.as_str() {
        grid_deduction::GAME_ID => {
            Box::new(GameEngine::new(config, grid_deduction::GridDeduction::new()))
        }
        word_morph::GAME_ID => Box::new(GameEngine::new(config, word_morph::WordMorph::new())),
        set_finder::GAME_ID => Box::new(GameEngine::new(config, set_finder::SetFinder::new())),
        anagram_blitz::GAME_ID => {
            Box::new(GameEngine::new(config, anagram_blitz::AnagramBlitz::new()))
        }
        number_memory::GAME_ID => {
            Box::new(GameEngine::new(config, number_memory::NumberMemory::new()))
        }
        spatial_recall::GAME_ID => {
            Box::new(GameEngine::new(config, spatial_recall::SpatialRecall::new()))
        }
        pattern_echo::GAME_ID => {
            Box::new(GameEngine::new(config, pattern_echo::PatternEcho::new()))
        }
        memory_match::GAME_ID => {
            Box::new(GameEngine::new(config, memory_match::MemoryMatch::new()))
        }
        speed_match::GAME_ID => Box::new(GameEngine::new(config, speed_match::SpeedMatch::new())),
        symbol_sprint::GAME_ID => {
            Box::new(GameEngine::new(config, symbol_sprint::SymbolSprint::new()))
        }
        reaction_rush::GAME_ID => {
            Box::new(GameEngine::new(config, reaction_rush::ReactionRush::new()))
        }
        visual_search::GAME_ID => {
            Box::new(GameEngine::new(config, visual_search::VisualSearch::new()))
        }
        target_tracker::GAME_ID => {
            Box::new(GameEngine::new(config, target_tracker::TargetTracker::new()))
        }
        color_clash::GAME_ID => Box::new(GameEngine::new(config, color_clash::ColorClash::new())),
        estimation_station::GAME_ID => Box::new(GameEngine::new(
            config,
            estimation_station::EstimationStation::new(),
        )),
        fraction_match::GAME_ID => {
            Box::new(GameEngine::new(config, fraction_match::FractionMatch::new()))
        }
        number_chain::GAME_ID => {
            Box::new(GameEngine::new(config, number_chain::NumberChain::new()))
        }
        sequence_solver::GAME_ID => {
            Box::new(GameEngine::new(config, sequence_solver::SequenceSolver::new()))
        }
        word_categories::GAME_ID => {
            Box::new(GameEngine::new(config, word_categories::WordCategories::new()))
        }
        quick_calc::GAME_ID => Box::new(GameEngine::new(config, quick_calc::QuickCalc::new())),
        other => return Err(EngineError::UnknownGame(other.to_string())),
    };
    Ok(engine)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::core::difficulty::config_for;
    use crate::engine::state::GameStatus;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn test_every_catalog_id_constructs_and_starts() {
        for id in GAME_IDS {
            let config = config_for(id, day());
            let mut engine = create_engine(&config)
                .unwrap_or_else(|_| panic!("{id} should construct"));
            assert_eq!(engine.game_id(), id);
            assert_eq!(engine.state().status, GameStatus::Loading);

            engine.init();
            engine.start();
            assert_eq!(engine.state().status, GameStatus::Playing, "{id}");
            assert!(!engine.view().is_null(), "{id} must render a view");
        }
    }

    #[test]
    fn test_unknown_id_is_the_only_error() {
        let config = config_for("mystery-game", day());
        let err = create_engine(&config).err().unwrap();
        assert_eq!(err, EngineError::UnknownGame("mystery-game".to_string()));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = GAME_IDS.to_vec();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), GAME_IDS.len());
    }
}

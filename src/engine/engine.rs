//! Game Engine
//!
//! `GameEngine<G>` composes the shared [`EngineCore`] with one game's
//! [`GameLogic`]. The object-safe [`Engine`] trait is the whole surface
//! the presentation layer sees; the registry hands out `Box<dyn Engine>`.

use serde_json::Value;

use crate::core::difficulty::GameConfig;
use crate::engine::core::{EngineCore, EngineEvent, GameDescriptor};
use crate::engine::input::InputEvent;
use crate::engine::state::GameState;
use crate::engine::timer::TimerAction;

/// Per-game logic plugged into the shared engine.
///
/// Implementations own only round/question-local state; everything shared
/// (score, lives, level, rng, timers) lives in the [`EngineCore`] handed
/// to each call.
pub trait GameLogic {
    /// Static identity: id, category, level cap.
    fn descriptor(&self) -> GameDescriptor;

    /// Build the puzzle for `core.level()`. Called on `start()` and after
    /// every level advance. Must reset all round-local state.
    fn generate_level(&mut self, core: &mut EngineCore);

    /// Process one discrete input event. Invalid or out-of-phase input
    /// must be ignored without mutating state.
    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent);

    /// Process a fired timer.
    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction);

    /// Presentation snapshot of the round-local state.
    fn view(&self) -> Value;
}

/// The presentation-facing engine surface.
///
/// Purely in-process: discrete inputs in, push-based events out, time
/// driven by `advance(elapsed_ms)`.
pub trait Engine {
    /// Registry id of the running game.
    fn game_id(&self) -> &'static str;

    /// `Loading -> Ready`. Must be called once before `start()`.
    fn init(&mut self);

    /// `Ready -> Playing`; generates level 1 synchronously.
    fn start(&mut self);

    /// Freeze status and clock. No-op unless `Playing`.
    fn pause(&mut self);

    /// Unfreeze. No-op unless `Paused`.
    fn resume(&mut self);

    /// Funnel one user input event into the game.
    fn handle_input(&mut self, input: &InputEvent);

    /// Advance the engine clock, firing due timers in order. No-op unless
    /// `Playing`.
    fn advance(&mut self, elapsed_ms: u64);

    /// Current shared state block.
    fn state(&self) -> &GameState;

    /// Round-local state for rendering.
    fn view(&self) -> Value;

    /// Drain pending events.
    fn take_events(&mut self) -> Vec<EngineEvent>;

    /// Install the synchronous event observer.
    fn set_observer(&mut self, observer: Box<dyn FnMut(&EngineEvent)>);

    /// Release all pending timers. Call before discarding the engine.
    fn cleanup(&mut self);
}

/// Shared engine + one game's logic.
pub struct GameEngine<G: GameLogic> {
    core: EngineCore,
    logic: G,
}

impl<G: GameLogic> GameEngine<G> {
    /// Construct from config and game logic.
    pub fn new(config: GameConfig, logic: G) -> Self {
        let descriptor = logic.descriptor();
        Self {
            core: EngineCore::new(config, descriptor),
            logic,
        }
    }

    /// The game logic (read-only; tests and tooling).
    pub fn logic(&self) -> &G {
        &self.logic
    }

    /// The shared core (read-only; tests and tooling).
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    /// Regenerate after a level advance requested it.
    fn run_pending_generate(&mut self) {
        while self.core.take_pending_generate() {
            if !self.core.is_playing() {
                return;
            }
            self.logic.generate_level(&mut self.core);
            self.core.emit_state();
        }
    }
}

impl<G: GameLogic> Engine for GameEngine<G> {
    fn game_id(&self) -> &'static str {
        self.core.descriptor().id
    }

    fn init(&mut self) {
        self.core.mark_ready();
    }

    fn start(&mut self) {
        if !self.core.begin() {
            return;
        }
        self.logic.generate_level(&mut self.core);
        self.core.emit_state();
    }

    fn pause(&mut self) {
        self.core.pause();
    }

    fn resume(&mut self) {
        self.core.resume();
    }

    fn handle_input(&mut self, input: &InputEvent) {
        if !self.core.is_playing() {
            return;
        }
        self.logic.handle_input(&mut self.core, input);
        self.run_pending_generate();
    }

    fn advance(&mut self, elapsed_ms: u64) {
        // Paused and completed engines hold time still; remaining
        // countdowns survive a pause exactly.
        if !self.core.is_playing() {
            return;
        }
        let target = self.core.now_ms() + elapsed_ms;
        while self.core.is_playing() {
            match self.core.fire_next_timer(target) {
                Some(action) => {
                    self.logic.on_timer(&mut self.core, action);
                    self.run_pending_generate();
                }
                None => break,
            }
        }
        self.core.settle_clock(target);
    }

    fn state(&self) -> &GameState {
        self.core.state()
    }

    fn view(&self) -> Value {
        self.logic.view()
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        self.core.take_events()
    }

    fn set_observer(&mut self, observer: Box<dyn FnMut(&EngineEvent)>) {
        self.core.set_observer(observer);
    }

    fn cleanup(&mut self) {
        self.core.cleanup();
    }
}

impl<G: GameLogic> Drop for GameEngine<G> {
    fn drop(&mut self) {
        // Backstop for hosts that forget cleanup(); timers are plain data,
        // so this only empties the queue.
        self.core.cleanup();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::engine::state::{GameCategory, GameStatus};

    /// Minimal logic: every `Select(0)` completes the level; a repeating
    /// tick counts; `Select(9)` is a mistake.
    struct ProbeLogic {
        ticks: u32,
        generated: u32,
    }

    impl GameLogic for ProbeLogic {
        fn descriptor(&self) -> GameDescriptor {
            GameDescriptor {
                id: "probe",
                category: GameCategory::Logic,
                max_levels: 3,
            }
        }

        fn generate_level(&mut self, core: &mut EngineCore) {
            self.generated += 1;
            if self.generated == 1 {
                core.schedule_repeating(100, TimerAction::Tick);
            }
        }

        fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
            match input {
                InputEvent::Select(0) => core.level_complete(0),
                InputEvent::Select(9) => core.mistake(),
                _ => {}
            }
        }

        fn on_timer(&mut self, _core: &mut EngineCore, action: TimerAction) {
            if action == TimerAction::Tick {
                self.ticks += 1;
            }
        }

        fn view(&self) -> Value {
            json!({ "ticks": self.ticks })
        }
    }

    fn probe_engine() -> GameEngine<ProbeLogic> {
        let config = GameConfig::with_seed(
            "probe",
            1,
            1.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        GameEngine::new(config, ProbeLogic { ticks: 0, generated: 0 })
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut engine = probe_engine();
        assert_eq!(engine.state().status, GameStatus::Loading);

        engine.init();
        assert_eq!(engine.state().status, GameStatus::Ready);

        // start() before init() would have been ignored; from Ready it runs
        engine.start();
        assert_eq!(engine.state().status, GameStatus::Playing);
        assert_eq!(engine.state().start_time, Some(0));

        engine.pause();
        assert_eq!(engine.state().status, GameStatus::Paused);
        engine.resume();
        assert_eq!(engine.state().status, GameStatus::Playing);
    }

    #[test]
    fn test_start_requires_ready() {
        let mut engine = probe_engine();
        engine.start(); // still Loading; ignored
        assert_eq!(engine.state().status, GameStatus::Loading);
        assert!(engine.state().start_time.is_none());
    }

    #[test]
    fn test_generate_called_per_level() {
        let mut engine = probe_engine();
        engine.init();
        engine.start();
        assert_eq!(engine.logic.generated, 1);

        engine.handle_input(&InputEvent::Select(0));
        assert_eq!(engine.logic.generated, 2);
        assert_eq!(engine.state().level, 2);
    }

    #[test]
    fn test_advance_fires_timers_and_pause_freezes_clock() {
        let mut engine = probe_engine();
        engine.init();
        engine.start();

        engine.advance(250);
        assert_eq!(engine.logic.ticks, 2);

        engine.pause();
        engine.advance(10_000); // frozen
        assert_eq!(engine.logic.ticks, 2);

        engine.resume();
        engine.advance(50); // 250 + 50 = 300ms -> third tick
        assert_eq!(engine.logic.ticks, 3);
    }

    #[test]
    fn test_win_after_max_levels() {
        let mut engine = probe_engine();
        engine.init();
        engine.start();

        engine.handle_input(&InputEvent::Select(0));
        engine.handle_input(&InputEvent::Select(0));
        engine.handle_input(&InputEvent::Select(0));

        assert_eq!(engine.state().status, GameStatus::Completed);
        // No regeneration after the winning completion
        assert_eq!(engine.logic.generated, 3);

        // Terminal: further input and time are ignored
        let level = engine.state().level;
        engine.handle_input(&InputEvent::Select(9));
        engine.advance(10_000);
        assert_eq!(engine.state().level, level);
        assert_eq!(engine.state().status, GameStatus::Completed);
    }

    #[test]
    fn test_unknown_input_ignored() {
        let mut engine = probe_engine();
        engine.init();
        engine.start();
        let before = engine.state().clone();
        engine.handle_input(&InputEvent::Tap);
        engine.handle_input(&InputEvent::Submit("junk".into()));
        assert_eq!(*engine.state(), before);
    }

    #[test]
    fn test_cleanup_stops_timers() {
        let mut engine = probe_engine();
        engine.init();
        engine.start();
        engine.cleanup();
        engine.advance(1000);
        assert_eq!(engine.logic.ticks, 0);
    }
}

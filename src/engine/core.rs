//! Engine Core
//!
//! The shared bookkeeping every game engine composes: lifecycle status,
//! score/lives/accuracy, level progression, scoped timers, and event
//! emission. Per-game logic receives `&mut EngineCore` and drives it
//! through the operations below; it never mutates `GameState` directly.

use tracing::debug;

use crate::core::difficulty::GameConfig;
use crate::core::rng::SeededRng;
use crate::engine::state::{
    GameCategory, GameOutcome, GameProgress, GameResult, GameState, GameStatus,
};
use crate::engine::timer::{TimerAction, TimerId, TimerQueue};

/// Static identity of a game, copied out of its logic at construction.
#[derive(Clone, Copy, Debug)]
pub struct GameDescriptor {
    /// Registry id, e.g. "grid-deduction"
    pub id: &'static str,
    /// Category for the meta-progression layer
    pub category: GameCategory,
    /// Level cap; reaching it on a level completion wins the game
    pub max_levels: u32,
}

/// Events pushed to the presentation/store layers.
///
/// `StateChanged` fires synchronously after every mutation, before control
/// returns to the input handler. `Completed` fires exactly once.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// A fresh snapshot of the shared state block
    StateChanged(GameState),
    /// Level or game completion telemetry
    Progress(GameProgress),
    /// The terminal result record
    Completed(GameResult),
}

/// Shared engine internals.
///
/// One instance per engine, created at construction and destroyed with
/// it. Owns the RNG (single stream, never cloned) and the timer queue.
pub struct EngineCore {
    config: GameConfig,
    descriptor: GameDescriptor,
    state: GameState,
    /// Engine-owned RNG; game logic consumes it during generation
    pub rng: SeededRng,
    now_ms: u64,
    timers: TimerQueue,
    events: Vec<EngineEvent>,
    observer: Option<Box<dyn FnMut(&EngineEvent)>>,
    attempts: u32,
    correct_count: u32,
    progress_log: Vec<GameProgress>,
    pending_generate: bool,
    result_emitted: bool,
}

impl EngineCore {
    /// Build the core for one engine instance.
    pub fn new(config: GameConfig, descriptor: GameDescriptor) -> Self {
        let rng = SeededRng::new(config.seed);
        Self {
            config,
            descriptor,
            state: GameState::new(),
            rng,
            now_ms: 0,
            timers: TimerQueue::new(),
            events: Vec::new(),
            observer: None,
            attempts: 0,
            correct_count: 0,
            progress_log: Vec::new(),
            pending_generate: false,
            result_emitted: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current shared state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current level (1-based).
    #[inline]
    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Difficulty scalar from the config.
    #[inline]
    pub fn difficulty(&self) -> f64 {
        self.config.difficulty
    }

    /// Engine-clock time in ms.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// The game's static identity.
    pub fn descriptor(&self) -> &GameDescriptor {
        &self.descriptor
    }

    /// Telemetry snapshots collected so far.
    pub fn progress_log(&self) -> &[GameProgress] {
        &self.progress_log
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// `Loading -> Ready`. No-op from any other status.
    pub fn mark_ready(&mut self) {
        if self.state.status != GameStatus::Loading {
            return;
        }
        self.state.status = GameStatus::Ready;
        self.emit_state();
    }

    /// `Ready -> Playing`; stamps `start_time`. Caller generates level 1
    /// and emits the snapshot afterward.
    pub(crate) fn begin(&mut self) -> bool {
        if self.state.status != GameStatus::Ready {
            return false;
        }
        self.state.status = GameStatus::Playing;
        self.state.start_time = Some(self.now_ms);
        debug!(game = self.descriptor.id, "game started");
        true
    }

    /// `Playing -> Paused`. The virtual clock freezes with it.
    pub fn pause(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        self.state.status = GameStatus::Paused;
        self.emit_state();
    }

    /// `Paused -> Playing`.
    pub fn resume(&mut self) {
        if self.state.status != GameStatus::Paused {
            return;
        }
        self.state.status = GameStatus::Playing;
        self.emit_state();
    }

    /// True while input and timers are live.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.status == GameStatus::Playing
    }

    /// Release every pending timer. Called on completion and by the
    /// presentation layer when discarding the engine.
    pub fn cleanup(&mut self) {
        self.timers.clear();
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// One-shot timer `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, action: TimerAction) -> TimerId {
        self.timers.schedule(self.now_ms, delay_ms, action)
    }

    /// Repeating timer every `interval_ms`.
    pub fn schedule_repeating(&mut self, interval_ms: u64, action: TimerAction) -> TimerId {
        self.timers.schedule_repeating(self.now_ms, interval_ms, action)
    }

    /// Cancel a pending timer.
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }

    /// Fire the next timer due at or before `until`, moving the clock to
    /// its fire time. Used only by the engine's `advance` loop.
    pub(crate) fn fire_next_timer(&mut self, until: u64) -> Option<TimerAction> {
        let (fire_at, action) = self.timers.fire_next(until)?;
        self.now_ms = self.now_ms.max(fire_at);
        Some(action)
    }

    /// Move the clock to `target` after timer processing.
    pub(crate) fn settle_clock(&mut self, target: u64) {
        self.now_ms = self.now_ms.max(target);
    }

    // =========================================================================
    // Scoring & progression
    // =========================================================================

    /// Base reward for completing the current level:
    /// `round(100 * (1 + 0.1*(level-1)) + difficulty*10)`.
    pub fn level_score(&self) -> u32 {
        let level = self.state.level as f64;
        (100.0 * (1.0 + 0.1 * (level - 1.0)) + self.config.difficulty * 10.0).round() as u32
    }

    /// Record a correct attempt and award `points`.
    pub fn correct(&mut self, points: u32) {
        if self.state.status == GameStatus::Completed {
            return;
        }
        self.attempts += 1;
        self.correct_count += 1;
        self.state.score = self.state.score.saturating_add(points);
        self.update_accuracy();
        self.emit_state();
    }

    /// Record an incorrect attempt; costs a life. At zero lives the game
    /// completes as a loss.
    pub fn mistake(&mut self) {
        if self.state.status == GameStatus::Completed {
            return;
        }
        self.attempts += 1;
        self.state.lives = self.state.lives.saturating_sub(1);
        self.update_accuracy();
        if self.state.lives == 0 {
            self.game_complete(GameOutcome::Lose);
        } else {
            self.emit_state();
        }
    }

    fn update_accuracy(&mut self) {
        if self.attempts > 0 {
            self.state.accuracy = self.correct_count as f64 / self.attempts as f64;
        }
    }

    /// Award the level score plus `bonus` and advance (or win).
    pub fn level_complete(&mut self, bonus: u32) {
        if self.state.status == GameStatus::Completed {
            return;
        }
        let award = self.level_score().saturating_add(bonus);
        self.state.score = self.state.score.saturating_add(award);
        self.advance_level();
    }

    /// Advance to the next level without a score award, or win at the cap.
    ///
    /// Games that award at answer time (`correct(points)`) use this from
    /// their feedback timer so the score lands on submit, not on the
    /// advance.
    pub fn advance_level(&mut self) {
        if self.state.status == GameStatus::Completed {
            return;
        }
        self.record_progress();
        if self.state.level >= self.descriptor.max_levels {
            self.game_complete(GameOutcome::Win);
        } else {
            self.state.level += 1;
            self.pending_generate = true;
            self.emit_state();
        }
    }

    /// Force termination with the given outcome.
    ///
    /// Sets `Completed`, stamps `end_time`, clears timers, and emits the
    /// one and only `GameResult`.
    pub fn game_complete(&mut self, outcome: GameOutcome) {
        if self.state.status == GameStatus::Completed {
            return;
        }
        self.state.status = GameStatus::Completed;
        self.state.end_time = Some(self.now_ms);
        self.timers.clear();
        self.record_progress();
        self.emit_state();

        if !self.result_emitted {
            self.result_emitted = true;
            let result = self.build_result(outcome);
            debug!(
                game = self.descriptor.id,
                score = result.score,
                outcome = ?outcome,
                "game complete"
            );
            self.emit(EngineEvent::Completed(result));
        }
    }

    fn build_result(&self, outcome: GameOutcome) -> GameResult {
        let start = self.state.start_time.unwrap_or(0);
        let end = self.state.end_time.unwrap_or(start);
        let levels_completed = match outcome {
            GameOutcome::Win => self.descriptor.max_levels,
            GameOutcome::Lose => self.state.level.saturating_sub(1),
        };
        GameResult {
            game_id: self.descriptor.id.to_string(),
            date: self.config.date,
            score: self.state.score,
            duration_ms: end.saturating_sub(start),
            accuracy: self.state.accuracy,
            levels_completed,
            max_level: self.descriptor.max_levels,
            category: self.descriptor.category,
            outcome,
        }
    }

    fn record_progress(&mut self) {
        let snapshot = GameProgress {
            level: self.state.level,
            score: self.state.score,
            at_ms: self.now_ms,
        };
        self.progress_log.push(snapshot);
        self.emit(EngineEvent::Progress(snapshot));
    }

    /// True once, after a level advance requested regeneration.
    pub(crate) fn take_pending_generate(&mut self) -> bool {
        std::mem::take(&mut self.pending_generate)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Push a `StateChanged` snapshot.
    pub fn emit_state(&mut self) {
        let snapshot = self.state.clone();
        self.emit(EngineEvent::StateChanged(snapshot));
    }

    fn emit(&mut self, event: EngineEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
        self.events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Install the synchronous observer (replaces any previous one).
    pub fn set_observer(&mut self, observer: Box<dyn FnMut(&EngineEvent)>) {
        self.observer = Some(observer);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_core(max_levels: u32) -> EngineCore {
        let config = GameConfig::with_seed(
            "test-game",
            42,
            2.0,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        );
        let descriptor = GameDescriptor {
            id: "test-game",
            category: GameCategory::Logic,
            max_levels,
        };
        let mut core = EngineCore::new(config, descriptor);
        core.mark_ready();
        core.begin();
        core.take_events();
        core
    }

    #[test]
    fn test_level_score_formula() {
        let core = test_core(10);
        // level 1, difficulty 2.0: 100 * 1.0 + 20 = 120
        assert_eq!(core.level_score(), 120);
    }

    #[test]
    fn test_correct_updates_score_and_accuracy() {
        let mut core = test_core(10);
        core.correct(50);
        assert_eq!(core.state().score, 50);
        assert_eq!(core.state().accuracy, 1.0);

        core.mistake();
        assert_eq!(core.state().accuracy, 0.5);
        assert_eq!(core.state().lives, 2);
    }

    #[test]
    fn test_accuracy_always_in_unit_interval() {
        let mut core = test_core(10);
        for i in 0..2 {
            if i % 2 == 0 {
                core.correct(1);
            } else {
                core.mistake();
            }
            let acc = core.state().accuracy;
            assert!((0.0..=1.0).contains(&acc));
        }
    }

    #[test]
    fn test_lives_exhaustion_completes_as_loss() {
        let mut core = test_core(10);
        core.mistake();
        core.mistake();
        assert!(core.is_playing());
        core.mistake();
        assert_eq!(core.state().status, GameStatus::Completed);

        let events = core.take_events();
        let result = events.iter().find_map(|e| match e {
            EngineEvent::Completed(r) => Some(r.clone()),
            _ => None,
        });
        let result = result.expect("loss must emit a result");
        assert_eq!(result.outcome, GameOutcome::Lose);
        assert_eq!(result.levels_completed, 0);
    }

    #[test]
    fn test_result_emitted_exactly_once() {
        let mut core = test_core(10);
        core.game_complete(GameOutcome::Lose);
        core.game_complete(GameOutcome::Lose);
        core.mistake(); // ignored after completion

        let completions = core
            .take_events()
            .iter()
            .filter(|e| matches!(e, EngineEvent::Completed(_)))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_level_complete_advances_and_scores() {
        let mut core = test_core(3);
        core.level_complete(10);
        // 120 base + 10 bonus
        assert_eq!(core.state().score, 130);
        assert_eq!(core.state().level, 2);
        assert!(core.take_pending_generate());
        assert!(!core.take_pending_generate());
    }

    #[test]
    fn test_win_at_level_cap() {
        let mut core = test_core(2);
        core.level_complete(0);
        assert!(core.is_playing());
        core.level_complete(0);
        assert_eq!(core.state().status, GameStatus::Completed);

        let result = core.take_events().into_iter().find_map(|e| match e {
            EngineEvent::Completed(r) => Some(r),
            _ => None,
        });
        let result = result.unwrap();
        assert_eq!(result.outcome, GameOutcome::Win);
        assert_eq!(result.levels_completed, 2);
    }

    #[test]
    fn test_completion_clears_timers() {
        let mut core = test_core(10);
        core.schedule(100, TimerAction::Tick);
        core.game_complete(GameOutcome::Lose);
        assert_eq!(core.fire_next_timer(u64::MAX), None);
    }

    #[test]
    fn test_pause_resume_gating() {
        let mut core = test_core(10);
        core.pause();
        assert_eq!(core.state().status, GameStatus::Paused);
        core.pause(); // no-op
        assert_eq!(core.state().status, GameStatus::Paused);
        core.resume();
        assert_eq!(core.state().status, GameStatus::Playing);
        core.resume(); // no-op
        assert_eq!(core.state().status, GameStatus::Playing);
    }

    #[test]
    fn test_observer_fires_synchronously() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(0u32));
        let seen2 = Rc::clone(&seen);

        let mut core = test_core(10);
        core.set_observer(Box::new(move |_| {
            *seen2.borrow_mut() += 1;
        }));
        core.correct(1);
        core.mistake();
        assert!(*seen.borrow() >= 2);
    }
}

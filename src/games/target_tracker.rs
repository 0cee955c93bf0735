//! Target Tracker
//!
//! Multiple-object tracking: a few balls flash as targets, everything
//! scrambles for a few seconds, then the player picks out exactly the
//! balls that were marked.

use serde_json::{json, Value};

use crate::core::rng::SeededRng;
use crate::engine::core::{EngineCore, GameDescriptor};
use crate::engine::input::{InputAction, InputEvent};
use crate::engine::state::GameCategory;
use crate::engine::timer::TimerAction;
use crate::engine::engine::GameLogic;
use crate::FEEDBACK_DELAY_MS;

/// Registry id.
pub const GAME_ID: &str = "target-tracker";

const MAX_LEVELS: u32 = 6;

/// Marker flash duration (ms).
const HIGHLIGHT_MS: u64 = 2000;

/// Blind tracking duration (ms).
const TRACKING_MS: u64 = 3000;

/// Balls on screen at a level.
pub fn ball_count(level: u32) -> usize {
    8 + level as usize
}

/// Marked balls at a level.
pub fn target_count(level: u32) -> usize {
    (4 + level as usize / 2).min(ball_count(level) / 2)
}

/// Pick which balls are the targets.
pub fn generate_targets(rng: &mut SeededRng, level: u32) -> Vec<usize> {
    let balls: Vec<usize> = (0..ball_count(level)).collect();
    let mut targets = rng.pick_multiple(&balls, target_count(level));
    targets.sort();
    targets
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Highlight,
    Tracking,
    Input,
    Feedback,
}

/// Target tracker game logic.
pub struct TargetTracker {
    targets: Vec<usize>,
    selected: Vec<usize>,
    phase: Phase,
    streak: u32,
    last_correct: bool,
}

impl TargetTracker {
    /// Fresh logic; the first round starts on `start()`.
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            selected: Vec::new(),
            phase: Phase::Highlight,
            streak: 0,
            last_correct: false,
        }
    }

    fn deal(&mut self, core: &mut EngineCore) {
        let level = core.level();
        self.targets = generate_targets(&mut core.rng, level);
        self.selected.clear();
        self.phase = Phase::Highlight;
        core.schedule(HIGHLIGHT_MS, TimerAction::PhaseEnd);
    }
}

impl Default for TargetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic for TargetTracker {
    fn descriptor(&self) -> GameDescriptor {
        GameDescriptor {
            id: GAME_ID,
            category: GameCategory::Attention,
            max_levels: MAX_LEVELS,
        }
    }

    fn generate_level(&mut self, core: &mut EngineCore) {
        self.deal(core);
    }

    fn handle_input(&mut self, core: &mut EngineCore, input: &InputEvent) {
        if self.phase != Phase::Input {
            return;
        }
        let level = core.level();
        match input {
            InputEvent::Select(idx) => {
                if *idx >= ball_count(level) {
                    return;
                }
                if let Some(pos) = self.selected.iter().position(|&s| s == *idx) {
                    self.selected.remove(pos);
                } else if self.selected.len() < target_count(level) {
                    self.selected.push(*idx);
                }
            }
            InputEvent::Action(InputAction::Confirm) => {
                if self.selected.len() != target_count(level) {
                    return;
                }
                let mut picked = self.selected.clone();
                picked.sort();
                if picked == self.targets {
                    self.streak += 1;
                    let points =
                        60 + 20 * self.targets.len() as u32 + (self.streak * 10).min(50);
                    self.last_correct = true;
                    self.phase = Phase::Feedback;
                    core.correct(points);
                    core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
                } else {
                    self.streak = 0;
                    self.last_correct = false;
                    core.mistake();
                    if core.is_playing() {
                        self.phase = Phase::Feedback;
                        core.schedule(FEEDBACK_DELAY_MS, TimerAction::Feedback);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_timer(&mut self, core: &mut EngineCore, action: TimerAction) {
        match action {
            TimerAction::PhaseEnd => match self.phase {
                Phase::Highlight => {
                    self.phase = Phase::Tracking;
                    core.schedule(TRACKING_MS, TimerAction::PhaseEnd);
                }
                Phase::Tracking => {
                    self.phase = Phase::Input;
                }
                _ => {}
            },
            TimerAction::Feedback => {
                if self.phase != Phase::Feedback {
                    return;
                }
                if self.last_correct {
                    core.level_complete(0);
                } else {
                    // New marks, same level
                    self.deal(core);
                }
            }
            _ => {}
        }
    }

    fn view(&self) -> Value {
        json!({
            "phase": match self.phase {
                Phase::Highlight => "highlight",
                Phase::Tracking => "tracking",
                Phase::Input => "input",
                Phase::Feedback => "feedback",
            },
            "targets": if self.phase == Phase::Highlight {
                json!(self.targets)
            } else {
                Value::Null
            },
            "targetCount": self.targets.len(),
            "selected": self.selected,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

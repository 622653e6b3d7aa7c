//! Mode-change transition lifecycle.
//!
//! ```text
//!   settling ──settle()──▶ idle ──mode changed──▶ animating{g}
//!      ▲                    ▲                         │
//!      └── suppress() ──────┴── transitionend / timeout(g) ┘
//! ```
//!
//! Only mode-changed notifications drive this machine. Each animation carries
//! a generation number so a timeout armed for an earlier change cannot end a
//! later one.

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// Initial paint; transitions are globally suppressed.
    #[default]
    Settling,
    /// Transitions enabled, nothing running.
    Idle,
    /// A mode change is animating.
    Animating { generation: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct TransitionMachine {
    phase: TransitionPhase,
    generation: u64,
    watched: Vec<String>,
}

impl TransitionMachine {
    #[must_use]
    pub fn new(watched: Vec<String>) -> Self {
        Self { phase: TransitionPhase::Settling, generation: 0, watched }
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.phase != TransitionPhase::Settling
    }

    /// Settle delay elapsed. Returns `false` if the machine was not settling.
    pub fn settle(&mut self) -> bool {
        if self.phase != TransitionPhase::Settling {
            return false;
        }
        self.phase = TransitionPhase::Idle;
        true
    }

    /// Re-enter the settling phase, abandoning any running animation.
    pub fn suppress(&mut self) {
        self.phase = TransitionPhase::Settling;
    }

    /// The observed mode changed.
    ///
    /// Returns the generation of the animation that started, or `None` while
    /// settling. A change during an animation restarts it.
    pub fn on_mode_changed(&mut self) -> Option<u64> {
        if self.phase == TransitionPhase::Settling {
            return None;
        }
        self.generation += 1;
        self.phase = TransitionPhase::Animating { generation: self.generation };
        Some(self.generation)
    }

    /// A `transitionend` arrived. Returns `true` if it ended the animation.
    pub fn on_transition_end(&mut self, property: &str) -> bool {
        if !matches!(self.phase, TransitionPhase::Animating { .. }) {
            return false;
        }
        if !self.watched.iter().any(|p| p == property) {
            return false;
        }
        self.phase = TransitionPhase::Idle;
        true
    }

    /// The timeout armed for `generation` fired. Returns `true` if it ended
    /// the animation.
    pub fn on_timeout(&mut self, generation: u64) -> bool {
        if self.phase != (TransitionPhase::Animating { generation }) {
            return false;
        }
        self.phase = TransitionPhase::Idle;
        true
    }
}

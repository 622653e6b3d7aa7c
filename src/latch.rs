//! Settle-once latch arbitrating the exit-animation race.
//!
//! Two participants race to trigger a deferred navigation: the overlay's
//! opacity `transitionend` and a fallback timer. The first to call
//! [`SettleOnce::settle`] wins and learns which participant to cancel; every
//! later call is refused.

#[cfg(test)]
#[path = "latch_test.rs"]
mod latch_test;

/// A participant in the exit race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    TransitionEnd,
    Fallback,
}

impl ExitSignal {
    /// The opposing participant.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::TransitionEnd => Self::Fallback,
            Self::Fallback => Self::TransitionEnd,
        }
    }
}

/// Single-assignment latch. Starts open; the first `settle` closes it forever.
#[derive(Debug, Clone, Default)]
pub struct SettleOnce {
    winner: Option<ExitSignal>,
}

impl SettleOnce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to settle the latch on behalf of `by`.
    ///
    /// Returns the losing participant that must now be cancelled, or `None`
    /// if the latch was already settled.
    pub fn settle(&mut self, by: ExitSignal) -> Option<ExitSignal> {
        if self.winner.is_some() {
            return None;
        }
        self.winner = Some(by);
        Some(by.other())
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<ExitSignal> {
        self.winner
    }
}

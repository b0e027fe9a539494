//! Debounce of the manual trigger input.
//!
//! The trigger is sampled once per loop iteration. A press fires exactly once,
//! on its first asserted sample. The trigger re-arms only after it has read
//! released for a number of consecutive polls, so contact bounce on release
//! cannot fire a second time. Nothing here blocks.
use crate::core::DEFAULT_RELEASE_SETTLE_POLLS;

/// Debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerState {
    /// Armed, waiting for a press.
    Idle,
    /// Held down; already fired.
    Pressed,
    /// Let go, waiting for the level to settle.
    Released { stable_polls: u16 },
}

/// Output of one [`TriggerDebouncer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEvent {
    None,
    /// A new press was detected.
    Fired,
}

#[derive(Debug, Clone)]
pub struct TriggerDebouncer {
    state: TriggerState,
    settle_polls: u16,
}

impl Default for TriggerDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_SETTLE_POLLS)
    }
}

impl TriggerDebouncer {
    /// `settle_polls` of zero is treated as one.
    pub const fn new(settle_polls: u16) -> Self {
        Self {
            state: TriggerState::Idle,
            settle_polls: if settle_polls == 0 { 1 } else { settle_polls },
        }
    }

    /// Feed one sample. `asserted` is the logical level, polarity already applied.
    pub fn update(&mut self, asserted: bool) -> TriggerEvent {
        let (next, event) = match (self.state, asserted) {
            (TriggerState::Idle, true) => (TriggerState::Pressed, TriggerEvent::Fired),
            (TriggerState::Idle, false) => (TriggerState::Idle, TriggerEvent::None),
            (TriggerState::Pressed, true) => (TriggerState::Pressed, TriggerEvent::None),
            (TriggerState::Pressed, false) => {
                (self.after_release_poll(0), TriggerEvent::None)
            }
            // Bounce: back to held without firing.
            (TriggerState::Released { .. }, true) => (TriggerState::Pressed, TriggerEvent::None),
            (TriggerState::Released { stable_polls }, false) => {
                (self.after_release_poll(stable_polls), TriggerEvent::None)
            }
        };
        self.state = next;
        event
    }

    fn after_release_poll(&self, stable_polls: u16) -> TriggerState {
        let stable_polls = stable_polls.saturating_add(1);
        if stable_polls >= self.settle_polls {
            TriggerState::Idle
        } else {
            TriggerState::Released { stable_polls }
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub const fn settle_polls(&self) -> u16 {
        self.settle_polls
    }
}

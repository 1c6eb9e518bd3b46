//! Press/release state machine.
//!
//! ```text
//!          pedal down, settled            report sent
//!   Wait ----------------------> SendKey -------------> Pressing
//!    ^                                                     |
//!    |        report sent                pedal up, settled |
//!    +------------------------ ReleaseKey <----------------+
//! ```
//!
//! Each accepted edge resets the dwell counter, so the opposite edge has to
//! persist for a full dwell period before it is acted on. A held pedal sends
//! one key-down report and nothing more until it is released.

use crate::builder::{NULL_SYMBOL, PEDAL_SYMBOL};
use crate::debounce::DebounceCounter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// Idle, pedal up.
    #[default]
    Wait,
    /// Key-down accepted, report not yet sent.
    SendKey,
    /// Key-down sent, waiting for release.
    Pressing,
    /// Key-up accepted, report not yet sent.
    ReleaseKey,
}

/// Drives one key-down and one key-up report per physical press.
#[derive(Debug, Default)]
pub struct KeyEventStateMachine {
    state: KeyState,
}

impl KeyEventStateMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: KeyState::Wait,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> KeyState {
        self.state
    }

    /// Consume this iteration's pedal signal.
    ///
    /// Returns the new state when an edge was accepted; the counter is reset
    /// exactly then.
    pub fn advance(&mut self, pedal_down: bool, counter: &mut DebounceCounter) -> Option<KeyState> {
        let next = match self.state {
            KeyState::Wait if pedal_down && counter.is_settled() => KeyState::SendKey,
            KeyState::Pressing if !pedal_down && counter.is_settled() => KeyState::ReleaseKey,
            _ => return None,
        };

        counter.reset();
        debug!("key state {} -> {}", self.state, next);
        self.state = next;
        Some(next)
    }

    /// The interrupt endpoint is free: take the symbol whose report should
    /// go out now, if any, and move past the sending state.
    pub fn take_report(&mut self) -> Option<u8> {
        let (symbol, next) = match self.state {
            KeyState::SendKey => (PEDAL_SYMBOL, KeyState::Pressing),
            KeyState::ReleaseKey => (NULL_SYMBOL, KeyState::Wait),
            KeyState::Wait | KeyState::Pressing => return None,
        };

        debug!("key state {} -> {}", self.state, next);
        self.state = next;
        Some(symbol)
    }
}

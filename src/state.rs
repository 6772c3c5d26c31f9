//! Key switch event state.
//!
//! Each event carries a small bitmask describing where the switch is in its
//! press cycle, and where the event came from.  The scanner reports two raw
//! bits, pressed now and pressed at the previous scan, and the edge
//! predicates are derived from those.

use bitflags::bitflags;

bitflags! {
    /// The state bits carried by a single key event.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct KeyState: u8 {
        /// The switch is closed at this scan.
        const PRESSED = 1 << 0;
        /// The switch was closed at the previous scan.
        const WAS_PRESSED = 1 << 1;
        /// The press should not be remembered in the live composite
        /// keymap.  Used for transient synthesized presses.
        const EPHEMERAL = 1 << 5;
        /// The event did not come from the physical scan.
        const INJECTED = 1 << 7;
    }
}

impl KeyState {
    /// State for a fresh press edge.
    pub const fn press() -> KeyState {
        KeyState::PRESSED
    }

    /// State for a switch held across scans.
    pub const fn held() -> KeyState {
        KeyState::PRESSED.union(KeyState::WAS_PRESSED)
    }

    /// State for a release edge.
    pub const fn release() -> KeyState {
        KeyState::WAS_PRESSED
    }

    pub fn is_pressed(self) -> bool {
        self.contains(KeyState::PRESSED)
    }

    pub fn was_pressed(self) -> bool {
        self.contains(KeyState::WAS_PRESSED)
    }

    /// A press edge: down now, up at the previous scan.
    pub fn toggled_on(self) -> bool {
        self.is_pressed() && !self.was_pressed()
    }

    /// A release edge: up now, down at the previous scan.
    pub fn toggled_off(self) -> bool {
        !self.is_pressed() && self.was_pressed()
    }

    pub fn is_injected(self) -> bool {
        self.contains(KeyState::INJECTED)
    }

    pub fn is_ephemeral(self) -> bool {
        self.contains(KeyState::EPHEMERAL)
    }
}

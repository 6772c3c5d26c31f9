//! Logical keys.
//!
//! A [`Key`] is what a keymap entry resolves to: a usage code plus a set of
//! behavior flags.  Ordinary keys carry a code from the HID keyboard page
//! and no flags.  Everything else (consumer control, system control, layer
//! switching, internal signals) is marked `SYNTHETIC` plus exactly one of
//! the synthetic subtype flags.
//!
//! Every flag gets its own bit.  Packing the subtype flags over the
//! held-modifier bits would save a byte per keymap entry, but then some
//! combinations alias each other, and flag tests stop being just flag
//! tests.
//!
//! Keys are plain values.  Two keys are equal when their code and flags are
//! equal, and nothing in this module has side effects.

use bitflags::bitflags;
use usbd_human_interface_device::page::{Consumer, Keyboard};

bitflags! {
    /// Behavior flags attached to a key.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct KeyFlags: u16 {
        /// Hold left shift while this key is pressed.
        const SHIFT_HELD = 1 << 0;
        /// Hold left control while this key is pressed.
        const CTRL_HELD = 1 << 1;
        /// Hold left alt while this key is pressed.
        const LALT_HELD = 1 << 2;
        /// Hold right alt while this key is pressed.
        const RALT_HELD = 1 << 3;
        /// Hold the GUI key while this key is pressed.
        const GUI_HELD = 1 << 4;
        /// Not an ordinary keyboard-page key.
        const SYNTHETIC = 1 << 5;
        /// Synthetic: a consumer-control usage.
        const IS_CONSUMER = 1 << 6;
        /// Synthetic: a system-control usage.
        const IS_SYSCTL = 1 << 7;
        /// Synthetic: an internal signal, carries no host-facing action.
        const IS_INTERNAL = 1 << 8;
        /// Synthetic: a layer-switch key, consumed by the layer logic.
        const SWITCH_TO_KEYMAP = 1 << 9;
        /// Reserved for keymap encodings that are not keys at all.
        const RESERVED = 1 << 10;
    }
}

/// A logical key: usage code plus behavior flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Key {
    code: u16,
    flags: KeyFlags,
}

impl Key {
    /// The "no key" sentinel.  A lookup that resolves to this emits
    /// nothing.
    pub const NONE: Key = Key::new(0, KeyFlags::empty());

    pub const fn new(code: u16, flags: KeyFlags) -> Key {
        Key { code, flags }
    }

    /// An ordinary key from the HID keyboard page.
    pub const fn keyboard(code: Keyboard) -> Key {
        Key::new(code as u16, KeyFlags::empty())
    }

    /// A consumer-control key (volume, media transport, and friends).
    pub const fn consumer(code: Consumer) -> Key {
        Key::new(
            code as u16,
            KeyFlags::SYNTHETIC.union(KeyFlags::IS_CONSUMER),
        )
    }

    /// A system-control key.  These use Generic Desktop usages, see the
    /// `SYSTEM_*` constants below.
    pub const fn system_control(code: u16) -> Key {
        Key::new(code, KeyFlags::SYNTHETIC.union(KeyFlags::IS_SYSCTL))
    }

    /// An internal signal key.  The dispatch core never acts on these, they
    /// exist for plugins to claim.
    pub const fn internal(code: u16) -> Key {
        Key::new(code, KeyFlags::SYNTHETIC.union(KeyFlags::IS_INTERNAL))
    }

    /// The same key with extra flags set.  The usual use is attaching held
    /// modifiers to an ordinary key.
    pub const fn with_flags(self, flags: KeyFlags) -> Key {
        Key::new(self.code, self.flags.union(flags))
    }

    pub const fn code(self) -> u16 {
        self.code
    }

    pub const fn flags(self) -> KeyFlags {
        self.flags
    }

    pub fn is_none(self) -> bool {
        self == Key::NONE
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Key {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Key({=u16:#x}, {=u16:#x})", self.code, self.flags.bits());
    }
}

// Generic Desktop usages for the system-control keys.
pub const SYSTEM_POWER_DOWN: Key = Key::system_control(0x81);
pub const SYSTEM_SLEEP: Key = Key::system_control(0x82);
pub const SYSTEM_WAKE_UP: Key = Key::system_control(0x83);

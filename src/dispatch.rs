//! The key event dispatch pipeline.
//!
//! One call to [`Dispatch::handle_keyswitch_event`] takes a single switch
//! transition all the way from raw edge to HID output.  The steps, in
//! order:
//!
//! 1. Invalid addresses skip the address-indexed steps entirely and go
//!    straight to the plugin chain.  Injected events are allowed to carry
//!    a logical key with no physical location, and nothing may index the
//!    cache or the mask set with such an address.
//! 2. A press edge commits the resolved key to the live composite keymap.
//!    Ephemeral presses, and presses where the caller supplied no key,
//!    commit a fresh stack walk instead of a caller-supplied identity.
//! 3. A masked address swallows the event, except that its release edge
//!    clears the mask and continues down the pipeline so plugins see the
//!    release too.
//! 4. If the caller supplied no key, the address resolves through the
//!    live composite keymap.
//! 5. The plugin chain runs, in order, both hook forms.  The first
//!    non-`Ok` result stops it.
//! 6. The layer logic takes its turn.  It runs even when a plugin
//!    consumed the event, so a layer key never misses an edge, but not
//!    after an abort.  If it consumed the key, we stop.
//! 7. Default handling emits the key through the HID boundary.
//!
//! The whole pipeline is synchronous and total: every step returns, no
//! step blocks, and failure anywhere is expressed as "emit nothing", never
//! as a fault.  Each mutable structure is owned by exactly one step; the
//! only mutators reachable from outside are the mask operations, which
//! exist for plugins that consume a key mid-gesture.

use crate::addr::KeyAddr;
use crate::hid::HidOutput;
use crate::hooks::{EventHandlerResult, KeyswitchHandler};
use crate::key::{Key, KeyFlags};
use crate::layers::{Keymap, Layers};
use crate::masking::MaskSet;
use crate::state::KeyState;

/// The dispatch context: the layer stack and the mask set, with the
/// pipeline entry point.  The firmware owns one of these, plus the handler
/// list and the HID adapter it passes into each call.
pub struct Dispatch {
    layers: Layers,
    mask: MaskSet,
}

impl Dispatch {
    pub fn new(keymaps: &'static [Keymap]) -> Dispatch {
        Dispatch {
            layers: Layers::new(keymaps),
            mask: MaskSet::new(),
        }
    }

    /// Read-only view of the layer state.
    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    /// Change the default layer.
    pub fn set_default_layer(&mut self, layer: u8) {
        self.layers.set_default_layer(layer);
    }

    pub fn is_key_masked(&self, addr: KeyAddr) -> bool {
        self.mask.is_masked(addr)
    }

    /// Suppress further events from this address until it is released.
    /// For plugins whose action consumes a held physical key.
    pub fn mask_key(&mut self, addr: KeyAddr) {
        self.mask.mask(addr);
    }

    pub fn unmask_key(&mut self, addr: KeyAddr) {
        self.mask.unmask(addr);
    }

    /// Dispatch one switch transition.  `mapped` is `None` unless the
    /// caller already knows the logical key, as injected events usually
    /// do.
    pub fn handle_keyswitch_event(
        &mut self,
        hid: &mut dyn HidOutput,
        handlers: &mut [&mut dyn KeyswitchHandler],
        mapped: Option<Key>,
        addr: KeyAddr,
        state: KeyState,
    ) {
        let mut mapped = mapped;

        if addr.is_valid() {
            if state.toggled_on() {
                match mapped {
                    Some(key) if !state.is_ephemeral() => {
                        self.layers.update_live_composite_with(addr, key);
                    }
                    _ => self.layers.update_live_composite(addr),
                }
            }

            if self.mask.is_masked(addr) {
                if state.toggled_off() {
                    self.mask.unmask(addr);
                } else {
                    return;
                }
            }

            if mapped.is_none() {
                mapped = Some(self.layers.lookup(addr));
            }
        }

        // Events with invalid addresses start here, with whatever key the
        // caller supplied.
        let key = mapped.unwrap_or(Key::NONE);

        match run_handlers(handlers, key, addr, state) {
            EventHandlerResult::Ok => (),
            EventHandlerResult::EventConsumed => {
                let _ = self.layers.event_handler(key, addr, state);
                return;
            }
            EventHandlerResult::Abort => return,
        }

        let key = match self.layers.event_handler(key, addr, state) {
            Some(key) => key,
            None => return,
        };

        handle_default(hid, key, state);
    }
}

/// Run both hook passes over the chain.  The address-aware pass goes
/// first, then the legacy row/column pass; a handler implementing only one
/// form is a no-op for the other.  Beyond "both passes finish before the
/// layer step", the relative ordering of the two passes is not a
/// guarantee plugins should lean on.
fn run_handlers(
    handlers: &mut [&mut dyn KeyswitchHandler],
    key: Key,
    addr: KeyAddr,
    state: KeyState,
) -> EventHandlerResult {
    for handler in handlers.iter_mut() {
        let result = handler.on_keyswitch_event(key, addr, state);
        if result != EventHandlerResult::Ok {
            return result;
        }
    }
    for handler in handlers.iter_mut() {
        let result = handler.on_keyswitch_event_rc(key, addr.row(), addr.col(), state);
        if result != EventHandlerResult::Ok {
            return result;
        }
    }
    EventHandlerResult::Ok
}

/// Terminal handling for an event nothing upstream claimed.
fn handle_default(hid: &mut dyn HidOutput, key: Key, state: KeyState) {
    if key.is_none() {
        return;
    }
    if key.flags().contains(KeyFlags::SYNTHETIC) {
        handle_synthetic(hid, key, state);
    } else if state.toggled_on() {
        hid.press_key(key, true);
    } else if state.is_pressed() {
        // Still held; re-assert without a fresh key-down.
        hid.press_key(key, false);
    } else if state.toggled_off() && state.is_injected() {
        // Physical releases are handled by the report cycle upstream;
        // re-emitting them here would double the release.
        hid.release_key(key);
    }
}

/// Dispatch for synthetic keys, checked in subtype priority order.  The
/// return says whether the event was this dispatcher's to handle; a
/// `false` is informational only, there is nothing downstream of us.
fn handle_synthetic(hid: &mut dyn HidOutput, key: Key, state: KeyState) -> bool {
    let flags = key.flags();

    if flags.contains(KeyFlags::RESERVED) {
        return false;
    }
    if !flags.contains(KeyFlags::SYNTHETIC) {
        return false;
    }

    if flags.contains(KeyFlags::IS_CONSUMER) {
        if state.is_pressed() {
            hid.press_consumer_control(key);
        }
    } else if flags.contains(KeyFlags::IS_SYSCTL) {
        if state.is_pressed() {
            // Nothing while held.  The host treats system control as a
            // momentary trigger, so the pulse goes out on release.
        } else if state.was_pressed() {
            hid.press_system_control(key);
            hid.release_system_control(key);
        }
    } else if flags.contains(KeyFlags::IS_INTERNAL) {
        // Internal keys carry no host-facing action.  A plugin that wants
        // one acts on it in the chain.
        return false;
    } else if flags.contains(KeyFlags::SWITCH_TO_KEYMAP) {
        // The layer logic consumes these before default handling.
        // Reaching here means a broken keymap entry; emit nothing.
    }

    true
}

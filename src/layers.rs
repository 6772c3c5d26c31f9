//! Layer stack and the live composite keymap.
//!
//! A layer is a static table mapping each key address to a logical key,
//! with `None` entries transparent to whatever is active below.  Layers
//! activate and deactivate at run time and stack in activation order, the
//! most recently activated layer wins.  A lookup walks the stack from the
//! top and stops at the first layer with an opinion about the address,
//! falling back to the default layer, so a lookup always terminates there.
//!
//! The subtle part is what happens to a key that is already held when the
//! stack changes.  If lookups always consulted the stack, a layer shift
//! could change the meaning of a key under your finger, and its release
//! would report a different key than its press.  To prevent that, every
//! press edge commits its resolved key to a per-address cache, the live
//! composite keymap, and later events for that address read the cache
//! instead of re-walking the stack.  The cache entry is only replaced by
//! the next press edge on the same address.
//!
//! Layer switching itself is driven by keys.  A keymap entry flagged
//! `SYNTHETIC | SWITCH_TO_KEYMAP` encodes a layer action in its code, and
//! [`Layers::event_handler`] decodes and applies it after the plugin chain
//! has seen the event.  That handler is the only place the stack is
//! mutated; anything else that wants a layer change injects one of these
//! keys through the dispatch pipeline.

use arrayvec::ArrayVec;

use crate::addr::{KeyAddr, NKEYS};
use crate::key::{Key, KeyFlags};
use crate::log::{info, warn};
use crate::state::KeyState;

/// One layer's keymap.  `None` is transparent.
pub type Keymap = [Option<Key>; NKEYS];

/// The most layers that can be active at once.
pub const MAX_LAYERS: usize = 32;

const SWITCH: KeyFlags = KeyFlags::SYNTHETIC.union(KeyFlags::SWITCH_TO_KEYMAP);

// Layer-key code encoding.  Codes below SHIFT_OFFSET lock the layer given
// by the code.  Codes at or above it shift momentarily to the layer given
// by the difference, with two special targets that step relative to the
// current top of the stack.
const SHIFT_OFFSET: u16 = 42;
const TARGET_PREVIOUS: u16 = 33;
const TARGET_NEXT: u16 = 34;

/// A key that toggles the given layer on each press.
pub const fn lock(layer: u8) -> Key {
    Key::new(layer as u16, SWITCH)
}

/// A key that activates the given layer while held.
pub const fn shift_to(layer: u8) -> Key {
    Key::new(layer as u16 + SHIFT_OFFSET, SWITCH)
}

/// A key that activates the layer above the current top while held.
pub const NEXT_MOMENTARY: Key = Key::new(TARGET_NEXT + SHIFT_OFFSET, SWITCH);

/// A key that activates the layer below the current top while held.
pub const PREVIOUS_MOMENTARY: Key = Key::new(TARGET_PREVIOUS + SHIFT_OFFSET, SWITCH);

/// Build a keymap from a sparse list of `(index, key)` entries.  Anything
/// not listed is transparent.
pub const fn keymap(entries: &[(usize, Key)]) -> Keymap {
    let mut map = [None; NKEYS];
    let mut i = 0;
    while i < entries.len() {
        map[entries[i].0] = Some(entries[i].1);
        i += 1;
    }
    map
}

/// The layer stack and its caches.
pub struct Layers {
    keymaps: &'static [Keymap],
    default_layer: u8,
    /// Active layers in activation order.  The default layer is not stored
    /// here, it is always the bottom of every lookup.
    active: ArrayVec<u8, MAX_LAYERS>,
    /// The live composite keymap: the key each address resolved to at its
    /// most recent press edge.
    live: [Key; NKEYS],
}

impl Layers {
    pub fn new(keymaps: &'static [Keymap]) -> Layers {
        let mut this = Layers {
            keymaps,
            default_layer: 0,
            active: ArrayVec::new(),
            live: [Key::NONE; NKEYS],
        };
        // Prime the cache so early lookups see the default layer rather
        // than garbage.
        for index in 0..NKEYS {
            this.live[index] = this.resolve(KeyAddr::from_index(index as u8));
        }
        this
    }

    /// Change the default layer, the one every lookup bottoms out on.
    /// Out of range values are ignored.
    pub fn set_default_layer(&mut self, layer: u8) {
        if layer as usize >= self.keymaps.len() {
            warn!("default layer out of range: {}", layer);
            return;
        }
        self.default_layer = layer;
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub fn is_active(&self, layer: u8) -> bool {
        self.active.contains(&layer)
    }

    /// The layer a lookup consults first.
    pub fn top_layer(&self) -> u8 {
        self.active.last().copied().unwrap_or(self.default_layer)
    }

    /// The key this address resolves to right now.  This reads the live
    /// composite keymap, so mid-press layer changes do not change the
    /// answer for a held key.  Invalid addresses resolve to `Key::NONE`.
    pub fn lookup(&self, addr: KeyAddr) -> Key {
        if !addr.is_valid() {
            return Key::NONE;
        }
        self.live[addr.index()]
    }

    /// Commit a fresh stack walk for this address to the cache.  Called on
    /// press edges where the caller has no pre-resolved key, or where the
    /// press is ephemeral and must not pin a caller-supplied identity.
    pub(crate) fn update_live_composite(&mut self, addr: KeyAddr) {
        self.live[addr.index()] = self.resolve(addr);
    }

    /// Commit a caller-supplied key for this address to the cache.
    pub(crate) fn update_live_composite_with(&mut self, addr: KeyAddr, key: Key) {
        self.live[addr.index()] = key;
    }

    /// Walk the stack, top to default, and return the first layer's
    /// non-transparent entry for this address.
    fn resolve(&self, addr: KeyAddr) -> Key {
        for &layer in self.active.iter().rev() {
            if let Some(key) = self.keymaps[layer as usize][addr.index()] {
                return key;
            }
        }
        match self.keymaps.get(self.default_layer as usize) {
            Some(map) => map[addr.index()].unwrap_or(Key::NONE),
            None => Key::NONE,
        }
    }

    /// The layer logic's turn at an event, after the plugin chain.  Keys
    /// that are not layer switches pass through untouched.  Layer-switch
    /// keys are applied to the stack and consumed: the return is `None`,
    /// which stops the pipeline before default handling.
    pub(crate) fn event_handler(
        &mut self,
        key: Key,
        _addr: KeyAddr,
        state: KeyState,
    ) -> Option<Key> {
        if key.flags() != SWITCH {
            return Some(key);
        }
        self.handle_switch_key(key.code(), state);
        None
    }

    fn handle_switch_key(&mut self, code: u16, state: KeyState) {
        if code >= SHIFT_OFFSET {
            match code - SHIFT_OFFSET {
                TARGET_NEXT => {
                    if state.toggled_on() {
                        self.activate(self.top_layer().saturating_add(1));
                    } else if state.toggled_off() {
                        self.deactivate_most_recent();
                    }
                }
                TARGET_PREVIOUS => {
                    if state.toggled_on() {
                        let top = self.top_layer();
                        if top == 0 {
                            warn!("layer previous at the bottom");
                        } else {
                            self.activate(top - 1);
                        }
                    } else if state.toggled_off() {
                        self.deactivate_most_recent();
                    }
                }
                target => {
                    // Momentary shift.  is_pressed rather than toggled_on
                    // so a shift deactivated behind our back comes back
                    // while the key is still held.
                    let target = target as u8;
                    if state.is_pressed() {
                        if !self.is_active(target) {
                            self.activate(target);
                        }
                    } else if state.toggled_off() {
                        self.deactivate(target);
                    }
                }
            }
        } else if state.toggled_on() {
            let target = code as u8;
            if self.is_active(target) && target != self.default_layer {
                self.deactivate(target);
            } else {
                self.activate(target);
            }
        }
    }

    fn activate(&mut self, layer: u8) {
        if layer as usize >= self.keymaps.len() {
            warn!("layer out of range: {}", layer);
            return;
        }
        if self.is_active(layer) {
            return;
        }
        if self.active.try_push(layer).is_err() {
            warn!("layer stack full");
            return;
        }
        info!("layer on: {}", layer);
    }

    fn deactivate(&mut self, layer: u8) {
        if let Some(pos) = self.active.iter().position(|&l| l == layer) {
            self.active.remove(pos);
            info!("layer off: {}", layer);
        }
    }

    fn deactivate_most_recent(&mut self) {
        if let Some(layer) = self.active.pop() {
            info!("layer off: {}", layer);
        }
    }
}

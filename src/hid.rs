//! HID output boundary.
//!
//! The dispatch pipeline ends by calling into this trait.  The firmware's
//! USB (or BLE) stack implements it by folding the calls into the next
//! outgoing reports; the tests implement it by recording the calls.
//!
//! The adapter receives the key exactly as the pipeline resolved it.
//! Expanding held-modifier flags into modifier usages is the adapter's
//! job, but it must not re-derive or second-guess the flags beyond that.

use crate::key::Key;

pub trait HidOutput {
    /// Add a key to the keyboard report.  With `edge` set this is a fresh
    /// key-down.  With `edge` clear it re-asserts a key that is already
    /// down, for report layouts that need periodic re-assertion, and must
    /// not register as a second press.
    fn press_key(&mut self, key: Key, edge: bool);

    /// Remove a key from the keyboard report.
    fn release_key(&mut self, key: Key);

    /// Add a consumer-control usage to the consumer report.
    fn press_consumer_control(&mut self, key: Key);

    /// Press the system-control usage.  System control is modeled as a
    /// momentary trigger, so every press is paired with an immediate
    /// release.
    fn press_system_control(&mut self, key: Key);

    /// Release the system-control usage.
    fn release_system_control(&mut self, key: Key);
}

//! Plugin hooks.
//!
//! Every key event is offered to an ordered chain of handlers before the
//! layer logic and default handling get their turn.  The chain is fixed at
//! startup: the firmware builds a list of handler references and passes it
//! into every dispatch call, so the order is deterministic and there is no
//! registration state hiding anywhere.
//!
//! A handler sees every event, including events with invalid addresses and
//! events for keys it has no interest in.  Filtering on key flags is the
//! handler's own job.  Handlers must not fail: there is no recovery path in
//! the middle of the chain, so a handler that hits an internal problem
//! should report it through its own side channel and return `Ok`.

use crate::addr::KeyAddr;
use crate::key::Key;
use crate::state::KeyState;

/// What a handler decided about an event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventHandlerResult {
    /// Not mine, or mine but others should still see it.  The chain
    /// continues.
    Ok,
    /// Handled.  The rest of the chain and default handling are skipped,
    /// but the layer logic still sees the event so layer keys never miss
    /// an edge.
    EventConsumed,
    /// Stop everything, including the layer logic and default handling.
    Abort,
}

/// A handler in the key event chain.
///
/// Both methods default to a no-op `Ok`, so a plugin implements only the
/// form it uses.  The row/column form is the older interface; the
/// dispatcher calls both, address form first, and a plugin should
/// implement exactly one of them.
pub trait KeyswitchHandler {
    fn on_keyswitch_event(
        &mut self,
        key: Key,
        addr: KeyAddr,
        state: KeyState,
    ) -> EventHandlerResult {
        let _ = (key, addr, state);
        EventHandlerResult::Ok
    }

    /// Legacy row/column form.  For an invalid address the row and column
    /// are out of range; handlers that index by position must check.
    fn on_keyswitch_event_rc(
        &mut self,
        key: Key,
        row: u8,
        col: u8,
        state: KeyState,
    ) -> EventHandlerResult {
        let _ = (key, row, col, state);
        EventHandlerResult::Ok
    }
}

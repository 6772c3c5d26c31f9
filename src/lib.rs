//! BBQ keyboard event dispatch
//!
//! This crate is the piece of the firmware that sits between the matrix
//! scanner and the HID report builders.  The scanner hands us clean
//! per-address press and release edges.  For each edge we resolve the
//! address against the active layer stack, offer the result to every
//! registered plugin in a fixed order, and finally emit keyboard,
//! consumer-control, or system-control actions through the
//! [`hid::HidOutput`] boundary.
//!
//! None of the hardware specifics live here: no scanning, no debouncing, no
//! USB descriptors, no LED effects.  Everything runs synchronously inside
//! one iteration of the scan loop, and every step is bounded, so the loop's
//! latency budget holds.  See the [`dispatch`] module for the pipeline
//! itself and the ordering rules that plugins can rely on.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod addr;
pub mod dispatch;
pub mod hid;
pub mod hooks;
pub mod key;
pub mod layers;
pub mod masking;
pub mod settings;
pub mod state;

pub use addr::KeyAddr;
pub use dispatch::Dispatch;
pub use hooks::{EventHandlerResult, KeyswitchHandler};
pub use key::{Key, KeyFlags};
pub use layers::{Keymap, Layers};
pub use state::KeyState;

// The logical key codes come straight from the HID pages.
pub use usbd_human_interface_device::page::{Consumer, Keyboard};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        mod log {
            pub use defmt::{info, warn};
        }
    } else if #[cfg(feature = "log")] {
        mod log {
            pub use log::{info, warn};
        }
    } else {
        mod log {
            macro_rules! nop_log {
                ($($arg:expr),* $(,)?) => { { $( let _ = &$arg; )* } };
            }
            pub(crate) use nop_log as info;
            pub(crate) use nop_log as warn;
        }
    }
}

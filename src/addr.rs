//! Physical key addresses.
//!
//! A [`KeyAddr`] names one switch position in the scan matrix.  Internally
//! it is the linearized index `row * COLS + col`, which keeps the
//! per-address tables (the live composite keymap, the mask set) simple
//! arrays.
//!
//! Not every event has a physical origin.  Injected events (macros, remote
//! control) may carry [`KeyAddr::INVALID`], and everything that indexes an
//! address-sized table must check [`KeyAddr::is_valid`] first.  The
//! dispatch pipeline does this once up front; plugins receive the address
//! as-is and must make the same check before using it as an index.

/// Rows in the scan matrix.
pub const ROWS: usize = 4;

/// Columns in the scan matrix.
pub const COLS: usize = 16;

/// Total number of key positions.
pub const NKEYS: usize = ROWS * COLS;

/// The address of a single key switch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyAddr(u8);

impl KeyAddr {
    /// The address used for events with no physical origin.
    pub const INVALID: KeyAddr = KeyAddr(0xff);

    /// Address of the switch at the given matrix position.
    pub const fn new(row: u8, col: u8) -> KeyAddr {
        KeyAddr(row * COLS as u8 + col)
    }

    /// Address from a linearized index.
    pub const fn from_index(index: u8) -> KeyAddr {
        KeyAddr(index)
    }

    /// Does this address name a real switch position?
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < NKEYS
    }

    /// The linearized index.  Only meaningful when the address is valid.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> u8 {
        self.0 / COLS as u8
    }

    pub const fn col(self) -> u8 {
        self.0 % COLS as u8
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyAddr {
    fn format(&self, fmt: defmt::Formatter) {
        if self.is_valid() {
            defmt::write!(fmt, "KeyAddr({}, {})", self.row(), self.col());
        } else {
            defmt::write!(fmt, "KeyAddr(invalid)");
        }
    }
}

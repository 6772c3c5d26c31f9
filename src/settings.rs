//! Persistent settings boundary.
//!
//! The dispatch core keeps no persistent state of its own, but the
//! collaborators around it (keymap overrides, plugin configuration) share
//! one fixed-size byte-addressable store, guarded by a CRC-16 over the
//! stored region so a half-written or erased store is never trusted.  The
//! CRC parameters are width 16, polynomial 0x8005, bit-reflected, initial
//! value 0, which the crc crate knows as CRC-16/ARC.
//!
//! This module defines the store trait and the guard.  The core itself
//! never reads or writes the store.

use crc::{Crc, CRC_16_ARC};

pub const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// A fixed-size byte-addressable store, EEPROM-shaped.
pub trait SettingsStore {
    type Error;

    /// Total capacity in bytes.
    fn capacity(&self) -> usize;

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Self::Error>;
}

/// A CRC-guarded region of a store.  The two bytes after the region hold
/// the CRC of its contents, little-endian.
#[derive(Clone, Copy, Debug)]
pub struct GuardedRegion {
    offset: usize,
    len: usize,
}

impl GuardedRegion {
    pub const fn new(offset: usize, len: usize) -> GuardedRegion {
        GuardedRegion { offset, len }
    }

    /// Bytes of store this region occupies, checksum included.
    pub const fn footprint(&self) -> usize {
        self.len + 2
    }

    /// Does the stored checksum match the region's contents?
    pub fn is_valid<S: SettingsStore>(&self, store: &S) -> Result<bool, S::Error> {
        let crc = self.checksum(store)?;
        let mut stored = [0u8; 2];
        store.read(self.offset + self.len, &mut stored)?;
        Ok(crc == u16::from_le_bytes(stored))
    }

    /// Recompute and store the checksum, declaring the region's current
    /// contents good.
    pub fn seal<S: SettingsStore>(&self, store: &mut S) -> Result<(), S::Error> {
        let crc = self.checksum(store)?;
        store.write(self.offset + self.len, &crc.to_le_bytes())
    }

    fn checksum<S: SettingsStore>(&self, store: &S) -> Result<u16, S::Error> {
        let mut digest = CRC.digest();
        let mut buf = [0u8; 16];
        let mut pos = 0;
        while pos < self.len {
            let count = buf.len().min(self.len - pos);
            store.read(self.offset + pos, &mut buf[..count])?;
            digest.update(&buf[..count]);
            pos += count;
        }
        Ok(digest.finalize())
    }
}

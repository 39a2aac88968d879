// ncgc/src/protocol/key2.rs
//! KEY2 (second encrypted regime) seeding and the software keystream.
//!
//! The card and host derive a shared stream-cipher state from a header seed
//! byte and the session seed value `mn`. Platforms with hardware KEY2
//! support hand the pair to the cart bus registers; platforms without it use
//! [`Keystream`] to cipher bytes in software. The session retains the seed
//! pair either way.

use crate::constants::{KEY2_SEED_TABLE, KEY2_Y_INIT};

/// Compute the initial KEY2 `(x, y)` register pair.
///
/// The low 3 bits of the header seed byte select one of eight fixed seed
/// bytes; `y` is a protocol constant.
pub fn seed(seed_byte: u8, mn: u32) -> (u64, u64) {
    let x = KEY2_SEED_TABLE[(seed_byte & 7) as usize] as u64 + ((mn as u64) << 15) + 0x6000;
    (x, KEY2_Y_INIT)
}

/// Per-session KEY2 state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Key2State {
    /// The KEY2 seed byte, as in the header.
    pub seed_byte: u8,
    /// The KEY2 ROMCNT settings, as used.
    pub romcnt: u32,
    /// The KEY2 seed value `mn`, set on KEY1 entry.
    pub mn: u32,
    /// The chip ID obtained in KEY2 mode.
    pub chipid: u32,
    /// The KEY2 register X.
    pub x: u64,
    /// The KEY2 register Y.
    pub y: u64,
}

/// Reverse the low 39 bits of `i`.
fn flip39(i: u64) -> u64 {
    (0..39)
        .filter(|b| i & (1 << b) != 0)
        .map(|b| 1u64 << (38 - b))
        .sum()
}

/// Software KEY2 stream cipher.
///
/// The registers are two 39-bit LFSRs; the wire representation of the seed
/// pair is bit-reversed relative to the register representation, so
/// construction flips both values.
#[derive(Debug, Clone, Copy)]
pub struct Keystream {
    x: u64,
    y: u64,
}

impl Keystream {
    /// Build a keystream from the seed pair produced by [`seed`].
    pub fn new(x: u64, y: u64) -> Self {
        Self {
            x: flip39(x),
            y: flip39(y),
        }
    }

    /// Advance both registers one step and cipher a single byte.
    pub fn cipher_byte(&mut self, byte: u8) -> u8 {
        let x = self.x;
        let y = self.y;
        self.x = (((x >> 5) ^ (x >> 17) ^ (x >> 18) ^ (x >> 31)) & 0xFF) + (x << 8);
        self.y = (((y >> 5) ^ (y >> 23) ^ (y >> 18) ^ (y >> 31)) & 0xFF) + (y << 8);
        byte ^ ((self.x ^ self.y) & 0xFF) as u8
    }

    /// Cipher a buffer in place.
    pub fn cipher_bytes(&mut self, bytes: &mut [u8]) {
        for byte in bytes.iter_mut() {
            *byte = self.cipher_byte(*byte);
        }
    }
}

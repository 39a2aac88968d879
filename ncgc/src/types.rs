// ncgc/src/types.rs
//! Session-level data types: the encryption regime and the parsed header.

use std::fmt;

use crate::constants::{
    HEADER_OFF_GAME_CODE, HEADER_OFF_KEY1_ROMCNT, HEADER_OFF_KEY2_ROMCNT, HEADER_OFF_KEY2_SEED,
    HEADER_PARSED_SIZE,
};
use crate::{Error, Result};

/// Encryption regime the link is currently in.
///
/// The state only ever advances `Raw -> Key1 -> Key2`. A failed chip ID
/// verification drops the session into `Unknown`, which is terminal: the
/// session must be discarded and rebuilt to retry from `Raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionState {
    /// Unencrypted initial regime, used for reset and discovery only.
    #[default]
    Raw,
    /// Block-cipher-encoded command mode (first encrypted regime).
    Key1,
    /// Stream-keystream-encoded mode (second encrypted regime).
    Key2,
    /// Terminal failure state after a verification mismatch.
    Unknown,
}

impl fmt::Display for EncryptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionState::Raw => write!(f, "raw"),
            EncryptionState::Key1 => write!(f, "KEY1"),
            EncryptionState::Key2 => write!(f, "KEY2"),
            EncryptionState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Fields the protocol core consumes from the 0x1000-byte card header.
///
/// Captured once during `initialize` and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHeader {
    /// The game code at offset 0x0C.
    pub game_code: u32,
    /// The default KEY1 ROMCNT settings, as in the header (offset 0x64).
    pub key1_romcnt: u32,
    /// The default KEY2 ROMCNT settings, as in the header (offset 0x60).
    pub key2_romcnt: u32,
    /// The KEY2 seed byte at offset 0x13.
    pub key2_seed_byte: u8,
}

impl CardHeader {
    /// Parse the header fields from a captured header block.
    ///
    /// `buf` must hold at least the first 0x68 bytes of the header; all
    /// fields are little-endian.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_PARSED_SIZE {
            return Err(Error::InvalidLength {
                expected: HEADER_PARSED_SIZE,
                actual: buf.len(),
            });
        }

        let word = |off: usize| {
            u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
        };

        Ok(Self {
            game_code: word(HEADER_OFF_GAME_CODE),
            key1_romcnt: word(HEADER_OFF_KEY1_ROMCNT),
            key2_romcnt: word(HEADER_OFF_KEY2_ROMCNT),
            key2_seed_byte: buf[HEADER_OFF_KEY2_SEED],
        })
    }

    /// Derive the 3-word KEY1 cipher key from the game code.
    pub fn key1_key(&self) -> [u32; 3] {
        [
            self.game_code,
            self.game_code >> 1,
            self.game_code.wrapping_shl(1),
        ]
    }
}

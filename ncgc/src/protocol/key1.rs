// ncgc/src/protocol/key1.rs
//! KEY1 (first encrypted regime) command construction.
//!
//! KEY1 commands interleave the opcode, argument, session nonce and command
//! counter into fixed, non-contiguous nibble positions of a 64-bit word, then
//! encrypt the byte-swapped word with the session's cipher schedule. The bit
//! layout is protocol-mandated and must be reproduced exactly.

use crate::cipher::{boxed_schedule, CipherAdapter, ScheduleTable};
use crate::constants::CMD_RAW_ACTIVATE_KEY1;

/// Interleave `(cmd, arg, ij, k)` into the KEY1 command layout.
///
/// Reading the result most-significant byte first, with `C` = opcode nibble,
/// `A` = argument, `I`/`J` = nonce halves and `K` = counter:
/// `KK KK JK JJ II AI AA CA`.
pub fn interleave(cmd: u8, arg: u16, ij: u32, k: u32) -> u64 {
    debug_assert!(cmd <= 0xF, "KEY1 opcode must fit in 4 bits");
    let arg = arg as u64;
    let ij = ij as u64;
    let k = k as u64;

    (((cmd & 0xF) as u64) << 4)
        | ((arg & 0xF000) >> 12)
        | ((arg & 0x0FF0) << 4)
        | ((arg & 0x000F) << 20)
        | ((ij & 0xF0_0000) >> 4)
        | ((ij & 0x0F_F000) << 12)
        | ((ij & 0x00_0FF0) << 28)
        | ((ij & 0x00_000F) << 44)
        | ((k & 0xF_0000) << 24)
        | ((k & 0x0_FF00) << 40)
        | ((k & 0x0_00FF) << 56)
}

/// Build the raw (unencrypted) KEY1 activation command word.
///
/// Layout, most-significant byte first: `00 KK KK 0K JJ IJ II 3C`. Only the
/// nonce and counter are embedded; no cipher is applied.
pub fn activation_payload(ij: u32, k: u32) -> u64 {
    let ij = ij as u64;
    let k = k as u64;

    CMD_RAW_ACTIVATE_KEY1 as u64
        | ((ij & 0xFF_0000) >> 8)
        | ((ij & 0x00_FF00) << 8)
        | ((ij & 0x00_00FF) << 24)
        | ((k & 0xF_0000) << 16)
        | ((k & 0x0_FF00) << 32)
        | ((k & 0x0_00FF) << 48)
}

/// Per-session KEY1 state: cipher schedule, derived key, nonce and counter.
pub struct Key1State {
    /// The chip ID obtained in KEY1 mode.
    pub chipid: u32,
    /// The KEY1 ROMCNT settings, as used.
    pub romcnt: u32,
    /// Cipher schedule (P-array and S-boxes) after key application.
    pub schedule: Box<ScheduleTable>,
    /// The 3-word key derived from the game code.
    pub key: [u32; 3],
    /// The session nonce `iiijjj`.
    pub ij: u32,
    /// The command counter, advanced on every encoded command.
    pub k: u32,
    /// The per-command nonce `llll`.
    pub l: u16,
}

impl Default for Key1State {
    fn default() -> Self {
        Self {
            chipid: 0,
            romcnt: 0,
            schedule: boxed_schedule(),
            key: [0; 3],
            ij: 0,
            k: 0,
            l: 0,
        }
    }
}

impl Key1State {
    /// Encode one KEY1 command: interleave, byte-swap, encrypt in place,
    /// byte-swap back to wire order.
    ///
    /// Consumes one counter value; `k` advances even if the command is never
    /// sent, since the card-side counter cannot be rolled back either.
    pub fn encode_command(&mut self, cipher: &dyn CipherAdapter, cmd: u8, arg: u16, ij: u32) -> u64 {
        let k = self.k;
        self.k = self.k.wrapping_add(1);

        let mut block = interleave(cmd, arg, ij, k).swap_bytes();
        cipher.encrypt_block(&self.schedule, &mut block);
        block.swap_bytes()
    }
}

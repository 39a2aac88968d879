// ncgc/src/cipher.rs
//! Contract for the external KEY1 block cipher.
//!
//! The cipher primitive itself (a key-scheduled block cipher over a fixed
//! substitution/permutation table) lives outside this crate. The protocol
//! core consumes it through exactly two operations and never inspects the
//! schedule contents.

/// Number of 32-bit words in a cipher schedule: an 18-word P-array plus
/// four 256-word S-boxes (0x1048 bytes).
pub const SCHEDULE_WORDS: usize = 18 + 4 * 256;

/// The cipher's key schedule state, owned by the session.
pub type ScheduleTable = [u32; SCHEDULE_WORDS];

/// Adapter over the external block cipher.
pub trait CipherAdapter {
    /// Mix a 3-word key into the schedule.
    ///
    /// Each call mixes further; the session applies the derived key twice
    /// in sequence during setup.
    fn apply_key(&self, schedule: &mut ScheduleTable, key: &[u32; 3]);

    /// Encrypt one 64-bit block in place using the current schedule.
    fn encrypt_block(&self, schedule: &ScheduleTable, block: &mut u64);
}

/// Allocate a zeroed schedule on the heap.
pub fn boxed_schedule() -> Box<ScheduleTable> {
    Box::new([0u32; SCHEDULE_WORDS])
}

// ncgc/src/platform/traits.rs
//! The trait a physical cart bus binding implements.

use thiserror::Error;

use crate::protocol::flags::ControlWord;

/// Error reported by the platform layer.
///
/// The protocol core never retries a failed exchange; retry policy belongs
/// to the platform implementation or the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// The physical link reset did not complete.
    #[error("link reset failed")]
    ResetFailed,

    /// No card is present in the slot.
    #[error("no card inserted")]
    NoCard,

    /// The bus driver reported a negative status.
    #[error("bus transfer failed with status {0}")]
    Bus(i32),

    /// The exchange did not complete in time.
    #[error("operation timed out")]
    Timeout,
}

/// Platform trait abstracts the physical cart bus away from protocol logic.
///
/// One implementation exists per physical link; any state the hardware
/// binding needs (register base, reset callback) is ordinary captured state
/// inside the implementor.
pub trait Platform {
    /// Physically reset the link, leaving the card ready for raw commands.
    fn reset(&mut self) -> Result<(), PlatformError>;

    /// Transmit an 8-byte command word and optionally receive `read_size`
    /// bytes of response into `dest`. Returns a non-negative status on
    /// success.
    ///
    /// `dest` may be shorter than `read_size`; the platform discards the
    /// excess, as the hardware FIFO must be drained regardless.
    fn send_command(
        &mut self,
        cmd: u64,
        read_size: u32,
        dest: Option<&mut [u8]>,
        flags: ControlWord,
    ) -> Result<i32, PlatformError>;

    /// Blocking wait of platform-defined duration units.
    fn io_delay(&mut self, cycles: u32);

    /// Hand the computed KEY2 keystream state to hardware.
    ///
    /// Only invoked when [`hw_key2`](Platform::hw_key2) returns true.
    fn seed_key2(&mut self, x: u64, y: u64);

    /// Whether KEY2 keystream advancement is done in hardware.
    fn hw_key2(&self) -> bool {
        false
    }
}

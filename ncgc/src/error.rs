// ncgc/src/error.rs
//! Error and failure-stage types shared by the protocol core.

use std::fmt;

use thiserror::Error;

use crate::platform::PlatformError;
use crate::types::EncryptionState;

/// Identifies which step of a multi-command operation failed.
///
/// This replaces the original additive error-offset convention (step number
/// times 100 added to the negated platform status) with an explicit tag
/// carrying the same information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Platform link reset during `initialize`.
    Reset,
    /// The raw dummy wake command after reset.
    RawWake,
    /// The raw-mode chip ID request.
    RawChipId,
    /// The raw-mode 0x1000-byte header read.
    HeaderRead,
    /// The raw 0x3C KEY1 activation command.
    Key1Activate,
    /// The KEY1 command that initialises the KEY2 seed.
    Key2Seed,
    /// The KEY1-mode chip ID request and verification.
    Key1ChipId,
    /// One of the four secure area chunk reads.
    SecureRead {
        /// Index of the failing chunk, 0..4.
        chunk: u8,
    },
    /// The KEY1 command that switches the card into KEY2 mode.
    Key2Activate,
    /// The KEY2-mode chip ID request and verification.
    Key2ChipId,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reset => write!(f, "link reset"),
            Stage::RawWake => write!(f, "raw wake command"),
            Stage::RawChipId => write!(f, "raw chip id"),
            Stage::HeaderRead => write!(f, "header read"),
            Stage::Key1Activate => write!(f, "KEY1 activation"),
            Stage::Key2Seed => write!(f, "KEY2 seed init"),
            Stage::Key1ChipId => write!(f, "KEY1 chip id"),
            Stage::SecureRead { chunk } => write!(f, "secure area chunk {}", chunk),
            Stage::Key2Activate => write!(f, "KEY2 activation"),
            Stage::Key2ChipId => write!(f, "KEY2 chip id"),
        }
    }
}

/// Common error type for the protocol core.
#[derive(Error, Debug)]
pub enum Error {
    /// The platform layer reported failure; never retried internally.
    #[error("platform i/o failed during {stage}: {source}")]
    Platform {
        /// The step that was executing when the platform failed.
        stage: Stage,
        /// The underlying platform error.
        #[source]
        source: PlatformError,
    },

    /// A chip ID check failed after a mode transition; the session has
    /// been dropped into the terminal `Unknown` state.
    #[error("chip id mismatch after {stage}: expected {expected:#010x}, got {actual:#010x}")]
    ChipIdMismatch {
        /// The verification step that observed the mismatch.
        stage: Stage,
        /// The raw-mode chip ID baseline.
        expected: u32,
        /// The chip ID returned under the new regime.
        actual: u32,
    },

    /// An operation was invoked while the session is in an incompatible
    /// state.
    #[error("{operation} not valid in state {actual}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The session state at the time of the call.
        actual: EncryptionState,
    },

    /// A caller-supplied buffer does not meet the required size.
    #[error("invalid buffer length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length in bytes.
        expected: usize,
        /// Provided length in bytes.
        actual: usize,
    },
}

impl Error {
    /// Tag a platform error with the stage it occurred in.
    pub(crate) fn platform(stage: Stage, source: PlatformError) -> Self {
        Error::Platform { stage, source }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

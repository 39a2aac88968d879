// ncgc/src/prelude.rs
//! Convenience re-exports for consumers of the crate.

pub use crate::card::CardSession;
pub use crate::cipher::{boxed_schedule, CipherAdapter, ScheduleTable, SCHEDULE_WORDS};
pub use crate::platform::{MockPlatform, Platform, PlatformError};
pub use crate::protocol::{ControlWord, Key1State, Key2State, Keystream};
pub use crate::{CardHeader, EncryptionState, Error, Result, Stage};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced};

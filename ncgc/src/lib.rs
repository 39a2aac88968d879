// ncgc/src/lib.rs

//! ncgc
//!
//! Pure Rust implementation of the NTR game card command protocol: the
//! encryption-state machine, bit-exact command encoding, keystream seeding
//! and control-word handling. The block cipher primitive and the physical
//! cart bus are consumed through the [`cipher::CipherAdapter`] and
//! [`platform::Platform`] traits and live outside this crate.
#![warn(missing_docs)]

pub mod card;
pub mod cipher;
pub mod constants;
pub mod error;
pub mod platform;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the types in `types` are available for consumers and for convenient
// `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;

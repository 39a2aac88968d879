// ncgc/src/utils/mod.rs
//! Small shared utilities.

mod hex;

pub use hex::{bytes_to_hex, bytes_to_hex_spaced};

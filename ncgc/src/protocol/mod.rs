// ncgc/src/protocol/mod.rs
//! Wire-level encoding: control words, KEY1 commands and the KEY2 keystream.

pub mod flags;
pub mod key1;
pub mod key2;

pub use flags::ControlWord;
pub use key1::Key1State;
pub use key2::{Key2State, Keystream};

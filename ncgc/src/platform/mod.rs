// ncgc/src/platform/mod.rs
//! The cart bus abstraction and its recording mock.

pub mod mock;
pub mod traits;

pub use mock::MockPlatform;
pub use traits::{Platform, PlatformError};

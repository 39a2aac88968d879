// fixtures.rs — shared payloads for the integration tests

use ncgc::platform::MockPlatform;
use ncgc::test_support;

pub use ncgc::test_support::{
    chipid_bytes, header_block, initial_schedule, TestCipher, GAME_CODE, KEY1_ROMCNT, KEY2_ROMCNT,
    KEY2_SEED_BYTE, RAW_CHIPID,
};

/// A mock platform seeded with everything `initialize` consumes.
pub fn mock_for_init() -> MockPlatform {
    let mut mock = MockPlatform::new();
    mock.push_response(chipid_bytes());
    mock.push_response(header_block());
    mock
}

/// A session ready for `begin_key1`: initialized, schedule set up, and the
/// KEY1 chip ID response queued.
pub fn session_ready_for_key1() -> ncgc::card::CardSession<MockPlatform> {
    let mut session = test_support::session_with_responses(false);
    session.initialize(None).unwrap();
    let schedule = initial_schedule();
    session.setup_cipher_schedule(&schedule).unwrap();
    session.platform_mut().push_response(chipid_bytes());
    session
}

use ncgc::card::CardSession;
use ncgc::constants::{CMD_RAW_CHIPID, CMD_RAW_DUMMY, CMD_RAW_HEADER_READ, HEADER_READ_SIZE};
use ncgc::platform::{MockPlatform, PlatformError};
use ncgc::{EncryptionState, Error, Stage};

use crate::fixtures::{self, TestCipher, GAME_CODE, KEY1_ROMCNT, KEY2_ROMCNT, RAW_CHIPID};

#[test]
fn initialize_sends_wake_chipid_header_in_order() {
    let mut session = CardSession::new(fixtures::mock_for_init(), Box::new(TestCipher));
    session.initialize(None).unwrap();

    let words = session.platform().sent_words();
    assert_eq!(
        words,
        vec![
            CMD_RAW_DUMMY as u64,
            CMD_RAW_CHIPID as u64,
            CMD_RAW_HEADER_READ as u64
        ]
    );
    assert_eq!(session.platform().resets, 1);
}

#[test]
fn initialize_header_read_timing() {
    let mut session = CardSession::new(fixtures::mock_for_init(), Box::new(TestCipher));
    session.initialize(None).unwrap();

    let header_read = &session.platform().sent[2];
    assert_eq!(header_read.read_size, HEADER_READ_SIZE as u32);
    assert!(header_read.flags.slow_clock());
    assert_eq!(header_read.flags.predelay(), 0x1FFF);
    assert_eq!(header_read.flags.postdelay(), 0x3F);
}

#[test]
fn initialize_parses_header_fields() {
    let mut session = CardSession::new(fixtures::mock_for_init(), Box::new(TestCipher));
    session.initialize(None).unwrap();

    let header = session.header().unwrap();
    assert_eq!(header.game_code, GAME_CODE);
    assert_eq!(header.key1_romcnt, KEY1_ROMCNT);
    assert_eq!(header.key2_romcnt, KEY2_ROMCNT);
    assert_eq!(session.raw_chipid(), RAW_CHIPID);
}

#[test]
fn reset_failure_is_stage_tagged() {
    let mut mock = MockPlatform::new();
    mock.fail_reset = true;
    let mut session = CardSession::new(mock, Box::new(TestCipher));

    match session.initialize(None) {
        Err(Error::Platform {
            stage: Stage::Reset,
            source,
        }) => assert_eq!(source, PlatformError::ResetFailed),
        other => panic!("expected reset failure, got {:?}", other),
    }
    assert_eq!(session.encryption_state(), EncryptionState::Raw);
}

#[test]
fn wake_failure_is_stage_tagged() {
    let mut mock = fixtures::mock_for_init();
    mock.fail_command_at(0, PlatformError::Bus(-4));
    let mut session = CardSession::new(mock, Box::new(TestCipher));

    match session.initialize(None) {
        Err(Error::Platform {
            stage: Stage::RawWake,
            source,
        }) => assert_eq!(source, PlatformError::Bus(-4)),
        other => panic!("expected wake failure, got {:?}", other),
    }
}

#[test]
fn missing_chipid_response_surfaces_as_raw_chipid_stage() {
    let mock = MockPlatform::new();
    let mut session = CardSession::new(mock, Box::new(TestCipher));

    match session.initialize(None) {
        Err(Error::Platform {
            stage: Stage::RawChipId,
            source,
        }) => assert_eq!(source, PlatformError::Timeout),
        other => panic!("expected chip id stage failure, got {:?}", other),
    }
    // A failed initialize may be retried; the session never became
    // initialized.
    let mut mock = fixtures::mock_for_init();
    std::mem::swap(session.platform_mut(), &mut mock);
    session.initialize(None).unwrap();
}

#[test]
fn short_caller_buffer_is_rejected() {
    let mut session = CardSession::new(fixtures::mock_for_init(), Box::new(TestCipher));
    let mut buf = vec![0u8; 0x20];
    match session.initialize(Some(&mut buf[..])) {
        Err(Error::InvalidLength { expected, actual }) => {
            assert_eq!(expected, 0x68);
            assert_eq!(actual, 0x20);
        }
        other => panic!("expected InvalidLength, got {:?}", other),
    }
}

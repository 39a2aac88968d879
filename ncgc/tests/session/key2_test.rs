use ncgc::constants::CMD_KEY2_CHIPID;
use ncgc::platform::PlatformError;
use ncgc::test_support::{chipid_bytes, session_in_key1, RAW_CHIPID};
use ncgc::{EncryptionState, Error, Stage};

#[test]
fn full_handshake_reaches_key2() {
    let mut session = session_in_key1();
    session.platform_mut().push_response(chipid_bytes());
    session.begin_key2().unwrap();

    assert_eq!(session.encryption_state(), EncryptionState::Key2);
    assert_eq!(session.raw_chipid(), RAW_CHIPID);
}

#[test]
fn key2_chipid_request_is_raw_with_header_timing() {
    let mut session = session_in_key1();
    session.platform_mut().push_response(chipid_bytes());
    session.begin_key2().unwrap();

    let chipid_cmd = session.platform().sent.last().unwrap();
    assert_eq!(chipid_cmd.cmd, CMD_KEY2_CHIPID as u64);
    assert_eq!(chipid_cmd.read_size, 4);
}

#[test]
fn activation_failure_keeps_key1_and_allows_retry() {
    let mut session = session_in_key1();
    let next = session.platform().sent.len();
    session
        .platform_mut()
        .fail_command_at(next, PlatformError::Bus(-2));

    match session.begin_key2() {
        Err(Error::Platform {
            stage: Stage::Key2Activate,
            ..
        }) => {}
        other => panic!("expected activation failure, got {:?}", other),
    }
    assert_eq!(session.encryption_state(), EncryptionState::Key1);

    // Still in KEY1, the caller may try again.
    session.platform_mut().fail_command = None;
    session.platform_mut().push_response(chipid_bytes());
    session.begin_key2().unwrap();
    assert_eq!(session.encryption_state(), EncryptionState::Key2);
}

#[test]
fn mismatch_is_terminal() {
    let mut session = session_in_key1();
    session.platform_mut().push_response(vec![1, 2, 3, 4]);

    match session.begin_key2() {
        Err(Error::ChipIdMismatch {
            stage: Stage::Key2ChipId,
            expected,
            actual,
        }) => {
            assert_eq!(expected, RAW_CHIPID);
            assert_eq!(actual, u32::from_le_bytes([1, 2, 3, 4]));
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
    assert_eq!(session.encryption_state(), EncryptionState::Unknown);

    // No operation makes progress from Unknown.
    session.platform_mut().push_response(chipid_bytes());
    assert!(matches!(
        session.begin_key2(),
        Err(Error::InvalidState { .. })
    ));
}

#[test]
fn begin_key2_from_raw_is_rejected() {
    let mut session = ncgc::test_support::session_with_responses(false);
    session.initialize(None).unwrap();
    assert!(matches!(
        session.begin_key2(),
        Err(Error::InvalidState { .. })
    ));
}

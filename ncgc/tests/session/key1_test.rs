use ncgc::constants::{KEY1_INIT_IJ, KEY1_INIT_K, KEY1_INIT_MN, KEY2_SEED_TABLE, KEY2_Y_INIT};
use ncgc::platform::PlatformError;
use ncgc::protocol::key1::activation_payload;
use ncgc::test_support::session_with_responses;
use ncgc::{EncryptionState, Error, Stage};

use crate::fixtures::{self, chipid_bytes, initial_schedule, KEY2_SEED_BYTE};

#[test]
fn full_key1_entry_verifies_chip_id() {
    let mut session = fixtures::session_ready_for_key1();
    session.begin_key1().unwrap();

    assert_eq!(session.encryption_state(), EncryptionState::Key1);
    assert_eq!(session.key1_counter(), KEY1_INIT_K + 2);
}

#[test]
fn activation_word_uses_fixed_nonce_and_counter() {
    let mut session = fixtures::session_ready_for_key1();
    session.begin_key1().unwrap();

    let activation = session.platform().sent[3].cmd;
    assert_eq!(activation, activation_payload(KEY1_INIT_IJ, KEY1_INIT_K));
    // With the protocol's fixed constants this is a known word.
    assert_eq!(activation, 0x0046_9D03_73A4_113C);
}

#[test]
fn key2_seed_values_follow_header_seed_byte() {
    let mut session = fixtures::session_ready_for_key1();
    session.begin_key1().unwrap();

    let (x, y) = session.key2_seed();
    let expected_x = KEY2_SEED_TABLE[(KEY2_SEED_BYTE & 7) as usize] as u64
        + ((KEY1_INIT_MN as u64) << 15)
        + 0x6000;
    assert_eq!(x, expected_x);
    assert_eq!(y, KEY2_Y_INIT);
}

#[test]
fn hardware_seeding_receives_the_retained_pair() {
    let mut session = session_with_responses(true);
    session.initialize(None).unwrap();
    let schedule = initial_schedule();
    session.setup_cipher_schedule(&schedule).unwrap();
    session.platform_mut().push_response(chipid_bytes());
    session.begin_key1().unwrap();

    assert_eq!(session.platform().seeds, vec![session.key2_seed()]);
}

#[test]
fn software_keystream_available_after_entry() {
    let mut session = fixtures::session_ready_for_key1();
    session.begin_key1().unwrap();

    let mut a = session.key2_keystream();
    let mut b = session.key2_keystream();
    let mut buf_a = [0u8; 4];
    let mut buf_b = [0u8; 4];
    a.cipher_bytes(&mut buf_a);
    b.cipher_bytes(&mut buf_b);
    // Both keystreams start from the retained seed phase.
    assert_eq!(buf_a, buf_b);
}

#[test]
fn seed_init_failure_leaves_raw_state_but_consumes_counter() {
    let mut session = fixtures::session_ready_for_key1();
    // Command index 4 is the KEY1-encoded seed-init command.
    session
        .platform_mut()
        .fail_command_at(4, PlatformError::Bus(-7));

    match session.begin_key1() {
        Err(Error::Platform {
            stage: Stage::Key2Seed,
            ..
        }) => {}
        other => panic!("expected seed-init failure, got {:?}", other),
    }
    assert_eq!(session.encryption_state(), EncryptionState::Raw);
    // The encoder consumed one counter value before the send failed; it is
    // never rolled back.
    assert_eq!(session.key1_counter(), KEY1_INIT_K + 1);
}

#[test]
fn setup_before_initialize_is_rejected() {
    let mut session = session_with_responses(false);
    let schedule = initial_schedule();
    assert!(matches!(
        session.setup_cipher_schedule(&schedule),
        Err(Error::InvalidState { .. })
    ));
}

// ncgc/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! These centralize MockPlatform seeding and the stand-in cipher so tests
//! across the crate and the tests/ directory share the same fixtures.
#![allow(dead_code)]

use crate::card::CardSession;
use crate::cipher::{boxed_schedule, CipherAdapter, ScheduleTable};
use crate::constants::{
    HEADER_OFF_GAME_CODE, HEADER_OFF_KEY1_ROMCNT, HEADER_OFF_KEY2_ROMCNT, HEADER_OFF_KEY2_SEED,
    HEADER_READ_SIZE,
};
use crate::platform::MockPlatform;

/// Game code used by the test header.
pub const GAME_CODE: u32 = 0x4A4D_4441;

/// Chip ID served for every chip ID request in the happy paths.
pub const RAW_CHIPID: u32 = 0xC2FF_01C0;

/// Header default KEY1 ROMCNT used by the test header.
pub const KEY1_ROMCNT: u32 = 0x0041_6657;

/// Header default KEY2 ROMCNT used by the test header.
pub const KEY2_ROMCNT: u32 = 0x0818_08F8;

/// KEY2 seed byte used by the test header.
pub const KEY2_SEED_BYTE: u8 = 0x05;

/// Deterministic stand-in for the external block cipher.
///
/// Not the real cipher, but bijective per block and sensitive to every
/// schedule word touched by `apply_key`, which is all the protocol core
/// assumes.
pub struct TestCipher;

impl CipherAdapter for TestCipher {
    fn apply_key(&self, schedule: &mut ScheduleTable, key: &[u32; 3]) {
        for (i, word) in schedule.iter_mut().enumerate() {
            *word = word
                .rotate_left((i % 31) as u32)
                .wrapping_add(key[i % 3])
                ^ (i as u32).wrapping_mul(0x9E37_79B9);
        }
    }

    fn encrypt_block(&self, schedule: &ScheduleTable, block: &mut u64) {
        let k0 = ((schedule[0] as u64) << 32) | schedule[1] as u64;
        let mut b = block.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ k0;
        b ^= b >> 29;
        *block = b.rotate_left(17) ^ schedule[2] as u64;
    }
}

/// The little-endian chip ID bytes matching [`RAW_CHIPID`].
pub fn chipid_bytes() -> Vec<u8> {
    RAW_CHIPID.to_le_bytes().to_vec()
}

/// A full 0x1000-byte header block with the test fields in place.
pub fn header_block() -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_READ_SIZE];
    buf[HEADER_OFF_GAME_CODE..HEADER_OFF_GAME_CODE + 4].copy_from_slice(&GAME_CODE.to_le_bytes());
    buf[HEADER_OFF_KEY2_SEED] = KEY2_SEED_BYTE;
    buf[HEADER_OFF_KEY2_ROMCNT..HEADER_OFF_KEY2_ROMCNT + 4]
        .copy_from_slice(&KEY2_ROMCNT.to_le_bytes());
    buf[HEADER_OFF_KEY1_ROMCNT..HEADER_OFF_KEY1_ROMCNT + 4]
        .copy_from_slice(&KEY1_ROMCNT.to_le_bytes());
    buf
}

/// An initial cipher schedule with a fixed non-zero pattern.
pub fn initial_schedule() -> Box<ScheduleTable> {
    let mut schedule = boxed_schedule();
    for (i, word) in schedule.iter_mut().enumerate() {
        *word = (i as u32).wrapping_mul(0x0101_0101) ^ 0x243F_6A88;
    }
    schedule
}

/// A fresh session whose mock platform is seeded with the responses
/// `initialize` consumes (raw chip ID, then the header block).
pub fn session_with_responses(hw_key2: bool) -> CardSession<MockPlatform> {
    let mut mock = MockPlatform::new();
    mock.hw_key2 = hw_key2;
    mock.push_response(chipid_bytes());
    mock.push_response(header_block());
    CardSession::new(mock, Box::new(TestCipher))
}

/// A session taken all the way into KEY1 mode against the mock platform.
pub fn session_in_key1() -> CardSession<MockPlatform> {
    let mut session = session_with_responses(false);
    session.initialize(None).unwrap();
    let schedule = initial_schedule();
    session.setup_cipher_schedule(&schedule).unwrap();
    session.platform_mut().push_response(chipid_bytes());
    session.begin_key1().unwrap();
    session
}

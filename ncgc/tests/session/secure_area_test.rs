use ncgc::constants::{SECURE_AREA_SIZE, SECURE_CHUNK_SIZE};
use ncgc::platform::PlatformError;
use ncgc::test_support::session_in_key1;
use ncgc::{Error, Stage};

#[test]
fn secure_area_read_issues_four_encrypted_chunks() {
    let mut session = session_in_key1();
    let sent_before = session.platform().sent.len();
    for chunk in 0u8..4 {
        session
            .platform_mut()
            .push_response(vec![chunk; SECURE_CHUNK_SIZE]);
    }

    let mut dest = [0u8; SECURE_AREA_SIZE];
    session.read_secure_area(&mut dest).unwrap();

    let reads = &session.platform().sent[sent_before..];
    assert_eq!(reads.len(), 4);
    for read in reads {
        assert_eq!(read.read_size, SECURE_CHUNK_SIZE as u32);
        // The command word is already cipher-encoded in software; only the
        // response travels under the KEY2 keystream.
        assert!(!read.flags.key2_command());
        assert!(read.flags.key2_data());
    }
    // Each encoded command consumed a fresh counter value, so all four wire
    // words differ.
    let words: Vec<u64> = reads.iter().map(|r| r.cmd).collect();
    for i in 0..words.len() {
        for j in i + 1..words.len() {
            assert_ne!(words[i], words[j]);
        }
    }
}

#[test]
fn secure_area_chunks_land_in_order() {
    let mut session = session_in_key1();
    for chunk in 0u8..4 {
        session
            .platform_mut()
            .push_response(vec![0xA0 + chunk; SECURE_CHUNK_SIZE]);
    }

    let mut dest = [0u8; SECURE_AREA_SIZE];
    session.read_secure_area(&mut dest).unwrap();

    for chunk in 0usize..4 {
        let slice = &dest[chunk * SECURE_CHUNK_SIZE..(chunk + 1) * SECURE_CHUNK_SIZE];
        assert!(slice.iter().all(|&b| b == 0xA0 + chunk as u8));
    }
}

#[test]
fn failing_chunk_aborts_with_its_index() {
    let mut session = session_in_key1();
    let sent_before = session.platform().sent.len();
    for chunk in 0u8..4 {
        session
            .platform_mut()
            .push_response(vec![chunk; SECURE_CHUNK_SIZE]);
    }
    // Fail the third read command.
    session
        .platform_mut()
        .fail_command_at(sent_before + 2, PlatformError::Bus(-9));

    let mut dest = [0u8; SECURE_AREA_SIZE];
    match session.read_secure_area(&mut dest) {
        Err(Error::Platform {
            stage: Stage::SecureRead { chunk },
            source,
        }) => {
            assert_eq!(chunk, 2);
            assert_eq!(source, PlatformError::Bus(-9));
        }
        other => panic!("expected chunk failure, got {:?}", other),
    }
    // The chunks before the failure are intact.
    assert!(dest[..SECURE_CHUNK_SIZE].iter().all(|&b| b == 0));
    assert!(dest[SECURE_CHUNK_SIZE..2 * SECURE_CHUNK_SIZE]
        .iter()
        .all(|&b| b == 1));
}

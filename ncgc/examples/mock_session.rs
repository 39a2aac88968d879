// Full handshake walkthrough against the mock platform.

// This example drives a CardSession through all three encryption regimes
// without real hardware: the MockPlatform plays the card side, serving the
// chip ID and header responses a real card would return.

use ncgc::constants::{SECURE_AREA_SIZE, SECURE_CHUNK_SIZE};
use ncgc::prelude::*;
use ncgc::test_support::{
    chipid_bytes, header_block, initial_schedule, TestCipher, RAW_CHIPID,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut mock = MockPlatform::new();
    mock.push_response(chipid_bytes());
    mock.push_response(header_block());

    let mut session = CardSession::new(mock, Box::new(TestCipher));

    let mut header = vec![0u8; 0x1000];
    session.initialize(Some(&mut header[..]))?;
    println!(
        "raw chip id: {:#010x} (expected {:#010x})",
        session.raw_chipid(),
        RAW_CHIPID
    );
    println!(
        "header game code bytes: {}",
        bytes_to_hex_spaced(&header[0x0C..0x10])
    );

    let schedule = initial_schedule();
    session.setup_cipher_schedule(&schedule)?;

    session.platform_mut().push_response(chipid_bytes());
    session.begin_key1()?;
    println!("state after KEY1 entry: {}", session.encryption_state());

    for chunk in 0u8..4 {
        session
            .platform_mut()
            .push_response(vec![chunk; SECURE_CHUNK_SIZE]);
    }
    let mut secure_area = [0u8; SECURE_AREA_SIZE];
    session.read_secure_area(&mut secure_area)?;
    println!(
        "secure area first bytes per chunk: {}",
        bytes_to_hex_spaced(&[
            secure_area[0],
            secure_area[SECURE_CHUNK_SIZE],
            secure_area[2 * SECURE_CHUNK_SIZE],
            secure_area[3 * SECURE_CHUNK_SIZE],
        ])
    );

    session.platform_mut().push_response(chipid_bytes());
    session.begin_key2()?;
    println!("state after KEY2 entry: {}", session.encryption_state());

    let (x, y) = session.key2_seed();
    println!("retained KEY2 seed: x={:#x} y={:#x}", x, y);

    let mut keystream = session.key2_keystream();
    let mut sample = [0u8; 8];
    keystream.cipher_bytes(&mut sample);
    println!("keystream sample: {}", bytes_to_hex(&sample));

    Ok(())
}

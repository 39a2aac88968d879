// ncgc/src/constants.rs
//! Protocol constants shared across the crate.

/// Raw-mode dummy command sent once after reset to wake the card.
pub const CMD_RAW_DUMMY: u8 = 0x9F;

/// Raw-mode chip ID request.
pub const CMD_RAW_CHIPID: u8 = 0x90;

/// Raw-mode header read (0x1000 bytes).
pub const CMD_RAW_HEADER_READ: u8 = 0x00;

/// Raw-mode KEY1 activation command byte.
pub const CMD_RAW_ACTIVATE_KEY1: u8 = 0x3C;

/// KEY1 opcode: initialise the KEY2 seed.
pub const CMD_KEY1_INIT_KEY2: u8 = 0x4;

/// KEY1 opcode: chip ID request.
pub const CMD_KEY1_CHIPID: u8 = 0x1;

/// KEY1 opcode: secure area read.
pub const CMD_KEY1_SECURE_READ: u8 = 0x2;

/// KEY1 opcode: switch the card into KEY2 mode.
pub const CMD_KEY1_ACTIVATE_KEY2: u8 = 0xA;

/// KEY2-mode data read command byte.
pub const CMD_KEY2_DATA_READ: u8 = 0xB7;

/// KEY2-mode chip ID request command byte.
pub const CMD_KEY2_CHIPID: u8 = 0xB8;

/// KEY2 seed bytes, selected by the low 3 bits of the header seed byte.
pub const KEY2_SEED_TABLE: [u8; 8] = [0xE8, 0x4D, 0x5A, 0xB1, 0x17, 0x8F, 0x99, 0xD5];

/// Initial value of the KEY2 `y` keystream register.
pub const KEY2_Y_INIT: u64 = 0x5C_879B_9B05;

/// Initial KEY2 seed value `mn`, set on KEY1 entry.
pub const KEY1_INIT_MN: u32 = 0xC9_9ACE;

/// Initial KEY1 nonce `ij`.
pub const KEY1_INIT_IJ: u32 = 0x11_A473;

/// Initial KEY1 command counter `k`.
pub const KEY1_INIT_K: u32 = 0x3_9D46;

/// Cycles waited between the wake command and the raw chip ID request.
pub const INIT_IO_DELAY: u32 = 0x40000;

/// Size of the header block transferred by [`CMD_RAW_HEADER_READ`].
pub const HEADER_READ_SIZE: usize = 0x1000;

/// Number of header bytes the protocol core actually consumes.
pub const HEADER_PARSED_SIZE: usize = 0x68;

/// Byte offset of the game code within the header.
pub const HEADER_OFF_GAME_CODE: usize = 0x0C;

/// Byte offset of the KEY2 seed byte within the header.
pub const HEADER_OFF_KEY2_SEED: usize = 0x13;

/// Byte offset of the default KEY2 ROMCNT word within the header.
pub const HEADER_OFF_KEY2_ROMCNT: usize = 0x60;

/// Byte offset of the default KEY1 ROMCNT word within the header.
pub const HEADER_OFF_KEY1_ROMCNT: usize = 0x64;

/// Total size of the secure area.
pub const SECURE_AREA_SIZE: usize = 0x4000;

/// Size of one secure area transfer chunk in large-block mode.
pub const SECURE_CHUNK_SIZE: usize = 0x1000;

/// Number of secure area chunks read by `read_secure_area`.
pub const SECURE_CHUNK_COUNT: usize = SECURE_AREA_SIZE / SECURE_CHUNK_SIZE;

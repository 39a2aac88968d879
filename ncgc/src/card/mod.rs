// ncgc/src/card/mod.rs
//! The card session state machine.
//!
//! A [`CardSession`] drives one physical card through the three encryption
//! regimes: raw discovery, KEY1 (block-cipher-encoded commands) and KEY2
//! (stream-keystream-encoded link). All persistent protocol state lives
//! here; the encoder and seeder in [`crate::protocol`] are stateless
//! transformations over it, and every byte that crosses the bus goes through
//! the [`Platform`] handle.

use log::{debug, trace};

use crate::cipher::{CipherAdapter, ScheduleTable};
use crate::constants::{
    CMD_KEY1_ACTIVATE_KEY2, CMD_KEY1_CHIPID, CMD_KEY1_INIT_KEY2, CMD_KEY1_SECURE_READ,
    CMD_KEY2_CHIPID, CMD_RAW_CHIPID, CMD_RAW_DUMMY, CMD_RAW_HEADER_READ, HEADER_PARSED_SIZE,
    HEADER_READ_SIZE, INIT_IO_DELAY, KEY1_INIT_IJ, KEY1_INIT_K, KEY1_INIT_MN, SECURE_AREA_SIZE,
    SECURE_CHUNK_COUNT, SECURE_CHUNK_SIZE,
};
use crate::error::Stage;
use crate::platform::Platform;
use crate::protocol::flags::{
    delay1, delay2, ControlWord, FLAGS_CLK_SLOW, FLAGS_DELAY1_MASK, FLAGS_DELAY2_MASK,
    FLAGS_SEC_CMD, FLAGS_SEC_DAT, FLAGS_SEC_EN, FLAGS_SEC_LARGE, FLAGS_WR,
};
use crate::protocol::key1::{activation_payload, Key1State};
use crate::protocol::key2::{self, Key2State, Keystream};
use crate::types::{CardHeader, EncryptionState};
use crate::{Error, Result};

/// A session with one physical card.
///
/// The session is exclusively owned by the caller driving the protocol; it
/// issues at most one outstanding command at a time and provides no internal
/// locking. A session that reached [`EncryptionState::Unknown`] is dead:
/// discard it and build a new one to retry from raw mode.
pub struct CardSession<P: Platform> {
    platform: P,
    cipher: Box<dyn CipherAdapter>,

    raw_chipid: u32,
    header: Option<CardHeader>,
    key1: Key1State,
    key2: Key2State,
    state: EncryptionState,
    initialized: bool,
}

impl<P: Platform> CardSession<P> {
    /// Create a session over the given platform and cipher bindings.
    ///
    /// The session starts uninitialized; call [`initialize`](Self::initialize)
    /// first.
    pub fn new(platform: P, cipher: Box<dyn CipherAdapter>) -> Self {
        Self {
            platform,
            cipher,
            raw_chipid: 0,
            header: None,
            key1: Key1State::default(),
            key2: Key2State::default(),
            state: EncryptionState::Raw,
            initialized: false,
        }
    }

    /// The platform binding.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform binding.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The current encryption regime.
    pub fn encryption_state(&self) -> EncryptionState {
        self.state
    }

    /// The chip ID captured in raw mode.
    pub fn raw_chipid(&self) -> u32 {
        self.raw_chipid
    }

    /// The header fields captured during [`initialize`](Self::initialize).
    pub fn header(&self) -> Option<&CardHeader> {
        self.header.as_ref()
    }

    /// The KEY1 command counter, as it will be used by the next encoded
    /// command.
    pub fn key1_counter(&self) -> u32 {
        self.key1.k
    }

    /// The retained KEY2 seed pair `(x, y)`, computed during
    /// [`begin_key1`](Self::begin_key1).
    pub fn key2_seed(&self) -> (u64, u64) {
        (self.key2.x, self.key2.y)
    }

    /// A software keystream positioned at the start of the KEY2 phase, for
    /// platforms without hardware KEY2 support.
    pub fn key2_keystream(&self) -> Keystream {
        Keystream::new(self.key2.x, self.key2.y)
    }

    /// Initialise the card slot and card: reset, wake, capture the raw chip
    /// ID, and read the header.
    ///
    /// If `header_buf` is provided it must hold at least 0x68 bytes and
    /// receives the header block (up to 0x1000 bytes); otherwise an internal
    /// 0x68-byte capture is parsed and discarded.
    ///
    /// A second call on an already-initialized session is rejected with
    /// [`Error::InvalidState`] before anything touches the bus.
    pub fn initialize(&mut self, header_buf: Option<&mut [u8]>) -> Result<()> {
        if self.initialized {
            return Err(Error::InvalidState {
                operation: "initialize",
                actual: self.state,
            });
        }

        self.platform
            .reset()
            .map_err(|e| Error::platform(Stage::Reset, e))?;
        self.state = EncryptionState::Raw;

        self.platform
            .send_command(
                CMD_RAW_DUMMY as u64,
                0x2000,
                None,
                ControlWord::from_bits(FLAGS_CLK_SLOW | delay2(0x18)),
            )
            .map_err(|e| Error::platform(Stage::RawWake, e))?;

        self.platform.io_delay(INIT_IO_DELAY);

        let mut chipid = [0u8; 4];
        self.platform
            .send_command(
                CMD_RAW_CHIPID as u64,
                4,
                Some(&mut chipid),
                ControlWord::from_bits(FLAGS_CLK_SLOW),
            )
            .map_err(|e| Error::platform(Stage::RawChipId, e))?;
        trace!("raw chip id bytes: {}", crate::utils::bytes_to_hex(&chipid));
        self.raw_chipid = u32::from_le_bytes(chipid);

        self.read_header(header_buf)?;

        self.initialized = true;
        debug!(
            "card initialized, raw chip id {:#010x}, game code {:#010x}",
            self.raw_chipid,
            self.header.map(|h| h.game_code).unwrap_or(0)
        );
        Ok(())
    }

    fn read_header(&mut self, buf: Option<&mut [u8]>) -> Result<()> {
        let mut own = [0u8; HEADER_PARSED_SIZE];
        let dest: &mut [u8] = match buf {
            Some(b) => b,
            None => &mut own,
        };

        self.platform
            .send_command(
                CMD_RAW_HEADER_READ as u64,
                HEADER_READ_SIZE as u32,
                Some(dest),
                ControlWord::from_bits(FLAGS_CLK_SLOW | delay1(0x1FFF) | delay2(0x3F)),
            )
            .map_err(|e| Error::platform(Stage::HeaderRead, e))?;

        let header = CardHeader::parse(dest)?;
        trace!(
            "header: key1 romcnt {:#010x}, key2 romcnt {:#010x}, seed byte {:#04x}",
            header.key1_romcnt,
            header.key2_romcnt,
            header.key2_seed_byte
        );

        // Working timing words start out as the header defaults.
        self.key1.romcnt = header.key1_romcnt;
        self.key2.romcnt = header.key2_romcnt;
        self.key2.seed_byte = header.key2_seed_byte;
        self.header = Some(header);
        Ok(())
    }

    /// Set up the KEY1 cipher schedule from the header's game code and the
    /// caller-supplied initial schedule table.
    ///
    /// Must run after [`initialize`](Self::initialize) and before
    /// [`begin_key1`](Self::begin_key1). The derived key is applied to the
    /// schedule twice.
    pub fn setup_cipher_schedule(&mut self, initial: &ScheduleTable) -> Result<()> {
        let header = self.header.ok_or(Error::InvalidState {
            operation: "setup_cipher_schedule",
            actual: self.state,
        })?;

        self.key1.key = header.key1_key();
        self.key1.schedule.copy_from_slice(initial);
        self.cipher.apply_key(&mut self.key1.schedule, &self.key1.key);
        self.cipher.apply_key(&mut self.key1.schedule, &self.key1.key);
        Ok(())
    }

    /// Bring the card into KEY1 mode.
    ///
    /// Seeds the session nonce and counter, sends the raw activation
    /// command, initialises the KEY2 seed, then verifies the chip ID under
    /// KEY1 against the raw-mode capture. A platform failure leaves the
    /// state unchanged (beyond counter values already consumed); a chip ID
    /// mismatch drops the session into [`EncryptionState::Unknown`].
    pub fn begin_key1(&mut self) -> Result<()> {
        let header = match (self.state, self.header) {
            (EncryptionState::Raw, Some(header)) => header,
            _ => {
                return Err(Error::InvalidState {
                    operation: "begin_key1",
                    actual: self.state,
                })
            }
        };

        self.key2.mn = KEY1_INIT_MN;
        self.key1.ij = KEY1_INIT_IJ;
        self.key1.k = KEY1_INIT_K;
        self.key1.l = 0;

        self.platform
            .send_command(
                activation_payload(self.key1.ij, self.key1.k),
                0,
                None,
                ControlWord::from_bits(
                    self.key2.romcnt & (FLAGS_CLK_SLOW | FLAGS_DELAY2_MASK | FLAGS_DELAY1_MASK),
                ),
            )
            .map_err(|e| Error::platform(Stage::Key1Activate, e))?;

        // Working KEY1 timing: keep the write/slow bits currently in use,
        // fold the header's post-delay into the pre-delay field, and force
        // large secure-block mode.
        self.key1.romcnt = (self.key2.romcnt & (FLAGS_WR | FLAGS_CLK_SLOW))
            | ((header.key1_romcnt & (FLAGS_CLK_SLOW | FLAGS_DELAY1_MASK))
                .wrapping_add((header.key1_romcnt & FLAGS_DELAY2_MASK) >> 16))
            | FLAGS_SEC_LARGE;

        let cmd = self.key1.encode_command(
            self.cipher.as_ref(),
            CMD_KEY1_INIT_KEY2,
            self.key1.l,
            self.key2.mn,
        );
        self.platform
            .send_command(cmd, 0, None, ControlWord::from_bits(self.key1.romcnt))
            .map_err(|e| Error::platform(Stage::Key2Seed, e))?;

        self.seed_key2();
        self.key1.romcnt |= FLAGS_SEC_EN | FLAGS_SEC_DAT;

        let cmd = self.key1.encode_command(
            self.cipher.as_ref(),
            CMD_KEY1_CHIPID,
            self.key1.l,
            self.key1.ij,
        );
        let mut chipid = [0u8; 4];
        self.platform
            .send_command(
                cmd,
                4,
                Some(&mut chipid),
                ControlWord::from_bits(self.key1.romcnt),
            )
            .map_err(|e| Error::platform(Stage::Key1ChipId, e))?;
        self.key1.chipid = u32::from_le_bytes(chipid);

        if self.key1.chipid != self.raw_chipid {
            self.state = EncryptionState::Unknown;
            return Err(Error::ChipIdMismatch {
                stage: Stage::Key1ChipId,
                expected: self.raw_chipid,
                actual: self.key1.chipid,
            });
        }

        self.state = EncryptionState::Key1;
        debug!("entered KEY1 mode, chip id verified");
        Ok(())
    }

    fn seed_key2(&mut self) {
        let (x, y) = key2::seed(self.key2.seed_byte, self.key2.mn);
        self.key2.x = x;
        self.key2.y = y;
        if self.platform.hw_key2() {
            self.platform.seed_key2(x, y);
        }
    }

    /// Read the 0x4000-byte secure area in four 0x1000-byte chunks.
    ///
    /// Valid only in KEY1 mode. The first failing chunk aborts the read
    /// with a chunk-tagged error; chunks before it have already been
    /// written to `dest` and remain valid, so a caller that can tolerate a
    /// partial read may use that prefix. Cards whose chip ID has the top
    /// bit set require different addressing here and are not supported.
    pub fn read_secure_area(&mut self, dest: &mut [u8; SECURE_AREA_SIZE]) -> Result<()> {
        let header = match (self.state, self.header) {
            (EncryptionState::Key1, Some(header)) => header,
            _ => {
                return Err(Error::InvalidState {
                    operation: "read_secure_area",
                    actual: self.state,
                })
            }
        };

        let romcnt = (header.key1_romcnt
            & (FLAGS_CLK_SLOW | FLAGS_DELAY1_MASK | FLAGS_DELAY2_MASK))
            | FLAGS_SEC_EN
            | FLAGS_SEC_DAT
            | FLAGS_SEC_LARGE;

        for chunk in 0..SECURE_CHUNK_COUNT {
            // Chunk addressing starts at block 4 on the wire.
            let arg = (chunk + 4) as u16;
            let cmd = self.key1.encode_command(
                self.cipher.as_ref(),
                CMD_KEY1_SECURE_READ,
                arg,
                self.key1.ij,
            );
            let slice = &mut dest[chunk * SECURE_CHUNK_SIZE..(chunk + 1) * SECURE_CHUNK_SIZE];
            self.platform
                .send_command(
                    cmd,
                    SECURE_CHUNK_SIZE as u32,
                    Some(slice),
                    ControlWord::from_bits(romcnt),
                )
                .map_err(|e| Error::platform(Stage::SecureRead { chunk: chunk as u8 }, e))?;
            trace!("secure area chunk {} read", chunk);
        }
        Ok(())
    }

    /// Bring the card into KEY2 mode.
    ///
    /// Sends the KEY1-encoded activation command, switches to the header's
    /// KEY2 timing, then verifies the chip ID over the now
    /// keystream-encrypted link. A mismatch drops the session into
    /// [`EncryptionState::Unknown`]; the captured header and raw chip ID
    /// are never modified.
    pub fn begin_key2(&mut self) -> Result<()> {
        let header = match (self.state, self.header) {
            (EncryptionState::Key1, Some(header)) => header,
            _ => {
                return Err(Error::InvalidState {
                    operation: "begin_key2",
                    actual: self.state,
                })
            }
        };

        let cmd = self.key1.encode_command(
            self.cipher.as_ref(),
            CMD_KEY1_ACTIVATE_KEY2,
            self.key1.l,
            self.key1.ij,
        );
        self.platform
            .send_command(cmd, 0, None, ControlWord::from_bits(self.key1.romcnt))
            .map_err(|e| Error::platform(Stage::Key2Activate, e))?;

        self.key2.romcnt = header.key2_romcnt
            & (FLAGS_CLK_SLOW
                | FLAGS_SEC_CMD
                | FLAGS_DELAY2_MASK
                | FLAGS_SEC_EN
                | FLAGS_SEC_DAT
                | FLAGS_DELAY1_MASK);

        // The chip ID request is a raw command word; the link itself now
        // carries the KEY2 encryption.
        let mut chipid = [0u8; 4];
        self.platform
            .send_command(
                CMD_KEY2_CHIPID as u64,
                4,
                Some(&mut chipid),
                ControlWord::from_bits(self.key2.romcnt),
            )
            .map_err(|e| Error::platform(Stage::Key2ChipId, e))?;
        self.key2.chipid = u32::from_le_bytes(chipid);

        if self.key2.chipid != self.raw_chipid {
            self.state = EncryptionState::Unknown;
            return Err(Error::ChipIdMismatch {
                stage: Stage::Key2ChipId,
                expected: self.raw_chipid,
                actual: self.key2.chipid,
            });
        }

        self.state = EncryptionState::Key2;
        debug!("entered KEY2 mode, chip id verified");
        Ok(())
    }
}
